//! End-to-end runoff modelling: seed, route, accumulate

use runoff_core::raster::Raster;
use runoff_core::{Algorithm, Error, Result};
use tracing::debug;

use super::lcp_accumulation::{accumulate_flow, AccumulationParams};
use super::lcp_routing::{lcp_routing, RoutingParams, RoutingSummary, SettlementOrder};
use super::outlets::FlatSeedMask;

/// Parameters for a full runoff run
#[derive(Debug, Clone, Default)]
pub struct RunoffParams {
    pub routing: RoutingParams,
    pub accumulation: AccumulationParams,
}

/// Everything a runoff run produces.
///
/// `directions` and `accumulation` share the DEM's shape and geotransform.
#[derive(Debug, Clone)]
pub struct RunoffResult {
    pub directions: Raster<i32>,
    pub accumulation: Raster<i32>,
    pub settlement: SettlementOrder,
    pub flat_mask: FlatSeedMask,
    pub summary: RoutingSummary,
}

/// Least-cost-path runoff model
#[derive(Debug, Clone, Default)]
pub struct Runoff;

impl Algorithm for Runoff {
    type Input = Raster<i32>;
    type Output = RunoffResult;
    type Params = RunoffParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LCP Runoff"
    }

    fn description(&self) -> &'static str {
        "Flow direction and flow accumulation by least-cost-path routing"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        runoff(&input, &params)
    }
}

/// Compute flow directions and flow accumulation for a DEM.
///
/// Routing runs to completion before accumulation starts; accumulation needs
/// the full direction grid and settlement order.
pub fn runoff(dem: &Raster<i32>, params: &RunoffParams) -> Result<RunoffResult> {
    dem.validate_dimensions()?;
    for band in &params.routing.bands {
        band.validate()?;
    }

    let routing = lcp_routing(dem, &params.routing)?;
    let accumulation = accumulate_flow(&routing, &params.accumulation)?;

    debug!(
        "runoff on {}x{}: {} directions, accumulation total {}",
        dem.cols(),
        dem.rows(),
        routing.summary.assigned,
        accumulation.sum()
    );

    Ok(RunoffResult {
        directions: routing.directions,
        accumulation,
        settlement: routing.settlement,
        flat_mask: routing.flat_mask,
        summary: routing.summary,
    })
}
