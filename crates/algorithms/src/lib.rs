//! # Runoff Algorithms
//!
//! Least-cost-path runoff modelling over integer elevation grids.
//!
//! ## Available Algorithm Categories
//!
//! - **hydrology**: outlet seeding, priority-flood flow direction, flow
//!   accumulation and the combined runoff pipeline

pub mod hydrology;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::hydrology::{
        accumulate_flow, lcp_routing, runoff, seed_outlets, AccumulationMode,
        AccumulationParams, D8Direction, ElevationBand, FlowRouting, LcpAccumulation,
        LcpRouting, Runoff, RunoffParams, RunoffResult, RoutingParams,
    };
    pub use runoff_core::prelude::*;
}
