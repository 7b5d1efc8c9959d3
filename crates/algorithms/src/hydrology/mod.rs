//! Hydrological analysis algorithms
//!
//! Least-cost-path runoff modelling from integer Digital Elevation Models:
//! - Outlets: border and flat wet-area seeding of the flood frontier
//! - LCP routing: priority-flood D8 flow direction, one outward edge per cell
//! - LCP accumulation: flow accumulation in reverse settlement order
//! - Runoff: the whole pipeline in one call

mod direction;
mod frontier;
mod lcp_accumulation;
mod lcp_routing;
mod outlets;
mod runoff;

pub use direction::{D8Direction, UNVISITED};
pub use frontier::{Frontier, FrontierEntry, SequenceCounter};
pub use lcp_accumulation::{
    accumulate_flow, flow_accumulation_lcp, AccumulationMode, AccumulationParams, LcpAccumulation,
    FLAT_SATURATION,
};
pub use lcp_routing::{
    lcp_routing, route_flow, FlowRouting, LcpRouting, RoutingParams, RoutingSummary,
    SettlementOrder,
};
pub use outlets::{seed_outlets, ElevationBand, FlatSeedMask, SeedFrontier, DEFAULT_BAND_TOLERANCE};
pub use runoff::{runoff, Runoff, RunoffParams, RunoffResult};
