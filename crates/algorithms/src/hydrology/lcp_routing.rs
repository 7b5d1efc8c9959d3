//! Least-cost-path (priority-flood) flow routing
//!
//! Assigns every reachable interior cell exactly one outward D8 direction by
//! flooding the DEM from its outlets in ascending elevation order. A cell's
//! direction is fixed the moment it is first discovered, and it points back
//! at the already-settled cell that discovered it. The result is a forest of
//! drainage trees rooted at the seed cells; pits and flats need no prior
//! filling because the flood simply climbs out of them.
//!
//! Reference:
//! Metz, M., Mitasova, H., & Harmon, R. S. (2011). Efficient extraction of
//! drainage networks from massive, radar-based elevation models with least
//! cost path search. *Hydrology and Earth System Sciences*, 15, 667–678.

use ndarray::Array2;
use runoff_core::raster::Raster;
use runoff_core::{Algorithm, Error, Result};
use tracing::debug;

use super::direction::{D8Direction, UNVISITED};
use super::frontier::{Frontier, FrontierEntry};
use super::outlets::{seed_outlets, ElevationBand, FlatSeedMask, SeedFrontier};

/// Parameters for least-cost-path routing
#[derive(Debug, Clone, Default)]
pub struct RoutingParams {
    /// Flat wet-area bands whose interior cells become extra outlets
    pub bands: Vec<ElevationBand>,
}

/// Cells in the order they left the frontier.
///
/// Ascending elevation, earliest-discovered first on ties. Drained in
/// reverse (last settled first) by flow accumulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementOrder {
    cells: Vec<(usize, usize)>,
}

impl SettlementOrder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, row: usize, col: usize) {
        self.cells.push((row, col));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Settled cells, first to last
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, usize)> + '_ {
        self.cells.iter().copied()
    }

    /// Settled cells, last to first
    pub fn iter_rev(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().rev().copied()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Position of every settled cell in the order; `None` for cells that
    /// were never settled
    pub fn ranks(&self, rows: usize, cols: usize) -> Array2<Option<usize>> {
        let mut ranks = Array2::from_elem((rows, cols), None);
        for (rank, &(row, col)) in self.cells.iter().enumerate() {
            if let Some(slot) = ranks.get_mut((row, col)) {
                *slot = Some(rank);
            }
        }
        ranks
    }
}

/// Counts describing one routing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingSummary {
    /// Border plus flat seeds
    pub seeds: usize,
    /// Seeds contributed by elevation bands
    pub flat_seeds: usize,
    /// Cells that received a direction
    pub assigned: usize,
}

/// Output of least-cost-path routing
#[derive(Debug, Clone)]
pub struct FlowRouting {
    /// D8 codes (10..80), `0` for seeds and unreached cells
    pub directions: Raster<i32>,
    pub settlement: SettlementOrder,
    pub flat_mask: FlatSeedMask,
    pub summary: RoutingSummary,
}

/// Least-cost-path routing algorithm (seeding + priority flood)
#[derive(Debug, Clone, Default)]
pub struct LcpRouting;

impl Algorithm for LcpRouting {
    type Input = Raster<i32>;
    type Output = FlowRouting;
    type Params = RoutingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LCP Flow Routing"
    }

    fn description(&self) -> &'static str {
        "Assign D8 flow directions by priority-flood from the DEM outlets"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        lcp_routing(&input, &params)
    }
}

/// Seed the outlets and route flow over the whole DEM.
pub fn lcp_routing(dem: &Raster<i32>, params: &RoutingParams) -> Result<FlowRouting> {
    let seeds = seed_outlets(dem, &params.bands)?;
    route_flow(dem, seeds)
}

/// Write a direction into an unvisited slot.
///
/// Each cell may be written exactly once; a second write means the discovery
/// guard is broken and is reported as [`Error::DuplicateAssignment`].
pub(crate) fn assign_direction(
    directions: &mut Raster<i32>,
    row: usize,
    col: usize,
    direction: D8Direction,
) -> Result<()> {
    let existing = directions.get(row, col)?;
    if existing != UNVISITED {
        return Err(Error::DuplicateAssignment { row, col, existing });
    }
    directions.set(row, col, direction.code())
}

/// Run the priority flood from an already seeded frontier.
///
/// # Algorithm
/// 1. Pop the lowest frontier entry (earliest sequence on ties) and append
///    it to the settlement order
/// 2. For each of its 8 neighbors off the outer ring that is neither
///    seeded nor already discovered:
///    - point the neighbor's direction back at the popped cell
///    - push the neighbor with its own elevation and a fresh sequence
/// 3. Repeat until the frontier is empty
///
/// # Arguments
/// * `dem` - Integer elevation grid
/// * `seeds` - Frontier from [`seed_outlets`] over the same DEM
///
/// The outermost ring is never a discovery target, so border cells keep
/// code `0` even when they were not seeded by the caller.
pub fn route_flow(dem: &Raster<i32>, seeds: SeedFrontier) -> Result<FlowRouting> {
    dem.validate_dimensions()?;

    let (rows, cols) = dem.shape();
    if seeds.seeded.dim() != (rows, cols) {
        let (ar, ac) = seeds.seeded.dim();
        return Err(Error::SizeMismatch { er: rows, ec: cols, ar, ac });
    }

    let SeedFrontier {
        entries,
        seeded,
        flat_mask,
        mut counter,
    } = seeds;

    // Targets must satisfy 1 <= row <= rows - 2 and 1 <= col <= cols - 2
    let last_row = rows as isize - 2;
    let last_col = cols as isize - 2;
    let routable = |r: isize, c: isize| r >= 1 && r <= last_row && c >= 1 && c <= last_col;

    let mut directions: Raster<i32> = dem.zeros_like();
    let mut discovered = seeded;
    let mut settlement = SettlementOrder::with_capacity(dem.len());
    let mut frontier = Frontier::with_capacity(entries.len());

    let seed_count = entries.len();
    frontier.extend(entries);

    let mut assigned = 0usize;
    while let Some(cell) = frontier.pop() {
        settlement.push(cell.row, cell.col);

        for direction in D8Direction::ALL {
            let (dr, dc) = direction.offset();
            if !routable(cell.row as isize + dr, cell.col as isize + dc) {
                continue;
            }

            let (nr, nc) = directions.offset(cell.row, cell.col, dr, dc)?;
            if discovered[(nr, nc)] {
                continue;
            }
            discovered[(nr, nc)] = true;

            // Neighbor drains back into the cell that found it
            assign_direction(&mut directions, nr, nc, direction.opposite())?;
            assigned += 1;

            let elevation = dem.get(nr, nc)?;
            frontier.push(FrontierEntry::new(nr, nc, elevation, &mut counter));
        }
    }

    let summary = RoutingSummary {
        seeds: seed_count,
        flat_seeds: flat_mask.count(),
        assigned,
    };

    debug!(
        "routing settled {} cells: {} seeds, {} directions, {} sequence numbers",
        settlement.len(),
        summary.seeds,
        summary.assigned,
        counter.issued()
    );

    Ok(FlowRouting {
        directions,
        settlement,
        flat_mask,
        summary,
    })
}
