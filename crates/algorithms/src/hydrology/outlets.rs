//! Outlet seeding for least-cost-path routing
//!
//! Builds the initial frontier: every cell on the outer border of the DEM,
//! plus every interior cell whose elevation falls inside one of the
//! operator-supplied flat/wet elevation bands (sea, lake, ocean). The band
//! seeds act as artificial outlets and keep the flood from drawing long
//! artificial channels across large level water bodies.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use runoff_core::raster::Raster;
use runoff_core::{Error, Result};
use tracing::debug;

use super::frontier::{FrontierEntry, SequenceCounter};

/// Tolerance applied to a band when none is given
pub const DEFAULT_BAND_TOLERANCE: i32 = 2;

/// Elevation band marking a flat wet area.
///
/// Contains `e` when `center - tolerance <= e < center + tolerance`: the
/// lower bound is inclusive and the upper bound exclusive, so the default
/// tolerance of 2 covers four integer elevations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevationBand {
    pub center: i32,
    pub tolerance: i32,
}

impl ElevationBand {
    /// Band with the default tolerance
    pub fn new(center: i32) -> Self {
        Self {
            center,
            tolerance: DEFAULT_BAND_TOLERANCE,
        }
    }

    pub fn with_tolerance(center: i32, tolerance: i32) -> Self {
        Self { center, tolerance }
    }

    /// Whether `elevation` falls inside the band
    pub fn contains(&self, elevation: i32) -> bool {
        let e = i64::from(elevation);
        let c = i64::from(self.center);
        let t = i64::from(self.tolerance);
        e >= c - t && e < c + t
    }

    /// Reject bands that cannot contain any elevation
    pub fn validate(&self) -> Result<()> {
        if self.tolerance < 1 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                value: self.tolerance.to_string(),
                reason: "band tolerance must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ElevationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.center, self.tolerance)
    }
}

impl FromStr for ElevationBand {
    type Err = Error;

    /// Parse `"center"` or `"center:tolerance"`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidParameter {
            name: "band",
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.trim().splitn(2, ':');
        let center = parts
            .next()
            .unwrap_or_default()
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid("center must be an integer elevation"))?;

        let band = match parts.next() {
            Some(t) => {
                let tolerance = t
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| invalid("tolerance must be an integer"))?;
                ElevationBand::with_tolerance(center, tolerance)
            }
            None => ElevationBand::new(center),
        };

        band.validate()?;
        Ok(band)
    }
}

/// Cells injected as extra seeds because they belong to a flat wet band.
///
/// Written once during seeding, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatSeedMask {
    mask: Array2<bool>,
}

impl FlatSeedMask {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            mask: Array2::from_elem((rows, cols), false),
        }
    }

    /// Whether `(row, col)` was seeded from a flat band.
    /// Coordinates outside the grid are never flat.
    pub fn is_flat(&self, row: usize, col: usize) -> bool {
        self.mask.get((row, col)).copied().unwrap_or(false)
    }

    /// Number of flat seed cells
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&flat| flat).count()
    }

    /// Flat seed cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.mask
            .indexed_iter()
            .filter(|(_, &flat)| flat)
            .map(|(idx, _)| idx)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.mask.dim()
    }
}

/// Initial frontier produced by [`seed_outlets`]
#[derive(Debug, Clone)]
pub struct SeedFrontier {
    /// Seeds in sequence order
    pub entries: Vec<FrontierEntry>,
    /// Every seeded cell, border and flat alike. These slots are reserved:
    /// routing never assigns them a direction.
    pub seeded: Array2<bool>,
    /// Seeds that came from elevation bands
    pub flat_mask: FlatSeedMask,
    /// Counter continued by the router
    pub counter: SequenceCounter,
}

impl SeedFrontier {
    /// Number of border seeds, independent of any later edits to `entries`
    pub fn border_count(&self) -> usize {
        let seeded = self.seeded.iter().filter(|&&s| s).count();
        seeded.saturating_sub(self.flat_mask.count())
    }
}

/// Seed the frontier from the DEM border and optional flat bands.
///
/// Sequence numbers follow a fixed scan so identical inputs always yield an
/// identical frontier:
/// 1. border cells, row-major;
/// 2. for each band in list order, remaining cells row-major.
///
/// A cell matched by several bands is seeded once, by the first band.
pub fn seed_outlets(dem: &Raster<i32>, bands: &[ElevationBand]) -> Result<SeedFrontier> {
    dem.validate_dimensions()?;
    for band in bands {
        band.validate()?;
    }

    let (rows, cols) = dem.shape();
    let mut counter = SequenceCounter::new();
    let mut seeded = Array2::from_elem((rows, cols), false);
    let mut flat_mask = FlatSeedMask::new(rows, cols);
    let mut entries = Vec::with_capacity(2 * (rows + cols));

    for ((row, col), elevation) in dem.indexed_iter() {
        if dem.is_border(row, col) {
            entries.push(FrontierEntry::new(row, col, elevation, &mut counter));
            seeded[(row, col)] = true;
        }
    }
    let border = entries.len();

    for band in bands {
        let before = entries.len();
        for ((row, col), elevation) in dem.indexed_iter() {
            if seeded[(row, col)] || !band.contains(elevation) {
                continue;
            }
            entries.push(FrontierEntry::new(row, col, elevation, &mut counter));
            seeded[(row, col)] = true;
            flat_mask.mask[(row, col)] = true;
        }
        debug!("band {} seeded {} flat cells", band, entries.len() - before);
    }

    debug!(
        "seeded {} outlets ({} border, {} flat)",
        entries.len(),
        border,
        entries.len() - border
    );

    Ok(SeedFrontier {
        entries,
        seeded,
        flat_mask,
        counter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plateau(rows: usize, cols: usize, border: i32, interior: i32) -> Raster<i32> {
        let mut dem = Raster::filled(rows, cols, interior);
        for row in 0..rows {
            for col in 0..cols {
                if dem.is_border(row, col) {
                    dem.set(row, col, border).unwrap();
                }
            }
        }
        dem
    }

    #[test]
    fn test_band_bounds_are_half_open() {
        let band = ElevationBand::new(100);
        assert!(!band.contains(97));
        assert!(band.contains(98));
        assert!(band.contains(101));
        assert!(!band.contains(102));

        let extreme = ElevationBand::new(i32::MAX);
        assert!(extreme.contains(i32::MAX));
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!("120".parse::<ElevationBand>().unwrap(), ElevationBand::new(120));
        assert_eq!(
            " -4:1 ".parse::<ElevationBand>().unwrap(),
            ElevationBand::with_tolerance(-4, 1)
        );
        assert!("lake".parse::<ElevationBand>().is_err());
        assert!("120:x".parse::<ElevationBand>().is_err());
        assert!(matches!(
            "120:0".parse::<ElevationBand>(),
            Err(Error::InvalidParameter { name: "tolerance", .. })
        ));
    }

    #[test]
    fn test_border_seeded_row_major() {
        let dem = plateau(4, 5, 1, 9);
        let seeds = seed_outlets(&dem, &[]).unwrap();

        let cells: Vec<(usize, usize)> = seeds.entries.iter().map(|e| (e.row, e.col)).collect();
        assert_eq!(
            cells,
            vec![
                (0, 0), (0, 1), (0, 2), (0, 3), (0, 4),
                (1, 0), (1, 4),
                (2, 0), (2, 4),
                (3, 0), (3, 1), (3, 2), (3, 3), (3, 4),
            ]
        );
        let sequences: Vec<u64> = seeds.entries.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, (0..14).collect::<Vec<u64>>());
        assert_eq!(seeds.counter.issued(), 14);
        assert_eq!(seeds.border_count(), 14);
        assert_eq!(seeds.flat_mask.count(), 0);
    }

    #[test]
    fn test_band_seeds_follow_border_and_are_marked() {
        let mut dem = plateau(5, 5, 50, 30);
        dem.set(1, 3, 7).unwrap();
        dem.set(3, 1, 8).unwrap();

        let seeds = seed_outlets(&dem, &[ElevationBand::new(7)]).unwrap();

        assert_eq!(seeds.entries.len(), 16 + 2);
        let flats: Vec<(usize, usize, u64)> = seeds.entries[16..]
            .iter()
            .map(|e| (e.row, e.col, e.sequence))
            .collect();
        assert_eq!(flats, vec![(1, 3, 16), (3, 1, 17)]);

        assert!(seeds.flat_mask.is_flat(1, 3));
        assert!(seeds.flat_mask.is_flat(3, 1));
        assert!(!seeds.flat_mask.is_flat(2, 2));
        assert!(!seeds.flat_mask.is_flat(0, 0));
        assert!(seeds.seeded[(3, 1)]);
    }

    #[test]
    fn test_border_count_survives_trimmed_entries() {
        let mut dem = plateau(5, 5, 50, 30);
        dem.set(1, 3, 7).unwrap();
        dem.set(3, 1, 8).unwrap();

        let mut seeds = seed_outlets(&dem, &[ElevationBand::new(7)]).unwrap();
        assert_eq!(seeds.border_count(), 16);

        seeds.entries.truncate(1);
        assert_eq!(seeds.border_count(), 16);
        assert_eq!(seeds.flat_mask.count(), 2);
    }

    #[test]
    fn test_overlapping_bands_seed_once_in_band_order() {
        let mut dem = plateau(5, 5, 50, 30);
        dem.set(2, 2, 10).unwrap();
        dem.set(1, 1, 12).unwrap();

        // [9, 11) takes (2, 2); [9, 13) re-matches it and adds (1, 1)
        let bands = [
            ElevationBand::with_tolerance(10, 1),
            ElevationBand::with_tolerance(11, 2),
        ];
        let seeds = seed_outlets(&dem, &bands).unwrap();

        let flats: Vec<(usize, usize, u64)> = seeds.entries[16..]
            .iter()
            .map(|e| (e.row, e.col, e.sequence))
            .collect();
        assert_eq!(flats, vec![(2, 2, 16), (1, 1, 17)]);
        assert_eq!(seeds.flat_mask.cells().collect::<Vec<_>>(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_border_cells_never_flat() {
        // Whole grid sits inside the band; only the interior counts as flat
        let dem = plateau(4, 4, 3, 3);
        let seeds = seed_outlets(&dem, &[ElevationBand::new(3)]).unwrap();
        assert_eq!(seeds.entries.len(), 16);
        assert_eq!(seeds.flat_mask.count(), 4);
        assert!(!seeds.flat_mask.is_flat(0, 2));
    }

    #[test]
    fn test_rejects_empty_grid_and_bad_band() {
        let empty: Raster<i32> = Raster::new(0, 4);
        assert!(matches!(
            seed_outlets(&empty, &[]),
            Err(Error::InvalidDimensions { .. })
        ));

        let dem = plateau(3, 3, 1, 1);
        assert!(seed_outlets(&dem, &[ElevationBand::with_tolerance(1, 0)]).is_err());
    }
}
