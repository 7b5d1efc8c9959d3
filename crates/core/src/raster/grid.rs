//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement};
use ndarray::Array2;

/// A georeferenced 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in a dense row-major grid indexed
/// by `(row, col)`, together with the geotransform of the source data.
/// Column is the grid `x` coordinate and row is `y`.
///
/// All checked accessors report coordinates outside the grid as
/// [`Error::IndexOutOfBounds`] instead of panicking, so an arithmetic slip in
/// neighbor expansion aborts a run through the normal error channel.
///
/// # Example
///
/// ```
/// use runoff_core::Raster;
///
/// let mut raster: Raster<i32> = Raster::new(100, 100);
/// raster.set(10, 20, 42).unwrap();
/// assert_eq!(raster.get(10, 20).unwrap(), 42);
/// assert!(raster.get(100, 0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    /// Affine transformation
    transform: GeoTransform,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            transform: GeoTransform::default(),
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            transform: GeoTransform::default(),
        }
    }

    /// Create a raster from row-major data.
    ///
    /// Rejects empty dimensions and a data length that does not equal
    /// `rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
                reason: "width and height must be positive".to_string(),
            });
        }
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
                reason: format!("expected {} samples, got {}", rows * cols, data.len()),
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            data: array,
            transform: GeoTransform::default(),
        })
    }

    /// Create a zero-filled raster of the same shape and georeferencing,
    /// possibly of a different element type
    pub fn zeros_like<U: RasterElement>(&self) -> Raster<U> {
        Raster {
            data: Array2::zeros(self.data.dim()),
            transform: self.transform,
        }
    }

    /// Check that the raster has a usable shape: both dimensions positive
    pub fn validate_dimensions(&self) -> Result<()> {
        if self.rows() == 0 || self.cols() == 0 {
            return Err(Error::InvalidDimensions {
                width: self.cols(),
                height: self.rows(),
                reason: "width and height must be positive".to_string(),
            });
        }
        Ok(())
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `(row, col)` lies on the outermost ring of the grid
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows() || col + 1 == self.cols()
    }

    /// Resolve a signed offset from `(row, col)` into grid coordinates.
    ///
    /// Returns [`Error::IndexOutOfBounds`] when the target falls outside the
    /// grid.
    pub fn offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Result<(usize, usize)> {
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        if nr < 0 || nc < 0 || nr as usize >= self.rows() || nc as usize >= self.cols() {
            return Err(self.out_of_bounds(nr, nc));
        }
        Ok((nr as usize, nc as usize))
    }

    fn out_of_bounds(&self, row: isize, col: isize) -> Error {
        Error::IndexOutOfBounds {
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or_else(|| self.out_of_bounds(row as isize, col as isize))
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(self.out_of_bounds(row as isize, col as isize));
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Iterate `((row, col), value)` in row-major order
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        self.data.indexed_iter().map(|(idx, &v)| (idx, v))
    }

    // Metadata

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Set the geotransform
    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, cell count)
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }
            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            count,
        }
    }
}

impl Raster<i32> {
    /// Sum of all cells, widened to avoid overflow on large grids
    pub fn sum(&self) -> i64 {
        self.data.iter().map(|&v| i64::from(v)).sum()
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<i32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<i32> = Raster::new(10, 10);
        raster.set(5, 5, 42).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42);
    }

    #[test]
    fn test_out_of_bounds_is_reported() {
        let mut raster: Raster<i32> = Raster::new(4, 6);
        assert!(matches!(
            raster.get(4, 0),
            Err(Error::IndexOutOfBounds { row: 4, col: 0, rows: 4, cols: 6 })
        ));
        assert!(raster.set(0, 6, 1).is_err());
        assert!(matches!(
            raster.offset(0, 3, -1, 0),
            Err(Error::IndexOutOfBounds { row: -1, col: 3, .. })
        ));
        assert_eq!(raster.offset(2, 3, 1, -1).unwrap(), (3, 2));
    }

    #[test]
    fn test_from_vec_rejects_bad_dimensions() {
        assert!(matches!(
            Raster::<i32>::from_vec(vec![1, 2, 3], 2, 2),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Raster::<i32>::from_vec(Vec::new(), 0, 5),
            Err(Error::InvalidDimensions { .. })
        ));

        let raster = Raster::from_vec(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
        assert_eq!(raster.get(1, 0).unwrap(), 4);
    }

    #[test]
    fn test_border_ring() {
        let raster: Raster<i32> = Raster::new(4, 5);
        let border = raster
            .indexed_iter()
            .filter(|&((r, c), _)| raster.is_border(r, c))
            .count();
        assert_eq!(border, 2 * 5 + 2 * 2);
        assert!(!raster.is_border(1, 1));
        assert!(raster.is_border(3, 2));
    }

    #[test]
    fn test_zeros_like_keeps_georeferencing() {
        let mut dem: Raster<i32> = Raster::filled(3, 4, 7);
        dem.set_transform(GeoTransform::new(105.0, 57.0, 0.5, -0.5));
        let out: Raster<i32> = dem.zeros_like();
        assert_eq!(out.shape(), (3, 4));
        assert_eq!(out.transform(), dem.transform());
        assert_eq!(out.sum(), 0);
    }

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<i32> = Raster::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                raster.set(i, j, (i * 10 + j) as i32).unwrap();
            }
        }

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(0));
        assert_eq!(stats.max, Some(99));
        assert_eq!(stats.count, 100);
        assert_eq!(raster.sum(), 4950);
    }
}
