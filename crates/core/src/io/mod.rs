//! Loading and persistence collaborators for integer grids
//!
//! The routing core never touches files. These helpers sit at the edges of a
//! run: one produces the elevation grid, the other serializes the direction
//! and accumulation grids with the input's georeferencing.

mod native;

pub use native::{read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer};
