//! GeoTIFF reading/writing on top of the `tiff` crate
//!
//! Elevation input may use any integer or floating point sample type and is
//! cast into the requested element type. Result grids are always written as
//! single-band 32-bit signed integers, carrying the input's pixel scale and
//! tiepoint so the outputs line up with the DEM they were derived from.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::GrayI32;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

// The decoder maps codes 33550, 33922 and 34735 onto these named variants;
// `Tag::Unknown(code)` never matches them on read.
const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;

/// Read the first band of a GeoTIFF file into a Raster.
///
/// Samples are cast strictly: a value the target type cannot hold (NaN,
/// infinity, out of range) fails the whole load with
/// [`Error::UnsupportedDataType`]. There is no nodata handling; every cell of
/// the DEM must carry an elevation.
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file))
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

fn cast_samples<T, S>(buf: Vec<S>) -> Result<Vec<T>>
where
    T: RasterElement,
    S: num_traits::NumCast + Copy + std::fmt::Display,
{
    buf.into_iter()
        .map(|v| {
            T::from_sample(v).ok_or_else(|| {
                Error::UnsupportedDataType(format!("sample {} does not fit the target type", v))
            })
        })
        .collect()
}

fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;

    let rows = height as usize;
    let cols = width as usize;

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::U8(buf) => cast_samples(buf)?,
        DecodingResult::U16(buf) => cast_samples(buf)?,
        DecodingResult::U32(buf) => cast_samples(buf)?,
        DecodingResult::U64(buf) => cast_samples(buf)?,
        DecodingResult::I8(buf) => cast_samples(buf)?,
        DecodingResult::I16(buf) => cast_samples(buf)?,
        DecodingResult::I32(buf) => cast_samples(buf)?,
        DecodingResult::I64(buf) => cast_samples(buf)?,
        DecodingResult::F32(buf) => cast_samples(buf)?,
        DecodingResult::F64(buf) => cast_samples(buf)?,
        #[allow(unreachable_patterns)]
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    // Multi-band files come back interleaved; keep only the first band
    let data = if data.len() > rows * cols && rows * cols > 0 && data.len() % (rows * cols) == 0 {
        let bands = data.len() / (rows * cols);
        data.into_iter().step_by(bands).collect()
    } else {
        data
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }

    Ok(raster)
}

/// ModelPixelScaleTag + ModelTiepointTag, if both are present
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// Write an integer Raster to a GeoTIFF file
pub fn write_geotiff<P: AsRef<Path>>(raster: &Raster<i32>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode_geotiff(raster, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an integer Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer(raster: &Raster<i32>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf))?;
    Ok(buf)
}

fn encode_geotiff<W: Write + Seek>(raster: &Raster<i32>, writer: W) -> Result<()> {
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = raster.shape();

    // Standard layout is row-major already; iter() follows it
    let data: Vec<i32> = raster.data().iter().copied().collect();

    let mut image = encoder.new_image::<GrayI32>(cols as u32, rows as u32)?;

    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image.encoder().write_tag(MODEL_PIXEL_SCALE, &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image.encoder().write_tag(MODEL_TIEPOINT, &tiepoint[..])?;

    // Version 1.1.0 with GTModelTypeGeoKey and GTRasterTypeGeoKey, so that
    // GIS tools recognise the file as a GeoTIFF
    let geokeys: [u16; 12] = [
        1, 1, 0, 2,
        1024, 0, 1, 1,
        1025, 0, 1, 1,
    ];
    image.encoder().write_tag(GEO_KEY_DIRECTORY, &geokeys[..])?;

    image.write_data(&data)?;

    Ok(())
}
