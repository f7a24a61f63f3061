//! Readers for the raster and label-matrix files the datasets ship.
//!
//! Every reader opens its file, decodes it completely and drops the handle before returning.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader, Luma, RgbImage};
use matfile::{MatFile, NumericData};
use ndarray::{Array2, ShapeBuilder};
use num_traits::AsPrimitive;

use crate::errors::{MedSegError, Result};

fn decode(path: &Path, operation: &str) -> Result<DynamicImage> {
    let decode_error = |source: Box<dyn std::error::Error + Send + Sync>| MedSegError::Decode {
        path: path.to_path_buf(),
        operation: operation.to_string(),
        source,
    };

    ImageReader::open(path)
        .map_err(|e| decode_error(Box::new(e)))?
        .with_guessed_format()
        .map_err(|e| decode_error(Box::new(e)))?
        .decode()
        .map_err(|e| decode_error(Box::new(e)))
}

/// Reads an image as 8-bit RGB whatever its native colour mode.
pub fn open_image(path: &Path) -> Result<RgbImage> {
    Ok(decode(path, "image read")?.into_rgb8())
}

/// Reads an annotation raster as 8-bit single-channel intensity.
///
/// Colour rasters are reduced with ITU-R 601-2 luma (`L = R*299/1000 + G*587/1000 + B*114/1000`),
/// the weights the annotations were thresholded with upstream. Alpha is dropped.
pub fn open_annotation(path: &Path) -> Result<GrayImage> {
    let image = decode(path, "annotation read")?;
    if image.color().has_color() {
        Ok(rec601_luma(&image.into_rgb8()))
    } else {
        Ok(image.into_luma8())
    }
}

fn rec601_luma(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0.map(u32::from);
        // 16.16 fixed point, rounded
        let l = (r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

/// Reads the first present field of `fields` from a MAT level-5 file as a `(rows, cols)` matrix.
pub fn open_label_matrix(path: &Path, fields: &[&'static str]) -> Result<Array2<f64>> {
    let file = File::open(path).map_err(|e| MedSegError::Decode {
        path: path.to_path_buf(),
        operation: "label matrix open".to_string(),
        source: Box::new(e),
    })?;
    let mat = MatFile::parse(BufReader::new(file)).map_err(|e| MedSegError::LabelMatrix {
        path: path.to_path_buf(),
        reason: format!("{:?}", e),
    })?;

    let array = fields
        .iter()
        .find_map(|field| mat.find_by_name(field))
        .ok_or_else(|| MedSegError::MissingLabelField {
            path: path.to_path_buf(),
            fields: fields.to_vec(),
        })?;

    let size = array.size();
    if size.len() != 2 {
        return Err(MedSegError::LabelMatrix {
            path: path.to_path_buf(),
            reason: format!("field {} has {} dimensions, expected 2", array.name(), size.len()),
        });
    }

    let values = match array.data() {
        NumericData::Int8 { real, .. } => widen(real),
        NumericData::UInt8 { real, .. } => widen(real),
        NumericData::Int16 { real, .. } => widen(real),
        NumericData::UInt16 { real, .. } => widen(real),
        NumericData::Int32 { real, .. } => widen(real),
        NumericData::UInt32 { real, .. } => widen(real),
        NumericData::Int64 { real, .. } => widen(real),
        NumericData::UInt64 { real, .. } => widen(real),
        NumericData::Single { real, .. } => widen(real),
        NumericData::Double { real, .. } => real.clone(),
    };

    // MAT files store matrices column-major.
    Array2::from_shape_vec((size[0], size[1]).f(), values).map_err(|e| MedSegError::LabelMatrix {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn widen<T: AsPrimitive<f64>>(values: &[T]) -> Vec<f64> {
    values.iter().map(|v| v.as_()).collect()
}
