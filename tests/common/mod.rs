#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

fn format_of(path: &Path) -> ImageFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap()
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "bmp" => ImageFormat::Bmp,
        _ => ImageFormat::Png,
    }
}

fn is_ppm(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".ppm")
}

/// Binary P6 pixmap.
fn write_ppm(path: &Path, image: &RgbImage) {
    let (width, height) = image.dimensions();
    let mut bytes = format!("P6\n{} {}\n255\n", width, height).into_bytes();
    bytes.extend_from_slice(image.as_raw());
    fs::write(path, bytes).unwrap();
}

fn write_rgb(path: &Path, image: &RgbImage) {
    if is_ppm(path) {
        write_ppm(path, image);
    } else {
        image.save_with_format(path, format_of(path)).unwrap();
    }
}

/// Solid RGB image, format chosen from the extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    write_rgb(path, &RgbImage::from_pixel(width, height, Rgb([120, 60, 30])));
}

/// Uniform annotation raster. Stored as RGB for bitmaps and pixmaps.
pub fn write_mask(path: &Path, width: u32, height: u32, value: u8) {
    ensure_parent(path);
    let format = format_of(path);
    if format == ImageFormat::Bmp || is_ppm(path) {
        write_rgb(path, &RgbImage::from_pixel(width, height, Rgb([value; 3])));
    } else {
        GrayImage::from_pixel(width, height, Luma([value]))
            .save_with_format(path, format)
            .unwrap();
    }
}

/// PNG mask with 255 wherever `foreground(x, y)`.
pub fn write_mask_with<F: Fn(u32, u32) -> bool>(path: &Path, width: u32, height: u32, foreground: F) {
    ensure_parent(path);
    GrayImage::from_fn(width, height, |x, y| {
        Luma([if foreground(x, y) { 255 } else { 0 }])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

pub fn write_garbage(path: &Path) {
    ensure_parent(path);
    fs::write(path, b"this is not an image").unwrap();
}

fn element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) {
    out.extend(data_type.to_le_bytes());
    out.extend((data.len() as u32).to_le_bytes());
    out.extend(data);
    out.resize(out.len() + (8 - data.len() % 8) % 8, 0);
}

/// One uint8 matrix of a MAT file: name, dimensions and column-major data.
pub struct MatArray<'a> {
    pub name: &'a str,
    pub dims: Vec<usize>,
    pub data: Vec<u8>,
}

impl<'a> MatArray<'a> {
    /// 2-D matrix from row-major `rows`.
    pub fn from_rows(name: &'a str, rows: Vec<Vec<u8>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let data = (0..width)
            .flat_map(|x| rows.iter().map(move |row| row[x]))
            .collect();
        Self {
            name,
            dims: vec![height, width],
            data,
        }
    }
}

/// Uncompressed little-endian MAT level-5 file with one uint8 matrix per `(name, rows)`.
pub fn write_mat(path: &Path, fields: &[(&str, Vec<Vec<u8>>)]) {
    let arrays: Vec<MatArray> = fields
        .iter()
        .map(|(name, rows)| MatArray::from_rows(name, rows.clone()))
        .collect();
    write_mat_arrays(path, &arrays);
}

pub fn write_mat_arrays(path: &Path, arrays: &[MatArray]) {
    const MI_INT8: u32 = 1;
    const MI_UINT8: u32 = 2;
    const MI_INT32: u32 = 5;
    const MI_UINT32: u32 = 6;
    const MI_MATRIX: u32 = 14;
    const MX_UINT8_CLASS: u32 = 9;

    ensure_parent(path);
    let mut bytes = b"MATLAB 5.0 MAT-file, Platform: test".to_vec();
    bytes.resize(116, b' ');
    bytes.extend([0u8; 8]);
    bytes.extend(0x0100u16.to_le_bytes());
    bytes.extend(b"IM");

    for array in arrays {
        let mut body = Vec::new();
        let flags = [MX_UINT8_CLASS.to_le_bytes(), 0u32.to_le_bytes()].concat();
        element(&mut body, MI_UINT32, &flags);
        let dims: Vec<u8> = array
            .dims
            .iter()
            .flat_map(|&d| (d as i32).to_le_bytes())
            .collect();
        element(&mut body, MI_INT32, &dims);
        element(&mut body, MI_INT8, array.name.as_bytes());
        element(&mut body, MI_UINT8, &array.data);

        bytes.extend(MI_MATRIX.to_le_bytes());
        bytes.extend((body.len() as u32).to_le_bytes());
        bytes.extend(body);
    }

    fs::write(path, bytes).unwrap();
}
