use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba};

pub struct ImagePreprocessor {
    size: u32,
    filter: FilterType,
}

impl ImagePreprocessor {
    pub fn new(size: u32, filter: FilterType) -> Self {
        Self { size, filter }
    }

    /// Stretches the image onto a `size`x`size` canvas. Aspect ratio is not kept.
    pub fn resize(&self, image: &DynamicImage) -> RgbImage {
        let rgb = flatten_onto_black(image);
        imageops::resize(&rgb, self.size, self.size, self.filter)
    }

    /// Planar RGB buffer of length `3 * size * size` with raw 0-255 values.
    pub fn preprocess(&self, image: &DynamicImage) -> Vec<f32> {
        to_planar_buffer(&self.resize(image))
    }
}

fn flatten_onto_black(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let blend = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Splits interleaved pixels into an R plane, then a G plane, then a B plane, each row-major.
pub fn to_planar_buffer(image: &RgbImage) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let plane = width as usize * height as usize;
    let mut buffer = vec![0.0f32; 3 * plane];

    for row in 0..height {
        for col in 0..width {
            let Rgb([r, g, b]) = *image.get_pixel(col, row);
            let offset = row as usize * width as usize + col as usize;
            buffer[offset] = f32::from(r);
            buffer[plane + offset] = f32::from(g);
            buffer[2 * plane + offset] = f32::from(b);
        }
    }

    buffer
}
