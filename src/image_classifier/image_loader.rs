use crate::error::{ClassifierError, Result};
use image::{DynamicImage, ImageError};
use std::path::Path;

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|error| match error {
        ImageError::IoError(source) => ClassifierError::from_io(path, source),
        source => ClassifierError::ImageDecode {
            path: path.to_path_buf(),
            source,
        },
    })
}
