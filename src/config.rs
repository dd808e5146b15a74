use crate::error::{ClassifierError, Result};
use crate::inference_engine::interface::InferenceContext;
use image::imageops::FilterType;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifacts live at `<model_path_prefix>.onnx`.
    pub model_path_prefix: PathBuf,
    pub labels_path: PathBuf,
    pub default_image_path: PathBuf,
    pub input_name: String,
    /// Side of the square the image is stretched to.
    pub input_size: u32,
    pub context: InferenceContext,
    pub resize_filter: FilterType,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path_prefix: PathBuf::from("models/resnet-18/resnet-18"),
            labels_path: PathBuf::from("models/resnet-18/synset.txt"),
            default_image_path: PathBuf::from("models/resnet-18/input.jpg"),
            input_name: "data".to_string(),
            input_size: 224,
            context: InferenceContext::Cpu,
            resize_filter: FilterType::Nearest,
            logger_timezone: local_timezone(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(ClassifierError::InvalidConfig(
                "input_size must be greater than zero".to_string(),
            ));
        }

        if self.input_name.is_empty() {
            return Err(ClassifierError::InvalidConfig(
                "input_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn local_timezone() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
