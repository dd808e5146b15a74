use crate::config::Config;
use crate::error::{ClassifierError, Result};
use crate::image_classifier::labels::load_labels;
use crate::image_classifier::preprocess::ImagePreprocessor;
use crate::inference_engine::impl_tract_onnx::InferenceEngineTractOnnx;
use crate::inference_engine::interface::{InferenceEngine, InputDescriptor};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class_name: String,
    pub probability: f32,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top class: {}, probability: {:.6}",
            self.class_name, self.probability
        )
    }
}

/// Owns the inference engine for its whole lifetime and turns one image into one labeled class.
pub struct ImageClassifier {
    engine: Box<dyn InferenceEngine>,
    labels: Vec<String>,
    preprocessor: ImagePreprocessor,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifier {
    pub fn new(config: &Config, logger: Arc<dyn Logger + Send + Sync>) -> Result<Self> {
        config.validate()?;

        let inputs = [InputDescriptor::image(&config.input_name, config.input_size)];
        let engine = InferenceEngineTractOnnx::new(
            &config.model_path_prefix,
            &inputs,
            config.context,
            logger.with_namespace("classifier"),
        )?;

        Self::with_engine(config, Box::new(engine), logger)
    }

    pub fn with_engine(
        config: &Config,
        engine: Box<dyn InferenceEngine>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self> {
        config.validate()?;

        let logger = logger.with_namespace("classifier");

        let labels = load_labels(&config.labels_path)
            .map_err(|e| ClassifierError::LabelResourceFailure(Box::new(e)))?;
        let _ = logger.info(&format!(
            "Loaded {} class labels from {}",
            labels.len(),
            config.labels_path.display()
        ));

        Ok(Self {
            engine,
            labels,
            preprocessor: ImagePreprocessor::new(config.input_size, config.resize_filter),
            logger,
        })
    }

    pub fn predict(&self, image: &DynamicImage) -> Result<Classification> {
        let buffer = self.preprocessor.preprocess(image);
        let _ = self.logger.info(&format!(
            "Preprocessed {}x{} image into {} values",
            image.width(),
            image.height(),
            buffer.len()
        ));

        let probabilities = self
            .engine
            .predict(&[buffer])?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClassifierError::InferenceFailure("engine returned an empty batch".to_string())
            })?;

        let index = max_index(&probabilities).ok_or_else(|| {
            ClassifierError::InferenceFailure("engine returned no class probabilities".to_string())
        })?;

        let class_name = self
            .labels
            .get(index)
            .ok_or(ClassifierError::IndexOutOfBounds {
                index,
                len: self.labels.len(),
            })?
            .clone();

        Ok(Classification {
            class_name,
            probability: probabilities[index],
        })
    }
}

/// Index of the largest value. Only a strictly greater value moves the index, so ties keep the first.
pub fn max_index(values: &[f32]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }

    let mut max_index = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[max_index] {
            max_index = index;
        }
    }

    Some(max_index)
}
