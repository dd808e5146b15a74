use crate::error::{ClassifierError, Result};
use crate::inference_engine::interface::{
    DataType, InferenceContext, InferenceEngine, InputDescriptor, Layout,
};
use crate::library::logger::interface::Logger;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct InferenceEngineTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input: InputDescriptor,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceEngineTractOnnx {
    /// Loads `<model_path_prefix>.onnx` and binds its first input to the single descriptor.
    pub fn new(
        model_path_prefix: &Path,
        inputs: &[InputDescriptor],
        context: InferenceContext,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self> {
        let logger = logger.with_namespace("tract_onnx");
        let model_path = model_file_path(model_path_prefix);

        // tract only runs on the host CPU
        if context != InferenceContext::Cpu {
            return Err(load_failure(
                &model_path,
                format!("the {} context is not supported by tract", context),
            ));
        }

        let input = match inputs {
            [input] => input.clone(),
            _ => {
                return Err(load_failure(
                    &model_path,
                    format!("expected one input descriptor, got {}", inputs.len()),
                ))
            }
        };

        if !model_path.is_file() {
            return Err(load_failure(&model_path, "model file not found"));
        }

        let _ = logger.info(&format!(
            "Loading model {} on {}",
            model_path.display(),
            context
        ));

        let fact: InferenceFact = match (input.data_type, input.layout) {
            (DataType::Float32, Layout::Nchw) => f32::fact(input.shape.clone()).into(),
        };

        let model = tract_onnx::onnx()
            .model_for_path(&model_path)
            .map_err(|e| load_failure(&model_path, e))?;

        if let Some(outlet) = model
            .input_outlets()
            .map_err(|e| load_failure(&model_path, e))?
            .first()
        {
            let model_input_name = &model.node(outlet.node).name;
            if model_input_name != &input.name {
                let _ = logger.info(&format!(
                    "Binding input '{}' to model input '{}'",
                    input.name, model_input_name
                ));
            }
        }

        let model = model
            .with_input_fact(0, fact)
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| load_failure(&model_path, e))?;

        let _ = logger.info("Model ready");

        Ok(Self {
            model,
            input,
            logger,
        })
    }

    fn run_single(&self, buffer: &[f32]) -> Result<Vec<f32>> {
        let expected = self.input.element_count();
        if buffer.len() != expected {
            return Err(ClassifierError::InferenceFailure(format!(
                "input '{}' expects {} values, got {}",
                self.input.name,
                expected,
                buffer.len()
            )));
        }

        let tensor = Tensor::from_shape(&self.input.shape, buffer).map_err(inference_failure)?;
        let outputs = self
            .model
            .run(tvec!(tensor.into_tvalue()))
            .map_err(inference_failure)?;
        let output = outputs.first().ok_or_else(|| {
            ClassifierError::InferenceFailure("model produced no outputs".to_string())
        })?;
        let probabilities = output.to_array_view::<f32>().map_err(inference_failure)?;

        Ok(probabilities.iter().copied().collect())
    }
}

impl InferenceEngine for InferenceEngineTractOnnx {
    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        let _ = self
            .logger
            .info(&format!("Running inference on batch of {}", batch.len()));

        batch.iter().map(|buffer| self.run_single(buffer)).collect()
    }
}

fn model_file_path(prefix: &Path) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(".onnx");
    PathBuf::from(path)
}

fn load_failure(path: &Path, reason: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::ModelLoadFailure {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn inference_failure(error: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::InferenceFailure(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference_engine::test::fixture::write_mean_color_model;
    use crate::library::logger::impl_console::LoggerConsole;
    use chrono::{Offset, Utc};

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(Utc.fix()))
    }

    #[test]
    fn test_model_file_path_appends_onnx_to_prefix() {
        assert_eq!(
            model_file_path(Path::new("models/resnet-18/resnet-18")),
            PathBuf::from("models/resnet-18/resnet-18.onnx")
        );
        assert_eq!(
            model_file_path(Path::new("models/v1.5/resnet")),
            PathBuf::from("models/v1.5/resnet.onnx")
        );
    }

    #[test]
    fn test_missing_model_is_model_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("resnet-18");

        let result = InferenceEngineTractOnnx::new(
            &prefix,
            &[InputDescriptor::image("data", 224)],
            InferenceContext::Cpu,
            logger(),
        );

        match result {
            Err(ClassifierError::ModelLoadFailure { path, reason }) => {
                assert_eq!(path, dir.path().join("resnet-18.onnx"));
                assert_eq!(reason, "model file not found");
            }
            _ => panic!("expected ModelLoadFailure"),
        }
    }

    #[test]
    fn test_gpu_context_is_rejected() {
        let result = InferenceEngineTractOnnx::new(
            Path::new("models/resnet-18/resnet-18"),
            &[InputDescriptor::image("data", 224)],
            InferenceContext::Gpu,
            logger(),
        );

        match result {
            Err(ClassifierError::ModelLoadFailure { reason, .. }) => {
                assert!(reason.contains("gpu"));
            }
            _ => panic!("expected ModelLoadFailure"),
        }
    }

    #[test]
    fn test_requires_exactly_one_input_descriptor() {
        let result = InferenceEngineTractOnnx::new(
            Path::new("models/resnet-18/resnet-18"),
            &[],
            InferenceContext::Cpu,
            logger(),
        );

        assert!(matches!(
            result,
            Err(ClassifierError::ModelLoadFailure { .. })
        ));
    }

    #[test]
    fn test_garbage_model_file_fails_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.onnx"), b"this is not a protobuf model").unwrap();

        let result = InferenceEngineTractOnnx::new(
            &dir.path().join("broken"),
            &[InputDescriptor::image("data", 224)],
            InferenceContext::Cpu,
            logger(),
        );

        assert!(matches!(
            result,
            Err(ClassifierError::ModelLoadFailure { .. })
        ));
    }

    fn mean_color_engine(dir: &Path, model_input_name: &str) -> InferenceEngineTractOnnx {
        let prefix = dir.join("mean_color");
        write_mean_color_model(&prefix, model_input_name, 2);

        InferenceEngineTractOnnx::new(
            &prefix,
            &[InputDescriptor::image("data", 2)],
            InferenceContext::Cpu,
            logger(),
        )
        .unwrap()
    }

    #[test]
    fn test_predict_runs_model_per_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let engine = mean_color_engine(dir.path(), "data");
        let planes = vec![
            10.0, 20.0, 30.0, 40.0, //
            0.0, 0.0, 0.0, 0.0, //
            255.0, 255.0, 255.0, 255.0,
        ];
        let red = vec![
            255.0, 255.0, 255.0, 255.0, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0,
        ];

        let outputs = engine.predict(&[planes, red]).unwrap();

        assert_eq!(outputs, vec![vec![25.0, 0.0, 255.0], vec![255.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_differently_named_model_input_is_still_bound() {
        let dir = tempfile::tempdir().unwrap();
        let engine = mean_color_engine(dir.path(), "input");

        let outputs = engine.predict(&[vec![1.0; 12]]).unwrap();

        assert_eq!(outputs, vec![vec![1.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_wrong_buffer_length_is_inference_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = mean_color_engine(dir.path(), "data");

        let result = engine.predict(&[vec![0.0; 5]]);

        match result {
            Err(ClassifierError::InferenceFailure(message)) => {
                assert_eq!(message, "input 'data' expects 12 values, got 5");
            }
            _ => panic!("expected InferenceFailure"),
        }
    }
}
