use crate::error::{ClassifierError, Result};
use crate::inference_engine::interface::InferenceEngine;
use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex};

/// Answers every buffer with the same probabilities and remembers what it was given.
pub struct InferenceEngineFake {
    outcome: std::result::Result<Vec<f32>, String>,
    received: Arc<Mutex<Vec<Vec<f32>>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceEngineFake {
    pub fn new(probabilities: Vec<f32>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            outcome: Ok(probabilities),
            received: Arc::new(Mutex::new(Vec::new())),
            logger: logger.with_namespace("inference_engine").with_namespace("fake"),
        }
    }

    pub fn failing(message: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            outcome: Err(message.to_string()),
            received: Arc::new(Mutex::new(Vec::new())),
            logger: logger.with_namespace("inference_engine").with_namespace("fake"),
        }
    }

    pub fn received(&self) -> Arc<Mutex<Vec<Vec<f32>>>> {
        self.received.clone()
    }
}

impl InferenceEngine for InferenceEngineFake {
    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        let _ = self
            .logger
            .info(&format!("Predicting batch of {}", batch.len()));

        self.received
            .lock()
            .map_err(|e| ClassifierError::InferenceFailure(e.to_string()))?
            .extend(batch.iter().cloned());

        match &self.outcome {
            Ok(probabilities) => Ok(batch.iter().map(|_| probabilities.clone()).collect()),
            Err(message) => Err(ClassifierError::InferenceFailure(message.clone())),
        }
    }
}
