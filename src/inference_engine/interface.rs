use crate::error::Result;
use std::fmt;

/// Compute device an engine executes on. Fixed for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceContext {
    Cpu,
    // the tract backend is CPU-only and rejects this context
    #[allow(dead_code)]
    Gpu,
}

impl fmt::Display for InferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceContext::Cpu => write!(f, "cpu"),
            InferenceContext::Gpu => write!(f, "gpu"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// batch, channel, height, width
    Nchw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    pub name: String,
    pub shape: Vec<usize>,
    pub data_type: DataType,
    pub layout: Layout,
}

impl InputDescriptor {
    /// Single RGB image of `size`x`size` as a float NCHW batch of one.
    pub fn image(name: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            shape: vec![1, 3, size as usize, size as usize],
            data_type: DataType::Float32,
            layout: Layout::Nchw,
        }
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

pub trait InferenceEngine {
    /// Runs one forward pass per buffer and returns one probability vector per buffer.
    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;
}
