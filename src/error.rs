use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to load model {}: {reason}", path.display())]
    ModelLoadFailure { path: PathBuf, reason: String },

    #[error("failed to load class labels: {0}")]
    LabelResourceFailure(#[source] Box<ClassifierError>),

    #[error("inference failed: {0}")]
    InferenceFailure(String),

    #[error("class index {index} is out of bounds for {len} labels")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

impl ClassifierError {
    /// A missing file is `ResourceNotFound`, every other io error is `IoFailure`.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ClassifierError::ResourceNotFound {
                path: path.to_path_buf(),
            },
            _ => ClassifierError::IoFailure {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
