pub mod classifier;
pub mod image_loader;
pub mod labels;
pub mod preprocess;
