use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Classifies an image with a pretrained ResNet-18 model")]
pub struct Args {
    /// Image to classify. Falls back to the configured default image when omitted.
    pub image: Option<PathBuf>,
}
