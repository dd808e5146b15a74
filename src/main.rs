use cli::Args;
use clap::Parser;
use config::Config;
use image_classifier::classifier::ImageClassifier;
use image_classifier::image_loader::load_image;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use std::process::ExitCode;
use std::sync::Arc;

mod cli;
mod config;
mod error;
mod image_classifier;
mod inference_engine;
mod library;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    match run(&config, args, logger.clone()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = logger.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(
    config: &Config,
    args: Args,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logger.info("Initializing image classifier...")?;
    let image_classifier = ImageClassifier::new(config, logger.clone())?;
    logger.info("image classifier initialized.")?;

    let image_path = match args.image {
        Some(path) => path,
        None => {
            logger.info(&format!(
                "No image file argument supplied, using default {}",
                config.default_image_path.display()
            ))?;
            config.default_image_path.clone()
        }
    };

    logger.info(&format!("Loading image from file: {} ...", image_path.display()))?;
    let image = load_image(&image_path)?;
    logger.info("Image loaded successfully.")?;

    logger.info("Invoking inference...")?;
    let classification = image_classifier.predict(&image)?;
    println!("Inference result: {}", classification);

    logger.info("Terminating...")?;

    Ok(())
}
