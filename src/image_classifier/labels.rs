use crate::error::{ClassifierError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads one class name per line. Line `i` names class index `i`; lines are kept verbatim.
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| ClassifierError::from_io(path, e))?;

    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| ClassifierError::from_io(path, e))
}
