//! Loader for the RON tuning file at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::TuningFile;

/// Schema version this build understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Error type for tuning load failures.
#[derive(Debug)]
pub struct TuningLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for TuningLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// RON options with implicit `Some` so optional fields read naturally.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse tuning text; `file` only labels errors.
pub fn parse_tuning(file: &str, contents: &str) -> Result<TuningFile, TuningLoadError> {
    let tuning: TuningFile = ron_options()
        .from_str(contents)
        .map_err(|e| TuningLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })?;

    if tuning.schema_version != SCHEMA_VERSION {
        return Err(TuningLoadError {
            file: file.to_string(),
            message: format!(
                "Unsupported schema_version {} (expected {})",
                tuning.schema_version, SCHEMA_VERSION
            ),
        });
    }
    Ok(tuning)
}

pub fn load_tuning(path: &Path) -> Result<TuningFile, TuningLoadError> {
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| TuningLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_tuning(&file_name, &contents)
}
