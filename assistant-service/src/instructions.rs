//! Versioned system instructions for the assistant.
//!
//! Instructions are configuration data: a `version` tag and the `text` sent as
//! the system message on every model call. The default document is compiled
//! in from `prompts/codewave.toml`; deployments can point
//! `assistant.instructions_path` at their own TOML, YAML or JSON file.

use config::{Config, File, FileFormat, Source};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

const EMBEDDED_INSTRUCTIONS: &str = include_str!("../prompts/codewave.toml");

#[derive(Debug, Error)]
pub enum InstructionsError {
    #[error("Failed to load instructions: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Instructions field '{0}' must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Instructions {
    pub version: String,
    pub text: String,
}

impl Instructions {
    /// The instructions shipped with the binary.
    pub fn embedded() -> Result<Self, InstructionsError> {
        Self::from_toml_str(EMBEDDED_INSTRUCTIONS)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, InstructionsError> {
        Self::from_source(File::from_str(raw, FileFormat::Toml))
    }

    /// Loads an instructions file; the format follows the file extension.
    pub fn from_path(path: &Path) -> Result<Self, InstructionsError> {
        Self::from_source(File::from(path))
    }

    /// External file when a path is configured, embedded document otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, InstructionsError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    fn from_source<S>(source: S) -> Result<Self, InstructionsError>
    where
        S: Source + Send + Sync + 'static,
    {
        let instructions: Instructions = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        instructions.validate()?;
        Ok(instructions)
    }

    fn validate(&self) -> Result<(), InstructionsError> {
        if self.version.trim().is_empty() {
            return Err(InstructionsError::Empty("version"));
        }
        if self.text.trim().is_empty() {
            return Err(InstructionsError::Empty("text"));
        }
        Ok(())
    }
}
