//! CI workflow-command protocol: step outputs and failure annotations.

use crate::env::EnvConfig;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// Writes step outputs and annotations for the CI runner
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    output_file: Option<PathBuf>,
}

impl ActionOutput {
    /// Use `GITHUB_OUTPUT` when the runner provides it
    pub fn new(env: &EnvConfig) -> Self {
        Self {
            output_file: env.get("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    /// Publish a named step output
    pub fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = &self.output_file else {
            println!("::set-output name={}::{}", escape_property(name), escape_data(value));
            return Ok(());
        };

        let block = file_command_block(name, value, &Uuid::new_v4().to_string())?;
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(block.as_bytes())
    }

    /// Annotate the step as failed
    pub fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

fn file_command_block(name: &str, value: &str, id: &str) -> io::Result<String> {
    let delimiter = format!("ghadelimiter_{}", id);
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output {} contains the delimiter {}", name, delimiter),
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Escape a workflow-command message
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow-command property value
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
