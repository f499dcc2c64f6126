use anyhow::{Context as AnyhowContext, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use thoughts_formatter::parse_thoughts as parse_json;
use thoughts_protocol::ThoughtValue;

/// Reads `path`, or stdin when it is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|p| p.as_os_str() != "-") {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read input from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;
    Ok(buffer)
}

/// JSON input becomes a structured payload; anything else is a plain string thought.
pub fn parse_thoughts(raw: &str) -> ThoughtValue {
    match parse_json(raw) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("input is not JSON ({err}); treating it as a string thought");
            ThoughtValue::String(raw.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}
