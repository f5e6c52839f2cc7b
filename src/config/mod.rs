//! JSON configuration for the command-line tools.
//!
//! Each tool takes a single config path; the file deserializes into one of
//! the `*Config` structs below. Library parameter structs embed directly and
//! fall back to their defaults when omitted.

pub mod golden_report;
pub mod view_plan;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read config {}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("failed to parse config {}: {e}", path.display())))
}
