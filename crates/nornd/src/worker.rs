use std::path::{Path, PathBuf};

use norn_core::config::AgentConfig;
use serde::Deserialize;

use crate::error::Error;

/// Declarative specification of one worker, parsed from a TOML file in the
/// worker config directory. Immutable once loaded. Absent fields default to
/// empty; an empty `protocol` fails later as unsupported, not at parse time.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSpec {
	#[serde(default)]
	pub exec: String,
	#[serde(default)]
	pub protocol: String,
	#[serde(default)]
	pub env: Vec<String>,
	#[serde(skip)]
	pub directive: String,
}

/// Reads the contents of `file` and parses it into a [`WorkerSpec`]. The
/// directive comes from the filename stem alone, never the file contents, so
/// the watcher can correlate filesystem events to workers without reopening
/// files.
pub fn load_worker_spec(file: &Path) -> Result<WorkerSpec, Error> {
	let data = std::fs::read_to_string(file)?;
	let mut spec: WorkerSpec = toml::from_str(&data)?;
	spec.directive = directive_from_path(file);
	Ok(spec)
}

/// Derives a directive name from a path's filename stem.
pub fn directive_from_path(path: &Path) -> String {
	path.file_stem()
		.and_then(|s| s.to_str())
		.unwrap_or_default()
		.to_string()
}

/// Resolves a directive back to its config file path.
pub fn spec_path(config: &AgentConfig, directive: &str) -> PathBuf {
	config.worker_dir().join(format!("{}.toml", directive))
}

/// Whether the worker's config file is still installed. Checked at process
/// exit time, not delete-event time, to close the race between a delete
/// event and process death.
pub fn spec_exists(config: &AgentConfig, directive: &str) -> bool {
	spec_path(config, directive).exists()
}
