use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Read-only snapshot of the agent configuration. Loaded once at startup and
/// shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
	#[serde(default)]
	pub client_id: String,
	#[serde(default = "default_socket_addr")]
	pub socket_addr: String,
	#[serde(default = "default_config_dir")]
	pub config_dir: PathBuf,
	#[serde(default = "default_run_dir")]
	pub run_dir: PathBuf,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	#[serde(default)]
	pub exclude_workers: HashSet<String>,
}

impl Default for AgentConfig {
	fn default() -> Self {
		Self {
			client_id: String::new(),
			socket_addr: default_socket_addr(),
			config_dir: default_config_dir(),
			run_dir: default_run_dir(),
			log_level: default_log_level(),
			exclude_workers: HashSet::new(),
		}
	}
}

impl AgentConfig {
	/// Directory holding one declarative worker file per worker.
	pub fn worker_dir(&self) -> PathBuf {
		self.config_dir.join("workers")
	}

	/// Directory holding one `<directive>.pid` record per running worker.
	pub fn pid_dir(&self) -> PathBuf {
		self.run_dir.join("workers")
	}
}

fn default_socket_addr() -> String {
	"unix:/run/norn/norn.sock".to_string()
}

fn default_config_dir() -> PathBuf {
	PathBuf::from("/etc/norn")
}

fn default_run_dir() -> PathBuf {
	PathBuf::from("/run/norn")
}

fn default_log_level() -> String {
	"info".to_string()
}

/// Loads `config.toml` from the default config directory. A missing,
/// unreadable or malformed file warns on stderr and falls back to defaults;
/// startup never fails on configuration.
pub fn load_agent_config() -> AgentConfig {
	let path = default_config_dir().join("config.toml");
	if path.exists() {
		match std::fs::read_to_string(&path) {
			Ok(content) => match toml::from_str(&content) {
				Ok(config) => return config,
				Err(e) => eprintln!("warning: failed to parse {}: {}", path.display(), e),
			},
			Err(e) => eprintln!("warning: failed to read {}: {}", path.display(), e),
		}
	}
	AgentConfig::default()
}
