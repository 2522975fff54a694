use std::sync::LazyLock;

use norn_core::config::AgentConfig;
use regex::Regex;

use crate::error::Error;
use crate::worker::WorkerSpec;

const SYSTEM_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// User env entries matching these are dropped: workers never override the
/// search path or the daemon-reserved YGG_ namespace.
static DENY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	["PATH=.*", "YGG_.*=.*"]
		.iter()
		.map(|p| Regex::new(p).expect("invalid deny pattern"))
		.collect()
});

/// Builds the full environment for a worker process as an ordered key/value
/// list: fixed baseline, ambient proxy settings, the protocol binding
/// variable, then filtered user entries. The list is applied onto a cleared
/// child environment, so later entries override earlier ones with the same
/// key.
pub fn build_env(config: &AgentConfig, spec: &WorkerSpec) -> Result<Vec<(String, String)>, Error> {
	let mut env = vec![
		("PATH".to_string(), SYSTEM_PATH.to_string()),
		("YGG_CONFIG_DIR".to_string(), config.config_dir.display().to_string()),
		("YGG_LOG_LEVEL".to_string(), config.log_level.clone()),
		("YGG_CLIENT_ID".to_string(), config.client_id.clone()),
	];

	for key in ["HTTP_PROXY", "HTTPS_PROXY", "NO_PROXY"] {
		if let Some(val) = proxy_from_env(key) {
			env.push((key.to_string(), val));
		}
	}

	match spec.protocol.as_str() {
		"grpc" => env.push(("YGG_SOCKET_ADDR".to_string(), config.socket_addr.clone())),
		other => return Err(Error::UnsupportedProtocol(other.to_string())),
	}

	for entry in &spec.env {
		if valid_env_var(entry) {
			env.push(split_entry(entry));
		}
	}

	Ok(env)
}

/// Reads a proxy variable from the ambient environment, uppercase spelling
/// first, then lowercase. Empty values count as unset.
fn proxy_from_env(key: &str) -> Option<String> {
	std::env::var(key)
		.ok()
		.filter(|v| !v.is_empty())
		.or_else(|| std::env::var(key.to_lowercase()).ok().filter(|v| !v.is_empty()))
}

fn valid_env_var(val: &str) -> bool {
	!DENY_PATTERNS.iter().any(|r| r.is_match(val))
}

/// Splits a "KEY=VALUE" entry at the first '='; an entry without one becomes
/// a key with an empty value.
fn split_entry(entry: &str) -> (String, String) {
	match entry.split_once('=') {
		Some((key, val)) => (key.to_string(), val.to_string()),
		None => (entry.to_string(), String::new()),
	}
}
