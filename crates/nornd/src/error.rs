use thiserror::Error;

/// Failures across the worker supervisor. Every variant carries enough
/// context to log with the directive name at the failure site.
#[derive(Debug, Error)]
pub enum Error {
	#[error("cannot read file: {0}")]
	Io(#[from] std::io::Error),

	#[error("cannot load config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("unsupported protocol: {0}")]
	UnsupportedProtocol(String),

	#[error("no tracked process for worker {0}")]
	NotFound(String),

	#[error("invalid pid record for worker {0}")]
	InvalidState(String),

	#[error("cannot signal process: {0}")]
	Os(#[from] nix::errno::Errno),

	#[error("failed to start worker {0} too many times")]
	ExhaustedRetries(String),

	#[error("cannot start notify watchpoint: {0}")]
	Watch(#[from] notify::Error),
}
