use std::sync::Arc;

use norn_core::config::{self, AgentConfig};
use nornd::supervisor::{Supervisor, WorkerEvent};
use nornd::watcher;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
	let config = Arc::new(config::load_agent_config());

	let level: tracing::Level = config.log_level.parse().unwrap_or(tracing::Level::INFO);
	tracing_subscriber::fmt().with_max_level(level).init();

	let (events_tx, mut events_rx) = mpsc::unbounded_channel();
	let supervisor = Supervisor::new(Arc::clone(&config), events_tx);

	// Observer for worker lifecycle notifications.
	tokio::spawn(async move {
		while let Some(event) = events_rx.recv().await {
			match event {
				WorkerEvent::Started { directive, pid } => {
					tracing::debug!("worker started: {} (pid {})", directive, pid);
				}
				WorkerEvent::Stopped { directive, pid } => {
					tracing::info!("worker died: {} (pid {})", directive, pid);
				}
			}
		}
	});

	// Start workers already installed before the daemon came up.
	scan_worker_dir(&config, &supervisor);

	let watch_config = Arc::clone(&config);
	let watch_supervisor = Arc::clone(&supervisor);
	let watch_handle = tokio::spawn(async move {
		if let Err(e) = watcher::watch_worker_dir(watch_config, watch_supervisor).await {
			tracing::error!("cannot watch worker directory: {}", e);
		}
	});

	tracing::info!("daemon started (pid {})", std::process::id());

	tokio::select! {
		_ = watch_handle => {},
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("shutting down");
		}
	}

	if let Err(e) = supervisor.stop_all() {
		tracing::error!("cannot stop workers: {}", e);
	}
}

fn scan_worker_dir(config: &Arc<AgentConfig>, supervisor: &Arc<Supervisor>) {
	let entries = match std::fs::read_dir(config.worker_dir()) {
		Ok(entries) => entries,
		// The worker directory may not exist yet; the watcher reports that.
		Err(_) => return,
	};
	for entry in entries.flatten() {
		let path = entry.path();
		if path.extension().map_or(false, |ext| ext == "toml") {
			watcher::install(config, supervisor, &path);
		}
	}
}
