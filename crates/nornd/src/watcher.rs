use std::path::Path;
use std::sync::Arc;

use norn_core::config::AgentConfig;
use notify::event::{AccessKind, AccessMode, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Error;
use crate::supervisor::Supervisor;
use crate::worker;

/// Watches the worker config directory and registers/deregisters workers as
/// files appear and disappear. The single sequential consumer of the event
/// stream; the start/stop actions it triggers run concurrently. Per-event
/// failures are logged and the loop continues; only failure to begin
/// watching propagates.
pub async fn watch_worker_dir(
	config: Arc<AgentConfig>,
	supervisor: Arc<Supervisor>,
) -> Result<(), Error> {
	let (tx, mut rx) = mpsc::unbounded_channel();
	let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
		let _ = tx.send(res);
	})?;
	watcher.watch(&config.worker_dir(), RecursiveMode::NonRecursive)?;

	while let Some(res) = rx.recv().await {
		let event = match res {
			Ok(event) => event,
			Err(e) => {
				tracing::error!("watch error: {}", e);
				continue;
			}
		};
		tracing::debug!("received filesystem event {:?}", event.kind);
		match event.kind {
			EventKind::Access(AccessKind::Close(AccessMode::Write))
			| EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
				for path in &event.paths {
					install(&config, &supervisor, path);
				}
			}
			EventKind::Remove(RemoveKind::File)
			| EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
				for path in &event.paths {
					remove(&supervisor, path);
				}
			}
			_ => {}
		}
	}

	Ok(())
}

/// Loads the worker config at `path` and spawns its supervision task. Also
/// used by the daemon's initial scan of the worker directory. Excluded
/// directives are skipped silently; load and start failures are logged and
/// never crash the caller.
pub fn install(config: &Arc<AgentConfig>, supervisor: &Arc<Supervisor>, path: &Path) {
	tracing::trace!("new worker detected: {}", path.display());
	let spec = match worker::load_worker_spec(path) {
		Ok(spec) => spec,
		Err(e) => {
			tracing::error!("cannot load worker config: {}", e);
			return;
		}
	};
	if config.exclude_workers.contains(&spec.directive) {
		tracing::trace!("skipping excluded worker {}", spec.directive);
		return;
	}
	tracing::debug!("starting worker: {}", spec.directive);
	let sup = Arc::clone(supervisor);
	tokio::spawn(async move {
		let directive = spec.directive.clone();
		if let Err(e) = sup.supervise(spec).await {
			tracing::error!("cannot start worker {}: {}", directive, e);
		}
	});
}

fn remove(supervisor: &Arc<Supervisor>, path: &Path) {
	let directive = worker::directive_from_path(path);
	if let Err(e) = supervisor.stop(&directive) {
		tracing::error!("cannot stop worker {}: {}", directive, e);
	}
}
