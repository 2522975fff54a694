use std::sync::Arc;
use std::time::Duration;

use norn_core::config::AgentConfig;
use tokio::sync::mpsc;

use crate::env;
use crate::error::Error;
use crate::output;
use crate::pidfile::PidStore;
use crate::process;
use crate::worker::{self, WorkerSpec};

const BACKOFF_STEP: Duration = Duration::from_secs(5);
const BACKOFF_CEILING: Duration = Duration::from_secs(30);
const FAST_EXIT: Duration = Duration::from_secs(1);

/// Lifecycle notification emitted to the external observer. Emission never
/// blocks the supervising task; a dropped receiver is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
	Started { directive: String, pid: u32 },
	Stopped { directive: String, pid: u32 },
}

/// Restart delay for one supervision episode. Grows by a fixed step after
/// each fast exit; reaching the ceiling makes the state exhausted, after
/// which the worker is never restarted without a fresh install event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Backoff {
	pub delay: Duration,
	pub exhausted: bool,
}

impl Backoff {
	pub fn record_exit(&mut self, runtime: Duration) {
		if runtime < FAST_EXIT {
			self.delay += BACKOFF_STEP;
		}
		if self.delay >= BACKOFF_CEILING {
			self.exhausted = true;
		}
	}
}

pub struct Supervisor {
	config: Arc<AgentConfig>,
	pids: PidStore,
	events: mpsc::UnboundedSender<WorkerEvent>,
}

impl Supervisor {
	pub fn new(config: Arc<AgentConfig>, events: mpsc::UnboundedSender<WorkerEvent>) -> Arc<Self> {
		let pids = PidStore::new(config.pid_dir());
		Arc::new(Self { config, pids, events })
	}

	/// Runs one worker's full lifecycle: start the process, wait for it to
	/// exit, and restart it with growing backoff for as long as its config
	/// file is still installed and the backoff is not exhausted. Returns
	/// `Err` only if the first start attempt fails; restart failures are
	/// logged and end supervision.
	///
	/// The config-file existence re-check happens at exit time, not at
	/// delete-event time: a deleted worker is never resurrected, while one
	/// still declared is retried with growing patience before being
	/// abandoned.
	pub async fn supervise(&self, spec: WorkerSpec) -> Result<(), Error> {
		let mut backoff = Backoff::default();

		self.run_once(&spec, &mut backoff).await?;

		loop {
			if !worker::spec_exists(&self.config, &spec.directive) {
				tracing::debug!("worker {} no longer installed, not restarting", spec.directive);
				return Ok(());
			}
			if backoff.exhausted {
				tracing::error!("{}", Error::ExhaustedRetries(spec.directive.clone()));
				return Ok(());
			}
			if let Err(e) = self.run_once(&spec, &mut backoff).await {
				tracing::error!("cannot restart worker {}: {}", spec.directive, e);
				return Ok(());
			}
		}
	}

	/// One pass through Delaying → Starting → Running → Exited.
	async fn run_once(&self, spec: &WorkerSpec, backoff: &mut Backoff) -> Result<(), Error> {
		let env = env::build_env(&self.config, spec)?;
		let (program, args) = process::split_exec(&spec.exec);

		if backoff.delay > Duration::ZERO {
			tracing::trace!("delaying worker start for {:?}...", backoff.delay);
			tokio::time::sleep(backoff.delay).await;
		}

		let mut handle = process::start(&program, &args, &env)?;
		let pid = handle.pid();

		self.pids.write(&spec.directive, pid)?;

		if let Some(stdout) = handle.take_stdout() {
			let name = program.clone();
			tokio::spawn(async move { output::pump(stdout, name, "stdout").await });
		}
		if let Some(stderr) = handle.take_stderr() {
			let name = program.clone();
			tokio::spawn(async move { output::pump(stderr, name, "stderr").await });
		}

		let _ = self.events.send(WorkerEvent::Started {
			directive: spec.directive.clone(),
			pid,
		});

		let exit = handle.wait().await?;
		tracing::info!("worker stopped: {} ({})", pid, exit.status);

		backoff.record_exit(exit.runtime);

		let _ = self.events.send(WorkerEvent::Stopped {
			directive: spec.directive.clone(),
			pid,
		});

		Ok(())
	}

	/// Stops a tracked worker: read its pid record, deliver SIGTERM, remove
	/// the record. An untracked directive is `NotFound` and no signal is
	/// issued.
	pub fn stop(&self, directive: &str) -> Result<(), Error> {
		let pid = self.pids.read(directive)?;
		process::stop(pid)?;
		self.pids.remove(directive)?;
		Ok(())
	}

	/// Stops every tracked worker. A failure on one aborts the remainder;
	/// the error propagates to the caller, which reports it.
	pub fn stop_all(&self) -> Result<(), Error> {
		for directive in self.pids.tracked()? {
			self.stop(&directive)?;
		}
		Ok(())
	}

	pub fn pids(&self) -> &PidStore {
		&self.pids
	}
}
