use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use crate::error::Error;

/// A started worker process. Wraps the OS child with the spawn timestamp so
/// exit reporting can include the measured wall-clock runtime.
pub struct ProcessHandle {
	child: Child,
	started_at: Instant,
}

/// Termination report from [`ProcessHandle::wait`].
pub struct ExitInfo {
	pub status: ExitStatus,
	pub runtime: Duration,
}

/// Starts `program` with the given arguments and exactly the given
/// environment (the parent environment is cleared), stdout and stderr piped.
pub fn start(
	program: &str,
	args: &[String],
	env: &[(String, String)],
) -> Result<ProcessHandle, Error> {
	let mut cmd = Command::new(program);
	cmd.args(args)
		.env_clear()
		.stdout(Stdio::piped())
		.stderr(Stdio::piped());
	for (key, val) in env {
		cmd.env(key, val);
	}
	let child = cmd.spawn()?;
	Ok(ProcessHandle {
		child,
		started_at: Instant::now(),
	})
}

impl ProcessHandle {
	/// Process id, or 0 if the OS did not report one.
	pub fn pid(&self) -> u32 {
		self.child.id().unwrap_or(0)
	}

	pub fn take_stdout(&mut self) -> Option<ChildStdout> {
		self.child.stdout.take()
	}

	pub fn take_stderr(&mut self) -> Option<ChildStderr> {
		self.child.stderr.take()
	}

	/// Waits for the process to terminate. Blocks only the calling task.
	pub async fn wait(&mut self) -> Result<ExitInfo, Error> {
		let status = self.child.wait().await?;
		Ok(ExitInfo {
			status,
			runtime: self.started_at.elapsed(),
		})
	}
}

/// Delivers SIGTERM to a process by id.
pub fn stop(pid: u32) -> Result<(), Error> {
	use nix::sys::signal::{kill, Signal};
	use nix::unistd::Pid;
	kill(Pid::from_raw(pid as i32), Signal::SIGTERM)?;
	Ok(())
}

/// Splits an `exec` string on single spaces into program + arguments. Empty
/// segments are preserved; an empty string yields an empty program name,
/// which fails at spawn.
pub fn split_exec(exec: &str) -> (String, Vec<String>) {
	let mut parts = exec.split(' ').map(str::to_string);
	let program = parts.next().unwrap_or_default();
	(program, parts.collect())
}
