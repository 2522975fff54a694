use std::path::PathBuf;

use crate::error::Error;

/// Durable directory of `<directive>.pid` records. A record exists from
/// successful start until explicit stop; a crash-triggered restart simply
/// rewrites it. Records are uniquely named per directive, so concurrent
/// supervisors never collide.
pub struct PidStore {
	dir: PathBuf,
}

impl PidStore {
	pub fn new(dir: PathBuf) -> Self {
		Self { dir }
	}

	pub fn record_path(&self, directive: &str) -> PathBuf {
		self.dir.join(format!("{}.pid", directive))
	}

	/// Writes a record, creating the pid directory if missing.
	pub fn write(&self, directive: &str, pid: u32) -> Result<(), Error> {
		std::fs::create_dir_all(&self.dir)?;
		std::fs::write(self.record_path(directive), pid.to_string())?;
		Ok(())
	}

	/// Reads a record back as a pid. A missing record is `NotFound`;
	/// unparseable content is `InvalidState`.
	pub fn read(&self, directive: &str) -> Result<u32, Error> {
		let data = match std::fs::read_to_string(self.record_path(directive)) {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(Error::NotFound(directive.to_string()));
			}
			Err(e) => return Err(e.into()),
		};
		data.trim()
			.parse()
			.map_err(|_| Error::InvalidState(directive.to_string()))
	}

	pub fn remove(&self, directive: &str) -> Result<(), Error> {
		std::fs::remove_file(self.record_path(directive))?;
		Ok(())
	}

	/// Lists the directives with a record on disk. Creates the pid directory
	/// if missing so shutdown on a fresh host is a no-op, not an error.
	pub fn tracked(&self) -> Result<Vec<String>, Error> {
		std::fs::create_dir_all(&self.dir)?;
		let mut directives = Vec::new();
		for entry in std::fs::read_dir(&self.dir)? {
			let name = entry?.file_name();
			if let Some(stem) = name.to_string_lossy().strip_suffix(".pid") {
				directives.push(stem.to_string());
			}
		}
		Ok(directives)
	}
}
