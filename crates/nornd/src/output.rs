use tokio::io::{AsyncRead, AsyncReadExt};

/// Drains one of a worker's output streams into the log. Non-empty chunks
/// are logged at trace level prefixed with the program name, with trailing
/// newline and null padding trimmed. End-of-stream ends the loop; any other
/// read error is logged and the loop keeps reading.
pub async fn pump<R: AsyncRead + Unpin>(mut reader: R, program: String, stream: &'static str) {
	let mut buf = [0u8; 4096];
	loop {
		match reader.read(&mut buf).await {
			Ok(0) => {
				tracing::debug!("{} {} reached EOF", program, stream);
				return;
			}
			Ok(n) => {
				let chunk = String::from_utf8_lossy(&buf[..n]);
				let chunk = chunk.trim_end_matches(['\n', '\0']);
				if !chunk.is_empty() {
					tracing::trace!("[{}] {}", program, chunk);
				}
			}
			Err(e) => {
				tracing::error!("cannot read from {}: {}", stream, e);
				continue;
			}
		}
	}
}
