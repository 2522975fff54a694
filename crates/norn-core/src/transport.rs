use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("transport not connected")]
	NotConnected,
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("transport error: {0}")]
	Other(String),
}

/// Callback invoked whenever data is received over the network.
pub type RxHandler = Box<
	dyn Fn(&str, &HashMap<String, String>, &[u8]) -> Result<(), TransportError> + Send + Sync,
>;

/// Response to a transmitted message.
#[derive(Debug, Clone)]
pub struct TxResponse {
	pub code: i32,
	pub metadata: HashMap<String, String>,
	pub data: Vec<u8>,
}

/// TLS material a transport loads its configuration from.
#[derive(Debug, Clone)]
pub struct TlsSettings {
	pub ca_roots: Vec<PathBuf>,
	pub cert_file: PathBuf,
	pub key_file: PathBuf,
}

/// The ability to send and receive data. Abstracts away the concrete
/// implementation, leaving that up to the implementing type; the worker
/// supervisor's only dependency on it is the socket address injected into
/// worker environments.
#[async_trait]
pub trait Transporter: Send + Sync {
	/// Begins listening over specific network connections and receiving data.
	async fn connect(&self) -> Result<(), TransportError>;

	/// Disconnects the transport, performing any graceful shutdown necessary
	/// within the quiesce window.
	async fn disconnect(&self, quiesce: Duration);

	/// Sends a message to the given address, using metadata and data
	/// according to the specific nature of the implementation.
	async fn tx(
		&self,
		addr: &str,
		metadata: HashMap<String, String>,
		data: Vec<u8>,
	) -> Result<TxResponse, TransportError>;

	/// Stores a reference to `handler`, which is then called whenever data is
	/// received over the network.
	fn set_rx_handler(&self, handler: RxHandler);

	/// Forces the transport to replace its TLS configuration.
	async fn reload_tls(&self, settings: TlsSettings) -> Result<(), TransportError>;
}
