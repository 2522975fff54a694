pub mod env;
pub mod error;
pub mod output;
pub mod pidfile;
pub mod process;
pub mod supervisor;
pub mod watcher;
pub mod worker;

pub use error::Error;
