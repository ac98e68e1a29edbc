pub mod cast;
pub mod config;
pub mod error;
pub mod types;

pub use cast::*;
pub use config::*;
pub use error::{DialogueError, ErrorKind};
pub use types::*;
