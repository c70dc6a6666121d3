pub mod errors;
pub mod id;

pub use errors::{ConfigError, DuetError};
pub use id::ConnectionId;
