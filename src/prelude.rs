//! Convenience re-exports for common use.

pub use crate::client::WitClient;
pub use crate::config::WitConfig;
pub use crate::error::{Result, WitError};
pub use crate::event::ConverseEvent;
pub use crate::types::{Context, ConverseResponse, MessageResponse};
