//! wit-client — async client for the Wit.ai natural-language API.
//!
//! Wraps the stateless `/message` parse endpoint and the stateful
//! `/converse` dialog endpoint, and drives multi-turn conversations with an
//! event-driven loop: each turn's response is mapped to an event
//! (`message`, `stop`, `error`, `action:<name>`) and dispatched to
//! registered handlers until the remote service ends the dialog.
//!
//! # Quick Start
//!
//! ```no_run
//! use wit_client::prelude::*;
//!
//! # async fn example() -> wit_client::error::Result<()> {
//! let client = WitClient::new(WitConfig::new("MY_TOKEN"));
//!
//! client.on("action:greet", |_response, context| {
//!     Box::pin(async move {
//!         context.insert("greeted".to_string(), serde_json::json!(true));
//!     })
//! });
//!
//! let mut context = Context::new();
//! client.run("session-1", Some("hello"), &mut context).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod prelude;
pub mod types;
