//! The Wit client: request operations and the conversation loop.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::WitConfig;
use crate::error::{Result, WitError};
use crate::event::{ConverseEvent, EventRegistry};
use crate::http::{bearer_headers, shared_client, status_to_error};
use crate::types::{Context, ConverseResponse, MessageResponse};

/// Client for the remote NLU API.
///
/// Cheap to share behind an `Arc`; independent runs on different sessions
/// may proceed concurrently as long as each has its own [`Context`].
pub struct WitClient {
    config: WitConfig,
    headers: HeaderMap,
    registry: EventRegistry,
}

impl WitClient {
    /// Build a client from explicit options.
    pub fn new(config: WitConfig) -> Self {
        let headers = bearer_headers(&config.api_token);
        Self {
            config,
            headers,
            registry: EventRegistry::new(),
        }
    }

    /// Build a client from `WIT_API_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(WitConfig::from_env())
    }

    pub fn config(&self) -> &WitConfig {
        &self.config
    }

    /// Register a handler for an event key.
    ///
    /// Keys are `"message"`, `"stop"`, `"error"`, `"action:<name>"`, or any
    /// other `type` value the service sends. Handlers registered under the
    /// same key run in registration order, each awaited to completion
    /// before the next.
    pub fn on<F>(&self, event: impl Into<String>, handler: F)
    where
        F: for<'a> Fn(&'a ConverseResponse, &'a mut Context) -> BoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.registry.on(event, Arc::new(handler));
    }

    /// Parse a single utterance without session state.
    ///
    /// Issues `GET /message?q=<text>&context=<ctx>&v=<version>`.
    pub async fn message(&self, text: &str, context: &Context) -> Result<MessageResponse> {
        let url = format!("{}/message", self.config.api_root);
        let context_json = serde_json::to_string(context)?;

        debug!(q = text, "wit message");

        let resp = shared_client()
            .get(&url)
            .headers(self.headers.clone())
            .query(&[
                ("q", text),
                ("context", context_json.as_str()),
                ("v", self.config.api_version.as_str()),
            ])
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// Take one turn of a stateful dialog.
    ///
    /// Issues `POST /converse?session_id=<id>[&q=<msg>]&v=<version>` with
    /// the JSON-serialized context as the body. `q` is sent only when
    /// `message` is `Some`.
    pub async fn converse(
        &self,
        session: &str,
        message: Option<&str>,
        context: &Context,
    ) -> Result<ConverseResponse> {
        let url = format!("{}/converse", self.config.api_root);

        let mut params: Vec<(&str, &str)> = vec![("session_id", session)];
        if let Some(q) = message {
            params.push(("q", q));
        }
        params.push(("v", self.config.api_version.as_str()));

        debug!(session, has_message = message.is_some(), "wit converse");

        let resp = shared_client()
            .post(&url)
            .headers(self.headers.clone())
            .query(&params)
            .json(context)
            .send()
            .await?;

        self.read_json(resp).await
    }

    /// Drive a dialog to completion.
    ///
    /// Repeatedly calls [`converse`](Self::converse), maps each response to
    /// a [`ConverseEvent`], and dispatches it to registered handlers. The
    /// caller's `message` is sent only on the first turn; after that the
    /// remote service drives the run via actions until it emits `stop` or
    /// `error`, at which point the loop returns and the caller still owns
    /// the (possibly mutated) `context`.
    ///
    /// Transport failures, non-success statuses, and malformed responses
    /// end the run with an `Err`.
    pub async fn run(
        &self,
        session: &str,
        message: Option<&str>,
        context: &mut Context,
    ) -> Result<()> {
        let mut message = message;

        loop {
            let response = self.converse(session, message, context).await?;
            let event = ConverseEvent::from_response(&response)?;

            debug!(session, event = %event.key(), "dispatching converse event");
            self.emit(&event.key(), &response, context).await;

            if event.is_terminal() {
                return Ok(());
            }
            // Only the first turn carries user text.
            message = None;
        }
    }

    /// Dispatch an event to its registered handlers, awaiting each in
    /// registration order.
    ///
    /// [`run`](Self::run) goes through this after every turn; callers can
    /// also fire events manually without a network call.
    pub async fn emit(&self, event: &str, response: &ConverseResponse, context: &mut Context) {
        // Snapshot under the read lock, then await outside it.
        let handlers = self.registry.handlers_for(event);
        for handler in handlers {
            handler(response, &mut *context).await;
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T> {
        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            warn!(status, "wit API returned non-success status");
            return Err(status_to_error(status, &body));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|err| WitError::InvalidResponse(format!("malformed response body: {err}")))
    }
}
