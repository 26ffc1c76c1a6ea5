//! Converse events and the handler registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;

use crate::error::{Result, WitError};
use crate::types::{Context, ConverseResponse};

/// Event derived from one converse turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverseEvent {
    /// The bot produced a message for the user.
    Message,
    /// The bot wants the caller to perform the named action.
    Action(String),
    /// The dialog concluded.
    Stop,
    /// The remote service reported an error state.
    Error,
    /// A `type` value this crate does not model, dispatched verbatim.
    Other(String),
}

impl ConverseEvent {
    /// Derive the event from a response, validating its shape.
    pub fn from_response(response: &ConverseResponse) -> Result<Self> {
        match response.kind.as_str() {
            "message" => Ok(Self::Message),
            "stop" => Ok(Self::Stop),
            "error" => Ok(Self::Error),
            "action" => match response.action.as_deref() {
                Some(name) if !name.is_empty() => Ok(Self::Action(name.to_string())),
                _ => Err(WitError::InvalidResponse(
                    "action response without an action name".to_string(),
                )),
            },
            other => Ok(Self::Other(other.to_string())),
        }
    }

    /// Registry key this event dispatches under.
    pub fn key(&self) -> String {
        match self {
            Self::Message => "message".to_string(),
            Self::Action(name) => format!("action:{name}"),
            Self::Stop => "stop".to_string(),
            Self::Error => "error".to_string(),
            Self::Other(kind) => kind.clone(),
        }
    }

    /// Whether the conversation loop ends after dispatching this event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stop | Self::Error)
    }
}

/// Boxed async handler invoked with the turn's response and the mutable
/// conversation context.
pub type Handler =
    Arc<dyn for<'a> Fn(&'a ConverseResponse, &'a mut Context) -> BoxFuture<'a, ()> + Send + Sync>;

/// Handler registry keyed by event key.
///
/// Registration order per key is invocation order. The registry is only
/// read during dispatch, so concurrent runs can share it freely.
#[derive(Default)]
pub struct EventRegistry {
    handlers: RwLock<HashMap<String, Vec<Handler>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under an event key.
    pub fn on(&self, event: impl Into<String>, handler: Handler) {
        self.handlers
            .write()
            .unwrap()
            .entry(event.into())
            .or_default()
            .push(handler);
    }

    /// Snapshot the handlers registered under a key.
    pub fn handlers_for(&self, event: &str) -> Vec<Handler> {
        self.handlers
            .read()
            .unwrap()
            .get(event)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn response(kind: &str, action: Option<&str>) -> ConverseResponse {
        ConverseResponse {
            kind: kind.to_string(),
            action: action.map(str::to_string),
            msg: None,
            entities: serde_json::Value::Null,
            confidence: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn action_event_carries_the_action_name() {
        let event = ConverseEvent::from_response(&response("action", Some("greet"))).unwrap();

        assert_eq!(event, ConverseEvent::Action("greet".to_string()));
        assert_eq!(event.key(), "action:greet");
    }

    #[test]
    fn action_without_name_is_rejected() {
        let err = ConverseEvent::from_response(&response("action", None)).unwrap_err();

        assert!(matches!(err, WitError::InvalidResponse(_)));
    }

    #[test]
    fn action_with_empty_name_is_rejected() {
        let err = ConverseEvent::from_response(&response("action", Some(""))).unwrap_err();

        assert!(matches!(err, WitError::InvalidResponse(_)));
    }

    #[test]
    fn only_stop_and_error_are_terminal() {
        assert!(ConverseEvent::Stop.is_terminal());
        assert!(ConverseEvent::Error.is_terminal());
        assert!(!ConverseEvent::Message.is_terminal());
        assert!(!ConverseEvent::Action("greet".to_string()).is_terminal());
        assert!(!ConverseEvent::Other("merge".to_string()).is_terminal());
    }

    #[test]
    fn unknown_kind_dispatches_under_its_verbatim_key() {
        let event = ConverseEvent::from_response(&response("merge", None)).unwrap();

        assert_eq!(event, ConverseEvent::Other("merge".to_string()));
        assert_eq!(event.key(), "merge");
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = EventRegistry::new();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.on(
                "stop",
                Arc::new(move |_response, _context| {
                    let order = Arc::clone(&order);
                    Box::pin(async move {
                        order.lock().unwrap().push(tag);
                    })
                }),
            );
        }

        let handlers = registry.handlers_for("stop");
        assert_eq!(handlers.len(), 3);

        let mut context = Context::new();
        let resp = response("stop", None);
        futures::executor::block_on(async {
            for handler in handlers {
                handler(&resp, &mut context).await;
            }
        });

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_key_has_no_handlers() {
        let registry = EventRegistry::new();

        assert!(registry.handlers_for("action:greet").is_empty());
    }
}
