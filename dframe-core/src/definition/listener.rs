use super::options;
use crate::error::Result;
use crate::handler::{HandlerCatalog, HandlerKind, ListenerHandler};
use crate::types::SubscriptionId;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Listener for a named client event. Id is `Client:<eventName>`.
pub struct Listener {
    pub id: String,
    /// Event name the listener subscribes to.
    pub name: String,
    /// Unsubscribe after the first delivery.
    pub once: bool,
    pub disabled: bool,
    pub source: Option<PathBuf>,
    pub execute: Arc<dyn ListenerHandler>,
    subscription: OnceLock<SubscriptionId>,
}

impl Listener {
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Live event-bus subscription, once the registry has attached one.
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription.get().copied()
    }

    /// Records the subscription created at load. Returns false if one was already attached.
    pub fn attach_subscription(&self, id: SubscriptionId) -> bool {
        self.subscription.set(id).is_ok()
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("once", &self.once)
            .field("disabled", &self.disabled)
            .field("source", &self.source)
            .field("subscription", &self.subscription.get())
            .finish_non_exhaustive()
    }
}

/// Builds a listener. Checks: object, name, execute, once, disabled.
pub fn listener(options: &Value, catalog: &HandlerCatalog) -> Result<Listener> {
    let map = options::object(options)?;
    let name = options::required_str(map, "name")?;
    let execute = options::required_handler(map, "execute", HandlerKind::Listener.as_str(), |k| {
        catalog.get_listener(k)
    })?;
    let once = options::optional_bool(map, "once")?;
    let disabled = options::optional_bool(map, "disabled")?;

    Ok(Listener {
        id: format!("Client:{}", name),
        name,
        once: once.unwrap_or(false),
        disabled: disabled.unwrap_or(false),
        source: None,
        execute,
        subscription: OnceLock::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameworkError;
    use crate::platform::BotContext;
    use crate::types::ClientEvent;
    use async_trait::async_trait;
    use serde_json::json;

    struct Greeter;

    #[async_trait]
    impl ListenerHandler for Greeter {
        async fn execute(&self, _bot: &BotContext, _event: &ClientEvent) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn catalog() -> HandlerCatalog {
        HandlerCatalog::new().listener("greet", Arc::new(Greeter))
    }

    #[test]
    fn test_listener_id_and_defaults() {
        let built = listener(&json!({ "name": "ready", "execute": "greet" }), &catalog()).unwrap();
        assert_eq!(built.id, "Client:ready");
        assert!(!built.once);
        assert!(!built.disabled);
        assert_eq!(built.subscription(), None);
    }

    #[test]
    fn test_listener_subscription_attaches_once() {
        let built = listener(&json!({ "name": "ready", "execute": "greet", "once": true }), &catalog()).unwrap();
        assert!(built.once);
        assert!(built.attach_subscription(SubscriptionId(7)));
        assert!(!built.attach_subscription(SubscriptionId(8)));
        assert_eq!(built.subscription(), Some(SubscriptionId(7)));
    }

    #[test]
    fn test_listener_checks_execute_before_once() {
        let opts = json!({ "name": "ready", "once": "yes" });
        assert!(matches!(
            listener(&opts, &catalog()),
            Err(FrameworkError::InvalidOption(ref name)) if name == "execute"
        ));
        let opts = json!({ "name": "ready", "execute": "greet", "once": "yes" });
        assert!(matches!(
            listener(&opts, &catalog()),
            Err(FrameworkError::InvalidType { ref name, .. }) if name == "once"
        ));
    }
}
