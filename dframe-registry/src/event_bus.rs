//! Named-event bus that loaded listeners subscribe to.

use dashmap::DashMap;
use dframe_core::{BotContext, ClientEvent, ListenerHandler, SubscriptionId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

struct Subscriber {
    id: SubscriptionId,
    handler: Arc<dyn ListenerHandler>,
    once: bool,
}

/// Delivers client events to the handlers subscribed under the event's name.
#[derive(Default)]
pub struct EventBus {
    subscribers: DashMap<String, Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler` to `event`. A `once` subscription is dropped after its first delivery.
    pub fn subscribe(&self, event: &str, handler: Arc<dyn ListenerHandler>, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .entry(event.to_string())
            .or_default()
            .push(Subscriber { id, handler, once });
        debug!(event, subscription = id.0, once, "listener subscribed");
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool {
        let Some(mut subscribers) = self.subscribers.get_mut(event) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        if removed {
            debug!(event, subscription = id.0, "listener unsubscribed");
        }
        removed
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.get(event).map(|s| s.len()).unwrap_or(0)
    }

    /// Runs every handler subscribed to the event's name, in subscription order, and returns
    /// how many ran. Handler errors are logged and do not stop delivery.
    pub async fn emit(&self, bot: &BotContext, event: &ClientEvent) -> usize {
        let name = event.name();
        let handlers: Vec<Arc<dyn ListenerHandler>> = match self.subscribers.get_mut(name) {
            Some(mut subscribers) => {
                let handlers = subscribers.iter().map(|s| Arc::clone(&s.handler)).collect();
                subscribers.retain(|s| !s.once);
                handlers
            }
            None => return 0,
        };

        for handler in &handlers {
            if let Err(e) = handler.execute(bot, event).await {
                error!(event = name, error = %e, "listener failed");
            }
        }
        handlers.len()
    }
}
