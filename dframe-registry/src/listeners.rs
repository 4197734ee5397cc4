//! Listener table wired to the [`EventBus`].

use crate::event_bus::EventBus;
use crate::registry::{ComponentRegistry, RegistryContext, RegistryHooks};
use dframe_core::Listener;
use std::ops::Deref;
use std::sync::Arc;
use tracing::warn;

struct BusHooks {
    bus: Arc<EventBus>,
}

impl RegistryHooks<Listener> for BusHooks {
    fn loaded(&self, listener: &Arc<Listener>) {
        let id = self
            .bus
            .subscribe(&listener.name, Arc::clone(&listener.execute), listener.once);
        if !listener.attach_subscription(id) {
            warn!(listener_id = %listener.id, "listener already subscribed");
            self.bus.unsubscribe(&listener.name, id);
        }
    }

    fn unloading(&self, listener: &Listener) {
        if let Some(id) = listener.subscription() {
            self.bus.unsubscribe(&listener.name, id);
        }
    }
}

/// Registry of listeners; loading subscribes, unloading detaches.
pub struct ListenerRegistry {
    registry: ComponentRegistry<Listener>,
    bus: Arc<EventBus>,
}

impl ListenerRegistry {
    pub fn new(ctx: RegistryContext, bus: Arc<EventBus>) -> Self {
        let hooks = BusHooks { bus: Arc::clone(&bus) };
        Self {
            registry: ComponentRegistry::with_hooks(ctx, Box::new(hooks)),
            bus,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

impl Deref for ListenerRegistry {
    type Target = ComponentRegistry<Listener>;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}
