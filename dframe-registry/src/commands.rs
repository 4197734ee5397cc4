//! Command table plus the additive alias table for message commands.

use crate::registry::{ComponentRegistry, RegistryContext, RegistryHooks};
use dashmap::DashMap;
use dframe_core::{Command, CommandType};
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

/// `alias id -> command id`. First registrant wins; entries are never removed.
#[derive(Debug, Default)]
pub struct AliasTable {
    aliases: DashMap<String, String>,
}

impl AliasTable {
    /// Registers `alias` for `command_id` unless another command already claimed it.
    pub fn register(&self, alias: &str, command_id: &str) -> bool {
        let key = CommandType::Message.id_for(&alias.to_lowercase());
        match self.aliases.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(command_id.to_string());
                true
            }
        }
    }

    /// Command id an alias id (`Message:<alias>`) points at.
    pub fn resolve(&self, alias_id: &str) -> Option<String> {
        self.aliases.get(alias_id).map(|id| id.value().clone())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

struct AliasHooks {
    aliases: Arc<AliasTable>,
}

impl RegistryHooks<Command> for AliasHooks {
    fn loaded(&self, command: &Arc<Command>) {
        for alias in command.aliases() {
            if !self.aliases.register(alias, &command.id) {
                debug!(alias = %alias, command_id = %command.id, "alias already taken");
            }
        }
    }
}

/// Registry of commands of every type.
pub struct CommandRegistry {
    registry: ComponentRegistry<Command>,
    aliases: Arc<AliasTable>,
}

impl CommandRegistry {
    pub fn new(ctx: RegistryContext) -> Self {
        let aliases = Arc::new(AliasTable::default());
        let hooks = AliasHooks {
            aliases: Arc::clone(&aliases),
        };
        Self {
            registry: ComponentRegistry::with_hooks(ctx, Box::new(hooks)),
            aliases,
        }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Message command invoked as `name`, directly or through an alias.
    pub fn find_message_command(&self, name: &str) -> Option<Arc<Command>> {
        let id = CommandType::Message.id_for(&name.to_lowercase());
        self.registry
            .get(&id)
            .or_else(|| self.aliases.resolve(&id).and_then(|target| self.registry.get(&target)))
    }
}

impl Deref for CommandRegistry {
    type Target = ComponentRegistry<Command>;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}
