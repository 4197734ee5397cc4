//! Shared fixtures for registry tests: a component root on disk, a handler catalog with
//! counting handlers, and a platform that accepts every call.

#![allow(dead_code)]

use async_trait::async_trait;
use dframe_core::{
    ApplicationCommandData, BotContext, ClientEvent, FrameworkSettings, HandlerCatalog, IncomingMessage,
    Interaction, InteractionCommandHandler, ListenerHandler, MessageCommandHandler, PermissionSnapshot, Platform,
    SentMessage,
};
use dframe_registry::{ManifestLoader, RegistryContext};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::broadcast;

/// Platform stub; registry tests never reach the network.
pub struct NullPlatform;

#[async_trait]
impl Platform for NullPlatform {
    fn self_mention_pattern(&self) -> Option<String> {
        None
    }

    async fn reply(&self, message: &IncomingMessage, _text: &str) -> dframe_core::Result<SentMessage> {
        Ok(SentMessage {
            id: "0".to_string(),
            channel_id: message.channel_id.clone(),
        })
    }

    async fn delete_message(&self, _message: &SentMessage) -> dframe_core::Result<()> {
        Ok(())
    }

    async fn reply_interaction(&self, _interaction: &Interaction, _text: &str, _ephemeral: bool) -> dframe_core::Result<()> {
        Ok(())
    }

    async fn member_permissions(&self, _g: &str, _c: &str, _u: &str) -> dframe_core::Result<PermissionSnapshot> {
        Ok(PermissionSnapshot::default())
    }

    async fn client_permissions(&self, _g: &str, _c: &str) -> dframe_core::Result<PermissionSnapshot> {
        Ok(PermissionSnapshot::default())
    }

    async fn client_display_name(&self, _guild_id: &str) -> dframe_core::Result<String> {
        Ok("bot".to_string())
    }

    async fn set_global_commands(&self, _commands: &[ApplicationCommandData]) -> dframe_core::Result<()> {
        Ok(())
    }

    async fn set_guild_commands(&self, _guild_id: &str, _commands: &[ApplicationCommandData]) -> dframe_core::Result<()> {
        Ok(())
    }
}

pub fn bot_context() -> BotContext {
    BotContext::new(Arc::new(NullPlatform), Arc::new(FrameworkSettings::default()))
}

/// Counts invocations; used for every handler kind.
#[derive(Clone, Default)]
pub struct Counter(pub Arc<AtomicUsize>);

impl Counter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageCommandHandler for Counter {
    async fn execute(&self, _bot: &BotContext, _message: &IncomingMessage, _args: &[String]) -> anyhow::Result<()> {
        self.hit();
        Ok(())
    }
}

#[async_trait]
impl InteractionCommandHandler for Counter {
    async fn execute(&self, _bot: &BotContext, _interaction: &Interaction) -> anyhow::Result<()> {
        self.hit();
        Ok(())
    }
}

#[async_trait]
impl ListenerHandler for Counter {
    async fn execute(&self, _bot: &BotContext, _event: &ClientEvent) -> anyhow::Result<()> {
        self.hit();
        Ok(())
    }
}

/// Handlers registered under `v1` and `v2` for commands and listeners.
pub struct Handlers {
    pub v1: Counter,
    pub v2: Counter,
    pub catalog: Arc<HandlerCatalog>,
}

pub fn handlers() -> Handlers {
    let v1 = Counter::default();
    let v2 = Counter::default();
    let catalog = HandlerCatalog::new()
        .interaction_command("v1", Arc::new(v1.clone()))
        .interaction_command("v2", Arc::new(v2.clone()))
        .message_command("v1", Arc::new(v1.clone()))
        .message_command("v2", Arc::new(v2.clone()))
        .listener("v1", Arc::new(v1.clone()))
        .listener("v2", Arc::new(v2.clone()));
    Handlers {
        v1,
        v2,
        catalog: Arc::new(catalog),
    }
}

/// Temporary component root with `commands/`, `listeners/` and `autocomplete/`.
pub struct Root {
    pub dir: TempDir,
}

impl Root {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["commands", "listeners", "autocomplete"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `relative` under the root and returns the full path.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn context(&self, catalog: Arc<HandlerCatalog>) -> (RegistryContext, broadcast::Receiver<dframe_core::FrameworkEvent>) {
        let (events, rx) = broadcast::channel(16);
        let ctx = RegistryContext {
            root_dir: self.dir.path().to_path_buf(),
            loader: Arc::new(ManifestLoader::new()),
            catalog,
            events,
        };
        (ctx, rx)
    }
}

pub fn slash_manifest(name: &str, handler: &str) -> String {
    format!(
        "[command]\nname = \"{name}\"\ndescription = \"test command\"\ncommandType = \"Slash\"\ncommandScope = \"guild\"\nexecute = \"{handler}\"\n"
    )
}

pub fn message_manifest(name: &str, aliases: &[&str], handler: &str) -> String {
    let aliases = aliases.iter().map(|a| format!("\"{a}\"")).collect::<Vec<_>>().join(", ");
    format!(
        "[command]\nname = \"{name}\"\ndescription = \"test command\"\ncommandType = \"Message\"\naliases = [{aliases}]\nexecute = \"{handler}\"\n"
    )
}

pub fn slash_interaction(command_name: &str) -> Interaction {
    Interaction {
        id: "interaction-1".to_string(),
        kind: dframe_core::InteractionKind::ChatInput,
        command_name: command_name.to_string(),
        user: dframe_core::User {
            id: "100".to_string(),
            username: Some("alice".to_string()),
            display_name: None,
            bot: false,
        },
        guild_id: Some("900".to_string()),
        channel_id: Some("901".to_string()),
        channel_kind: dframe_core::ChannelKind::Guild,
        options: Vec::new(),
        target_id: None,
    }
}
