//! Shared fixtures for dispatch tests.
//!
//! [`MockPlatform`] records every reply, deletion and publish so tests can assert on them
//! without a live chat platform. Permission snapshots and failures are configurable.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dframe_core::{
    ApplicationCommandData, AutocompleterHandler, BotContext, ChannelKind, ClientEvent, Command,
    CommandAutocompleteHandler, FrameworkError, FrameworkSettings, HandlerCatalog, IncomingMessage, Interaction, InteractionCommandHandler,
    InteractionKind, InteractionOption, ListenerHandler, MessageCommandHandler, PermissionSnapshot, Permissions,
    Platform, SentMessage, User,
};
use dframe_dispatch::{Clock, CooldownManager, Framework};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const GUILD: &str = "900";
pub const CHANNEL: &str = "901";
pub const T0: u64 = 1_700_000_000_000;

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reply { channel_id: String, text: String },
    Delete { message_id: String },
    InteractionReply { interaction_id: String, text: String, ephemeral: bool },
    SetGlobal(Vec<ApplicationCommandData>),
    SetGuild { guild_id: String, commands: Vec<ApplicationCommandData> },
}

#[derive(Default)]
pub struct MockPlatform {
    pub calls: Mutex<Vec<Call>>,
    /// Permission snapshots keyed by user id; the bot uses the key `"@client"`.
    pub permissions: Mutex<HashMap<String, PermissionSnapshot>>,
    pub fail_permissions: Mutex<bool>,
    pub failing_guilds: Mutex<Vec<String>>,
    pub mention: Mutex<Option<String>>,
    next_id: AtomicUsize,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn grant(&self, user_id: &str, snapshot: PermissionSnapshot) {
        self.permissions.lock().unwrap().insert(user_id.to_string(), snapshot);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { text, .. } | Call::InteractionReply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn snapshot(&self, key: &str) -> dframe_core::Result<PermissionSnapshot> {
        if *self.fail_permissions.lock().unwrap() {
            return Err(FrameworkError::Platform("member lookup failed".to_string()));
        }
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or_else(|| PermissionSnapshot {
                channel: None,
                guild: Permissions::all(),
            }))
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn self_mention_pattern(&self) -> Option<String> {
        self.mention.lock().unwrap().clone()
    }

    async fn reply(&self, message: &IncomingMessage, text: &str) -> dframe_core::Result<SentMessage> {
        self.record(Call::Reply {
            channel_id: message.channel_id.clone(),
            text: text.to_string(),
        });
        Ok(SentMessage {
            id: format!("sent-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            channel_id: message.channel_id.clone(),
        })
    }

    async fn delete_message(&self, message: &SentMessage) -> dframe_core::Result<()> {
        self.record(Call::Delete {
            message_id: message.id.clone(),
        });
        Ok(())
    }

    async fn reply_interaction(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> dframe_core::Result<()> {
        self.record(Call::InteractionReply {
            interaction_id: interaction.id.clone(),
            text: text.to_string(),
            ephemeral,
        });
        Ok(())
    }

    async fn member_permissions(&self, _guild_id: &str, _channel_id: &str, user_id: &str) -> dframe_core::Result<PermissionSnapshot> {
        self.snapshot(user_id)
    }

    async fn client_permissions(&self, _guild_id: &str, _channel_id: &str) -> dframe_core::Result<PermissionSnapshot> {
        self.snapshot("@client")
    }

    async fn client_display_name(&self, _guild_id: &str) -> dframe_core::Result<String> {
        Ok("Dframe".to_string())
    }

    async fn set_global_commands(&self, commands: &[ApplicationCommandData]) -> dframe_core::Result<()> {
        self.record(Call::SetGlobal(commands.to_vec()));
        Ok(())
    }

    async fn set_guild_commands(&self, guild_id: &str, commands: &[ApplicationCommandData]) -> dframe_core::Result<()> {
        if self.failing_guilds.lock().unwrap().iter().any(|g| g == guild_id) {
            return Err(FrameworkError::Platform(format!("missing access to {}", guild_id)));
        }
        self.record(Call::SetGuild {
            guild_id: guild_id.to_string(),
            commands: commands.to_vec(),
        });
        Ok(())
    }

    fn relative_time(&self, at: DateTime<Utc>) -> String {
        format!("in {}ms", at.timestamp_millis())
    }
}

/// Clock the test moves by hand.
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn at(ms: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(ms)))
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counting handler for every handler kind; fails when built with [`Spy::failing`].
#[derive(Clone, Default)]
pub struct Spy {
    hits: Arc<AtomicUsize>,
    fail: bool,
    pub last_args: Arc<Mutex<Vec<String>>>,
    pub last_value: Arc<Mutex<Option<String>>>,
}

impl Spy {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn hit(&self) -> anyhow::Result<()> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("spy failure");
        }
        Ok(())
    }
}

#[async_trait]
impl MessageCommandHandler for Spy {
    async fn execute(&self, _bot: &BotContext, _message: &IncomingMessage, args: &[String]) -> anyhow::Result<()> {
        *self.last_args.lock().unwrap() = args.to_vec();
        self.hit()
    }
}

#[async_trait]
impl InteractionCommandHandler for Spy {
    async fn execute(&self, _bot: &BotContext, _interaction: &Interaction) -> anyhow::Result<()> {
        self.hit()
    }
}

#[async_trait]
impl CommandAutocompleteHandler for Spy {
    async fn autocomplete(&self, _bot: &BotContext, _interaction: &Interaction) -> anyhow::Result<()> {
        self.hit()
    }
}

#[async_trait]
impl AutocompleterHandler for Spy {
    async fn execute(&self, _bot: &BotContext, _interaction: &Interaction, _command: &Command, value: &str) -> anyhow::Result<()> {
        *self.last_value.lock().unwrap() = Some(value.to_string());
        self.hit()
    }
}

#[async_trait]
impl ListenerHandler for Spy {
    async fn execute(&self, _bot: &BotContext, _event: &ClientEvent) -> anyhow::Result<()> {
        self.hit()
    }
}

/// Spies registered in the catalog under `ok`, `fail`, `inline` and `city`; `fail` is bound for every kind but listeners.
pub struct Spies {
    pub ok: Spy,
    pub fail: Spy,
    pub inline: Spy,
    pub city: Spy,
}

impl Spies {
    pub fn new() -> Self {
        Self {
            ok: Spy::default(),
            fail: Spy::failing(),
            inline: Spy::default(),
            city: Spy::default(),
        }
    }

    pub fn catalog(&self) -> HandlerCatalog {
        HandlerCatalog::new()
            .message_command("ok", Arc::new(self.ok.clone()))
            .message_command("fail", Arc::new(self.fail.clone()))
            .interaction_command("ok", Arc::new(self.ok.clone()))
            .interaction_command("fail", Arc::new(self.fail.clone()))
            .command_autocomplete("inline", Arc::new(self.inline.clone()))
            .command_autocomplete("fail", Arc::new(self.fail.clone()))
            .autocompleter("city", Arc::new(self.city.clone()))
            .autocompleter("fail", Arc::new(self.fail.clone()))
            .listener("ok", Arc::new(self.ok.clone()))
    }
}

/// A framework over a temporary component root.
pub struct Harness {
    pub root: TempDir,
    pub platform: Arc<MockPlatform>,
    pub clock: Arc<ManualClock>,
    pub spies: Spies,
    pub framework: Framework,
}

impl Harness {
    /// Writes `files` (relative path, contents) under a fresh root and starts a framework on it.
    pub fn start(files: &[(&str, &str)], settings: FrameworkSettings) -> Self {
        let root = tempfile::tempdir().unwrap();
        for (relative, contents) in files {
            let path: PathBuf = root.path().join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, contents).unwrap();
        }
        let platform = MockPlatform::new();
        let clock = ManualClock::at(T0);
        let spies = Spies::new();
        let framework = Framework::builder(platform.clone(), spies.catalog())
            .settings(settings.with_root_dir(root.path()))
            .cooldowns(CooldownManager::new(clock.clone()))
            .build();
        framework.start();
        Self {
            root,
            platform,
            clock,
            spies,
            framework,
        }
    }
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: Some(format!("user{}", id)),
        display_name: None,
        bot: false,
    }
}

pub fn guild_message(author: &str, content: &str) -> IncomingMessage {
    IncomingMessage {
        id: "m1".to_string(),
        author: user(author),
        channel_id: CHANNEL.to_string(),
        guild_id: Some(GUILD.to_string()),
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

pub fn dm_message(author: &str, content: &str) -> IncomingMessage {
    IncomingMessage {
        guild_id: None,
        channel_id: author.to_string(),
        ..guild_message(author, content)
    }
}

pub fn interaction(kind: InteractionKind, command_name: &str, user_id: &str) -> Interaction {
    Interaction {
        id: "i1".to_string(),
        kind,
        command_name: command_name.to_string(),
        user: user(user_id),
        guild_id: Some(GUILD.to_string()),
        channel_id: Some(CHANNEL.to_string()),
        channel_kind: ChannelKind::Guild,
        options: Vec::new(),
        target_id: None,
    }
}

pub fn autocomplete(command_name: &str, option: &str, value: &str) -> Interaction {
    Interaction {
        options: vec![InteractionOption {
            name: option.to_string(),
            value: serde_json::Value::String(value.to_string()),
            focused: true,
        }],
        ..interaction(InteractionKind::Autocomplete, command_name, "u1")
    }
}

pub fn slash(name: &str, handler: &str, extra: &str) -> String {
    format!(
        "[command]\nname = \"{name}\"\ndescription = \"{name} command\"\ncommandType = \"Slash\"\ncommandScope = \"default\"\nexecute = \"{handler}\"\n{extra}"
    )
}

pub fn message(name: &str, handler: &str, extra: &str) -> String {
    format!(
        "[command]\nname = \"{name}\"\ndescription = \"{name} command\"\ncommandType = \"Message\"\nexecute = \"{handler}\"\n{extra}"
    )
}
