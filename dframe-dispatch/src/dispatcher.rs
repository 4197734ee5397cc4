//! Routes message, interaction and autocomplete events to exactly one loaded definition.
//!
//! Each flow applies policy in a fixed order and logs every step, then runs the handler
//! between `Execute` and `Success`/`Error` lifecycle events.

use crate::cooldown::{to_datetime, CooldownCheck, CooldownManager};
use crate::events::{AutocompleteEvent, CommandEvent, EventChannels, Invocation};
use crate::overrides::Overrides;
use crate::permissions::{self, PermissionCheck, Subject};
use crate::prefix::PrefixMatcher;
use dframe_core::permissions::humanize_permission;
use dframe_core::{
    Autocompleter, BotContext, ChannelKind, Command, CommandKind, CommandType, IncomingMessage, Interaction,
    InteractionKind, MessageExt,
};
use dframe_registry::{AutocompleteRegistry, CommandRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Default permission-denial replies to messages are deleted after this long.
pub const DENIAL_REPLY_TTL: Duration = Duration::from_secs(10);

pub const MEMBER_PERMISSIONS_REPLY: &str = "❌ You don't have the required permission(s) to use this command.";

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not addressed to a command, or dropped silently (unknown name, disabled, dev-only, wrong context).
    Ignored,
    /// An interceptor returned false.
    Intercepted,
    /// `Unknown` was published.
    Unknown,
    MemberDenied,
    ClientDenied,
    CoolingDown,
    /// A permission lookup failed; nothing ran and nothing was replied.
    Aborted,
    Executed,
    Failed,
}

/// Policy and routing shared by every inbound event.
pub struct Dispatcher {
    bot: BotContext,
    commands: Arc<CommandRegistry>,
    completers: Arc<AutocompleteRegistry>,
    cooldowns: CooldownManager,
    prefix: PrefixMatcher,
    overrides: Arc<Overrides>,
    events: EventChannels,
}

impl Dispatcher {
    pub fn new(
        bot: BotContext,
        commands: Arc<CommandRegistry>,
        completers: Arc<AutocompleteRegistry>,
        cooldowns: CooldownManager,
        overrides: Arc<Overrides>,
        events: EventChannels,
    ) -> Self {
        let prefix = PrefixMatcher::new(bot.prefix());
        Self {
            bot,
            commands,
            completers,
            cooldowns,
            prefix,
            overrides,
            events,
        }
    }

    pub fn bot(&self) -> &BotContext {
        &self.bot
    }

    pub fn cooldowns(&self) -> &CooldownManager {
        &self.cooldowns
    }

    /// Message-command flow: filter, intercept, parse, resolve, context, permissions, cooldown, run.
    #[instrument(skip(self, message), fields(message_id = %message.id, user_id = %message.author.id))]
    pub async fn handle_message(&self, message: &IncomingMessage) -> DispatchOutcome {
        if message.content.is_empty() || message.author.bot {
            return DispatchOutcome::Ignored;
        }

        if let Some(interceptor) = self.overrides.message_interceptor() {
            if !interceptor.intercept(&self.bot, message).await {
                info!("step: message interceptor stopped dispatch");
                return DispatchOutcome::Intercepted;
            }
        }

        let mention = self.bot.platform.self_mention_pattern();
        let Some(parsed) = self.prefix.parse(&message.content, mention.as_deref()) else {
            return DispatchOutcome::Ignored;
        };

        let Some(command) = self.commands.find_message_command(&parsed.name) else {
            debug!(name = %parsed.name, "no message command");
            return DispatchOutcome::Ignored;
        };
        if command.command_type != CommandType::Message || command.disabled {
            return DispatchOutcome::Ignored;
        }
        if command.dev_only() && !message.is_developer(&self.bot) {
            debug!(command_id = %command.id, "dev-only command, caller is not a developer");
            return DispatchOutcome::Ignored;
        }

        let channel = if message.in_guild() {
            ChannelKind::Guild
        } else {
            ChannelKind::BotDm
        };
        if !command.runs_in(channel) {
            debug!(command_id = %command.id, ?channel, "command not available in this context");
            return DispatchOutcome::Ignored;
        }

        info!(command_id = %command.id, args = parsed.args.len(), "step: message command resolved");
        let invocation = Invocation::Message(message.clone());

        if let Some(guild_id) = message.guild_id.as_deref() {
            if let Some(outcome) = self
                .gate(&invocation, &command, guild_id, &message.channel_id, Gate::Member)
                .await
            {
                return outcome;
            }
            if let Some(outcome) = self
                .gate(&invocation, &command, guild_id, &message.channel_id, Gate::Client)
                .await
            {
                return outcome;
            }
        }

        if !self.enforce_cooldown(&invocation, &command).await {
            return DispatchOutcome::CoolingDown;
        }

        self.execute(invocation, command, &parsed.args).await
    }

    /// Chat-input and context-menu flow: intercept, resolve, client permissions, cooldown, run.
    #[instrument(skip(self, interaction), fields(interaction_id = %interaction.id, user_id = %interaction.user.id))]
    pub async fn handle_interaction(&self, interaction: &Interaction) -> DispatchOutcome {
        let Some(command_type) = CommandType::from_interaction(interaction.kind) else {
            return DispatchOutcome::Ignored;
        };

        if let Some(interceptor) = self.overrides.interaction_interceptor() {
            if !interceptor.intercept(&self.bot, interaction).await {
                info!("step: interaction interceptor stopped dispatch");
                return DispatchOutcome::Intercepted;
            }
        }

        let id = command_type.id_for(&interaction.command_name);
        let command = match self.commands.get(&id) {
            Some(command) if !command.disabled && command.command_type != CommandType::Message => command,
            _ => {
                info!(command_id = %id, "step: unknown interaction command");
                self.events.command(CommandEvent::Unknown(interaction.clone()));
                return DispatchOutcome::Unknown;
            }
        };
        info!(command_id = %command.id, "step: interaction command resolved");
        let invocation = Invocation::Interaction(interaction.clone());

        if let (Some(guild_id), Some(channel_id), ChannelKind::Guild) = (
            interaction.guild_id.as_deref(),
            interaction.channel_id.as_deref(),
            interaction.channel_kind,
        ) {
            if let Some(outcome) = self
                .gate(&invocation, &command, guild_id, channel_id, Gate::Client)
                .await
            {
                return outcome;
            }
        }

        if !self.enforce_cooldown(&invocation, &command).await {
            return DispatchOutcome::CoolingDown;
        }

        self.execute(invocation, command, &[]).await
    }

    /// Autocomplete flow: a standalone completer named after the focused option wins over the
    /// command's inline handler.
    #[instrument(skip(self, interaction), fields(interaction_id = %interaction.id, command = %interaction.command_name))]
    pub async fn handle_autocomplete(&self, interaction: &Interaction) -> DispatchOutcome {
        if interaction.kind != InteractionKind::Autocomplete {
            return DispatchOutcome::Ignored;
        }

        let command = self
            .commands
            .get(&CommandType::Slash.id_for(&interaction.command_name))
            .filter(|c| c.command_type == CommandType::Slash);
        let (Some(option), Some(command)) = (interaction.focused_option(), command) else {
            self.events.autocomplete(AutocompleteEvent::Unknown(interaction.clone()));
            return DispatchOutcome::Unknown;
        };

        if let Some(completer) = self.completers.get(&option.name).filter(|c| !c.disabled) {
            info!(completer = %completer.id, "step: autocompleter resolved");
            let value = option.text();
            return self
                .complete(interaction, command, Completion::Standalone(completer, value))
                .await;
        }

        let inline = match &command.kind {
            CommandKind::Slash {
                autocomplete: Some(handler),
                ..
            } if !command.disabled => Some(Arc::clone(handler)),
            _ => None,
        };
        match inline {
            Some(handler) => {
                info!(command_id = %command.id, "step: inline autocomplete resolved");
                self.complete(interaction, command, Completion::Inline(handler)).await
            }
            None => {
                self.events.autocomplete(AutocompleteEvent::Unknown(interaction.clone()));
                DispatchOutcome::Unknown
            }
        }
    }

    async fn complete(&self, interaction: &Interaction, command: Arc<Command>, target: Completion) -> DispatchOutcome {
        let completer = match &target {
            Completion::Standalone(completer, _) => Some(Arc::clone(completer)),
            Completion::Inline(_) => None,
        };
        self.events.autocomplete(AutocompleteEvent::Execute {
            interaction: interaction.clone(),
            command: Arc::clone(&command),
            completer: completer.clone(),
        });

        let result = match &target {
            Completion::Standalone(completer, value) => {
                completer.execute.execute(&self.bot, interaction, &command, value).await
            }
            Completion::Inline(handler) => handler.autocomplete(&self.bot, interaction).await,
        };

        match result {
            Ok(()) => {
                info!(command_id = %command.id, "step: autocomplete done");
                self.events.autocomplete(AutocompleteEvent::Success {
                    interaction: interaction.clone(),
                    command,
                    completer,
                });
                DispatchOutcome::Executed
            }
            Err(e) => {
                warn!(command_id = %command.id, error = %e, "autocomplete handler failed");
                self.events.autocomplete(AutocompleteEvent::Error {
                    interaction: interaction.clone(),
                    command,
                    completer,
                    error: Arc::new(e),
                });
                DispatchOutcome::Failed
            }
        }
    }

    /// Runs the command handler between `Execute` and `Success`/`Error`.
    async fn execute(&self, invocation: Invocation, command: Arc<Command>, args: &[String]) -> DispatchOutcome {
        info!(command_id = %command.id, "step: command execute");
        self.events.command(CommandEvent::Execute {
            invocation: invocation.clone(),
            command: Arc::clone(&command),
        });

        let result = match (&command.kind, &invocation) {
            (CommandKind::Message { execute, .. }, Invocation::Message(message)) => {
                execute.execute(&self.bot, message, args).await
            }
            (
                CommandKind::Slash { execute, .. } | CommandKind::Context { execute, .. },
                Invocation::Interaction(interaction),
            ) => execute.execute(&self.bot, interaction).await,
            _ => Err(anyhow::anyhow!(
                "{} cannot be invoked from this context",
                command.id
            )),
        };

        match result {
            Ok(()) => {
                info!(command_id = %command.id, "step: command done");
                self.events.command(CommandEvent::Success { invocation, command });
                DispatchOutcome::Executed
            }
            Err(e) => {
                warn!(command_id = %command.id, error = %e, "command handler failed");
                self.events.command(CommandEvent::Error {
                    invocation,
                    command,
                    error: Arc::new(e),
                });
                DispatchOutcome::Failed
            }
        }
    }

    /// Permission check for one subject. Returns the outcome to stop with, or `None` to continue.
    async fn gate(
        &self,
        invocation: &Invocation,
        command: &Command,
        guild_id: &str,
        channel_id: &str,
        gate: Gate,
    ) -> Option<DispatchOutcome> {
        let required = match gate {
            Gate::Member => command.member_permissions,
            Gate::Client => command.client_permissions,
        }
        .filter(|p| !p.is_empty())?;
        let subject = match gate {
            Gate::Member => Subject::Member(invocation.user_id()),
            Gate::Client => Subject::Client,
        };

        let missing = match permissions::check(self.bot.platform.as_ref(), guild_id, channel_id, subject, required).await {
            Ok(PermissionCheck::Granted) => return None,
            Ok(PermissionCheck::Missing(missing)) => missing,
            Err(e) => {
                error!(command_id = %command.id, guild_id, ?gate, error = %e, "permission lookup failed");
                return Some(DispatchOutcome::Aborted);
            }
        };
        info!(command_id = %command.id, ?gate, ?missing, "step: permissions missing");

        match gate {
            Gate::Member => {
                if let Some(handler) = self.overrides.member_permissions() {
                    if let Err(e) = handler.on_member_permissions(&self.bot, invocation, command, &missing).await {
                        warn!(error = %e, "member permission handler failed");
                    }
                } else {
                    self.deny(invocation, MEMBER_PERMISSIONS_REPLY).await;
                }
                Some(DispatchOutcome::MemberDenied)
            }
            Gate::Client => {
                if let Some(handler) = self.overrides.client_permissions() {
                    if let Err(e) = handler.on_client_permissions(&self.bot, invocation, command, &missing).await {
                        warn!(error = %e, "client permission handler failed");
                    }
                } else {
                    let name = match self.bot.platform.client_display_name(guild_id).await {
                        Ok(name) => name,
                        Err(e) => {
                            warn!(guild_id, error = %e, "could not resolve bot display name");
                            "The bot".to_string()
                        }
                    };
                    self.deny(invocation, &client_permissions_reply(&name, &missing)).await;
                }
                Some(DispatchOutcome::ClientDenied)
            }
        }
    }

    /// Returns false when the caller is cooling down; the rejection has been answered.
    async fn enforce_cooldown(&self, invocation: &Invocation, command: &Command) -> bool {
        let expires_at_ms = match self
            .cooldowns
            .check_and_stamp(&command.id, invocation.user_id(), command.cooldown)
        {
            CooldownCheck::Rejected { expires_at_ms } => expires_at_ms,
            CooldownCheck::Exempt | CooldownCheck::Stamped { .. } => return true,
        };
        info!(command_id = %command.id, expires_at_ms, "step: cooldown active");
        let expires_at = to_datetime(expires_at_ms);

        if let Some(handler) = self.overrides.cooldown() {
            if let Err(e) = handler.on_cooldown(&self.bot, invocation, command, expires_at).await {
                warn!(error = %e, "cooldown handler failed");
            }
            return false;
        }

        let text = format!(
            "❌ Slow down and try the Command Again **{}**.",
            self.bot.platform.relative_time(expires_at)
        );
        match invocation {
            Invocation::Message(message) => {
                let remaining = expires_at_ms.saturating_sub(self.cooldowns.now_ms());
                self.reply_transient(message, &text, Duration::from_millis(remaining)).await;
            }
            Invocation::Interaction(interaction) => self.reply_ephemeral(interaction, &text).await,
        }
        false
    }

    async fn deny(&self, invocation: &Invocation, text: &str) {
        match invocation {
            Invocation::Message(message) => self.reply_transient(message, text, DENIAL_REPLY_TTL).await,
            Invocation::Interaction(interaction) => self.reply_ephemeral(interaction, text).await,
        }
    }

    /// Replies to a message and deletes the reply after `ttl`.
    async fn reply_transient(&self, message: &IncomingMessage, text: &str, ttl: Duration) {
        let sent = match self.bot.platform.reply(message, text).await {
            Ok(sent) => sent,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "reply failed");
                return;
            }
        };
        let platform = Arc::clone(&self.bot.platform);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = platform.delete_message(&sent).await {
                debug!(message_id = %sent.id, error = %e, "transient reply already gone");
            }
        });
    }

    async fn reply_ephemeral(&self, interaction: &Interaction, text: &str) {
        if let Err(e) = self.bot.platform.reply_interaction(interaction, text, true).await {
            warn!(interaction_id = %interaction.id, error = %e, "interaction reply failed");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Member,
    Client,
}

enum Completion {
    Standalone(Arc<Autocompleter>, String),
    Inline(Arc<dyn dframe_core::CommandAutocompleteHandler>),
}

/// Default reply when the bot lacks permissions.
pub fn client_permissions_reply(display_name: &str, missing: &[&str]) -> String {
    let listed = missing
        .iter()
        .map(|p| format!("` {} `", humanize_permission(p)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("❌ {} requires {} permission(s) to run this command.", display_name, listed)
}
