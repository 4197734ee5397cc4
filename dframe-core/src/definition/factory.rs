//! Command factories: validate a raw options object and build a [`Command`].
//!
//! Kind-specific checks run first, then the shared base checks (name, description, type,
//! permissions, cooldown, disabled). The first failing check is the reported error.

use super::command::{
    AppCommandSettings, Command, CommandContext, CommandKind, CommandScope, CommandType, IntegrationType,
};
use super::options::{self, Options};
use crate::error::Result;
use crate::handler::{HandlerCatalog, HandlerKind};
use crate::permissions::Permissions;
use serde_json::Value;

/// Fields every command shares, validated by [`base`].
struct BaseFields {
    name: String,
    description: String,
    command_type: CommandType,
    member_permissions: Option<Permissions>,
    client_permissions: Option<Permissions>,
    cooldown: Option<u64>,
    disabled: bool,
}

/// Builds a command of whatever type `commandType` names.
pub fn build_command(options: &Value, catalog: &HandlerCatalog) -> Result<Command> {
    let map = options::object(options)?;
    let command_type = options::required_enum(map, "commandType", &CommandType::NAMES, |v| {
        v.as_str().and_then(CommandType::parse)
    })?;
    match command_type {
        CommandType::Slash => slash_command(options, catalog),
        CommandType::Message => message_command(options, catalog),
        CommandType::ContextMessage | CommandType::ContextUser => context_command(options, catalog),
    }
}

/// Slash (chat-input) command. `commandType` in the options is ignored.
pub fn slash_command(options: &Value, catalog: &HandlerCatalog) -> Result<Command> {
    let map = options::object(options)?;
    let app = app_settings(map)?;
    let execute = options::required_handler(map, "execute", HandlerKind::InteractionCommand.as_str(), |k| {
        catalog.get_interaction_command(k)
    })?;
    let autocomplete = options::optional_handler(
        map,
        "autocomplete",
        HandlerKind::CommandAutocomplete.as_str(),
        |k| catalog.get_command_autocomplete(k),
    )?;
    let slash_options = options::optional_array(map, "options")?.cloned().unwrap_or_default();
    let base = base(map, Some(CommandType::Slash))?;
    Ok(assemble(
        base,
        CommandKind::Slash {
            app,
            options: slash_options,
            execute,
            autocomplete,
        },
    ))
}

/// User or message context-menu command.
pub fn context_command(options: &Value, catalog: &HandlerCatalog) -> Result<Command> {
    const CONTEXT_TYPES: [&str; 2] = ["ContextUser", "ContextMessage"];

    let map = options::object(options)?;
    let command_type = options::required_enum(map, "commandType", &CONTEXT_TYPES, |v| {
        match v.as_str().and_then(CommandType::parse) {
            Some(t @ (CommandType::ContextUser | CommandType::ContextMessage)) => Some(t),
            _ => None,
        }
    })?;
    let app = app_settings(map)?;
    let execute = options::required_handler(map, "execute", HandlerKind::InteractionCommand.as_str(), |k| {
        catalog.get_interaction_command(k)
    })?;
    let base = base(map, Some(command_type))?;
    Ok(assemble(base, CommandKind::Context { app, execute }))
}

/// Message (prefix) command. `commandType` in the options is ignored.
pub fn message_command(options: &Value, catalog: &HandlerCatalog) -> Result<Command> {
    let map = options::object(options)?;
    let aliases = options::optional_array(map, "aliases")?
        .map(|items| {
            items
                .iter()
                .filter_map(|a| a.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let usage = options::optional_str(map, "usage")?;
    let contexts = options::optional_enum_list(
        map,
        "contexts",
        &CommandContext::MESSAGE_NAMES,
        CommandContext::parse_message,
    )?;
    let execute = options::required_handler(map, "execute", HandlerKind::MessageCommand.as_str(), |k| {
        catalog.get_message_command(k)
    })?;
    let dev_only = options::optional_bool(map, "devOnly")?;
    let base = base(map, Some(CommandType::Message))?;
    Ok(assemble(
        base,
        CommandKind::Message {
            aliases,
            usage,
            dev_only: dev_only.unwrap_or(false),
            contexts: contexts.unwrap_or_else(|| vec![CommandContext::Guild]),
            execute,
        },
    ))
}

fn app_settings(map: &Options) -> Result<AppCommandSettings> {
    let scope = options::required_enum(map, "commandScope", &CommandScope::NAMES, CommandScope::parse)?;
    let contexts =
        options::optional_enum_list(map, "commandContexts", &CommandContext::NAMES, CommandContext::parse)?;
    let integration_types = options::optional_enum_list(
        map,
        "integrationTypes",
        &IntegrationType::NAMES,
        IntegrationType::parse,
    )?;
    let name_localizations = options::optional_localizations(map, "nameLocalizations")?;
    let description_localizations = options::optional_localizations(map, "descriptionLocalizations")?;

    Ok(AppCommandSettings {
        scope,
        contexts: contexts
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| vec![CommandContext::Guild]),
        integration_types: integration_types
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| vec![IntegrationType::GuildInstall]),
        name_localizations,
        description_localizations,
    })
}

/// Shared checks. `forced_type` is set by the type-specific factories; otherwise
/// `commandType` is read from the options.
fn base(map: &Options, forced_type: Option<CommandType>) -> Result<BaseFields> {
    let name = options::required_str(map, "name")?;
    let description = options::required_str(map, "description")?;
    let command_type = match forced_type {
        Some(t) => t,
        None => options::required_enum(map, "commandType", &CommandType::NAMES, |v| {
            v.as_str().and_then(CommandType::parse)
        })?,
    };
    let member_permissions = options::optional_permissions(map, "memberPermissions")?;
    let client_permissions = options::optional_permissions(map, "clientPermissions")?;
    let cooldown = options::optional_u64(map, "cooldown")?;
    let disabled = options::optional_bool(map, "disabled")?;

    Ok(BaseFields {
        name,
        description,
        command_type,
        member_permissions,
        client_permissions,
        cooldown,
        disabled: disabled.unwrap_or(false),
    })
}

fn assemble(base: BaseFields, kind: CommandKind) -> Command {
    Command {
        id: base.command_type.id_for(&base.name),
        name: base.name,
        description: base.description,
        command_type: base.command_type,
        cooldown: base.cooldown,
        member_permissions: base.member_permissions,
        client_permissions: base.client_permissions,
        disabled: base.disabled,
        source: None,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameworkError;
    use crate::handler::{InteractionCommandHandler, MessageCommandHandler};
    use crate::platform::BotContext;
    use crate::types::{IncomingMessage, Interaction};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct Noop;

    #[async_trait]
    impl InteractionCommandHandler for Noop {
        async fn execute(&self, _bot: &BotContext, _interaction: &Interaction) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl MessageCommandHandler for Noop {
        async fn execute(&self, _bot: &BotContext, _message: &IncomingMessage, _args: &[String]) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn catalog() -> HandlerCatalog {
        HandlerCatalog::new()
            .interaction_command("ping", Arc::new(Noop))
            .message_command("ping", Arc::new(Noop))
    }

    /// **Test: Slash factory builds id and applies defaults**
    ///
    /// **Setup:** minimal slash options.
    /// **Action:** `slash_command`.
    /// **Expected:** id `Slash:ping`, contexts `[Guild]`, integration `[GuildInstall]`, enabled.
    #[test]
    fn test_slash_command_defaults() {
        let opts = json!({
            "name": "ping",
            "description": "Replies with pong",
            "commandScope": "default",
            "execute": "ping",
        });
        let command = slash_command(&opts, &catalog()).unwrap();
        assert_eq!(command.id, "Slash:ping");
        assert_eq!(command.command_type, CommandType::Slash);
        assert!(!command.disabled);
        let app = command.app_settings().unwrap();
        assert_eq!(app.contexts, vec![CommandContext::Guild]);
        assert_eq!(app.integration_types, vec![IntegrationType::GuildInstall]);
    }

    /// **Test: Kind-specific checks run before the base checks**
    ///
    /// **Setup:** slash options missing both `name` and `commandScope`.
    /// **Action:** `slash_command`.
    /// **Expected:** the scope error is reported, not the name error.
    #[test]
    fn test_slash_command_reports_scope_before_name() {
        let opts = json!({ "description": "x", "execute": "ping" });
        match slash_command(&opts, &catalog()) {
            Err(FrameworkError::InvalidOption(name)) => assert_eq!(name, "commandScope"),
            other => panic!("unexpected: {:?}", other.map(|c| c.id)),
        }
    }

    #[test]
    fn test_slash_command_rejects_unknown_scope_with_allowed_set() {
        let opts = json!({ "name": "ping", "description": "x", "commandScope": "everywhere", "execute": "ping" });
        match slash_command(&opts, &catalog()) {
            Err(FrameworkError::InvalidValue { name, expected }) => {
                assert_eq!(name, "commandScope");
                assert_eq!(expected, vec!["default", "guild", "global"]);
            }
            other => panic!("unexpected: {:?}", other.map(|c| c.id)),
        }
    }

    #[test]
    fn test_unknown_handler_key() {
        let opts = json!({ "name": "ping", "description": "x", "commandScope": "guild", "execute": "pong" });
        assert!(matches!(
            slash_command(&opts, &catalog()),
            Err(FrameworkError::UnknownHandler { ref key, .. }) if key == "pong"
        ));
    }

    /// **Test: Message factory**
    ///
    /// **Setup:** options with aliases, devOnly and a BotDM context.
    /// **Action:** `message_command`.
    /// **Expected:** id `Message:ping`, aliases kept, dev-only, runs in DMs only.
    #[test]
    fn test_message_command() {
        let opts = json!({
            "name": "ping",
            "description": "x",
            "aliases": ["p", "pp"],
            "contexts": ["BotDM"],
            "devOnly": true,
            "execute": "ping",
        });
        let command = message_command(&opts, &catalog()).unwrap();
        assert_eq!(command.id, "Message:ping");
        assert_eq!(command.aliases(), ["p".to_string(), "pp".to_string()]);
        assert!(command.dev_only());
        assert!(command.runs_in(crate::types::ChannelKind::BotDm));
        assert!(!command.runs_in(crate::types::ChannelKind::Guild));
    }

    #[test]
    fn test_message_command_rejects_private_channel_context() {
        let opts = json!({ "name": "ping", "description": "x", "contexts": ["PrivateChannel"], "execute": "ping" });
        assert!(matches!(
            message_command(&opts, &catalog()),
            Err(FrameworkError::InvalidValues { ref name, .. }) if name == "contexts"
        ));
    }

    #[test]
    fn test_context_command_requires_context_type() {
        let opts = json!({ "name": "inspect", "description": "x", "commandType": "Slash", "commandScope": "guild", "execute": "ping" });
        assert!(matches!(
            context_command(&opts, &catalog()),
            Err(FrameworkError::InvalidValue { ref name, .. }) if name == "commandType"
        ));
    }

    #[test]
    fn test_build_command_dispatches_on_type() {
        let opts = json!({
            "name": "inspect",
            "description": "x",
            "commandType": "ContextUser",
            "commandScope": "global",
            "commandContexts": [0, 1],
            "execute": "ping",
        });
        let command = build_command(&opts, &catalog()).unwrap();
        assert_eq!(command.id, "ContextUser:inspect");
        assert_eq!(
            command.app_settings().unwrap().contexts,
            vec![CommandContext::Guild, CommandContext::BotDm]
        );

        assert!(matches!(
            build_command(&json!({ "name": "x" }), &catalog()),
            Err(FrameworkError::InvalidOption(ref name)) if name == "commandType"
        ));
        assert!(matches!(build_command(&Value::Null, &catalog()), Err(FrameworkError::NoOptions)));
    }

    #[test]
    fn test_base_checks_permissions_and_cooldown() {
        let opts = json!({
            "name": "ban",
            "description": "x",
            "commandScope": "guild",
            "execute": "ping",
            "memberPermissions": ["BanMembers"],
            "cooldown": 1500,
        });
        let command = slash_command(&opts, &catalog()).unwrap();
        assert_eq!(command.cooldown, Some(1500));
        assert!(command.member_permissions.unwrap().contains(Permissions::from_name("BanMembers").unwrap()));

        let bad = json!({ "name": "ban", "description": "x", "commandScope": "guild", "execute": "ping", "cooldown": "soon" });
        assert!(matches!(
            slash_command(&bad, &catalog()),
            Err(FrameworkError::InvalidType { ref name, .. }) if name == "cooldown"
        ));
    }
}
