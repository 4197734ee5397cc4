//! Application-command publishing.

use crate::events::EventChannels;
use dframe_core::{ApplicationCommandData, Command, CommandScope, CommandType, FrameworkError, FrameworkEvent, Platform, Result};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Registration payload of a command; `None` for message commands.
pub fn command_data(command: &Command) -> Option<ApplicationCommandData> {
    command.application_data()
}

fn payload(commands: &[Arc<Command>], excluded: CommandScope) -> Vec<ApplicationCommandData> {
    commands
        .iter()
        .filter(|c| c.command_type != CommandType::Message && !c.disabled)
        .filter(|c| c.scope() != Some(excluded))
        .filter_map(|c| command_data(c))
        .collect()
}

/// Replaces the global command set with every enabled application command not scoped to guilds.
/// Returns how many commands were published.
#[instrument(skip(platform, commands))]
pub async fn publish_global(platform: &dyn Platform, commands: &[Arc<Command>]) -> Result<usize> {
    let data = payload(commands, CommandScope::Guild);
    platform.set_global_commands(&data).await?;
    info!(count = data.len(), "global commands published");
    Ok(data.len())
}

/// Replaces one guild's command set with every enabled application command not scoped globally.
#[instrument(skip(platform, commands))]
pub async fn publish_guild(platform: &dyn Platform, guild_id: &str, commands: &[Arc<Command>]) -> Result<usize> {
    let data = payload(commands, CommandScope::Global);
    platform.set_guild_commands(guild_id, &data).await?;
    info!(guild_id, count = data.len(), "guild commands published");
    Ok(data.len())
}

/// Publishes to each guild in turn. A failing guild is logged and reported as
/// `AppCommandRegister`; the others still publish. Returns how many guilds succeeded.
pub async fn register_on_start(
    platform: &dyn Platform,
    guild_ids: &[String],
    commands: &[Arc<Command>],
    events: &EventChannels,
) -> usize {
    let mut published = 0;
    for guild_id in guild_ids {
        match publish_guild(platform, guild_id, commands).await {
            Ok(_) => published += 1,
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "guild command registration failed");
                events.framework(FrameworkEvent::error(FrameworkError::AppCommandRegister {
                    guild_id: Some(guild_id.clone()),
                    source: Box::new(e),
                }));
            }
        }
    }
    published
}
