//! Permission gate for guild contexts.

use dframe_core::{Permissions, Platform, Result};
use tracing::debug;

/// Whose permissions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a> {
    /// The invoking member.
    Member(&'a str),
    /// The bot itself.
    Client,
}

/// Outcome of [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionCheck {
    Granted,
    /// Names of the required permissions the subject lacks.
    Missing(Vec<&'static str>),
}

/// Compares `required` with what `subject` holds in the channel, falling back to the
/// guild-wide set when the channel set cannot be resolved.
pub async fn check(
    platform: &dyn Platform,
    guild_id: &str,
    channel_id: &str,
    subject: Subject<'_>,
    required: Permissions,
) -> Result<PermissionCheck> {
    let snapshot = match subject {
        Subject::Member(user_id) => platform.member_permissions(guild_id, channel_id, user_id).await?,
        Subject::Client => platform.client_permissions(guild_id, channel_id).await?,
    };
    let missing = snapshot.effective().missing(required);
    debug!(guild_id, channel_id, ?subject, ?missing, "permissions checked");
    if missing.is_empty() {
        Ok(PermissionCheck::Granted)
    } else {
        Ok(PermissionCheck::Missing(missing))
    }
}
