//! Capability sets used by the permission gate.
//!
//! [`Permissions`] is a bit set with the platform's named capability flags. Definition
//! files declare requirements by name (`"SendMessages"`), as a list of names, or as raw bits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::BitOr;

const FLAGS: &[(&str, u64)] = &[
    ("CreateInstantInvite", 1 << 0),
    ("KickMembers", 1 << 1),
    ("BanMembers", 1 << 2),
    ("Administrator", 1 << 3),
    ("ManageChannels", 1 << 4),
    ("ManageGuild", 1 << 5),
    ("AddReactions", 1 << 6),
    ("ViewAuditLog", 1 << 7),
    ("PrioritySpeaker", 1 << 8),
    ("Stream", 1 << 9),
    ("ViewChannel", 1 << 10),
    ("SendMessages", 1 << 11),
    ("SendTTSMessages", 1 << 12),
    ("ManageMessages", 1 << 13),
    ("EmbedLinks", 1 << 14),
    ("AttachFiles", 1 << 15),
    ("ReadMessageHistory", 1 << 16),
    ("MentionEveryone", 1 << 17),
    ("UseExternalEmojis", 1 << 18),
    ("ViewGuildInsights", 1 << 19),
    ("Connect", 1 << 20),
    ("Speak", 1 << 21),
    ("MuteMembers", 1 << 22),
    ("DeafenMembers", 1 << 23),
    ("MoveMembers", 1 << 24),
    ("UseVAD", 1 << 25),
    ("ChangeNickname", 1 << 26),
    ("ManageNicknames", 1 << 27),
    ("ManageRoles", 1 << 28),
    ("ManageWebhooks", 1 << 29),
    ("ManageGuildExpressions", 1 << 30),
    ("UseApplicationCommands", 1 << 31),
    ("RequestToSpeak", 1 << 32),
    ("ManageEvents", 1 << 33),
    ("ManageThreads", 1 << 34),
    ("CreatePublicThreads", 1 << 35),
    ("CreatePrivateThreads", 1 << 36),
    ("UseExternalStickers", 1 << 37),
    ("SendMessagesInThreads", 1 << 38),
    ("UseEmbeddedActivities", 1 << 39),
    ("ModerateMembers", 1 << 40),
];

/// A set of named capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Permissions(u64);

impl Permissions {
    pub const ADMINISTRATOR: Permissions = Permissions(1 << 3);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Every known flag.
    pub fn all() -> Self {
        Self(FLAGS.iter().fold(0, |acc, (_, bit)| acc | bit))
    }

    /// Looks up a single flag by its name (e.g. `"ManageMessages"`).
    pub fn from_name(name: &str) -> Option<Self> {
        FLAGS
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, bit)| Self(*bit))
    }

    /// Resolves a raw option value: a flag name, a numeric bit string, an integer, or an array of those.
    /// Returns `None` when any part cannot be resolved.
    pub fn resolve(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_name(s).or_else(|| s.parse::<u64>().ok().map(Self)),
            Value::Number(n) => n.as_u64().map(Self),
            Value::Array(items) => items
                .iter()
                .try_fold(Self::empty(), |acc, item| Self::resolve(item).map(|p| acc | p)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every flag of `other` is present.
    pub fn contains(&self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `required` is satisfied; `Administrator` satisfies everything.
    pub fn has(&self, required: Permissions) -> bool {
        self.contains(Self::ADMINISTRATOR) || self.contains(required)
    }

    /// Names of the flags in `required` that this set lacks. Empty when [`Permissions::has`] holds.
    pub fn missing(&self, required: Permissions) -> Vec<&'static str> {
        if self.has(required) {
            return Vec::new();
        }
        Self(required.0 & !self.0).names()
    }

    /// Names of the flags in this set, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        FLAGS
            .iter()
            .filter(|(_, bit)| self.0 & bit != 0)
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}

/// Capabilities of one actor: channel-scoped when the platform can resolve them, plus guild-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionSnapshot {
    pub channel: Option<Permissions>,
    pub guild: Permissions,
}

impl PermissionSnapshot {
    /// Channel-scoped set, falling back to the guild-wide set.
    pub fn effective(&self) -> Permissions {
        self.channel.unwrap_or(self.guild)
    }
}

/// Splits a flag name into words for user-facing text: `"SendMessages"` → `"Send Messages"`.
pub fn humanize_permission(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
