//! Registration payload for application commands.

use super::command::{Command, CommandKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// What the platform receives when commands are published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCommandData {
    pub name: String,
    pub description: String,
    /// 1 chat input, 2 user, 3 message.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Permission bits as a decimal string; `None` leaves the command open to everyone.
    pub default_member_permissions: Option<String>,
    pub contexts: Vec<u8>,
    pub integration_types: Vec<u8>,
    pub name_localizations: Option<BTreeMap<String, String>>,
    pub description_localizations: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub options: Option<Vec<Value>>,
}

impl Command {
    /// Registration payload; `None` for message commands.
    pub fn application_data(&self) -> Option<ApplicationCommandData> {
        let app = self.app_settings()?;
        let options = match &self.kind {
            CommandKind::Slash { options, .. } => Some(options.clone()),
            _ => None,
        };
        Some(ApplicationCommandData {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.command_type.application_type(),
            default_member_permissions: self.member_permissions.map(|p| p.bits().to_string()),
            contexts: app.contexts.iter().map(|c| c.code()).collect(),
            integration_types: app.integration_types.iter().map(|t| t.code()).collect(),
            name_localizations: app.name_localizations.clone(),
            description_localizations: app.description_localizations.clone(),
            options,
        })
    }
}
