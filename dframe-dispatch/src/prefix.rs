//! Message-command prefix matching: a mention of the bot or the configured prefix.

use regex::Regex;
use std::sync::Mutex;
use tracing::warn;

/// Matches `^(<mention>\s+|<prefix>\s*)`, case-insensitively, with the prefix taken literally.
pub struct PrefixMatcher {
    prefix: String,
    /// Regex compiled for the last mention pattern seen.
    compiled: Mutex<Option<(Option<String>, Regex)>>,
}

/// A message split into command name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// First token, lower-cased.
    pub name: String,
    pub args: Vec<String>,
}

impl PrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            compiled: Mutex::new(None),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn build(&self, mention: Option<&str>) -> Option<Regex> {
        let mut alternatives = Vec::new();
        // A mention must end at whitespace or end of input; `@bot_x` is not `@bot`.
        if let Some(mention) = mention.filter(|m| !m.is_empty()) {
            alternatives.push(format!(r"(?:{})(?:\s+|$)", mention));
        }
        if !self.prefix.is_empty() {
            alternatives.push(format!(r"{}\s*", regex::escape(&self.prefix)));
        }
        if alternatives.is_empty() {
            return None;
        }
        let pattern = format!(r"(?i)^(?:{})", alternatives.join("|"));
        match Regex::new(&pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "invalid prefix pattern");
                None
            }
        }
    }

    /// Strips the prefix and any following whitespace; `None` if the message is not addressed
    /// to the bot. `mention` is a regex fragment matching a mention of the bot.
    pub fn strip<'a>(&self, content: &'a str, mention: Option<&str>) -> Option<&'a str> {
        let mut compiled = self.compiled.lock().unwrap_or_else(|e| e.into_inner());
        let stale = match compiled.as_ref() {
            Some((cached, _)) => cached.as_deref() != mention,
            None => true,
        };
        if stale {
            *compiled = self.build(mention).map(|re| (mention.map(str::to_string), re));
        }
        let (_, re) = compiled.as_ref()?;
        re.find(content).map(|m| &content[m.end()..])
    }

    /// Strips the prefix and splits the rest into a lower-cased name and arguments.
    pub fn parse(&self, content: &str, mention: Option<&str>) -> Option<ParsedCommand> {
        let rest = self.strip(content, mention)?;
        let mut tokens = rest.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        Some(ParsedCommand {
            name,
            args: tokens.map(str::to_string).collect(),
        })
    }
}
