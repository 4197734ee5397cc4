use super::options;
use crate::error::Result;
use crate::handler::{AutocompleterHandler, HandlerCatalog, HandlerKind};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Standalone autocompleter, keyed by the option name it completes.
#[derive(Clone)]
pub struct Autocompleter {
    /// Same as `name`.
    pub id: String,
    pub name: String,
    pub disabled: bool,
    pub source: Option<PathBuf>,
    pub execute: Arc<dyn AutocompleterHandler>,
}

impl Autocompleter {
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Debug for Autocompleter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autocompleter")
            .field("id", &self.id)
            .field("disabled", &self.disabled)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Builds an autocompleter. Checks: object, name, execute, disabled.
pub fn autocompleter(options: &Value, catalog: &HandlerCatalog) -> Result<Autocompleter> {
    let map = options::object(options)?;
    let name = options::required_str(map, "name")?;
    let execute = options::required_handler(map, "execute", HandlerKind::Autocompleter.as_str(), |k| {
        catalog.get_autocompleter(k)
    })?;
    let disabled = options::optional_bool(map, "disabled")?;

    Ok(Autocompleter {
        id: name.clone(),
        name,
        disabled: disabled.unwrap_or(false),
        source: None,
        execute,
    })
}
