//! # dframe-core
//!
//! Core types and traits for the command framework: [`Platform`], handler traits and the
//! [`HandlerCatalog`], definition records and factories, permissions, settings, the error
//! taxonomy and tracing initialization. Transport-agnostic; used by dframe-registry,
//! dframe-dispatch and dframe-telegram.

pub mod definition;
pub mod error;
pub mod events;
pub mod ext;
pub mod handler;
pub mod logger;
pub mod permissions;
pub mod platform;
pub mod settings;
pub mod types;

pub use definition::{
    ApplicationCommandData, Autocompleter, Command, CommandContext, CommandKind, CommandScope, CommandType,
    Listener,
};
pub use error::{FrameworkError, Result};
pub use events::FrameworkEvent;
pub use ext::MessageExt;
pub use handler::{
    AutocompleterHandler, CommandAutocompleteHandler, HandlerCatalog, InteractionCommandHandler,
    ListenerHandler, MessageCommandHandler,
};
pub use logger::init_tracing;
pub use permissions::{PermissionSnapshot, Permissions};
pub use platform::{BotContext, Platform};
pub use settings::FrameworkSettings;
pub use types::{
    ChannelKind, ClientEvent, IncomingMessage, Interaction, InteractionKind, InteractionOption, SentMessage,
    SubscriptionId, User,
};
