//! # dframe-dispatch
//!
//! Routes client events to loaded definitions. [`Framework`] wires the registries, the
//! listener bus and the [`Dispatcher`]; the dispatcher applies interceptors, dev-only and
//! context checks, the permission gate and cooldowns before running a handler, and publishes
//! lifecycle events on broadcast channels.

pub mod cooldown;
pub mod dispatcher;
pub mod events;
pub mod framework;
pub mod overrides;
pub mod permissions;
pub mod prefix;
pub mod publish;

pub use cooldown::{Clock, CooldownCheck, CooldownManager, SystemClock, COOLDOWN_FLOOR_MS};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use events::{AutocompleteEvent, CommandEvent, EventChannels, Invocation};
pub use framework::{Framework, FrameworkBuilder};
pub use overrides::{
    ClientPermissionHandler, CooldownHandler, InteractionInterceptor, MemberPermissionHandler, MessageInterceptor,
    PolicyHandler,
};
pub use prefix::PrefixMatcher;
