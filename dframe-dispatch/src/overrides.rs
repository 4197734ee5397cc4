//! Replaceable policy responses and pre-dispatch interceptors.

use crate::events::Invocation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dframe_core::{BotContext, Command, IncomingMessage, Interaction};
use std::sync::{Arc, RwLock};

/// Replaces the default cooldown reply.
#[async_trait]
pub trait CooldownHandler: Send + Sync {
    async fn on_cooldown(
        &self,
        bot: &BotContext,
        invocation: &Invocation,
        command: &Command,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

/// Replaces the default reply when the invoking member lacks permissions.
#[async_trait]
pub trait MemberPermissionHandler: Send + Sync {
    async fn on_member_permissions(
        &self,
        bot: &BotContext,
        invocation: &Invocation,
        command: &Command,
        missing: &[&'static str],
    ) -> anyhow::Result<()>;
}

/// Replaces the default reply when the bot lacks permissions.
#[async_trait]
pub trait ClientPermissionHandler: Send + Sync {
    async fn on_client_permissions(
        &self,
        bot: &BotContext,
        invocation: &Invocation,
        command: &Command,
        missing: &[&'static str],
    ) -> anyhow::Result<()>;
}

/// Runs before message-command parsing; returning false drops the message.
#[async_trait]
pub trait MessageInterceptor: Send + Sync {
    async fn intercept(&self, bot: &BotContext, message: &IncomingMessage) -> bool;
}

/// Runs before interaction-command lookup; returning false drops the interaction.
#[async_trait]
pub trait InteractionInterceptor: Send + Sync {
    async fn intercept(&self, bot: &BotContext, interaction: &Interaction) -> bool;
}

/// Argument of [`Overrides::set_handler`].
#[derive(Clone)]
pub enum PolicyHandler {
    Cooldown(Arc<dyn CooldownHandler>),
    MemberPermissions(Arc<dyn MemberPermissionHandler>),
    ClientPermissions(Arc<dyn ClientPermissionHandler>),
}

/// Installed overrides. Each slot can be replaced at any time; dispatch reads a snapshot.
#[derive(Default)]
pub struct Overrides {
    cooldown: RwLock<Option<Arc<dyn CooldownHandler>>>,
    member_permissions: RwLock<Option<Arc<dyn MemberPermissionHandler>>>,
    client_permissions: RwLock<Option<Arc<dyn ClientPermissionHandler>>>,
    message_interceptor: RwLock<Option<Arc<dyn MessageInterceptor>>>,
    interaction_interceptor: RwLock<Option<Arc<dyn InteractionInterceptor>>>,
}

fn read<T: ?Sized>(slot: &RwLock<Option<Arc<T>>>) -> Option<Arc<T>> {
    slot.read().unwrap_or_else(|e| e.into_inner()).clone()
}

fn write<T: ?Sized>(slot: &RwLock<Option<Arc<T>>>, value: Arc<T>) {
    *slot.write().unwrap_or_else(|e| e.into_inner()) = Some(value);
}

impl Overrides {
    pub fn set_handler(&self, handler: PolicyHandler) {
        match handler {
            PolicyHandler::Cooldown(h) => write(&self.cooldown, h),
            PolicyHandler::MemberPermissions(h) => write(&self.member_permissions, h),
            PolicyHandler::ClientPermissions(h) => write(&self.client_permissions, h),
        }
    }

    pub fn set_message_interceptor(&self, interceptor: Arc<dyn MessageInterceptor>) {
        write(&self.message_interceptor, interceptor);
    }

    pub fn set_interaction_interceptor(&self, interceptor: Arc<dyn InteractionInterceptor>) {
        write(&self.interaction_interceptor, interceptor);
    }

    pub fn cooldown(&self) -> Option<Arc<dyn CooldownHandler>> {
        read(&self.cooldown)
    }

    pub fn member_permissions(&self) -> Option<Arc<dyn MemberPermissionHandler>> {
        read(&self.member_permissions)
    }

    pub fn client_permissions(&self) -> Option<Arc<dyn ClientPermissionHandler>> {
        read(&self.client_permissions)
    }

    pub fn message_interceptor(&self) -> Option<Arc<dyn MessageInterceptor>> {
        read(&self.message_interceptor)
    }

    pub fn interaction_interceptor(&self) -> Option<Arc<dyn InteractionInterceptor>> {
        read(&self.interaction_interceptor)
    }
}
