//! [`Framework`]: owns the registries, the event bus and the dispatcher, and routes client events.

use crate::cooldown::CooldownManager;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::events::{AutocompleteEvent, CommandEvent, EventChannels};
use crate::overrides::{InteractionInterceptor, MessageInterceptor, Overrides, PolicyHandler};
use crate::publish;
use dframe_core::{
    BotContext, ClientEvent, FrameworkEvent, FrameworkSettings, HandlerCatalog, InteractionKind, Platform, Result,
};
use dframe_registry::{
    AutocompleteRegistry, CommandRegistry, EventBus, ListenerRegistry, LoadReport, ManifestLoader, ModuleLoader,
    RegistryContext,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// The command framework client.
pub struct Framework {
    bot: BotContext,
    commands: Arc<CommandRegistry>,
    listeners: ListenerRegistry,
    completers: Arc<AutocompleteRegistry>,
    bus: Arc<EventBus>,
    dispatcher: Dispatcher,
    overrides: Arc<Overrides>,
    events: EventChannels,
    registered: AtomicBool,
}

/// Builder for [`Framework`]; the loader and cooldown clock can be swapped for tests.
pub struct FrameworkBuilder {
    platform: Arc<dyn Platform>,
    settings: FrameworkSettings,
    catalog: HandlerCatalog,
    loader: Arc<dyn ModuleLoader>,
    cooldowns: CooldownManager,
}

impl FrameworkBuilder {
    pub fn settings(mut self, settings: FrameworkSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn cooldowns(mut self, cooldowns: CooldownManager) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    pub fn build(self) -> Framework {
        let settings = Arc::new(self.settings);
        let bot = BotContext::new(self.platform, Arc::clone(&settings));
        let events = EventChannels::default();
        let ctx = RegistryContext {
            root_dir: settings.root_dir.clone(),
            loader: self.loader,
            catalog: Arc::new(self.catalog),
            events: events.framework.clone(),
        };

        let bus = Arc::new(EventBus::new());
        let commands = Arc::new(CommandRegistry::new(ctx.clone()));
        let listeners = ListenerRegistry::new(ctx.clone(), Arc::clone(&bus));
        let completers = Arc::new(AutocompleteRegistry::new(ctx));
        let overrides = Arc::new(Overrides::default());
        let dispatcher = Dispatcher::new(
            bot.clone(),
            Arc::clone(&commands),
            Arc::clone(&completers),
            self.cooldowns,
            Arc::clone(&overrides),
            events.clone(),
        );

        Framework {
            bot,
            commands,
            listeners,
            completers,
            bus,
            dispatcher,
            overrides,
            events,
            registered: AtomicBool::new(false),
        }
    }
}

impl Framework {
    pub fn builder(platform: Arc<dyn Platform>, catalog: HandlerCatalog) -> FrameworkBuilder {
        FrameworkBuilder {
            platform,
            settings: FrameworkSettings::default(),
            catalog,
            loader: Arc::new(ManifestLoader::new()),
            cooldowns: CooldownManager::default(),
        }
    }

    pub fn new(platform: Arc<dyn Platform>, settings: FrameworkSettings, catalog: HandlerCatalog) -> Self {
        Self::builder(platform, catalog).settings(settings).build()
    }

    /// Loads autocompleters, then commands, then listeners.
    #[instrument(skip(self), fields(root = %self.bot.settings.root_dir.display()))]
    pub fn start(&self) -> LoadReport {
        let report = self
            .completers
            .load_all()
            .merge(self.commands.load_all())
            .merge(self.listeners.load_all());
        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            failed = report.failed,
            "step: framework started"
        );
        report
    }

    /// Delivers `event` to subscribed listeners, then routes it to the dispatcher.
    #[instrument(skip(self, event), fields(event = %event.name()))]
    pub async fn handle_event(&self, event: ClientEvent) -> Option<DispatchOutcome> {
        self.bus.emit(&self.bot, &event).await;

        match &event {
            ClientEvent::Ready(user) => {
                info!(bot_user = %user.id, "step: client ready");
                if self.bot.settings.register_on_start
                    && !self.bot.settings.guilds_to_register.is_empty()
                    && !self.registered.swap(true, Ordering::SeqCst)
                {
                    self.register_on_start(&self.bot.settings.guilds_to_register).await;
                }
                None
            }
            ClientEvent::MessageCreate(message) => Some(self.dispatcher.handle_message(message).await),
            ClientEvent::InteractionCreate(interaction) => match interaction.kind {
                InteractionKind::Autocomplete => Some(self.dispatcher.handle_autocomplete(interaction).await),
                InteractionKind::ChatInput | InteractionKind::UserContextMenu | InteractionKind::MessageContextMenu => {
                    Some(self.dispatcher.handle_interaction(interaction).await)
                }
                InteractionKind::Button | InteractionKind::SelectMenu | InteractionKind::ModalSubmit => {
                    self.bus
                        .emit(&self.bot, &ClientEvent::Component(interaction.clone()))
                        .await;
                    None
                }
            },
            ClientEvent::Component(_) | ClientEvent::Custom { .. } => None,
        }
    }

    /// Publishes guild-scoped commands to each guild; failures are reported, not returned.
    pub async fn register_on_start(&self, guild_ids: &[String]) -> usize {
        let commands = self.commands.values();
        publish::register_on_start(self.bot.platform.as_ref(), guild_ids, &commands, &self.events).await
    }

    pub async fn publish_global(&self) -> Result<usize> {
        publish::publish_global(self.bot.platform.as_ref(), &self.commands.values()).await
    }

    pub async fn publish_guild(&self, guild_id: &str) -> Result<usize> {
        publish::publish_guild(self.bot.platform.as_ref(), guild_id, &self.commands.values()).await
    }

    pub fn set_handler(&self, handler: PolicyHandler) {
        self.overrides.set_handler(handler);
    }

    pub fn set_message_interceptor(&self, interceptor: Arc<dyn MessageInterceptor>) {
        self.overrides.set_message_interceptor(interceptor);
    }

    pub fn set_interaction_interceptor(&self, interceptor: Arc<dyn InteractionInterceptor>) {
        self.overrides.set_interaction_interceptor(interceptor);
    }

    pub fn bot(&self) -> &BotContext {
        &self.bot
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn autocomplete(&self) -> &AutocompleteRegistry {
        &self.completers
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn subscribe_commands(&self) -> broadcast::Receiver<CommandEvent> {
        self.events.commands.subscribe()
    }

    pub fn subscribe_autocomplete(&self) -> broadcast::Receiver<AutocompleteEvent> {
        self.events.autocomplete.subscribe()
    }

    pub fn subscribe_framework(&self) -> broadcast::Receiver<FrameworkEvent> {
        self.events.framework.subscribe()
    }
}
