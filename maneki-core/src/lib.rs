pub mod config;

use std::sync::Arc;

use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::debug;
use twilight_gateway::MessageSender;
use twilight_http::Client;
use twilight_model::gateway::{
    payload::outgoing::UpdatePresence,
    presence::{ActivityType, MinimalActivity, Status},
};

use maneki_utils::giphy::GiphyClient;
use maneki_utils::menu::{ReactionWaiters, TwilightTransport};

pub use config::BotConfig;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub waiters: Arc<ReactionWaiters>,
    pub gateway: MessageSender,
    pub bot_user_id: u64,
    pub config: Arc<BotConfig>,
    pub giphy: Option<GiphyClient>,
    /// Cancelled on shutdown; every menu session listens to it.
    pub shutdown: CancellationToken,
    /// Running menu sessions, awaited on shutdown so they can shed their controls.
    pub menus: TaskTracker,
    transport: Arc<TwilightTransport>,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        http: Arc<Client>,
        gateway: MessageSender,
        bot_user_id: u64,
        config: BotConfig,
        shutdown: CancellationToken,
    ) -> Self {
        let waiters = Arc::new(ReactionWaiters::new());
        let transport = Arc::new(TwilightTransport::new(
            Arc::clone(&http),
            Arc::clone(&waiters),
            bot_user_id,
        ));
        let giphy = config.giphy_api_key.as_deref().map(GiphyClient::new);

        Self {
            http,
            waiters,
            gateway,
            bot_user_id,
            config: Arc::new(config),
            giphy,
            shutdown,
            menus: TaskTracker::new(),
            transport,
        }
    }

    /// Transport shared by every menu session.
    pub fn menu_transport(&self) -> Arc<TwilightTransport> {
        Arc::clone(&self.transport)
    }

    /// Replace the bot's presence with "Playing `name`".
    pub fn set_activity(&self, name: &str) -> anyhow::Result<()> {
        let activity = MinimalActivity {
            kind: ActivityType::Playing,
            name: name.to_owned(),
            url: None,
        };
        let presence = UpdatePresence::new(vec![activity.into()], false, None, Status::Online)?;
        self.gateway.command(&presence)?;
        debug!(activity = name, "presence updated");

        Ok(())
    }
}
