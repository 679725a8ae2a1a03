use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use maneki_commands::handle_message;
use maneki_core::{BotConfig, Context};
use maneki_utils::menu::reaction_event;

const MENU_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
const LOG_FILES_KEPT: usize = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;

    let log_file = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("maneki")
        .filename_suffix("log")
        .max_log_files(LOG_FILES_KEPT)
        .build(&config.log_dir)?;
    // Flushes buffered file output when dropped at exit.
    let (log_writer, _log_guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(log_writer))
        .init();

    info!(log_dir = %config.log_dir.display(), "logging initialised");

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let bot_user = http.current_user().await?.model().await?;
    info!(user_id = bot_user.id.get(), name = %bot_user.name, "authenticated");

    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::GUILD_MESSAGE_REACTIONS
        | Intents::DIRECT_MESSAGES
        | Intents::DIRECT_MESSAGE_REACTIONS
        | Intents::MESSAGE_CONTENT;

    let mut shard = Shard::new(ShardId::ONE, config.token.clone(), intents);

    let shutdown = CancellationToken::new();
    let ctx = Context::new(
        Arc::clone(&http),
        shard.sender(),
        bot_user.id.get(),
        config,
        shutdown.clone(),
    );

    info!("Maneki is connecting...");

    loop {
        let item = tokio::select! {
            biased;
            signal = tokio::signal::ctrl_c() => {
                if let Err(source) = signal {
                    error!(?source, "failed to listen for ctrl-c");
                }
                info!("shutting down");
                break;
            }
            item = shard.next_event(EventTypeFlags::all()) => item,
        };

        let Some(item) = item else {
            warn!("gateway event stream ended");
            break;
        };

        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                info!(guilds = ready.guilds.len(), "Maneki has successfully awoken!");
                if let Some(activity) = ctx.config.activity.as_deref()
                    && let Err(source) = ctx.set_activity(activity)
                {
                    warn!(?source, "failed to set initial activity");
                }
            }

            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "command handler failed");
                    }
                });
            }

            // Dispatched inline so menus see reactions in gateway order.
            Event::ReactionAdd(reaction) => {
                let resolved = ctx.waiters.dispatch(&reaction_event(&reaction));
                if resolved > 0 {
                    debug!(message_id = reaction.message_id.get(), resolved, "reaction routed");
                }
            }

            Event::MessageDelete(deleted) => {
                ctx.waiters.notify_deleted(deleted.id.get());
            }

            Event::MessageDeleteBulk(deleted) => {
                for id in deleted.ids {
                    ctx.waiters.notify_deleted(id.get());
                }
            }

            _ => {} // Ignore unused events
        }
    }

    shutdown.cancel();
    ctx.menus.close();
    if tokio::time::timeout(MENU_SHUTDOWN_GRACE, ctx.menus.wait())
        .await
        .is_err()
    {
        warn!(open = ctx.menus.len(), "menus still open at exit");
    }

    Ok(()) // Return Success, shutdown cleanly
}
