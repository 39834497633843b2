use anyhow::Result;
use coach_directory::config::Config;
use coach_directory::debug_console::DebugConsole;
use coach_directory::discovery::DiscoveryClient;
use coach_directory::i18n::{LocaleContext, PreferenceStore};
use coach_directory::messages::Message;
use coach_directory::scheduler::{self, MessageSink};
use coach_directory::server::{self, AppState};
use coach_directory::store::StoreClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Configuration first: it decides whether the debug console is installed
    let config = Config::from_env()?;

    let console = config
        .debug_console
        .then(|| DebugConsole::new(config.debug_console_capacity));

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("coach_directory=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .with(console.clone())
        .init();

    info!("Starting coach directory preview");

    let locale = LocaleContext::with_store(
        PreferenceStore::new(config.preferences_path.as_str()),
        config.default_preferences(),
    );
    info!(
        "Locale: {} / {}",
        locale.language().code(),
        locale.currency().code()
    );

    let store = StoreClient::from_config(&config);

    // Keep the scheduler alive for the lifetime of the server
    let _poller = match &config.watch_conversation {
        Some(conversation_id) => {
            let sink: MessageSink = Arc::new(|messages: Vec<Message>| {
                for message in messages {
                    info!(
                        "[{}] {}: {}",
                        message.conversation_id, message.sender_id, message.body
                    );
                }
            });
            Some(
                scheduler::start_message_polling(
                    Arc::new(store.clone()),
                    conversation_id.clone(),
                    Duration::from_secs(config.message_poll_secs),
                    sink,
                )
                .await?,
            )
        }
        None => None,
    };

    let state = Arc::new(AppState {
        store,
        discovery: DiscoveryClient::from_config(&config),
        console,
        default_language: locale.language(),
    });

    server::serve(state, config.port).await
}
