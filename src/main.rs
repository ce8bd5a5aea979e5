//! parley - a small bot on top of the parley client engine.
//!
//! Reads a TOML config (first argument, default `parley.toml`), joins the
//! configured channels once registered and logs channel traffic.

use parley::{Client, ClientConfig, handler_fn};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "parley.toml".to_string());

    let config = ClientConfig::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    let Some(server) = config.server.clone() else {
        return Err(anyhow::anyhow!("{config_path}: no [server] section"));
    };
    info!(
        nick = %config.identity.nick,
        host = %server.host,
        port = server.port,
        "Starting parley"
    );

    let client = Client::new(config);

    client.add_handler(
        "welcome",
        handler_fn(|client, _| {
            for block in &client.config().autojoin {
                info!(channel = %block.channel, "joining");
                client.join(&block.channel, block.key.as_deref());
            }
            Ok(())
        }),
    );

    client.add_handler(
        "privmsg",
        handler_fn(|_, event| {
            if let (Some(nick), Some(target), Some(text)) =
                (event.nick(), event.param(0), event.param(1))
            {
                info!(to = %target, from = %nick, "{text}");
            }
            Ok(())
        }),
    );

    let shutdown = {
        let client = client.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                client.quit(Some("Shutting down")).await;
            }
        })
    };

    let result = client.run().await;
    shutdown.abort();

    match result {
        Ok(()) => {
            info!("Disconnected");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Connection failed");
            Err(e.into())
        }
    }
}
