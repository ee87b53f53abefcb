//! PADDOCK: Racehorse lease valuation and syndicator onboarding service.
//!
//! Entry point: loads config, opens the draft store, connects Studio if
//! enabled, and serves the HTTP API until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use paddock::config;
use paddock::server::{self, routes::ServerState};
use paddock::storage::DraftStore;
use paddock::studio::client::StudioClient;
use paddock::studio::StudioJobs;

const BANNER: &str = r#"
 ____   _    ____  ____   ___   ____ _  __
|  _ \ / \  |  _ \|  _ \ / _ \ / ___| |/ /
| |_) / _ \ | | | | | | | | | | |   | ' /
|  __/ ___ \| |_| | |_| | |_| | |___| . \
|_| /_/   \_\____/|____/ \___/ \____|_|\_\

  Lease valuation & syndicator onboarding
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        service = %cfg.service.name,
        currency = %cfg.service.currency,
        drafts_dir = %cfg.storage.drafts_dir,
        "PADDOCK starting up"
    );

    let drafts = DraftStore::open(&cfg.storage.drafts_dir)?;

    let studio: Option<Arc<dyn StudioJobs>> = match StudioClient::from_config(&cfg.studio)? {
        Some(client) => {
            info!(base_url = %cfg.studio.base_url, "Studio client enabled");
            Some(Arc::new(client))
        }
        None => {
            info!("Studio disabled, job endpoints will return 503");
            None
        }
    };

    let state = Arc::new(ServerState {
        drafts,
        studio,
        poller: cfg.studio.poller(),
        currency: cfg.currency_format(),
    });

    if !cfg.server.enabled {
        warn!("Server disabled in config, nothing to do");
        return Ok(());
    }

    server::serve(state, cfg.server.port).await?;

    info!("PADDOCK shut down cleanly");
    Ok(())
}

/// Initialise the tracing subscriber.
///
/// Uses `RUST_LOG` when set, otherwise `paddock=info`. Set
/// `PADDOCK_LOG_JSON` for JSON output.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("paddock=info"));

    let json_logging = std::env::var("PADDOCK_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
