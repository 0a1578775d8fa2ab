//! Web view entry point: serves today's schedule on one read-only route.

use std::sync::Arc;

use anyhow::Result;

use weekplan::config::Preferences;
use weekplan::schedule::Store;
use weekplan::web::{self, WebState};

#[tokio::main]
async fn main() -> Result<()> {
    weekplan::init_logging();

    let prefs = Preferences::load_or_default();
    let state = Arc::new(WebState {
        store: Store::open_default()?,
        aliases: prefs.aliases,
    });

    web::serve(web::DEFAULT_ADDR, state).await
}
