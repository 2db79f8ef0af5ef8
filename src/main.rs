//! paycore - Concurrent Account & Transfer Core
//!
//! Entry point. Wiring only:
//!
//! ```text
//! ┌──────────┐    ┌───────────────┐    ┌──────────┐
//! │  Config  │───▶│ AccountService │───▶│ Gateway  │
//! │  (YAML)  │    │ (store+ledger) │    │ (axum)   │
//! └──────────┘    └───────────────┘    └──────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use paycore::account::directory::UserDirectory;
use paycore::account::ledger::Ledger;
use paycore::account::service::AccountService;
use paycore::account::store::AccountStore;
use paycore::config::AppConfig;
use paycore::gateway::{self, state::AppState};
use paycore::logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&config);

    info!(env = %env, lock_timeout_ms = config.engine.lock_timeout_ms, "starting paycore");

    let store = Arc::new(AccountStore::with_lock_timeout(Duration::from_millis(
        config.engine.lock_timeout_ms,
    )));
    let ledger = Arc::new(Ledger::new());
    let directory = Arc::new(UserDirectory::new());
    let service = Arc::new(AccountService::new(
        store,
        Arc::clone(&directory),
        ledger,
    ));

    let state = Arc::new(AppState::new(service, directory));
    gateway::run_gateway(state, &config.gateway).await
}
