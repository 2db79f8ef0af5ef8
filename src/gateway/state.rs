use std::sync::Arc;

use crate::account::directory::UserDirectory;
use crate::account::service::AccountService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
    pub directory: Arc<UserDirectory>,
}

impl AppState {
    pub fn new(service: Arc<AccountService>, directory: Arc<UserDirectory>) -> Self {
        Self { service, directory }
    }
}
