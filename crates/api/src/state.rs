use std::sync::Arc;

use yamdb_db::DbPool;
use yamdb_mail::Mailer;

use crate::config::ServerConfig;

/// Handler state. Every field is an `Arc` or a pool handle, so cloning per
/// request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// Read by the auth extractor for the JWT secret.
    pub config: Arc<ServerConfig>,
    /// Delivers signup confirmation codes.
    pub mailer: Arc<dyn Mailer>,
}
