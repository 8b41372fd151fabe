use std::sync::Arc;
use std::time::Duration;

use shared::services::access_policy::AccessPolicy;
use shared::services::admin_service::MatchAdminService;
use shared::services::match_service::MatchService;

#[derive(Clone)]
pub struct AppState {
    pub match_service: Arc<MatchService>,
    pub admin_service: Arc<MatchAdminService>,
    pub access_policy: Arc<dyn AccessPolicy + Send + Sync>,
    pub request_timeout: Duration,
}
