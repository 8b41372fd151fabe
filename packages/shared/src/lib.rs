pub mod models;
pub mod repositories;
pub mod services;

pub use models::auth::Caller;
pub use models::match_record::{GameType, Match, MatchStatus};
pub use services::errors::match_service_errors::{ErrorKind, MatchServiceError};
pub use services::match_service::{MatchService, MatchServiceConfig};
