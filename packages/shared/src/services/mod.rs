pub mod access_policy;
pub mod admin_service;
pub mod authorization;
pub mod errors;
pub mod match_service;
pub mod move_oracle;
