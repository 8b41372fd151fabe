pub mod access_policy_errors;
pub mod match_service_errors;
