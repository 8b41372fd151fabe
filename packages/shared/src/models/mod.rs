pub mod auth;
pub mod match_record;
pub mod matches;
