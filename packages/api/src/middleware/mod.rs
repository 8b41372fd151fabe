pub mod auth;
pub mod deadline;
