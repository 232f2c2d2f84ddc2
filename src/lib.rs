//! Event registration — progress resolution and session flow for a paid
//! event's onboarding pipeline.

pub mod config;
pub mod error;
pub mod registration;
pub mod store;
