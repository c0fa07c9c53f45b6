//! Infrastructure layer - stores, background workers and services

pub mod account;
pub mod activity;
pub mod logging;
pub mod setup_key;
