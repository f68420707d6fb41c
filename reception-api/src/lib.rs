//! Reception API: verifies the shared reception password, hands out the
//! `mottagning_key` cookie and serves the posts behind it.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
