//! Data models for extracted transactions and configuration.

pub mod config;
pub mod record;
