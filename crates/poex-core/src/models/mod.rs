//! Data models for extracted purchase orders and pipeline configuration.

pub mod config;
pub mod order;
