// Library for tests to access modules

pub mod aggregator;
pub mod collectors;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod models;
pub mod platform;
pub mod policy;
pub mod provider;
pub mod render;
