pub mod agent;
pub mod app;
pub mod chat;
pub mod config;
pub mod knowledge;
pub mod provider;
pub mod shared;
pub mod workflow;
