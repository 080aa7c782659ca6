//! LuxDev partner portal server library.
//!
//! This library provides the core functionality for the portal server:
//! the store implementations, the derived calendar and statistics, the AI
//! gateway and the HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
pub mod store;
