//! Core translation engine module

pub mod catalog;
pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod progress;
pub mod retry;
pub mod runner;
