//! Creator business backend: sponsorship CRM, revenue tracking, multi-platform
//! content publishing and AI assistants behind one HTTP API.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod platforms;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
