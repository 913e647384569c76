//! Extraction and caching core for the furaffinity.net upstream.
//!
//! The crate turns upstream HTML pages into typed, cacheable records:
//! [`pages`] holds one parser per page type behind the [`pages::Page`] trait,
//! [`fetch`] performs authenticated GETs with raw-HTML caching, [`cache`] is
//! the read-through store both layers share, and [`auth`] carries the login
//! cookie and SFW flag that scope every cache key. A boundary layer (HTTP
//! API, CLI, feed generator) is expected to sit on top of [`client::FaClient`]
//! and [`pages::get_result`]; nothing in here renders or routes.

pub mod actions;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod doc;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod pages;
pub mod style;

pub use auth::AuthContext;
pub use client::FaClient;
pub use config::Config;
pub use error::FaError;
