//! Property Listing Webhook Service Library
//!
//! Backend intake for the marketing site's property listings: third-party
//! feeds push listings to a single webhook endpoint, and each usable
//! listing is appended as one row to the site's `properties` table.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: Shared application state and service-level handlers.
//! - `store`: Row-store boundary and PostgreSQL implementation.
//! - `webhook_handler`: Listing webhook handler.
//! - `webhook_models`: Webhook payload and row models.

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod errors;
pub mod handlers;
pub mod store;
pub mod webhook_handler;
pub mod webhook_models;
