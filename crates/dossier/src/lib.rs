//! Company intelligence dashboard
//!
//! Collects a company name, decision makers, project details and competitor
//! picks; runs the backend analysis together with one competitor analysis
//! per pick; and renders the merged result with on-demand contact lookups.

pub mod backend;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod fanout;
pub mod form;
pub mod models;
pub mod render;
pub mod request;
pub mod server;
pub mod service;
pub mod state;

pub use config::DossierConfig;
pub use error::{DossierError, Result};
pub use service::DossierService;
