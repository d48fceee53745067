//! Sentiment Analysis Service
//!
//! Scores text as negative/neutral/positive over HTTP, using a pretrained
//! transformer when available and a keyword lexicon otherwise.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod model;
pub mod preprocessing;
pub mod sentiment;
pub mod server;


pub use analyzer::Analyzer;
pub use error::{Result, ServiceError};
