//! Chat relay backend: per-user conversation memory, a pre-model rule
//! engine and an OpenAI-compatible upstream, served over `POST /api/chat`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
