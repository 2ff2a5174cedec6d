//! Server for IngreAI - streams Gemini output for ingredient scanning
//!
//! A thin proxy in front of Google Gemini: clients post a photo and/or
//! prompt text, the server opens a streaming generation call (with
//! rate-limit backoff) and chunks the model's text straight back. Prompt
//! templates, response parsing, and the client screen-flow reducer live
//! here too so consumers share one contract.

pub mod ai;
pub mod error;
pub mod flow;
pub mod models;
pub mod parse;
pub mod prompts;
pub mod retry;
pub mod server;

pub use error::{Error, Result};
