//! # ragq
//!
//! Core library for the `ragq` terminal client. It models the exchange with a
//! retrieval question-answering service: the request payload, the validated
//! response outcome, the HTTP client that performs the single POST, and the
//! interaction state container that front-ends render from.
//!
//! The library is deliberately UI-framework free so the state machine and the
//! wire contract can be tested without a terminal.

pub mod client;
pub mod errors;
pub mod panel;
pub mod types;

pub use client::QueryClient;
pub use errors::QueryError;
pub use panel::{PanelState, DEFAULT_RESULT_COUNT, RESULT_COUNT_RANGE};
pub use types::{QueryOutcome, QueryRequest, SourceExcerpt, EXCERPT_MAX_CHARS};
