//! # answerkit-server
//!
//! The HTTP surface of the answerkit service: a single `POST /api/chat`
//! endpoint that runs the retrieval pipeline and returns the answer with
//! optional source diagnostics. Configuration comes from the environment;
//! missing provider credentials are reported as a distinct configuration
//! error so operators know to check credentials rather than chase an
//! internal failure.

mod config;
mod routes;

pub use config::ServerConfig;
pub use routes::{app, AppState};
