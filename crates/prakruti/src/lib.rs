//! Prakruti (dosha constitution) self-assessment engine.
//!
//! The [`assessment`] module holds the questionnaire model, the scoring engine, and the
//! session state machine. The HTTP router and service facade live alongside it so the
//! `prakruti-api` binary stays a thin shell around this crate.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
