//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Host the control-action dispatcher.
//! - Keep the HTTP layer decoupled from storage details.

pub mod control_service;
pub mod record_service;
