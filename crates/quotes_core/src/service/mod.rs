//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input and delegate to repository contracts.
//! - Keep CLI and other callers decoupled from storage details.

pub mod quote_service;
