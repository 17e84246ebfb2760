//! Core use-case services.
//!
//! # Responsibility
//! - Validate input and orchestrate the in-memory caches.
//! - Keep UI layers decoupled from storage and bookkeeping details.

pub mod clock;
pub mod logic_controller;
pub mod verifier;
