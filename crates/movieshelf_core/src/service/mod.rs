//! Core use-case services.
//!
//! # Responsibility
//! - Give request handlers one entry point over the three repositories.
//! - Own caller-side input normalization (search paging) and multi-step
//!   workflows that span repositories.

pub mod library_service;
