//! Sample Store Core - Shared types library.
//!
//! This crate provides common types used across all Sample Store components:
//! - `billing` - Billing entities and payment gateway synchronization
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, card numbers, prices,
//!   and address kinds

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
