//! Core types for vend
//!
//! This module holds the pieces every other module depends on: the error taxonomy
//! ([`VendError`]) and its user-facing wrapper ([`ErrorContext`]).
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use vend::core::{VendError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<()> {
//!     Err(VendError::NotAPackage { dir: "/src/app".to_string() }.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.to_string().contains("/src/app"));
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, VendError, user_friendly_error};
