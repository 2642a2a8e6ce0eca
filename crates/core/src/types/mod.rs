//! Core types for FreshWash.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod role;
pub mod status;

pub use id::*;
pub use role::{Role, RoleParseError};
pub use status::*;
