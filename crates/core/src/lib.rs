//! FreshWash Core - Shared types library.
//!
//! This crate provides the pieces of the FreshWash portal that carry no I/O:
//! - `portal` - Server-rendered portal for admins, outlet admins, workers,
//!   drivers and customers
//! - `cli` - Operator tools for inspecting the route guard table
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no sessions, no caches. Route authorization and cache key derivation live
//! here so they can be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Roles, newtype IDs and laundry status enums
//! - [`guard`] - Declarative route guard table and its evaluation
//! - [`query_key`] - Cache keys for API queries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod guard;
pub mod query_key;
pub mod types;

pub use guard::{GuardDecision, GuardTable, GuardTableError, RedirectReason, RouteRule};
pub use query_key::QueryKey;
pub use types::*;
