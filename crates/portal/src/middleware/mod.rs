//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (`x-request-id` in span, Sentry scope and response)
//! 4. Session layer (tower-sessions, in-memory store)
//! 5. Route guard (redirects before any handler runs)

pub mod auth;
pub mod flash;
pub mod guard;
pub mod request_id;
pub mod session;

pub use auth::{RequireUser, SessionUser, current_user};
pub use guard::route_guard;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
