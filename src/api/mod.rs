//! API Module
//!
//! HTTP gateway in front of the mediator.
//!
//! # Endpoints
//! - `GET /fetch?key=` - Fetch a resource (role from the `x-role` header)
//! - `DELETE /cache?key=` - Invalidate a cached resource
//! - `GET /stats` - Mediator and cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
