//! Request and Response models for the gateway API
//!
//! DTOs used for (de)serializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

pub use requests::KeyQuery;
pub use responses::{
    ErrorResponse, FetchResponse, HealthResponse, InvalidateResponse, StatsResponse,
};
