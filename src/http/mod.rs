//! HTTP transport
//!
//! Form POSTs with retry, backoff and a token bucket quota (governor) shared
//! by every clone of the limiter.

mod client;
mod rate_limit;

pub use client::{FormBody, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
