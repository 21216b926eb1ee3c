//! Domain listings API proxy: token cache, request governor, per-client limiter.

pub mod client;
pub mod clock;
pub mod error;
pub mod governor;
pub mod limiter;
pub mod router;
pub mod token;
pub mod transport;

#[cfg(test)]
mod tests;

pub use client::{DomainClient, DomainStatus, FetchOptions, SuburbStatsQuery};
pub use clock::{Clock, SystemClock};
pub use error::ListingsError;
pub use governor::{RequestWindow, UsageLevel};
pub use limiter::{enforce_client_limit, ClientRateLimiter, RateDecision};
pub use router::listings_router;
pub use token::CachedToken;
pub use transport::{
    DomainTransport, HttpMethod, OutboundBody, OutboundRequest, OutboundResponse,
    ReqwestTransport,
};
