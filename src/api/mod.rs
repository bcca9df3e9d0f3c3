//! HTTP clients for the two external APIs
//!
//! Both clients decode JSON bodies into typed records directly; there is no
//! lazy field fetching. Every response's rate-limit headers are captured
//! into a single normalized [`ResponseMeta`] so the throttle layer never
//! has to introspect client-specific header shapes.

mod ads;
mod meta;
mod newsletter;

pub use ads::{AdsClient, Breakdown, TimeRange};
pub use meta::ResponseMeta;
pub use newsletter::{
    ClickWire, EmailStatsWire, NewsletterClient, PostStatsWire, PostWire, PublicationWire,
    SegmentWire,
};

use serde::Deserialize;

/// A decoded API response body plus its normalized rate-limit telemetry
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub body: T,
    pub meta: ResponseMeta,
}

/// One page of a paginated listing endpoint
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Pagination envelope: a fully-qualified `next` URL when more pages exist
#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

/// Error envelope returned by the ad platform on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: PlatformError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlatformError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
