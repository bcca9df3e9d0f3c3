//! Rate-limit measurement and retry/backoff
//!
//! The ad platform signals pressure two ways: usage-percentage headers on
//! successful responses, and a pair of transient error codes. Both are
//! handled here so the harvesters only ever see clean results or fatal
//! errors.

mod gauge;
mod retry;

pub use gauge::UsageSample;
pub use retry::{backoff_delay, call_with_backoff, BASE_BACKOFF_SECS, MAX_ATTEMPTS};
