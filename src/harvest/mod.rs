//! Sequential harvesters for the two upstream APIs
//!
//! Each harvester walks its source one item at a time in discovery order
//! and builds an owned in-memory tree for the projector. There is no
//! partial-failure recovery: any error aborts the run.

mod ads;
mod newsletter;

pub use ads::AdsHarvester;
pub use newsletter::{NewsletterHarvester, MAX_PAGES, WINDOW_DAYS};
