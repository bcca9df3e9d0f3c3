//! Typed records for both harvest trees
//!
//! The ad-platform hierarchy (account → campaign → ad set → ad) and the
//! newsletter snapshot (publication → posts/segments) are plain owned
//! structs assembled per run; nothing here outlives the run.

pub mod ads;
pub mod newsletter;

pub use ads::{Ad, AdAccount, AdSet, Campaign, InsightRow, Targeting};
pub use newsletter::{
    segment_type_label, PostMetric, Publication, PublicationStats, SegmentSnapshot, UrlMetric,
};
