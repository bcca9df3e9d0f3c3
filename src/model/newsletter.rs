//! Newsletter snapshot records
//!
//! One `Publication` per newsletter, carrying the trailing-window posts
//! (each with its per-URL click metrics) and the completed segments.

use chrono::NaiveDate;
use serde::Deserialize;

/// Aggregate stats expanded onto the publications listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicationStats {
    #[serde(default)]
    pub active_subscriptions: i64,
    #[serde(default)]
    pub active_premium_subscriptions: i64,
    #[serde(default)]
    pub active_free_subscriptions: i64,
    #[serde(default)]
    pub average_open_rate: f64,
    #[serde(default)]
    pub average_click_rate: f64,
    #[serde(default)]
    pub total_sent: i64,
    #[serde(default)]
    pub total_unique_opened: i64,
    #[serde(default)]
    pub total_clicked: i64,
}

/// One publication with its harvested posts and segments
#[derive(Debug, Clone)]
pub struct Publication {
    pub id: String,
    pub name: String,
    pub organization_name: String,
    pub stats: PublicationStats,
    pub posts: Vec<PostMetric>,
    pub segments: Vec<SegmentSnapshot>,
}

/// Per-post email performance counters for one in-window post
#[derive(Debug, Clone)]
pub struct PostMetric {
    pub post_id: String,
    pub publication_id: String,
    pub publication_name: String,
    pub publish_date: NaiveDate,
    pub delivered: i64,
    pub clicks: i64,
    pub unique_clicks: i64,
    pub click_rate: f64,
    pub opens: i64,
    pub unique_opens: i64,
    pub open_rate: f64,
    pub unsubscribes: i64,
    pub spam_reports: i64,
    /// One entry per tracked link, in API response order, no dedup
    pub urls: Vec<UrlMetric>,
}

/// Click-through metrics for one tracked link on one post
#[derive(Debug, Clone)]
pub struct UrlMetric {
    pub url: String,
    pub clicks: i64,
    pub unique_clicks: i64,
    pub click_through_rate: f64,
}

/// One completed audience segment
#[derive(Debug, Clone)]
pub struct SegmentSnapshot {
    pub publication_id: String,
    pub publication_name: String,
    pub segment_id: String,
    pub name: String,
    pub type_label: &'static str,
    pub last_calculated: NaiveDate,
    pub total_results: i64,
}

/// Status label stored for every kept segment (only completed ones are kept)
pub const SEGMENT_STATUS_LABEL: &str = "Completado";

/// Maps the API's segment type onto the three fixed report labels.
pub fn segment_type_label(kind: &str) -> &'static str {
    match kind {
        "dynamic" => "Dinámico",
        "static" => "Estático",
        _ => "Manual",
    }
}
