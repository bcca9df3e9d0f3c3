//! Newsletter-platform HTTP client
//!
//! Bearer-token REST endpoints for publications, posts, and segments.
//! Posts and segments paginate by page number with a fixed page size of
//! 100; the harvester drives the page loop.

use crate::api::Page;
use crate::config::NewsletterConfig;
use crate::model::PublicationStats;
use crate::{ApiError, ApiResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Page size for every newsletter listing
pub const PAGE_LIMIT: &str = "100";

/// HTTP client for the newsletter API
pub struct NewsletterClient {
    http: Client,
    base: String,
    api_key: String,
}

impl NewsletterClient {
    pub fn new(config: &NewsletterConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(NewsletterClient {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Lists publications with expanded aggregate stats, ordered by name.
    pub async fn list_publications(&self) -> ApiResult<Vec<PublicationWire>> {
        let url = self.endpoint(
            "publications",
            &[
                ("expand[]", "stats"),
                ("limit", PAGE_LIMIT),
                ("order_by", "name"),
            ],
        )?;
        Ok(self.fetch::<Page<PublicationWire>>(url).await?.data)
    }

    /// Fetches one page of confirmed posts in descending publish-date order.
    pub async fn list_posts_page(
        &self,
        publication_id: &str,
        page: u32,
    ) -> ApiResult<Vec<PostWire>> {
        let page_number = page.to_string();
        let url = self.endpoint(
            &format!("publications/{publication_id}/posts"),
            &[
                ("direction", "desc"),
                ("expand[]", "stats"),
                ("limit", PAGE_LIMIT),
                ("order_by", "publish_date"),
                ("status", "confirmed"),
                ("page", &page_number),
            ],
        )?;
        Ok(self.fetch::<Page<PostWire>>(url).await?.data)
    }

    /// Fetches one page of segments.
    pub async fn list_segments_page(
        &self,
        publication_id: &str,
        page: u32,
    ) -> ApiResult<Vec<SegmentWire>> {
        let page_number = page.to_string();
        let url = self.endpoint(
            &format!("publications/{publication_id}/segments"),
            &[("limit", PAGE_LIMIT), ("page", &page_number)],
        )?;
        Ok(self.fetch::<Page<SegmentWire>>(url).await?.data)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Http {
                url: url.to_string(),
                source,
            })?
            .error_for_status()
            .map_err(|source| ApiError::Http {
                url: url.to_string(),
                source,
            })?;

        let text = response.text().await.map_err(|source| ApiError::Http {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Url> {
        let raw = format!("{}/{path}", self.base);
        let mut url = Url::parse(&raw).map_err(|source| ApiError::Url { url: raw, source })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Publication as listed by the API, with expanded stats
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationWire {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub stats: PublicationStats,
}

/// Post with expanded email and per-URL click stats
#[derive(Debug, Clone, Deserialize)]
pub struct PostWire {
    pub id: String,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub publish_date: i64,
    #[serde(default)]
    pub stats: PostStatsWire,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostStatsWire {
    #[serde(default)]
    pub email: EmailStatsWire,
    /// One entry per tracked link, in the order the API reports them
    #[serde(default)]
    pub clicks: Vec<ClickWire>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailStatsWire {
    #[serde(default)]
    pub recipients: i64,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub unique_clicks: i64,
    #[serde(default)]
    pub click_rate: f64,
    #[serde(default)]
    pub opens: i64,
    #[serde(default)]
    pub unique_opens: i64,
    #[serde(default)]
    pub open_rate: f64,
    #[serde(default)]
    pub unsubscribes: i64,
    #[serde(default)]
    pub spam_reports: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickWire {
    pub url: String,
    #[serde(default)]
    pub total_clicks: i64,
    #[serde(default)]
    pub total_unique_clicks: i64,
    #[serde(default)]
    pub total_click_through_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentWire {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub last_calculated: i64,
    #[serde(default)]
    pub total_results: i64,
}
