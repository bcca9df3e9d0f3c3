//! Ad-platform HTTP client
//!
//! Graph-style listing endpoints: `{base}/{node-id}/{edge}` returning a
//! `data` array plus a `paging.next` URL. Every request names an explicit
//! field list and decodes into typed records; every page request goes
//! through the retry/backoff wrapper.

use crate::api::{ApiResponse, ErrorEnvelope, Page, ResponseMeta};
use crate::config::AdsConfig;
use crate::model::{Ad, AdAccount, AdSet, Campaign, InsightRow};
use crate::throttle::call_with_backoff;
use crate::{ApiError, ApiResult};
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const ACCOUNT_FIELDS: &str = "id,name,currency,timezone_name,created_time";
const CAMPAIGN_FIELDS: &str =
    "id,name,objective,status,created_time,start_time,stop_time,daily_budget,lifetime_budget";
const AD_SET_FIELDS: &str = "id,campaign_id,name,status,created_time,start_time,stop_time,\
     daily_budget,lifetime_budget,bid_amount,bid_strategy,billing_event,optimization_goal,targeting";
const AD_FIELDS: &str = "id,adset_id,name,status,created_time";
const INSIGHT_FIELDS: &str = "spend,clicks,unique_clicks,cpc,ctr,impressions,reach";

/// Which metric breakdown dimension to request from the insights edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    Location,
    Audience,
}

impl Breakdown {
    pub fn dimensions(&self) -> &'static str {
        match self {
            Breakdown::Location => "region,country",
            Breakdown::Audience => "age,gender",
        }
    }
}

/// Insights time range: fixed start date (inclusive) to "today" (exclusive)
#[derive(Debug, Clone)]
pub struct TimeRange {
    pub since: String,
    pub until: String,
}

impl TimeRange {
    /// Builds the range from the configured start date to today's date.
    pub fn from_since(since: &str) -> Self {
        TimeRange {
            since: since.to_string(),
            until: Utc::now().format("%Y-%m-%d").to_string(),
        }
    }

    fn to_query(&self) -> String {
        serde_json::json!({"since": self.since, "until": self.until}).to_string()
    }
}

/// HTTP client for the ad-platform API
pub struct AdsClient {
    http: Client,
    base: String,
    access_token: String,
}

impl AdsClient {
    pub fn new(config: &AdsConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(AdsClient {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Lists ad accounts owned by the business node.
    pub async fn list_ad_accounts(&self, business_id: &str) -> ApiResult<Vec<AdAccount>> {
        let url = self.listing_url(
            &format!("{business_id}/owned_ad_accounts"),
            ACCOUNT_FIELDS,
            &[],
        )?;
        self.list(url).await
    }

    /// Lists an account's campaigns filtered by effective status.
    pub async fn list_campaigns(
        &self,
        account_id: &str,
        effective_status: &[String],
    ) -> ApiResult<Vec<Campaign>> {
        let status_filter = serde_json::to_string(effective_status)
            .unwrap_or_else(|_| "[\"ACTIVE\"]".to_string());
        let url = self.listing_url(
            &format!("{account_id}/campaigns"),
            CAMPAIGN_FIELDS,
            &[("effective_status", status_filter)],
        )?;
        self.list(url).await
    }

    /// Lists a campaign's ad sets.
    pub async fn list_ad_sets(&self, campaign_id: &str) -> ApiResult<Vec<AdSet>> {
        let url = self.listing_url(&format!("{campaign_id}/adsets"), AD_SET_FIELDS, &[])?;
        self.list(url).await
    }

    /// Lists an ad set's ads.
    pub async fn list_ads(&self, ad_set_id: &str) -> ApiResult<Vec<Ad>> {
        let url = self.listing_url(&format!("{ad_set_id}/ads"), AD_FIELDS, &[])?;
        self.list(url).await
    }

    /// Fetches one metric breakdown for any hierarchy node.
    pub async fn list_insights(
        &self,
        node_id: &str,
        breakdown: Breakdown,
        range: &TimeRange,
    ) -> ApiResult<Vec<InsightRow>> {
        let url = self.listing_url(
            &format!("{node_id}/insights"),
            INSIGHT_FIELDS,
            &[
                ("breakdowns", breakdown.dimensions().to_string()),
                ("time_range", range.to_query()),
            ],
        )?;
        self.list(url).await
    }

    /// Drains a paginated listing, retrying each page under backoff.
    async fn list<T: DeserializeOwned>(&self, first: Url) -> ApiResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first);

        while let Some(url) = next {
            let response = call_with_backoff(|| self.fetch_page::<T>(url.clone())).await?;
            let Page { data, paging } = response.body;
            items.extend(data);
            next = match paging.and_then(|p| p.next) {
                Some(raw) => Some(Url::parse(&raw).map_err(|source| ApiError::Url {
                    url: raw.clone(),
                    source,
                })?),
                None => None,
            };
        }

        Ok(items)
    }

    /// Performs one GET, capturing rate-limit headers and decoding either
    /// the page body or the platform error envelope.
    async fn fetch_page<T: DeserializeOwned>(&self, url: Url) -> ApiResult<ApiResponse<Page<T>>> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Http {
                url: url.to_string(),
                source,
            })?;

        let meta = ResponseMeta::from_headers(response.headers());
        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Http {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
                return Err(ApiError::Platform {
                    url: url.to_string(),
                    code: envelope.error.code,
                    message: envelope.error.message,
                });
            }
            // No envelope; carry the HTTP status as the platform code
            return Err(ApiError::Platform {
                url: url.to_string(),
                code: i64::from(status.as_u16()),
                message: text.chars().take(200).collect(),
            });
        }

        let body = serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(ApiResponse { body, meta })
    }

    fn listing_url(
        &self,
        path: &str,
        fields: &str,
        extra: &[(&str, String)],
    ) -> ApiResult<Url> {
        let raw = format!("{}/{path}", self.base);
        let mut url = Url::parse(&raw).map_err(|source| ApiError::Url { url: raw, source })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fields", fields);
            query.append_pair("access_token", &self.access_token);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
