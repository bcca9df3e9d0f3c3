//! Normalized response metadata
//!
//! The ad platform reports usage through up to four different headers, each
//! carrying a JSON-encoded string value. Every call site captures them into
//! this one structure; the gauge in [`crate::throttle`] is the only reader.

use reqwest::header::HeaderMap;

/// Raw rate-limit header values from one API response.
///
/// Missing headers stay `None` and contribute zero utilization. Values are
/// kept as raw strings; parsing (and recovery from malformed JSON) happens
/// in the gauge.
#[derive(Debug, Clone, Default)]
pub struct ResponseMeta {
    /// `x-ad-account-usage`: per-account utilization
    pub account_usage: Option<String>,

    /// `x-business-use-case-usage`: map of per-use-case usage entries
    pub business_usage: Option<String>,

    /// `x-fb-ads-insights-throttle`: insights-specific app/account utilization
    pub insights_throttle: Option<String>,

    /// `x-app-usage`: generic app-level utilization
    pub app_usage: Option<String>,
}

impl ResponseMeta {
    /// Captures the recognized rate-limit headers from a response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let grab = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };

        ResponseMeta {
            account_usage: grab("x-ad-account-usage"),
            business_usage: grab("x-business-use-case-usage"),
            insights_throttle: grab("x-fb-ads-insights-throttle"),
            app_usage: grab("x-app-usage"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn captures_present_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-ad-account-usage"),
            HeaderValue::from_static(r#"{"acc_id_util_pct": 12}"#),
        );
        headers.insert(
            HeaderName::from_static("x-app-usage"),
            HeaderValue::from_static(r#"{"call_count": 3}"#),
        );

        let meta = ResponseMeta::from_headers(&headers);
        assert!(meta.account_usage.is_some());
        assert!(meta.app_usage.is_some());
        assert!(meta.business_usage.is_none());
        assert!(meta.insights_throttle.is_none());
    }

    #[test]
    fn insights_throttle_uses_the_platform_wire_name() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-fb-ads-insights-throttle"),
            HeaderValue::from_static(r#"{"app_id_util_pct": 100, "acc_id_util_pct": 100}"#),
        );

        let meta = ResponseMeta::from_headers(&headers);
        assert!(meta.insights_throttle.is_some());

        // A fully-throttled insights response must register as saturated
        let sample = crate::throttle::UsageSample::measure(&meta);
        assert_eq!(sample.overall(), 100.0);
    }

    #[test]
    fn empty_headers_yield_default() {
        let meta = ResponseMeta::from_headers(&HeaderMap::new());
        assert!(meta.account_usage.is_none());
        assert!(meta.business_usage.is_none());
        assert!(meta.insights_throttle.is_none());
        assert!(meta.app_usage.is_none());
    }
}
