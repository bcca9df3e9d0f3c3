//! Rate-limit gauge
//!
//! Turns the up-to-four usage headers of one response into a single
//! normalized utilization percentage. Malformed header values are treated
//! as zero utilization, never as errors.

use crate::api::ResponseMeta;
use serde_json::Value;

/// Utilization percentages derived from one API response
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageSample {
    pub ad_account_pct: f64,
    pub business_pct: f64,
    pub app_pct: f64,
}

impl UsageSample {
    /// Parses every recognized usage header present on the response.
    ///
    /// Header conventions:
    /// - account-usage: `{"acc_id_util_pct": N}`
    /// - business-use-case-usage: `{"<id>": [{"call_count": N,
    ///   "total_cputime": N, "total_time": N}, ...], ...}` — per entry take
    ///   the max of the three counters, then the max across all entries
    /// - insights-throttle: `{"app_id_util_pct": N, "acc_id_util_pct": N}`
    /// - app-usage: `{"call_count": N}`
    pub fn measure(meta: &ResponseMeta) -> Self {
        let mut sample = UsageSample::default();

        if let Some(value) = parse_header(&meta.account_usage) {
            sample.ad_account_pct = as_pct(value.get("acc_id_util_pct"));
        }

        if let Some(value) = parse_header(&meta.business_usage) {
            if let Some(entries) = value.as_object() {
                for entry in entries.values() {
                    // Each use case maps to an array of usage records
                    let records = entry.as_array().map(|a| a.as_slice()).unwrap_or(&[]);
                    for record in records {
                        let worst = as_pct(record.get("call_count"))
                            .max(as_pct(record.get("total_cputime")))
                            .max(as_pct(record.get("total_time")));
                        sample.business_pct = sample.business_pct.max(worst);
                    }
                }
            }
        }

        if let Some(value) = parse_header(&meta.insights_throttle) {
            sample.app_pct = sample.app_pct.max(as_pct(value.get("app_id_util_pct")));
            sample.ad_account_pct = sample
                .ad_account_pct
                .max(as_pct(value.get("acc_id_util_pct")));
        }

        if let Some(value) = parse_header(&meta.app_usage) {
            sample.app_pct = sample.app_pct.max(as_pct(value.get("call_count")));
        }

        sample
    }

    /// Overall utilization: the worst of the three signals.
    pub fn overall(&self) -> f64 {
        self.ad_account_pct.max(self.business_pct).max(self.app_pct)
    }
}

fn parse_header(raw: &Option<String>) -> Option<Value> {
    raw.as_deref().and_then(|s| serde_json::from_str(s).ok())
}

/// Reads a percentage out of a JSON value that may be a number, a numeric
/// string, or absent/garbage (which counts as 0).
fn as_pct(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with(field: &str, raw: &str) -> ResponseMeta {
        let mut meta = ResponseMeta::default();
        let slot = match field {
            "account" => &mut meta.account_usage,
            "business" => &mut meta.business_usage,
            "insights" => &mut meta.insights_throttle,
            "app" => &mut meta.app_usage,
            other => panic!("unknown header slot {other}"),
        };
        *slot = Some(raw.to_string());
        meta
    }

    #[test]
    fn account_usage_header_is_read() {
        let meta = meta_with("account", r#"{"acc_id_util_pct": 42.5, "reset_time_duration": 300}"#);
        let sample = UsageSample::measure(&meta);
        assert_eq!(sample.ad_account_pct, 42.5);
        assert_eq!(sample.overall(), 42.5);
    }

    #[test]
    fn business_usage_takes_max_not_sum() {
        let meta = meta_with(
            "business",
            r#"{
                "123": [{"call_count": 10, "total_cputime": 25, "total_time": 15}],
                "456": [{"call_count": 5, "total_cputime": 5, "total_time": 60}]
            }"#,
        );
        let sample = UsageSample::measure(&meta);
        // max(10,25,15) = 25 for the first entry, max(5,5,60) = 60 for the
        // second; overall is 60, not any sum of counters
        assert_eq!(sample.business_pct, 60.0);
    }

    #[test]
    fn business_usage_scans_all_records_per_entry() {
        let meta = meta_with(
            "business",
            r#"{"123": [
                {"call_count": 10, "total_cputime": 10, "total_time": 10},
                {"call_count": 95, "total_cputime": 20, "total_time": 20}
            ]}"#,
        );
        assert_eq!(UsageSample::measure(&meta).business_pct, 95.0);
    }

    #[test]
    fn insights_throttle_feeds_both_signals() {
        let meta = meta_with(
            "insights",
            r#"{"app_id_util_pct": 33, "acc_id_util_pct": 77}"#,
        );
        let sample = UsageSample::measure(&meta);
        assert_eq!(sample.app_pct, 33.0);
        assert_eq!(sample.ad_account_pct, 77.0);
    }

    #[test]
    fn insights_throttle_keeps_higher_account_usage() {
        let mut meta = meta_with("account", r#"{"acc_id_util_pct": 90}"#);
        meta.insights_throttle = Some(r#"{"acc_id_util_pct": 50}"#.to_string());
        assert_eq!(UsageSample::measure(&meta).ad_account_pct, 90.0);
    }

    #[test]
    fn app_usage_is_combined_with_throttle() {
        let mut meta = meta_with("insights", r#"{"app_id_util_pct": 20}"#);
        meta.app_usage = Some(r#"{"call_count": 55}"#.to_string());
        assert_eq!(UsageSample::measure(&meta).app_pct, 55.0);
    }

    #[test]
    fn numeric_strings_parse() {
        let meta = meta_with("account", r#"{"acc_id_util_pct": "88.5"}"#);
        assert_eq!(UsageSample::measure(&meta).ad_account_pct, 88.5);
    }

    #[test]
    fn malformed_headers_count_as_zero() {
        let meta = meta_with("account", "not json at all {{{");
        assert_eq!(UsageSample::measure(&meta).overall(), 0.0);

        let meta = meta_with("business", r#"{"123": "not an array"}"#);
        assert_eq!(UsageSample::measure(&meta).overall(), 0.0);
    }

    #[test]
    fn missing_headers_count_as_zero() {
        let sample = UsageSample::measure(&ResponseMeta::default());
        assert_eq!(sample.overall(), 0.0);
    }
}
