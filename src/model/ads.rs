//! Ad-platform hierarchy records
//!
//! Decoded straight from the listing endpoints with explicit field lists.
//! The API serializes most numbers as JSON strings, so every numeric field
//! accepts either shape and recovers to zero/absent on garbage.

use serde::{Deserialize, Deserializer};

/// One metric breakdown row from an insights call.
///
/// The dimension kind is implied by which optional keys are populated:
/// region+country for location breakdowns, age+gender for audience ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightRow {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub spend: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub clicks: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub unique_clicks: f64,
    #[serde(rename = "cpc", default, deserialize_with = "flexible_f64")]
    pub cost_per_click: f64,
    #[serde(rename = "ctr", default, deserialize_with = "flexible_f64")]
    pub click_through_rate: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub impressions: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub reach: f64,

    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Ad account node: the root of one hierarchy tree
#[derive(Debug, Clone, Deserialize)]
pub struct AdAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub timezone_name: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,

    // Attached after listing; `None` when the API returned no insight rows
    #[serde(skip)]
    pub insights_location: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub insights_audience: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub stop_time: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub daily_budget: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub lifetime_budget: Option<f64>,

    #[serde(skip)]
    pub insights_location: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub insights_audience: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub ad_sets: Vec<AdSet>,
}

impl Campaign {
    /// Daily budget if set, else lifetime budget, else 0.
    pub fn budget(&self) -> f64 {
        self.daily_budget.or(self.lifetime_budget).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdSet {
    pub id: String,
    pub campaign_id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub stop_time: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub daily_budget: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub lifetime_budget: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub bid_amount: Option<f64>,
    #[serde(default)]
    pub bid_strategy: Option<String>,
    #[serde(default)]
    pub billing_event: Option<String>,
    #[serde(default)]
    pub optimization_goal: Option<String>,
    #[serde(default)]
    pub targeting: Option<Targeting>,

    #[serde(skip)]
    pub insights_location: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub insights_audience: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub ads: Vec<Ad>,
}

impl AdSet {
    /// Daily budget if set, else lifetime budget, else 0.
    pub fn budget(&self) -> f64 {
        self.daily_budget.or(self.lifetime_budget).unwrap_or(0.0)
    }
}

/// The subset of ad-set targeting the destination tables care about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Targeting {
    #[serde(default)]
    pub age_min: Option<i64>,
    #[serde(default)]
    pub geo_locations: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ad {
    pub id: String,
    pub adset_id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,

    #[serde(skip)]
    pub insights_location: Option<Vec<InsightRow>>,
    #[serde(skip)]
    pub insights_audience: Option<Vec<InsightRow>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleNumber {
    Num(f64),
    Text(String),
}

impl FlexibleNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FlexibleNumber::Num(n) => Some(*n),
            FlexibleNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Accepts a JSON number or a numeric string; anything else becomes 0.
fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FlexibleNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| n.as_f64()).unwrap_or(0.0))
}

/// Accepts a JSON number or a numeric string; null/garbage stays absent.
fn flexible_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FlexibleNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| n.as_f64()))
}
