//! Ad-platform hierarchy harvester
//!
//! Walks accounts → campaigns → ad sets → ads. The listing endpoints
//! return flat per-level collections, so children are re-associated to
//! parents afterwards by grouping on their foreign-key field, one map per
//! level.

use crate::api::{AdsClient, Breakdown, TimeRange};
use crate::config::AdsConfig;
use crate::model::{Ad, AdAccount, AdSet, Campaign, InsightRow};
use crate::ApiResult;
use std::collections::HashMap;
use std::hash::Hash;

/// Harvester for the four-level ad hierarchy
pub struct AdsHarvester<'a> {
    client: &'a AdsClient,
    config: &'a AdsConfig,
}

impl<'a> AdsHarvester<'a> {
    pub fn new(client: &'a AdsClient, config: &'a AdsConfig) -> Self {
        AdsHarvester { client, config }
    }

    /// Harvests every owned ad account into a fully-assembled tree, each
    /// level annotated with location and audience metric breakdowns.
    pub async fn harvest(&self) -> ApiResult<Vec<AdAccount>> {
        let range = TimeRange::from_since(&self.config.since_date);

        let mut accounts = self.client.list_ad_accounts(&self.config.business_id).await?;
        tracing::info!("Listed {} ad accounts", accounts.len());

        for account in &mut accounts {
            let (location, audience) = self.fetch_breakdowns(&account.id, &range).await?;
            account.insights_location = location;
            account.insights_audience = audience;

            let mut campaigns = self
                .client
                .list_campaigns(&account.id, &self.config.effective_status)
                .await?;
            tracing::debug!(
                "Account {}: {} campaigns match {:?}",
                account.id,
                campaigns.len(),
                self.config.effective_status
            );

            let mut ad_sets = Vec::new();
            for campaign in &mut campaigns {
                let (location, audience) = self.fetch_breakdowns(&campaign.id, &range).await?;
                campaign.insights_location = location;
                campaign.insights_audience = audience;
                ad_sets.extend(self.client.list_ad_sets(&campaign.id).await?);
            }

            let mut ads = Vec::new();
            for ad_set in &mut ad_sets {
                let (location, audience) = self.fetch_breakdowns(&ad_set.id, &range).await?;
                ad_set.insights_location = location;
                ad_set.insights_audience = audience;
                ads.extend(self.client.list_ads(&ad_set.id).await?);
            }

            for ad in &mut ads {
                let (location, audience) = self.fetch_breakdowns(&ad.id, &range).await?;
                ad.insights_location = location;
                ad.insights_audience = audience;
            }

            account.campaigns = assemble_tree(campaigns, ad_sets, ads);
        }

        Ok(accounts)
    }

    /// Fetches both breakdown kinds for one node. Empty results collapse to
    /// `None`; the projector treats both identically.
    async fn fetch_breakdowns(
        &self,
        node_id: &str,
        range: &TimeRange,
    ) -> ApiResult<(Option<Vec<InsightRow>>, Option<Vec<InsightRow>>)> {
        let location = self
            .client
            .list_insights(node_id, Breakdown::Location, range)
            .await?;
        let audience = self
            .client
            .list_insights(node_id, Breakdown::Audience, range)
            .await?;
        Ok((non_empty(location), non_empty(audience)))
    }
}

/// Re-associates the flat per-level collections into campaign-owned trees.
fn assemble_tree(
    mut campaigns: Vec<Campaign>,
    ad_sets: Vec<AdSet>,
    ads: Vec<Ad>,
) -> Vec<Campaign> {
    let mut ads_by_set = group_by(ads, |ad| ad.adset_id.clone());
    let mut sets_by_campaign = group_by(ad_sets, |set| set.campaign_id.clone());

    for campaign in &mut campaigns {
        let mut sets = sets_by_campaign.remove(&campaign.id).unwrap_or_default();
        for set in &mut sets {
            set.ads = ads_by_set.remove(&set.id).unwrap_or_default();
        }
        campaign.ad_sets = sets;
    }

    campaigns
}

fn group_by<T, K, F>(items: Vec<T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

fn non_empty(rows: Vec<InsightRow>) -> Option<Vec<InsightRow>> {
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: &str) -> Campaign {
        serde_json::from_str(&format!(r#"{{"id": "{id}", "name": "campaign {id}"}}"#)).unwrap()
    }

    fn ad_set(id: &str, campaign_id: &str) -> AdSet {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "campaign_id": "{campaign_id}", "name": "set {id}"}}"#
        ))
        .unwrap()
    }

    fn ad(id: &str, adset_id: &str) -> Ad {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "adset_id": "{adset_id}", "name": "ad {id}"}}"#
        ))
        .unwrap()
    }

    #[test]
    fn children_attach_to_their_parents() {
        let campaigns = vec![campaign("c1"), campaign("c2")];
        let ad_sets = vec![ad_set("s1", "c1"), ad_set("s2", "c2"), ad_set("s3", "c1")];
        let ads = vec![ad("a1", "s1"), ad("a2", "s3"), ad("a3", "s1")];

        let tree = assemble_tree(campaigns, ad_sets, ads);

        let c1 = &tree[0];
        assert_eq!(c1.ad_sets.len(), 2);
        let s1 = c1.ad_sets.iter().find(|s| s.id == "s1").unwrap();
        assert_eq!(s1.ads.len(), 2);
        assert_eq!(s1.ads[0].id, "a1");
        assert_eq!(s1.ads[1].id, "a3");

        let c2 = &tree[1];
        assert_eq!(c2.ad_sets.len(), 1);
        assert!(c2.ad_sets[0].ads.is_empty());
    }

    #[test]
    fn orphans_are_dropped() {
        let campaigns = vec![campaign("c1")];
        let ad_sets = vec![ad_set("s1", "c-unknown")];
        let tree = assemble_tree(campaigns, ad_sets, vec![]);
        assert!(tree[0].ad_sets.is_empty());
    }

    #[test]
    fn empty_insight_lists_collapse_to_none() {
        assert!(non_empty(vec![]).is_none());
        assert_eq!(non_empty(vec![InsightRow::default()]).map(|v| v.len()), Some(1));
    }
}
