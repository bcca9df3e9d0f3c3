//! Row projection
//!
//! Pure transformation from the two harvest trees into the eleven
//! destination row lists. Deterministic given identical inputs and load
//! timestamp; nothing here performs I/O.

mod tables;
mod value;

pub use tables::{
    TableLoad, TableSpec, AD_ACCOUNT, AD_AUDIENCE, AD_LOCATION, AD_SET_AUDIENCE, AD_SET_LOCATION,
    CAMPAIGN, NEWSLETTER_PERFORMANCE, PUBLICATIONS, SEGMENTS, TABLES, UNIFIED_PERFORMANCE,
    URL_PERFORMANCE,
};
pub use value::SqlValue;

use crate::model::newsletter::SEGMENT_STATUS_LABEL;
use crate::model::{Ad, AdAccount, AdSet, Campaign, InsightRow, PostMetric, Publication};
use chrono::Utc;

/// Projects both harvest trees into the eleven table loads, stamped with
/// wall-clock "now".
pub fn project(publications: &[Publication], accounts: &[AdAccount]) -> Vec<TableLoad> {
    let loaded_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    project_at(publications, accounts, &loaded_at)
}

/// Deterministic projection with an explicit load timestamp.
pub fn project_at(
    publications: &[Publication],
    accounts: &[AdAccount],
    loaded_at: &str,
) -> Vec<TableLoad> {
    let mut loads: Vec<TableLoad> = TABLES.iter().map(|spec| TableLoad::new(spec)).collect();
    let [newsletter, urls, unified, pubs, segments, ad_accounts, campaigns, set_audience, set_location, ad_audience, ad_location] =
        &mut loads[..]
    else {
        unreachable!("TABLES is always eleven entries");
    };

    for publication in publications {
        pubs.push(vec![
            publication.id.clone().into(),
            publication.name.clone().into(),
            publication.organization_name.clone().into(),
            publication.stats.active_subscriptions.into(),
            publication.stats.active_premium_subscriptions.into(),
            publication.stats.active_free_subscriptions.into(),
            publication.stats.average_open_rate.into(),
            publication.stats.average_click_rate.into(),
            publication.stats.total_sent.into(),
            publication.stats.total_unique_opened.into(),
            publication.stats.total_clicked.into(),
            loaded_at.into(),
        ]);

        for segment in &publication.segments {
            segments.push(vec![
                segment.publication_id.clone().into(),
                segment.publication_name.clone().into(),
                segment.segment_id.clone().into(),
                segment.name.clone().into(),
                segment.type_label.into(),
                segment.last_calculated.format("%Y-%m-%d").to_string().into(),
                segment.total_results.into(),
                SEGMENT_STATUS_LABEL.into(),
                loaded_at.into(),
            ]);
        }

        for post in &publication.posts {
            newsletter.push(post_cells(post, loaded_at));

            for url in &post.urls {
                urls.push(vec![
                    post.post_id.clone().into(),
                    post.publication_id.clone().into(),
                    url.url.clone().into(),
                    url.clicks.into(),
                    url.unique_clicks.into(),
                    url.click_through_rate.into(),
                    loaded_at.into(),
                ]);

                // Deliberate denormalization: the full post record repeats
                // once per URL for downstream reporting convenience
                let mut row = post_cells(post, loaded_at);
                row.truncate(row.len() - 1);
                row.extend([
                    url.url.clone().into(),
                    url.clicks.into(),
                    url.unique_clicks.into(),
                    url.click_through_rate.into(),
                    loaded_at.into(),
                ]);
                unified.push(row);
            }
        }
    }

    for account in accounts {
        ad_accounts.push(account_cells(account, loaded_at));

        for campaign in &account.campaigns {
            campaigns.push(campaign_cells(account, campaign, loaded_at));

            for ad_set in &campaign.ad_sets {
                for insight in breakdown_rows(&ad_set.insights_audience) {
                    set_audience.push(ad_set_cells(
                        campaign,
                        ad_set,
                        insight,
                        [insight.age.clone().into(), insight.gender.clone().into()],
                        loaded_at,
                    ));
                }
                for insight in breakdown_rows(&ad_set.insights_location) {
                    set_location.push(ad_set_cells(
                        campaign,
                        ad_set,
                        insight,
                        [insight.region.clone().into(), insight.country.clone().into()],
                        loaded_at,
                    ));
                }

                for ad in &ad_set.ads {
                    for insight in breakdown_rows(&ad.insights_audience) {
                        ad_audience.push(ad_cells(
                            ad_set,
                            ad,
                            insight,
                            [insight.age.clone().into(), insight.gender.clone().into()],
                            loaded_at,
                        ));
                    }
                    for insight in breakdown_rows(&ad.insights_location) {
                        ad_location.push(ad_cells(
                            ad_set,
                            ad,
                            insight,
                            [insight.region.clone().into(), insight.country.clone().into()],
                            loaded_at,
                        ));
                    }
                }
            }
        }
    }

    loads
}

fn post_cells(post: &PostMetric, loaded_at: &str) -> Vec<SqlValue> {
    vec![
        post.post_id.clone().into(),
        post.publication_id.clone().into(),
        post.publication_name.clone().into(),
        post.publish_date.format("%Y-%m-%d").to_string().into(),
        post.delivered.into(),
        post.clicks.into(),
        post.unique_clicks.into(),
        post.click_rate.into(),
        post.opens.into(),
        post.unique_opens.into(),
        post.open_rate.into(),
        post.unsubscribes.into(),
        post.spam_reports.into(),
        loaded_at.into(),
    ]
}

/// Summary aggregates for the account/campaign tables come from the
/// location breakdown; the audience breakdown feeds only the per-row
/// audience tables.
fn account_cells(account: &AdAccount, loaded_at: &str) -> Vec<SqlValue> {
    let location = account.insights_location.as_deref();
    vec![
        account.id.clone().into(),
        account.name.clone().into(),
        "ACTIVE".into(),
        account.currency.clone().into(),
        sum_of(location, |i| i.spend).into(),
        sum_of(location, |i| i.clicks).into(),
        sum_of(location, |i| i.unique_clicks).into(),
        sum_of(location, |i| i.impressions).into(),
        sum_of(location, |i| i.reach).into(),
        mean_of(location, |i| i.cost_per_click).into(),
        mean_of(location, |i| i.click_through_rate).into(),
        SqlValue::Null,
        account.created_time.clone().into(),
        loaded_at.into(),
    ]
}

fn campaign_cells(account: &AdAccount, campaign: &Campaign, loaded_at: &str) -> Vec<SqlValue> {
    let location = campaign.insights_location.as_deref();
    vec![
        campaign.id.clone().into(),
        account.id.clone().into(),
        campaign.name.clone().into(),
        campaign.status.clone().into(),
        campaign.objective.clone().into(),
        campaign.budget().into(),
        sum_of(location, |i| i.spend).into(),
        sum_of(location, |i| i.clicks).into(),
        sum_of(location, |i| i.unique_clicks).into(),
        sum_of(location, |i| i.impressions).into(),
        sum_of(location, |i| i.reach).into(),
        mean_of(location, |i| i.cost_per_click).into(),
        mean_of(location, |i| i.click_through_rate).into(),
        campaign.created_time.clone().into(),
        campaign.start_time.clone().into(),
        campaign.stop_time.clone().into(),
        loaded_at.into(),
    ]
}

fn ad_set_cells(
    campaign: &Campaign,
    ad_set: &AdSet,
    insight: &InsightRow,
    dimension: [SqlValue; 2],
    loaded_at: &str,
) -> Vec<SqlValue> {
    let targeting = ad_set.targeting.as_ref();
    let [first, second] = dimension;
    vec![
        ad_set.id.clone().into(),
        campaign.id.clone().into(),
        ad_set.name.clone().into(),
        ad_set.status.clone().into(),
        campaign.objective.clone().into(),
        ad_set.bid_amount.unwrap_or(0.0).into(),
        ad_set.bid_strategy.clone().into(),
        ad_set.billing_event.clone().into(),
        ad_set.budget().into(),
        targeting.and_then(|t| t.age_min).into(),
        targeting
            .and_then(|t| t.geo_locations.as_ref())
            .map(|geo| geo.to_string())
            .into(),
        first,
        second,
        insight.spend.into(),
        insight.clicks.into(),
        insight.unique_clicks.into(),
        insight.impressions.into(),
        insight.reach.into(),
        insight.cost_per_click.into(),
        insight.click_through_rate.into(),
        ad_set.created_time.clone().into(),
        ad_set.start_time.clone().into(),
        ad_set.stop_time.clone().into(),
        loaded_at.into(),
    ]
}

fn ad_cells(
    ad_set: &AdSet,
    ad: &Ad,
    insight: &InsightRow,
    dimension: [SqlValue; 2],
    loaded_at: &str,
) -> Vec<SqlValue> {
    let [first, second] = dimension;
    vec![
        ad.id.clone().into(),
        ad_set.id.clone().into(),
        ad.name.clone().into(),
        ad.status.clone().into(),
        first,
        second,
        insight.spend.into(),
        insight.clicks.into(),
        insight.unique_clicks.into(),
        insight.impressions.into(),
        insight.reach.into(),
        insight.cost_per_click.into(),
        insight.click_through_rate.into(),
        ad.created_time.clone().into(),
        SqlValue::Null,
        SqlValue::Null,
        loaded_at.into(),
    ]
}

fn breakdown_rows(rows: &Option<Vec<InsightRow>>) -> &[InsightRow] {
    rows.as_deref().unwrap_or(&[])
}

fn sum_of<F: Fn(&InsightRow) -> f64>(rows: Option<&[InsightRow]>, field: F) -> f64 {
    rows.map(|rows| rows.iter().map(&field).sum()).unwrap_or(0.0)
}

/// Arithmetic mean over the breakdown entries; 0 for a missing or empty
/// list, never a division by zero.
fn mean_of<F: Fn(&InsightRow) -> f64>(rows: Option<&[InsightRow]>, field: F) -> f64 {
    match rows {
        Some(rows) if !rows.is_empty() => {
            rows.iter().map(&field).sum::<f64>() / rows.len() as f64
        }
        _ => 0.0,
    }
}
