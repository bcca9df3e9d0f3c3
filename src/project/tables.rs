//! Destination table schemas
//!
//! The load path has no column-name binding (positional insert), so every
//! projected row's arity and field order must exactly match its table's
//! declared column list. `TableLoad::push` enforces the arity half of that
//! invariant.

use crate::project::SqlValue;

/// Name and ordered column list of one destination table
#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const NEWSLETTER_PERFORMANCE: TableSpec = TableSpec {
    name: "newsletter_performance_table",
    columns: &[
        "post_id",
        "publication_id",
        "publication_name",
        "publish_date",
        "delivered",
        "clicks",
        "unique_clicks",
        "click_rate",
        "opens",
        "unique_opens",
        "open_rate",
        "unsubscribes",
        "spam_reports",
        "loaded_at",
    ],
};

pub const URL_PERFORMANCE: TableSpec = TableSpec {
    name: "url_performance_table",
    columns: &[
        "post_id",
        "publication_id",
        "url",
        "url_clicks",
        "url_unique_clicks",
        "url_click_through_rate",
        "loaded_at",
    ],
};

pub const UNIFIED_PERFORMANCE: TableSpec = TableSpec {
    name: "unified_performance_table",
    columns: &[
        "post_id",
        "publication_id",
        "publication_name",
        "publish_date",
        "delivered",
        "clicks",
        "unique_clicks",
        "click_rate",
        "opens",
        "unique_opens",
        "open_rate",
        "unsubscribes",
        "spam_reports",
        "url",
        "url_clicks",
        "url_unique_clicks",
        "url_click_through_rate",
        "loaded_at",
    ],
};

pub const PUBLICATIONS: TableSpec = TableSpec {
    name: "publications_table",
    columns: &[
        "publication_id",
        "publication_name",
        "organization_name",
        "active_subscriptions",
        "active_premium_subscriptions",
        "active_free_subscriptions",
        "average_open_rate",
        "average_click_rate",
        "total_sent",
        "total_unique_opened",
        "total_clicked",
        "loaded_at",
    ],
};

pub const SEGMENTS: TableSpec = TableSpec {
    name: "segments_table",
    columns: &[
        "publication_id",
        "publication_name",
        "segment_id",
        "segment_name",
        "segment_type",
        "last_calculated",
        "total_results",
        "segment_status",
        "loaded_at",
    ],
};

pub const AD_ACCOUNT: TableSpec = TableSpec {
    name: "ad_account_table",
    columns: &[
        "account_id",
        "name",
        "status",
        "currency",
        "spend",
        "clicks",
        "unique_clicks",
        "impressions",
        "reach",
        "cost_per_click",
        "click_through_rate",
        "objective",
        "created_time",
        "updated_time",
    ],
};

pub const CAMPAIGN: TableSpec = TableSpec {
    name: "campaign_table",
    columns: &[
        "campaign_id",
        "ad_account_id",
        "name",
        "status",
        "objective",
        "budget",
        "spend",
        "clicks",
        "unique_clicks",
        "impressions",
        "reach",
        "cost_per_click",
        "click_through_rate",
        "created_time",
        "start_time",
        "stop_time",
        "updated_time",
    ],
};

pub const AD_SET_AUDIENCE: TableSpec = TableSpec {
    name: "ad_set_audience_table",
    columns: &[
        "ad_set_id",
        "campaign_id",
        "name",
        "status",
        "objective",
        "bid_amount",
        "bid_strategy",
        "billing_event",
        "budget_remaining",
        "age_targeting",
        "geo_targeting",
        "age",
        "gender",
        "spend",
        "clicks",
        "unique_clicks",
        "impressions",
        "reach",
        "cost_per_click",
        "click_through_rate",
        "created_time",
        "start_time",
        "stop_time",
        "updated_time",
    ],
};

pub const AD_SET_LOCATION: TableSpec = TableSpec {
    name: "ad_set_location_table",
    columns: &[
        "ad_set_id",
        "campaign_id",
        "name",
        "status",
        "objective",
        "bid_amount",
        "bid_strategy",
        "billing_event",
        "budget_remaining",
        "age_targeting",
        "geo_targeting",
        "region",
        "country",
        "spend",
        "clicks",
        "unique_clicks",
        "impressions",
        "reach",
        "cost_per_click",
        "click_through_rate",
        "created_time",
        "start_time",
        "stop_time",
        "updated_time",
    ],
};

pub const AD_AUDIENCE: TableSpec = TableSpec {
    name: "ad_audience_table",
    columns: &[
        "ad_id",
        "ad_set_id",
        "name",
        "status",
        "age",
        "gender",
        "spend",
        "clicks",
        "unique_clicks",
        "impressions",
        "reach",
        "cost_per_click",
        "click_through_rate",
        "created_time",
        "start_time",
        "stop_time",
        "updated_time",
    ],
};

pub const AD_LOCATION: TableSpec = TableSpec {
    name: "ad_location_table",
    columns: &[
        "ad_id",
        "ad_set_id",
        "name",
        "status",
        "region",
        "country",
        "spend",
        "clicks",
        "unique_clicks",
        "impressions",
        "reach",
        "cost_per_click",
        "click_through_rate",
        "created_time",
        "start_time",
        "stop_time",
        "updated_time",
    ],
};

/// Load order for every destination table
pub const TABLES: [&TableSpec; 11] = [
    &NEWSLETTER_PERFORMANCE,
    &URL_PERFORMANCE,
    &UNIFIED_PERFORMANCE,
    &PUBLICATIONS,
    &SEGMENTS,
    &AD_ACCOUNT,
    &CAMPAIGN,
    &AD_SET_AUDIENCE,
    &AD_SET_LOCATION,
    &AD_AUDIENCE,
    &AD_LOCATION,
];

/// The projected rows destined for one table
#[derive(Debug)]
pub struct TableLoad {
    pub spec: &'static TableSpec,
    pub rows: Vec<Vec<SqlValue>>,
}

impl TableLoad {
    pub fn new(spec: &'static TableSpec) -> Self {
        TableLoad {
            spec,
            rows: Vec::new(),
        }
    }

    /// Appends one row, enforcing the positional-insert arity invariant.
    pub fn push(&mut self, row: Vec<SqlValue>) {
        assert_eq!(
            row.len(),
            self.spec.columns.len(),
            "row arity must match the column list of {}",
            self.spec.name
        );
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_tables_in_fixed_order() {
        let names: Vec<&str> = TABLES.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "newsletter_performance_table",
                "url_performance_table",
                "unified_performance_table",
                "publications_table",
                "segments_table",
                "ad_account_table",
                "campaign_table",
                "ad_set_audience_table",
                "ad_set_location_table",
                "ad_audience_table",
                "ad_location_table",
            ]
        );
    }

    #[test]
    fn matching_arity_is_accepted() {
        let mut load = TableLoad::new(&URL_PERFORMANCE);
        load.push(vec![
            "post".into(),
            "pub".into(),
            "https://x".into(),
            1i64.into(),
            1i64.into(),
            0.5f64.into(),
            "2026-01-01 00:00:00".into(),
        ]);
        assert_eq!(load.rows.len(), 1);
    }

    #[test]
    #[should_panic(expected = "row arity")]
    fn arity_mismatch_panics() {
        let mut load = TableLoad::new(&URL_PERFORMANCE);
        load.push(vec!["only".into(), "three".into(), "cells".into()]);
    }
}
