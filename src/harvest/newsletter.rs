//! Newsletter harvester
//!
//! Walks publications → posts/segments. Posts are pre-sorted by descending
//! publish date, so the first post at or older than the trailing-window
//! cutoff ends pagination for that publication entirely; segments are
//! paginated in full.

use crate::api::{NewsletterClient, PostWire, PublicationWire};
use crate::model::{segment_type_label, PostMetric, Publication, SegmentSnapshot, UrlMetric};
use crate::ApiResult;
use chrono::{DateTime, Utc};

/// Maximum pages fetched per publication for posts and for segments
pub const MAX_PAGES: u32 = 10;

/// Trailing window for posts, in days
pub const WINDOW_DAYS: i64 = 7;

/// Harvester for the newsletter platform
pub struct NewsletterHarvester<'a> {
    client: &'a NewsletterClient,
}

impl<'a> NewsletterHarvester<'a> {
    pub fn new(client: &'a NewsletterClient) -> Self {
        NewsletterHarvester { client }
    }

    /// Harvests every publication for the trailing seven-day window.
    pub async fn harvest(&self) -> ApiResult<Vec<Publication>> {
        self.harvest_window(Utc::now() - chrono::Duration::days(WINDOW_DAYS))
            .await
    }

    /// Same as [`harvest`](Self::harvest) with an explicit cutoff, used by
    /// tests to pin the window.
    pub async fn harvest_window(&self, cutoff: DateTime<Utc>) -> ApiResult<Vec<Publication>> {
        let listed = self.client.list_publications().await?;
        tracing::info!("Listed {} publications", listed.len());

        let mut publications = Vec::with_capacity(listed.len());
        for wire in listed {
            let posts = self.harvest_posts(&wire, cutoff).await?;
            let segments = self.harvest_segments(&wire).await?;
            tracing::debug!(
                "Publication {}: {} posts in window, {} completed segments",
                wire.name,
                posts.len(),
                segments.len()
            );
            publications.push(Publication {
                id: wire.id,
                name: wire.name,
                organization_name: wire.organization_name,
                stats: wire.stats,
                posts,
                segments,
            });
        }
        Ok(publications)
    }

    async fn harvest_posts(
        &self,
        publication: &PublicationWire,
        cutoff: DateTime<Utc>,
    ) -> ApiResult<Vec<PostMetric>> {
        let mut posts = Vec::new();

        'pages: for page in 1..=MAX_PAGES {
            let page_posts = self.client.list_posts_page(&publication.id, page).await?;
            for wire in page_posts {
                let published = DateTime::from_timestamp(wire.publish_date, 0)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                if published <= cutoff {
                    // Descending order makes this a valid early exit, not a filter
                    break 'pages;
                }
                posts.push(convert_post(publication, wire, published));
            }
        }

        Ok(posts)
    }

    async fn harvest_segments(
        &self,
        publication: &PublicationWire,
    ) -> ApiResult<Vec<SegmentSnapshot>> {
        let mut segments = Vec::new();

        for page in 1..=MAX_PAGES {
            for wire in self.client.list_segments_page(&publication.id, page).await? {
                if wire.status != "completed" {
                    continue;
                }
                let last_calculated = DateTime::from_timestamp(wire.last_calculated, 0)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                segments.push(SegmentSnapshot {
                    publication_id: publication.id.clone(),
                    publication_name: publication.name.clone(),
                    segment_id: wire.id,
                    name: wire.name,
                    type_label: segment_type_label(&wire.kind),
                    last_calculated: last_calculated.date_naive(),
                    total_results: wire.total_results,
                });
            }
        }

        Ok(segments)
    }
}

fn convert_post(
    publication: &PublicationWire,
    wire: PostWire,
    published: DateTime<Utc>,
) -> PostMetric {
    let email = &wire.stats.email;
    PostMetric {
        post_id: wire.id.clone(),
        publication_id: publication.id.clone(),
        publication_name: publication.name.clone(),
        publish_date: published.date_naive(),
        delivered: email.recipients,
        clicks: email.clicks,
        unique_clicks: email.unique_clicks,
        click_rate: email.click_rate,
        opens: email.opens,
        unique_opens: email.unique_opens,
        open_rate: email.open_rate,
        unsubscribes: email.unsubscribes,
        spam_reports: email.spam_reports,
        urls: wire
            .stats
            .clicks
            .iter()
            .map(|click| UrlMetric {
                url: click.url.clone(),
                clicks: click.total_clicks,
                unique_clicks: click.total_unique_clicks,
                click_through_rate: click.total_click_through_rate,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClickWire, EmailStatsWire, PostStatsWire};
    use crate::model::PublicationStats;

    fn publication_wire() -> PublicationWire {
        PublicationWire {
            id: "pub_1".into(),
            name: "Daily Brief".into(),
            organization_name: "Acme Media".into(),
            stats: PublicationStats::default(),
        }
    }

    #[test]
    fn post_conversion_keeps_url_order() {
        let wire = PostWire {
            id: "post_1".into(),
            publish_date: 1_714_000_000,
            stats: PostStatsWire {
                email: EmailStatsWire {
                    recipients: 10,
                    ..EmailStatsWire::default()
                },
                clicks: vec![
                    ClickWire {
                        url: "https://b.example".into(),
                        total_clicks: 5,
                        total_unique_clicks: 4,
                        total_click_through_rate: 2.0,
                    },
                    ClickWire {
                        url: "https://a.example".into(),
                        total_clicks: 9,
                        total_unique_clicks: 8,
                        total_click_through_rate: 4.0,
                    },
                    // Duplicate URLs stay: one UrlMetric per tracked link
                    ClickWire {
                        url: "https://b.example".into(),
                        total_clicks: 1,
                        total_unique_clicks: 1,
                        total_click_through_rate: 0.5,
                    },
                ],
            },
        };

        let published = DateTime::from_timestamp(wire.publish_date, 0).unwrap();
        let post = convert_post(&publication_wire(), wire, published);

        assert_eq!(post.delivered, 10);
        let urls: Vec<&str> = post.urls.iter().map(|u| u.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://b.example", "https://a.example", "https://b.example"]
        );
    }
}
