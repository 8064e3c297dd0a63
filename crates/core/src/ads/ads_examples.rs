//! Example ads used to populate a fresh subscription before the first scrape.

use chrono::{Duration, NaiveDateTime};
use serde_json::json;

use super::ads_model::ScrapedAd;
use crate::advertisers::ScrapedAdvertiser;
use crate::constants::EXAMPLE_AD_COUNT;
use crate::subscriptions::Subscription;

const EXAMPLE_TEMPLATES: [(&str, &str); EXAMPLE_AD_COUNT] = [
    (
        "Stop losing hours to {query}",
        "See how teams cut busywork in half with a smarter approach to {query}.",
    ),
    (
        "The {query} playbook top brands use",
        "A free guide to the strategies behind the fastest growing {query} companies.",
    ),
    (
        "Try the #1 rated {query} tool free for 14 days",
        "No credit card required. Join thousands of happy customers today.",
    ),
];

/// Builds the example ads for a subscription. Ads are spaced one hour apart,
/// newest first, starting at `now`.
pub fn example_ads(subscription: &Subscription, now: NaiveDateTime) -> Vec<ScrapedAd> {
    let query = subscription.display_query();
    let platform = subscription.platform;

    EXAMPLE_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, (title, description))| {
            let page_id = format!("example-{}-{}", platform, index + 1);
            ScrapedAd {
                title: title.replace("{query}", query),
                description: Some(description.replace("{query}", query)),
                image_url: Some(format!("https://placehold.co/600x400?text=Example+{}", index + 1)),
                video_url: None,
                landing_page_url: Some(format!("https://example.com/{}", page_id)),
                advertiser: Some(ScrapedAdvertiser {
                    page_id: page_id.clone(),
                    platform,
                    name: format!("Example Advertiser {}", index + 1),
                    profile_url: Some(format!("https://example.com/advertisers/{}", page_id)),
                    image_url: None,
                }),
                raw_data: json!({
                    "example": true,
                    "platform": platform.as_str(),
                    "query": query,
                }),
                scraped_at: Some(now - Duration::hours(index as i64)),
            }
        })
        .collect()
}
