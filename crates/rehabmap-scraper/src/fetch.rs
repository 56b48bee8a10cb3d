//! HTML page fetching for the provider directory.

use reqwest::Client;

use crate::client::check_status;
use crate::error::ScraperError;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};

/// Fetch the HTML body of `url`, retrying transient failures.
///
/// # Errors
///
/// - [`ScraperError::BotChallenge`] when the server answers with an
///   anti-bot interstitial instead of the page.
/// - Any status or network error from [`check_status`] once retries are spent.
pub(crate) async fn fetch_html(
    client: &Client,
    url: &str,
    policy: RetryPolicy,
) -> Result<String, ScraperError> {
    retry_with_backoff(policy, || async move {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-AU,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let response = check_status(response, url)?;
        let body = response.text().await?;

        if looks_like_bot_challenge(&body) {
            return Err(ScraperError::BotChallenge {
                url: url.to_owned(),
            });
        }
        Ok(body)
    })
    .await
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}
