//! Shared HTTP plumbing for the directory and geocoder clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::ScraperError;

/// Builds a `reqwest::Client` with the configured timeout and `User-Agent`.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] if the client cannot be constructed.
pub(crate) fn build_http_client(
    timeout_secs: u64,
    user_agent: &str,
) -> Result<Client, ScraperError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Maps non-2xx responses onto typed errors, passing 2xx responses through.
pub(crate) fn check_status(response: Response, url: &str) -> Result<Response, ScraperError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ScraperError::RateLimited {
            domain: extract_domain(url),
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ScraperError::NotFound {
            url: url.to_owned(),
        });
    }

    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response)
}

/// Host portion of `url`, or the input itself if it does not parse.
pub(crate) fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
