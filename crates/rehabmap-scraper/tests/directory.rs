//! Integration tests for `DirectoryClient::fetch_providers` against a local
//! `wiremock` server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rehabmap_scraper::{DirectoryClient, RetryPolicy, ScraperError};

const DIRECTORY_HTML: &str = include_str!("fixtures/directory.html");
const SEARCH_PATH: &str = "/information-search/rehab-provider/search";

fn test_client() -> DirectoryClient {
    DirectoryClient::new(5, "rehabmap-test/0.1", RetryPolicy::none())
        .expect("failed to build test DirectoryClient")
}

async fn serve(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn parses_every_named_card() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_raw(DIRECTORY_HTML, "text/html"),
    )
    .await;

    let url = format!("{}{SEARCH_PATH}", server.uri());
    let records = test_client()
        .fetch_providers(&url)
        .await
        .expect("fetch_providers failed");

    let names: Vec<&str> = records.iter().map(|r| r.company_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Acme Rehab Pty Ltd", "West Rehab Services", "Remote Rehab"]
    );

    let acme = &records[0];
    assert_eq!(acme.business_address, "Level 2, 100 George St, SYDNEY NSW 2000");
    assert_eq!(acme.suburb, "Sydney");
    assert_eq!(acme.postcode, "2000");
    assert_eq!(acme.provider_id, "acme-rehab-1001");
    assert_eq!(
        acme.link,
        format!("{}/information-search/rehab-provider/acme-rehab-1001", server.uri())
    );

    let west = &records[1];
    assert_eq!(west.phone, "N/A");
    assert_eq!(west.provider_id, "west-rehab-1002");
    assert_eq!(west.suburb, "Parramatta");
}

#[tokio::test]
async fn page_without_cards_is_an_error() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200)
            .set_body_raw("<html><body><div id=\"app\"></div></body></html>", "text/html"),
    )
    .await;

    let url = format!("{}{SEARCH_PATH}", server.uri());
    let err = test_client().fetch_providers(&url).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::NoProviderCards { .. }),
        "expected NoProviderCards, got {err:?}"
    );
}

#[tokio::test]
async fn not_found_maps_to_typed_error() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(404)).await;

    let url = format!("{}{SEARCH_PATH}", server.uri());
    let err = test_client().fetch_providers(&url).await.unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn bot_challenge_is_detected() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_raw(
            "<html><title>Attention Required! | Cloudflare</title></html>",
            "text/html",
        ),
    )
    .await;

    let url = format!("{}{SEARCH_PATH}", server.uri());
    let err = test_client().fetch_providers(&url).await.unwrap_err();
    assert!(matches!(err, ScraperError::BotChallenge { .. }), "got {err:?}");
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_raw(DIRECTORY_HTML, "text/html"),
    )
    .await;

    let client = DirectoryClient::new(
        5,
        "rehabmap-test/0.1",
        RetryPolicy {
            max_retries: 2,
            backoff_base_secs: 0,
        },
    )
    .expect("client");
    let url = format!("{}{SEARCH_PATH}", server.uri());
    let records = client.fetch_providers(&url).await.expect("retry succeeded");
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn relative_url_is_rejected_before_any_request() {
    let err = test_client()
        .fetch_providers("/information-search/rehab-provider/search")
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::InvalidUrl { .. }), "got {err:?}");
}
