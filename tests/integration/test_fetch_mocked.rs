//! Article page fetching against a mocked PMC server

mod common;

use common::{mock_config, read_fixture};
use pmc_markdown::{ArticleFetcher, PmcError, html_to_markdown};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_mock_fetcher(mock_server: &MockServer) -> ArticleFetcher {
    ArticleFetcher::with_config(mock_config(&mock_server.uri()))
}

#[tokio::test]
#[traced_test]
async fn test_fetch_classic_view_as_browser() {
    let mock_server = MockServer::start().await;
    let page = read_fixture("PMC7906746.html");

    Mock::given(method("GET"))
        .and(path("/pmc/articles/PMC7906746/"))
        .and(query_param("report", "classic"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_mock_fetcher(&mock_server);
    // The bare numeric form is normalized before the request
    let html = fetcher
        .fetch_html("7906746")
        .await
        .expect("Fetch should succeed");

    assert_eq!(html, page);
    assert!(html_to_markdown(&html).starts_with("# Lipid droplets in neuronal stress\n"));

    let requests = mock_server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    assert_eq!(
        headers.get("accept").unwrap().to_str().unwrap(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
    );
    assert!(
        headers
            .get("user-agent")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("Mozilla/5.0")
    );
}

#[tokio::test]
async fn test_not_found_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pmc/articles/PMC1/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = create_mock_fetcher(&mock_server).fetch_html("PMC1").await;

    match result {
        Err(PmcError::ApiError { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pmc/articles/PMC2/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = create_mock_fetcher(&mock_server).fetch_html("PMC2").await;
    assert!(matches!(result, Err(PmcError::ApiError { status: 503, .. })));
}

#[tokio::test]
async fn test_blank_page_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pmc/articles/PMC3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n "))
        .mount(&mock_server)
        .await;

    let result = create_mock_fetcher(&mock_server).fetch_html("pmc3").await;
    assert!(matches!(result, Err(PmcError::EmptyResponse { pmcid }) if pmcid == "PMC3"));
}

#[tokio::test]
async fn test_invalid_pmcid_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = create_mock_fetcher(&mock_server).fetch_html("PMCabc").await;
    assert!(matches!(result, Err(PmcError::InvalidPmcid { .. })));
}
