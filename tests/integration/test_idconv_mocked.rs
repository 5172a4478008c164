//! ID converter client against a mocked NCBI endpoint
//!
//! These tests use wiremock to simulate the PMC ID converter service.

mod common;

use common::mock_config;
use pmc_markdown::{IdConverterClient, IdMapping, PmcError};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDCONV_PATH: &str = "/pmc/utils/idconv/v1.0/";

fn create_mock_client(mock_server: &MockServer, batch_size: usize) -> IdConverterClient {
    IdConverterClient::with_config(mock_config(&mock_server.uri()).with_batch_size(batch_size))
}

fn pmids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn mapping(pmid: &str, pmcid: Option<&str>) -> IdMapping {
    IdMapping {
        pmid: pmid.to_string(),
        pmcid: pmcid.map(String::from),
    }
}

#[tokio::test]
#[traced_test]
async fn test_convert_single_batch_keeps_input_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "33594324,31978945,1"))
        .and(query_param("format", "json"))
        .and(query_param("tool", "pmc-markdown"))
        .and(query_param("email", "tests@example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "records": [
                {"pmcid": "PMC7029158", "pmid": "31978945", "doi": "10.1056/NEJMoa2001017"},
                {"pmcid": "PMC7906746", "pmid": 33594324},
                {"requested-id": "1", "status": "error", "errmsg": "invalid article id"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);
    let mappings = client
        .convert(&pmids(&["33594324", "31978945", "1"]))
        .await
        .expect("Conversion should succeed");

    assert_eq!(
        mappings,
        vec![
            mapping("33594324", Some("PMC7906746")),
            mapping("31978945", Some("PMC7029158")),
            mapping("1", None),
        ]
    );
}

#[tokio::test]
#[traced_test]
async fn test_convert_splits_into_batches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "11,22"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{"pmid": "11", "pmcid": "PMC11"}, {"pmid": "22", "pmcid": "PMC22"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "33"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{"pmid": "33", "pmcid": "PMC33"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 2);
    let mappings = client.convert(&pmids(&["11", "22", "33"])).await.unwrap();

    assert_eq!(
        mappings,
        vec![
            mapping("11", Some("PMC11")),
            mapping("22", Some("PMC22")),
            mapping("33", Some("PMC33")),
        ]
    );
    assert!(logs_contain("Processing PMIDs 3 to 3"));
}

#[tokio::test]
#[traced_test]
async fn test_failed_batch_maps_to_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "11,22"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "33"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{"pmid": "33", "pmcid": "PMC33"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 2);
    let mappings = client
        .convert(&pmids(&["11", "22", "33"]))
        .await
        .expect("A failed batch must not abort the run");

    assert_eq!(
        mappings,
        vec![mapping("11", None), mapping("22", None), mapping("33", Some("PMC33"))]
    );
    assert!(logs_contain("Failed ID converter batch"));
}

#[tokio::test]
async fn test_malformed_json_maps_to_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);
    let mappings = client.convert(&pmids(&["123"])).await.unwrap();

    assert_eq!(mappings, vec![mapping("123", None)]);
}

#[tokio::test]
async fn test_only_invalid_pmids_send_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);
    let mappings = client
        .convert(&pmids(&["PMC456", "abc"]))
        .await
        .expect("Invalid PMIDs should not fail the batch");

    assert_eq!(mappings, vec![mapping("PMC456", None), mapping("abc", None)]);
}

#[tokio::test]
#[traced_test]
async fn test_invalid_pmid_is_skipped_in_mixed_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "123,789"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [
                {"pmid": "123", "pmcid": "PMC123"},
                {"pmid": "789", "pmcid": "PMC789"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);
    let mappings = client
        .convert(&pmids(&["123", "PMC456", "789"]))
        .await
        .expect("Conversion should succeed");

    assert_eq!(
        mappings,
        vec![
            mapping("123", Some("PMC123")),
            mapping("PMC456", None),
            mapping("789", Some("PMC789")),
        ]
    );
    assert!(logs_contain("Skipping invalid PMID"));
}

#[tokio::test]
async fn test_lookup_rejects_invalid_pmid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);
    let result = client.lookup("PMC456").await;

    assert!(matches!(result, Err(PmcError::InvalidPmid { pmid }) if pmid == "PMC456"));
}

#[tokio::test]
async fn test_lookup_single_pmid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IDCONV_PATH))
        .and(query_param("ids", "33594324"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{"pmid": "33594324", "pmcid": "PMC7906746"}]
        })))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);

    assert_eq!(
        client.lookup("33594324").await.unwrap().as_deref(),
        Some("PMC7906746")
    );
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 100);
    assert!(client.convert(&[]).await.unwrap().is_empty());
}
