//! Mock catalog helpers shared by integration tests.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix the mock catalog is served under.
pub const API_PREFIX: &str = "/ibMobile";

/// Base URL to hand to `IbookClient::with_base_url`.
pub fn api_base(server: &MockServer) -> String {
    format!("{}{API_PREFIX}", server.uri())
}

/// Firmware URL served by `server` at `/fw/<segments>`.
pub fn firmware_url(server: &MockServer, segments: &str) -> String {
    format!("{}/fw/{segments}", server.uri())
}

/// Answers every keyword not mounted explicitly with an empty model list.
pub async fn mount_empty_keywords(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/getSkuModelList")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": []
        })))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Answers the model query for `keyword` with `models`.
pub async fn mount_keyword(server: &MockServer, keyword: &str, models: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/getSkuModelList")))
        .and(query_param("keyword", keyword))
        .and(query_param("iBookType", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": models
        })))
        .mount(server)
        .await;
}

/// Answers the version query for `model` with `versions`.
pub async fn mount_versions(server: &MockServer, model: &str, versions: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/getMcuVersionBySku")))
        .and(query_param("skuModel", model))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": { "systemVersion": "Linux", "mcuVersionList": versions }
        })))
        .mount(server)
        .await;
}

/// Answers the release page of an unversioned `model` with a SoC URL.
pub async fn mount_soc_release(server: &MockServer, model: &str, url: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/getIbookList")))
        .and(query_param("skuModel", model))
        .and(query_param("mcuVersion", ""))
        .and(query_param("langType", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": { "softwareVo": { "socVo": { "socUrl": url } } }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Answers the release page of `model` at `version` with an MCU URL.
pub async fn mount_mcu_release(
    server: &MockServer,
    model: &str,
    version: &str,
    url: &str,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/getIbookList")))
        .and(query_param("skuModel", model))
        .and(query_param("mcuVersion", version))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": { "softwareVo": { "mcuVo": { "mcuUrl": url } } }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Serves `body` at `/fw/<segments>`.
pub async fn mount_firmware(server: &MockServer, segments: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/fw/{segments}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Counts received requests whose path ends with `endpoint`.
pub async fn count_requests(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().ends_with(endpoint))
        .count()
}
