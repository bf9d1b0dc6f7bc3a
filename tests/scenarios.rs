//! Integration tests for the fixed request/response scenarios.

use xhr_fixture::scenario::{FIXTURE_VERSION, VERSION_HEADER};
use xhr_fixture::FixtureConfig;

mod common;

const JSON_UTF8: &str = "application/json; charset=UTF-8";
const TEXT_UTF8: &str = "text/plain; charset=UTF-8";

/// Add the header triple a programmatic XHR client sends.
fn xhr(req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.header("X-Requested-With", "XMLHttpRequest")
        .header("Cache-Control", "no-cache")
        .header("Accept", "application/json, text/javascript")
}

#[tokio::test]
async fn get_string_returns_the_fixed_string() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/get-string"))
        .header("Content-Type", JSON_UTF8)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], TEXT_UTF8);
    assert_eq!(res.headers()[VERSION_HEADER], FIXTURE_VERSION);
    assert_eq!(res.text().await.unwrap(), "this is a string");

    shutdown.trigger();
}

#[tokio::test]
async fn absent_content_type_passes_negotiation() {
    // Intentional legacy asymmetry: a missing Content-Type header is
    // accepted even though a present wrong one is rejected. Client
    // tests depend on this, so it must not be "fixed".
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/get-string"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "this is a string");

    shutdown.trigger();
}

#[tokio::test]
async fn send_string_echoes_the_body() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/send-string"))
        .header("Content-Type", TEXT_UTF8)
        .body("round trip payload")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], TEXT_UTF8);
    assert_eq!(res.text().await.unwrap(), "round trip payload");

    shutdown.trigger();
}

#[tokio::test]
async fn wrong_content_type_gets_a_quoted_diagnostic() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/send-string"))
        .header("Content-Type", JSON_UTF8)
        .body("ignored")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(
        res.text().await.unwrap(),
        format!("\"send-string: bad content type [{JSON_UTF8}].\"")
    );

    shutdown.trigger();
}

#[tokio::test]
async fn xhr_requests_must_carry_cache_control() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/get-string"))
        .header("X-Requested-With", "XMLHttpRequest")
        .header("Accept", "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "\"Bad cache control.\"");

    shutdown.trigger();
}

#[tokio::test]
async fn unknown_requested_with_value_is_rejected() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/get-string"))
        .header("X-Requested-With", "Fetch")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "\"Bad X-Requested-With header.\"");

    shutdown.trigger();
}

#[tokio::test]
async fn unknown_scenario_is_a_404() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/no-such-scenario"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "not found");

    shutdown.trigger();
}

#[tokio::test]
async fn bad_xhr_status_pairs_404_with_a_success_envelope() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = xhr(client.post(format!("http://{addr}/test/bad-xhr-status")))
        .header("Content-Type", JSON_UTF8)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["content-type"], JSON_UTF8);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["version"], FIXTURE_VERSION);
    assert_eq!(body["code"], "SUCCESS");
    assert_eq!(body["value"], "bad status");

    shutdown.trigger();
}

#[tokio::test]
async fn get_object_returns_the_stock_person() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/get-object"))
        .header("Content-Type", JSON_UTF8)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Maximus Decimus Deridius");
    assert_eq!(body["profession"], "gladiator");
    assert_eq!(body["origin"], "Spanish");

    shutdown.trigger();
}

#[tokio::test]
async fn get_xml_returns_the_enveloped_person_document() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/test/get-xml"))
        .header("Content-Type", JSON_UTF8)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/xml; charset=UTF-8");
    assert_eq!(
        res.text().await.unwrap(),
        format!(
            "<?xml version=\"1.0\"?><root>\
             <version>{FIXTURE_VERSION}</version><code>SUCCESS</code>\
             <value><name>Maximus Decimus Deridius</name>\
             <profession>gladiator</profession><origin>Spanish</origin></value>\
             </root>"
        )
    );

    shutdown.trigger();
}

#[tokio::test]
async fn browser_form_submit_gets_an_html_wrapper() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let form = reqwest::multipart::Form::new().text("name", "X");
    let res = client
        .post(format!("http://{addr}/test/send-form"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html; charset=UTF-8");

    let body = res.text().await.unwrap();
    let start = body.find("<body>").expect("body open tag") + "<body>".len();
    let end = body.find("</body>").expect("body close tag");
    let embedded: serde_json::Value = serde_json::from_str(&body[start..end]).unwrap();
    assert_eq!(embedded["name"], "X");
    assert_eq!(embedded["profession"], "gladiator");

    shutdown.trigger();
}

#[tokio::test]
async fn xhr_form_submit_gets_raw_json() {
    let (addr, shutdown) = common::spawn_fixture().await;
    let client = common::client();

    let form = reqwest::multipart::Form::new()
        .text("name", "Commodus")
        .text("rank", "emperor");
    let res = xhr(client.post(format!("http://{addr}/test/send-form")))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], JSON_UTF8);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Commodus");
    assert_eq!(body["origin"], "Spanish");
    // Fields the person record does not declare are dropped.
    assert!(body.get("rank").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn slow_scenario_delays_before_answering() {
    let mut config = FixtureConfig::default();
    config.scenario.slow_delay_ms = 100;
    let (addr, shutdown) = common::spawn_fixture_with(config).await;
    let client = common::client();

    let started = std::time::Instant::now();
    let res = client
        .post(format!("http://{addr}/test/xhr-timeout"))
        .header("Content-Type", JSON_UTF8)
        .send()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(res.status(), 200);
    assert!(elapsed >= std::time::Duration::from_millis(100));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["value"], "xhr timeout");

    shutdown.trigger();
}
