use wiremock::matchers::any;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;

/// Query parameters alone are enough; the (empty) body is never consulted
#[tokio::test]
async fn query_submission_is_forwarded_verbatim() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/subscribers"))
        .and(header("Authorization", "Token test-token"))
        .and(body_json(serde_json::json!({ "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let resp = app
        .post_submission("email=a%40b.com&form-name=email-subscription", "".into())
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.text().await.unwrap().contains("a@b.com"));
}

/// When both sources are present, query wins; the body payload is ignored
#[tokio::test]
async fn query_parameters_win_over_body_payload() {
    let app = spawn_app().await;

    Mock::given(path("/v1/subscribers"))
        .and(body_json(serde_json::json!({ "email": "query@b.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let body = r#"{"payload": {"email": "body@b.com", "form_name": "email-subscription"}}"#;
    let resp = app
        .post_submission(
            "email=query%40b.com&form_name=email-subscription",
            body.into(),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 200);
}

/// No query string at all: both fields come from the JSON body's `payload`
#[tokio::test]
async fn body_payload_fills_in_for_missing_query() {
    let app = spawn_app().await;

    Mock::given(path("/v1/subscribers"))
        .and(body_json(serde_json::json!({ "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let body = r#"{"payload": {"email": "a@b.com", "form_name": "email-subscription"}}"#;
    let resp = app.post_submission("", body.into()).await;

    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn unknown_form_is_404_and_never_calls_the_provider() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let resp = app
        .post_submission("email=a%40b.com&form-name=newsletter", "".into())
        .await;

    assert_eq!(resp.status().as_u16(), 404);
    // the body names the form the caller actually sent
    assert!(resp.text().await.unwrap().contains("newsletter"));
}

#[tokio::test]
async fn missing_parameters_are_400() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider_server)
        .await;

    for (query, body, msg) in [
        ("", "", "nothing supplied"),
        ("form-name=email-subscription", "", "null email"),
        ("email=a%40b.com", "", "null form name"),
        ("", r#"{"payload": {}}"#, "empty payload"),
        ("", "not json at all", "malformed body"),
    ] {
        let resp = app.post_submission(query, body.into()).await;
        assert_eq!(resp.status().as_u16(), 400, "{msg}");
    }
}

#[tokio::test]
async fn invalid_email_is_400_and_never_calls_the_provider() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let resp = app
        .post_submission("email=not-an-email&form-name=email-subscription", "".into())
        .await;

    assert_eq!(resp.status().as_u16(), 400);
}

/// Valid form, but the deployment has no token configured
#[tokio::test]
async fn missing_token_is_500_and_never_calls_the_provider() {
    let app = spawn_app_with(|cfg| cfg.provider.authorization_token = None).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let resp = app
        .post_submission("email=a%40b.com&form-name=email-subscription", "".into())
        .await;

    assert_eq!(resp.status().as_u16(), 500);
}

#[tokio::test]
async fn provider_rejection_is_422_with_the_stringified_error() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let resp = app
        .post_submission("email=a%40b.com&form-name=email-subscription", "".into())
        .await;

    assert_eq!(resp.status().as_u16(), 422);
    assert!(resp
        .text()
        .await
        .unwrap()
        .contains("Could not forward submission"));
}

/// Transport-level failure: nothing is listening at the provider's address
#[tokio::test]
async fn unreachable_provider_is_422() {
    let app = spawn_app_with(|cfg| {
        // port 1 on localhost refuses connections immediately
        cfg.provider.base_url = "http://127.0.0.1:1".to_string();
    })
    .await;

    let resp = app
        .post_submission("email=a%40b.com&form-name=email-subscription", "".into())
        .await;

    assert_eq!(resp.status().as_u16(), 422);
    assert!(resp
        .text()
        .await
        .unwrap()
        .contains("Could not forward submission"));
}
