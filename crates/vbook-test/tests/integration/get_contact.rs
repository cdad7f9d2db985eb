#![allow(clippy::unused_async, clippy::expect_used, clippy::unwrap_used)]
//! Tests for GET on single vCards.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn get_contact_returns_vcard() {
    let app = seeded_app();

    let response = TestRequest::get("/carddav/uuid-333.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Type", "text/x-vcard; charset=utf-8")
        .assert_body_contains("FN:Ivan Ivanovich Ivanov\n")
        .assert_body_contains("N:Ivan;Ivanovich;Ivanov\n")
        .assert_body_contains("UID:uuid-333\n")
        .assert_body_contains("CATEGORIES:Retail\n")
        .assert_body_not_contains("multistatus");

    let body = response.body_string();
    assert!(body.starts_with("BEGIN:VCARD\nVERSION:3.0\n"), "{body}");
    assert!(body.ends_with("END:VCARD\n"), "{body}");
}

#[test_log::test(tokio::test)]
async fn get_contact_accepts_bare_id() {
    let app = seeded_app();

    TestRequest::get("/carddav/334")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("FN:Smith & Sons\n");
}

#[test_log::test(tokio::test)]
async fn zero_id_is_not_found() {
    let app = seeded_app();

    TestRequest::get("/carddav/uuid-0.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(app.backend.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn non_numeric_id_is_not_found() {
    let app = seeded_app();

    TestRequest::get("/carddav/uuid-ivan.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(app.backend.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn unknown_contact_is_not_found() {
    let app = seeded_app();

    TestRequest::get("/carddav/uuid-999.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(app.backend.calls(), 1);
}

#[test_log::test(tokio::test)]
async fn rejected_principal_is_forbidden() {
    let app = TestApp::new(MockBackend::rejecting("Access denied"));

    TestRequest::get("/carddav/uuid-333.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn backend_failure_is_not_found() {
    let app = TestApp::new(MockBackend::with_contacts(seed_contacts()).failing());

    TestRequest::get("/carddav/uuid-333.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn get_contact_requires_basic_auth() {
    let app = seeded_app();

    TestRequest::get("/carddav/uuid-333.vcf")
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_header("WWW-Authenticate", "Basic realm=Restricted");

    TestRequest::get("/carddav/uuid-333.vcf")
        .header("Authorization", "Bearer token")
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(app.backend.calls(), 0);
}
