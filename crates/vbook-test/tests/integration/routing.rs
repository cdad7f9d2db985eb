#![allow(clippy::unused_async, clippy::expect_used, clippy::unwrap_used)]
//! Tests for discovery, fallback routing and sessions.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn well_known_redirects_to_root() {
    let app = seeded_app();

    TestRequest::propfind("/.well-known/carddav")
        .send(&app.service)
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY)
        .assert_header("Location", "/carddav");
}

#[test_log::test(tokio::test)]
async fn unknown_routes_are_not_found() {
    let app = seeded_app();

    TestRequest::get("/nowhere")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    TestRequest::get("/.well-known/carddav")
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    TestRequest::new(salvo::http::Method::DELETE, "/carddav/uuid-333.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(app.backend.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn session_cookie_is_issued() {
    let app = seeded_app();
    let cookie_name = app.settings.session.cookie_name.clone();
    assert_eq!(cookie_name, "sbss-vbook-sid");

    let response = TestRequest::get("/carddav/uuid-333.vcf")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let session_id = response.get_cookie(&cookie_name).expect("session cookie");
    assert_eq!(session_id.len(), 32);
    assert!(session_id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(app.sessions.len().await, 1);
}

#[test_log::test(tokio::test)]
async fn session_cookie_is_reused() {
    let app = seeded_app();
    let cookie_name = app.settings.session.cookie_name.clone();

    for _ in 0..3 {
        let response = TestRequest::get("/carddav/uuid-333.vcf")
            .authorized()
            .cookie(&cookie_name, "EHm2YMtV0bNqgvMDzOqNHcTqMvcG5iQw")
            .send(&app.service)
            .await
            .assert_status(StatusCode::OK);

        assert_eq!(
            response.get_cookie(&cookie_name),
            Some("EHm2YMtV0bNqgvMDzOqNHcTqMvcG5iQw")
        );
    }

    assert_eq!(app.factory.created(), 1);
    assert_eq!(app.sessions.len().await, 1);
}

#[test_log::test(tokio::test)]
async fn requests_without_cookie_get_separate_sessions() {
    let app = seeded_app();

    for _ in 0..2 {
        TestRequest::get("/carddav/uuid-333.vcf")
            .authorized()
            .send(&app.service)
            .await
            .assert_status(StatusCode::OK);
    }

    assert_eq!(app.factory.created(), 2);
}

#[test_log::test(tokio::test)]
async fn unauthorized_requests_still_get_a_session() {
    let app = seeded_app();
    let cookie_name = app.settings.session.cookie_name.clone();

    let response = TestRequest::propfind("/carddav/")
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert!(response.get_cookie(&cookie_name).is_some());
}

#[test_log::test(tokio::test)]
async fn session_cookie_name_comes_from_settings() {
    let mut settings = vbook_test::test_config();
    settings.session.cookie_name = "team-book-sid".to_owned();
    let app = TestApp::with_settings(MockBackend::with_contacts(seed_contacts()), settings);

    let response = TestRequest::get("/carddav/uuid-333.vcf")
        .authorized()
        .cookie("team-book-sid", "qf3v9YgNvd2kWz1RM4hUe7pLxtC0sAaB")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(
        response.get_cookie("team-book-sid"),
        Some("qf3v9YgNvd2kWz1RM4hUe7pLxtC0sAaB")
    );
    assert!(response.get_cookie("sbss-vbook-sid").is_none());
    assert_eq!(app.factory.created(), 1);
}
