#![allow(clippy::unused_async, clippy::expect_used, clippy::unwrap_used)]
//! Tests for PROPFIND on the address book collections.

use salvo::http::StatusCode;

use super::helpers::*;

const COLLECTION_PROPS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:cs="http://calendarserver.org/ns/" xmlns:card="urn:ietf:params:xml:ns:carddav">
  <d:prop>
    <d:resourcetype/>
    <cs:getctag/>
    <d:displayname/>
    <d:calendar-color/>
  </d:prop>
</d:propfind>"#;

const ETAG_PROPS: &str = r#"<d:propfind xmlns:d="DAV:">
  <d:prop><d:getetag/><d:getcontenttype/></d:prop>
</d:propfind>"#;

const DISCOVERY_PROPS: &str = r#"<d:propfind xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav">
  <d:prop>
    <d:current-user-principal/>
    <card:addressbook-home-set/>
    <d:supported-report-set/>
  </d:prop>
</d:propfind>"#;

#[test_log::test(tokio::test)]
async fn propfind_requires_basic_auth() {
    let app = seeded_app();

    TestRequest::propfind("/carddav/")
        .xml_body(COLLECTION_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_header("WWW-Authenticate", "Basic realm=Restricted");

    assert_eq!(app.backend.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn propfind_empty_body_is_no_content() {
    let app = seeded_app();

    TestRequest::propfind("/carddav/")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NO_CONTENT)
        .assert_body_empty();
}

#[test_log::test(tokio::test)]
async fn propfind_malformed_body_is_bad_request() {
    let app = seeded_app();

    TestRequest::propfind("/carddav/")
        .authorized()
        .xml_body("<d:propfind xmlns:d=\"DAV:\"><d:prop>")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_not_contains("multistatus");
}

#[test_log::test(tokio::test)]
async fn propfind_groups_properties_by_status() {
    let app = seeded_app();

    let response = TestRequest::propfind("/carddav/")
        .authorized()
        .xml_body(COLLECTION_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_header("Content-Type", "application/xml; charset=utf-8")
        .assert_body_contains("<cs:getctag>\"42\"</cs:getctag>")
        .assert_body_contains("<d:displayname>SBSS contacts</d:displayname>")
        .assert_body_contains("<d:resourcetype><d:collection/><card:addressbook/></d:resourcetype>")
        .assert_body_contains("<calendar-color></calendar-color>");

    let multistatus = response.multistatus();
    assert_eq!(multistatus.responses.len(), 2);

    let found = multistatus.block(Status::Ok).unwrap();
    assert_eq!(found.href.as_deref(), Some("/carddav/"));
    assert_eq!(found.elements.len(), 3);

    let missing = multistatus.block(Status::NotFound).unwrap();
    assert!(missing.href.is_none());
    assert_eq!(missing.elements.len(), 1);
    assert!(missing.element("calendar-color").unwrap().payload.is_empty());
}

#[test_log::test(tokio::test)]
async fn propfind_getetag_targets_contacts_collection() {
    let app = seeded_app();

    let response = TestRequest::propfind("/carddav/")
        .authorized()
        .xml_body(ETAG_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<d:getcontenttype>text/x-vcard; charset=utf-8</d:getcontenttype>");

    let multistatus = response.multistatus();
    assert_eq!(multistatus.responses.len(), 1);
    assert_eq!(
        multistatus.responses[0].href.as_deref(),
        Some("/carddav/contacts")
    );
}

#[test_log::test(tokio::test)]
async fn propfind_discovery_properties() {
    let app = seeded_app();

    let response = TestRequest::propfind("/carddav/contacts")
        .authorized()
        .xml_body(DISCOVERY_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains(
            "<d:current-user-principal><d:href>/carddav</d:href></d:current-user-principal>",
        )
        .assert_body_contains(
            "<card:addressbook-home-set><d:href>/carddav/contacts</d:href></card:addressbook-home-set>",
        )
        .assert_body_contains("<d:sync-collection/>");

    let multistatus = response.multistatus();
    assert_eq!(
        multistatus.block(Status::Ok).unwrap().href.as_deref(),
        Some("/carddav/contacts")
    );
    assert_eq!(app.backend.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn propfind_failed_ctag_is_isolated() {
    let app = TestApp::new(MockBackend::with_contacts(seed_contacts()).without_change_tag());

    let response = TestRequest::propfind("/carddav/")
        .authorized()
        .xml_body(COLLECTION_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<cs:getctag><d:error>Internal server error</d:error></cs:getctag>")
        .assert_body_contains("<d:status>HTTP/1.1 500 Internal Server Error</d:status>");

    let multistatus = response.multistatus();
    assert_eq!(multistatus.responses.len(), 3);

    let failed = multistatus.block(Status::InternalServerError).unwrap();
    assert!(failed.href.is_none());
    assert!(failed.element("getctag").is_some());

    let found = multistatus.block(Status::Ok).unwrap();
    assert!(found.element("displayname").is_some());
    assert!(found.element("resourcetype").is_some());
}

#[test_log::test(tokio::test)]
async fn propfind_forwards_credentials_to_backend() {
    let app = seeded_app();

    TestRequest::propfind("/carddav/")
        .basic_auth("operator", "pa:ss")
        .xml_body(COLLECTION_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS);

    assert_eq!(app.backend.usernames(), ["operator"]);
}

#[test_log::test(tokio::test)]
async fn propfind_unsuccessful_ctag_without_message_is_500() {
    let app = TestApp::new(MockBackend::with_contacts(seed_contacts()).rejecting_change_tag(""));

    let response = TestRequest::propfind("/carddav/")
        .authorized()
        .xml_body(COLLECTION_PROPS)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_not_contains("<cs:getctag>\"\"</cs:getctag>");

    let multistatus = response.multistatus();
    let failed = multistatus.block(Status::InternalServerError).unwrap();
    assert!(failed.element("getctag").is_some());
    assert!(multistatus.block(Status::Ok).unwrap().element("getctag").is_none());
}
