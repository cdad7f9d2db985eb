#![allow(clippy::unused_async, clippy::expect_used, clippy::unwrap_used)]
//! Tests for the sync-collection and addressbook-multiget reports.

use salvo::http::StatusCode;

use super::helpers::*;

const SYNC_COLLECTION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:sync-collection xmlns:d="DAV:">
  <d:sync-token/>
  <d:sync-level>1</d:sync-level>
  <d:prop>
    <d:getetag/>
    <d:getcontenttype/>
  </d:prop>
</d:sync-collection>"#;

const MULTIGET_ALL: &str = r#"<card:addressbook-multiget xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav">
  <d:prop><d:getetag/><card:address-data/></d:prop>
</card:addressbook-multiget>"#;

const MULTIGET_SOME: &str = r#"<card:addressbook-multiget xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav">
  <d:prop><d:getetag/><card:address-data/></d:prop>
  <d:href>/carddav/contacts/uuid-334.vcf</d:href>
  <d:href>/carddav/contacts/uuid-999.vcf</d:href>
</card:addressbook-multiget>"#;

fn hrefs(multistatus: &Multistatus) -> Vec<&str> {
    multistatus
        .responses
        .iter()
        .filter_map(|r| r.href.as_deref())
        .collect()
}

#[test_log::test(tokio::test)]
async fn sync_collection_lists_contacts() {
    let app = seeded_app();

    let response = TestRequest::report("/carddav/")
        .authorized()
        .xml_body(SYNC_COLLECTION)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_header("Content-Type", "application/xml; charset=utf-8")
        .assert_body_contains("<d:getetag>\"1456827630\"</d:getetag>")
        .assert_body_contains("<d:getetag>\"0\"</d:getetag>")
        .assert_body_contains("<d:getcontenttype>text/vcard</d:getcontenttype>");

    let multistatus = response.multistatus();
    assert_eq!(
        hrefs(&multistatus),
        ["/carddav/uuid-333.vcf", "/carddav/uuid-334.vcf"]
    );
    assert!(multistatus.responses.iter().all(|r| r.status == Status::Ok));

    let token = multistatus.sync_token.expect("sync token");
    assert_eq!(token.len(), 16);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test_log::test(tokio::test)]
async fn sync_collection_issues_fresh_tokens() {
    let app = seeded_app();

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let response = TestRequest::report("/carddav/contacts")
            .authorized()
            .xml_body(SYNC_COLLECTION)
            .send(&app.service)
            .await
            .assert_status(StatusCode::MULTI_STATUS);
        tokens.push(response.multistatus().sync_token.expect("sync token"));
    }

    assert_ne!(tokens[0], tokens[1]);
}

#[test_log::test(tokio::test)]
async fn multiget_returns_every_contact_without_hrefs() {
    let app = seeded_app();

    let response = TestRequest::report("/carddav/contacts")
        .authorized()
        .xml_body(MULTIGET_ALL)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_contains("<card:address-data>BEGIN:VCARD\nVERSION:3.0\nFN:Ivan Ivanovich Ivanov\n")
        .assert_body_contains("FN:Smith &amp; Sons")
        .assert_body_not_contains("<d:sync-token>");

    let multistatus = response.multistatus();
    assert_eq!(
        hrefs(&multistatus),
        [
            "/carddav/contacts/uuid-333.vcf",
            "/carddav/contacts/uuid-334.vcf"
        ]
    );

    let smith = multistatus
        .responses
        .iter()
        .find(|r| r.href.as_deref() == Some("/carddav/contacts/uuid-334.vcf"))
        .unwrap();
    assert!(
        smith
            .element("address-data")
            .unwrap()
            .payload
            .as_str()
            .contains("FN:Smith & Sons\n")
    );
}

#[test_log::test(tokio::test)]
async fn multiget_reports_unknown_hrefs() {
    let app = seeded_app();

    let response = TestRequest::report("/carddav/contacts")
        .authorized()
        .xml_body(MULTIGET_SOME)
        .send(&app.service)
        .await
        .assert_status(StatusCode::MULTI_STATUS)
        .assert_body_not_contains("Ivan");

    let multistatus = response.multistatus();
    assert_eq!(multistatus.responses.len(), 2);
    assert_eq!(
        multistatus.block(Status::Ok).unwrap().href.as_deref(),
        Some("/carddav/contacts/uuid-334.vcf")
    );
    assert_eq!(
        multistatus.block(Status::NotFound).unwrap().href.as_deref(),
        Some("/carddav/contacts/uuid-999.vcf")
    );
}

#[test_log::test(tokio::test)]
async fn unsupported_report_is_not_implemented() {
    let app = seeded_app();

    TestRequest::report("/carddav/contacts")
        .authorized()
        .xml_body(
            r#"<card:addressbook-query xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav"><d:prop><d:getetag/></d:prop></card:addressbook-query>"#,
        )
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_IMPLEMENTED);

    assert_eq!(app.backend.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn report_empty_body_is_no_content() {
    let app = seeded_app();

    TestRequest::report("/carddav/")
        .authorized()
        .send(&app.service)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[test_log::test(tokio::test)]
async fn report_malformed_body_is_bad_request() {
    let app = seeded_app();

    TestRequest::report("/carddav/")
        .authorized()
        .xml_body("<d:sync-collection xmlns:d=\"DAV:\">")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn rejected_principal_is_forbidden() {
    let app = TestApp::new(MockBackend::rejecting("Access denied"));

    TestRequest::report("/carddav/")
        .authorized()
        .xml_body(SYNC_COLLECTION)
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body_not_contains("multistatus");
}

#[test_log::test(tokio::test)]
async fn backend_failure_aborts_report() {
    let app = TestApp::new(MockBackend::with_contacts(seed_contacts()).failing());

    TestRequest::report("/carddav/contacts")
        .authorized()
        .xml_body(MULTIGET_ALL)
        .send(&app.service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_body_not_contains("multistatus");
}
