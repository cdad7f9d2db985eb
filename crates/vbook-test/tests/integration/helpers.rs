#![allow(clippy::unused_async, clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Seeding the in-memory backend
//! - Making HTTP requests against the in-process service
//! - Asserting on responses

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use salvo::Service;
use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::test::{RequestBuilder, ResponseExt, TestClient};

pub use vbook_test::rfc::dav::{Multistatus, Status, parse_multistatus};
pub use vbook_test::service::backend::Contact;
pub use vbook_test::{MockBackend, TestApp};

pub const USER: &str = "manager";
pub const PASSWORD: &str = "secret";

/// ## Summary
/// Returns the contacts most tests run against.
///
/// Contact 333 is a person updated at 2016-03-01 10:20:30 UTC, contact 334 an
/// organization with no update time.
#[must_use]
pub fn seed_contacts() -> Vec<Contact> {
    let updated = NaiveDate::from_ymd_opt(2016, 3, 1)
        .and_then(|d| d.and_hms_opt(10, 20, 30))
        .expect("valid timestamp");

    vec![
        Contact::new(333, "Ivan Ivanovich Ivanov", 0)
            .with_email("ivan@example.com")
            .with_classname("Retail")
            .with_updated(updated),
        Contact::new(334, "Smith & Sons", 1),
    ]
}

/// Creates a test app whose backend serves [`seed_contacts`].
#[must_use]
pub fn seeded_app() -> TestApp {
    TestApp::new(MockBackend::with_contacts(seed_contacts()))
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    /// Creates a new test request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a new GET request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a new PROPFIND request.
    #[must_use]
    pub fn propfind(path: &str) -> Self {
        Self::new(
            Method::from_bytes(b"PROPFIND").expect("PROPFIND is a valid method"),
            path,
        )
    }

    /// Creates a new REPORT request.
    #[must_use]
    pub fn report(path: &str) -> Self {
        Self::new(
            Method::from_bytes(b"REPORT").expect("REPORT is a valid method"),
            path,
        )
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds Basic credentials for the given user.
    #[must_use]
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.header("Authorization", &format!("Basic {encoded}"))
    }

    /// Adds the default test credentials.
    #[must_use]
    pub fn authorized(self) -> Self {
        self.basic_auth(USER, PASSWORD)
    }

    /// Sends a cookie with the request.
    #[must_use]
    pub fn cookie(self, name: &str, value: &str) -> Self {
        self.header("Cookie", &format!("{name}={value}"))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets an XML request body with the XML content type.
    #[must_use]
    pub fn xml_body(self, xml: &str) -> Self {
        self.header("Content-Type", "application/xml; charset=utf-8")
            .body(xml.as_bytes().to_vec())
    }

    /// Sends the request to the test service and returns the response.
    ///
    /// ## Panics
    /// Panics if the request cannot be sent or the response cannot be read.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let cookies: Vec<(String, String)> = response
            .cookies()
            .iter()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            cookies,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}\n{}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    #[must_use]
    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        let value = self.get_header(name);
        assert_eq!(
            value,
            Some(expected),
            "Header '{name}' expected '{expected}' but got {value:?}"
        );
        self
    }

    /// Asserts that the response body contains the expected substring.
    #[must_use]
    pub fn assert_body_contains(self, expected: &str) -> Self {
        let body = self.body_string();
        assert!(
            body.contains(expected),
            "Expected body to contain '{expected}' but got:\n{body}"
        );
        self
    }

    /// Asserts that the response body does not contain the given substring.
    #[must_use]
    pub fn assert_body_not_contains(self, unexpected: &str) -> Self {
        let body = self.body_string();
        assert!(
            !body.contains(unexpected),
            "Expected body to NOT contain '{unexpected}' but got:\n{body}"
        );
        self
    }

    /// Asserts that the response body is empty.
    #[must_use]
    pub fn assert_body_empty(self) -> Self {
        assert!(
            self.body.is_empty(),
            "Expected empty body but got {} bytes",
            self.body.len()
        );
        self
    }

    /// Returns the body as a UTF-8 string.
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the value of a cookie set by the response.
    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as a multistatus document.
    ///
    /// ## Panics
    /// Panics if the body is not a multistatus document.
    #[must_use]
    pub fn multistatus(&self) -> Multistatus {
        parse_multistatus(&self.body).expect("Response should be a multistatus document")
    }
}
