//! HTTP client of the SBSS billing API.

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use vbook_core::config::BackendConfig;

use super::{
    BackendFactory, BackendFuture, ContactFilter, ContactsBackend, ContactsList, Credentials,
    SyncTag,
};
use crate::error::{BackendError, BackendResult};

/// Talks to the billing API with form posts.
///
/// The client keeps a cookie store, so the session cookie set by the login
/// request is sent with the following command.
#[derive(Debug, Clone)]
pub struct SbssClient {
    http: Client,
    url: String,
}

impl SbssClient {
    /// ## Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    /// ## Summary
    /// Logs in, then posts a `clients` command and decodes its JSON answer.
    ///
    /// ## Errors
    /// Returns transport errors, non-success HTTP statuses and decoding errors.
    async fn command<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        params: &[(&str, String)],
    ) -> BackendResult<T> {
        self.login(credentials).await?;

        let mut form: Vec<(&str, String)> = vec![
            ("async", "1".to_owned()),
            ("inc", "clients".to_owned()),
        ];
        form.extend_from_slice(params);

        tracing::debug!(url = %self.url, ?form, "Posting backend command");

        let response = self.http.post(&self.url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn login(&self, credentials: &Credentials) -> BackendResult<()> {
        let response = self
            .http
            .post(&self.url)
            .form(&[
                ("login", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(user = %credentials.username, %status, "Backend login failed");
            return Err(BackendError::Status(status.as_u16()));
        }

        Ok(())
    }
}

impl ContactsBackend for SbssClient {
    fn fetch_contacts<'a>(
        &'a self,
        credentials: &'a Credentials,
        filter: Option<ContactFilter>,
    ) -> BackendFuture<'a, ContactsList> {
        Box::pin(async move {
            let mut params = vec![("cmd", "get".to_owned())];
            if let Some(filter) = filter {
                params.push(("contacts", "1".to_owned()));
                params.push(("uid", filter.id.to_string()));
            }

            self.command(credentials, &params).await
        })
    }

    fn fetch_sync_tag<'a>(&'a self, credentials: &'a Credentials) -> BackendFuture<'a, SyncTag> {
        Box::pin(async move {
            self.command(credentials, &[("cmd", "getclientsetag".to_owned())])
                .await
        })
    }
}

/// Builds an [`SbssClient`] for every new session.
#[derive(Debug, Clone)]
pub struct SbssClientFactory {
    config: BackendConfig,
}

impl SbssClientFactory {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }
}

impl BackendFactory for SbssClientFactory {
    fn create(&self) -> BackendResult<Arc<dyn ContactsBackend>> {
        Ok(Arc::new(SbssClient::new(&self.config)?))
    }
}
