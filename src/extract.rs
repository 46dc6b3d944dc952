//! Extract invocation against the archive backend
//!
//! Issues the extract GET and classifies the response. The backend applies
//! its own idempotent unpacking; on success there is no payload and no
//! client-side validation of the resulting directory tree (the file
//! browser's own refresh takes care of showing the outcome).

use crate::error::{Error, Result};
use crate::request::RequestBuilder;

/// Issues extract requests and classifies their responses
///
/// One invoker is shared for the process lifetime; the underlying
/// [`reqwest::Client`] pools its connections. There is no retry and no
/// client-side timeout: a hung backend leaves the invoking command pending.
#[derive(Clone)]
pub struct ExtractInvoker {
    client: reqwest::Client,
    builder: RequestBuilder,
}

impl ExtractInvoker {
    /// Create an invoker that builds URLs with `builder`
    pub fn new(builder: RequestBuilder) -> Self {
        Self {
            client: reqwest::Client::new(),
            builder,
        }
    }

    /// Ask the backend to expand the archive at `path` in place
    ///
    /// # Errors
    ///
    /// [`Error::RequestFailed`] for any non-200 status, carrying the status
    /// and the response body when one was readable; [`Error::Network`] when
    /// the request could not be sent at all.
    pub async fn extract(&self, path: &str) -> Result<()> {
        let url = self.builder.build_extract_url(path)?;

        tracing::info!(path, "requesting in-place extraction");
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();

        if status != 200 {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            tracing::warn!(path, status, "extract request failed");
            return Err(Error::RequestFailed { status, body });
        }

        tracing::debug!(path, "extraction finished");
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::NoCookies;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn invoker_for(server: &MockServer) -> ExtractInvoker {
        let builder = RequestBuilder::new(&server.uri(), Arc::new(NoCookies)).unwrap();
        ExtractInvoker::new(builder)
    }

    #[tokio::test]
    async fn successful_extract_resolves_with_no_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extract-archive/data/folder.zip"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let invoker = invoker_for(&server).await;
        invoker.extract("data/folder.zip").await.unwrap();
    }

    #[tokio::test]
    async fn server_error_yields_request_failed_with_status_and_no_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extract-archive/data/folder.tar.xz"))
            .respond_with(ResponseTemplate::new(500).set_body_string("extraction blew up"))
            .expect(1) // a second request would be a retry, which must not happen
            .mount(&server)
            .await;

        let invoker = invoker_for(&server).await;
        let err = invoker.extract("data/folder.tar.xz").await.unwrap_err();

        match err {
            Error::RequestFailed { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.as_deref(), Some("extraction blew up"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn not_found_is_also_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extract-archive/missing.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let invoker = invoker_for(&server).await;
        let err = invoker.extract("missing.zip").await.unwrap_err();
        assert!(matches!(err, Error::RequestFailed { status: 404, .. }));
    }

    #[tokio::test]
    async fn xsrf_cookie_travels_as_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extract-archive/data/a.zip"))
            .and(query_param("_xsrf", "cookie-value"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let cookies = crate::request::MemoryCookies::new([(
            crate::request::XSRF_COOKIE_NAME.to_string(),
            "cookie-value".to_string(),
        )]);
        let builder = RequestBuilder::new(&server.uri(), Arc::new(cookies)).unwrap();
        ExtractInvoker::new(builder).extract("data/a.zip").await.unwrap();
    }
}
