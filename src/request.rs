//! Request construction for archive downloads and extraction
//!
//! Builds the two backend URLs deterministically from their inputs plus the
//! ambient anti-forgery cookie. Nothing here performs I/O beyond reading
//! that cookie: the builder is a pure function of its arguments, which is
//! what makes the download path synchronous end-to-end.

use crate::config::ArchiveFormat;
use crate::error::{Error, Result};
use rand::{Rng, distributions::Alphanumeric};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Route prefix for archive downloads
pub const DIRECTORIES_URL: &str = "directories";

/// Route prefix for in-place extraction
pub const EXTRACT_ARCHIVE_URL: &str = "extract-archive";

/// Name of the anti-forgery cookie the backend expects mirrored as a query
/// parameter. Its value is security-relevant and supplied externally, unlike
/// the cache-busting token which is generated here and carries no guarantee.
pub const XSRF_COOKIE_NAME: &str = "_xsrf";

/// Length of the cache-busting token appended to download URLs
const ARCHIVE_TOKEN_LEN: usize = 20;

/// Ambient cookie store of the hosting environment
///
/// Absence of a cookie is tolerated everywhere in this crate; `None` is a
/// normal answer, not an error.
pub trait CookieSource: Send + Sync {
    /// Look up a cookie value by exact name
    fn get(&self, name: &str) -> Option<String>;
}

/// Cookie source for hosts that have no cookie store at all
pub struct NoCookies;

impl CookieSource for NoCookies {
    fn get(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Simple in-memory cookie store
///
/// Useful for embedders that receive cookies out-of-band and for tests.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    values: HashMap<String, String>,
}

impl MemoryCookies {
    /// Create a store holding the given name/value pairs
    pub fn new(values: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl CookieSource for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Builds download and extract URLs rooted at the host's base URL
///
/// Paths are percent-encoded segment-by-segment so directory separators
/// survive while reserved characters are escaped. Each download URL carries
/// a single-use random token whose sole purpose is to defeat browser/proxy
/// caching of repeated identical requests.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    cookies: Arc<dyn CookieSource>,
}

impl RequestBuilder {
    /// Create a builder rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] when the URL does not parse or
    /// cannot serve as a base (e.g. `mailto:`).
    pub fn new(base_url: &str, cookies: Arc<dyn CookieSource>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| Error::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(format!(
                "{base_url}: not a hierarchical URL"
            )));
        }
        Ok(Self {
            base_url,
            cookies,
        })
    }

    /// Build the download URL for `path`
    ///
    /// `format` is appended verbatim; no default substitution happens here,
    /// so callers must resolve the [`Unset`](ArchiveFormat::Unset) sentinel
    /// to a concrete format first. Passing the sentinel is rejected rather
    /// than silently sending an empty format to the backend.
    pub fn build_download_url(
        &self,
        path: &str,
        format: ArchiveFormat,
        follow_symlinks: bool,
        download_hidden: bool,
    ) -> Result<String> {
        if format.is_unset() {
            return Err(Error::UnrecognizedFormat {
                format: format.as_str().to_string(),
            });
        }

        let mut url = self.routed_url(DIRECTORIES_URL, path);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("archiveToken", &archive_token());
            query.append_pair("archiveFormat", format.as_str());
            query.append_pair("followSymlinks", bool_str(follow_symlinks));
            query.append_pair("downloadHidden", bool_str(download_hidden));
            if let Some(xsrf) = self.cookies.get(XSRF_COOKIE_NAME) {
                query.append_pair(XSRF_COOKIE_NAME, &xsrf);
            }
        }

        tracing::debug!(path, format = %format, "built download URL");
        Ok(url.into())
    }

    /// Build the extract URL for `path`
    pub fn build_extract_url(&self, path: &str) -> Result<String> {
        let mut url = self.routed_url(EXTRACT_ARCHIVE_URL, path);
        if let Some(xsrf) = self.cookies.get(XSRF_COOKIE_NAME) {
            url.query_pairs_mut().append_pair(XSRF_COOKIE_NAME, &xsrf);
        }

        tracing::debug!(path, "built extract URL");
        Ok(url.into())
    }

    /// Join `<base>/<route>/<path>` with per-segment percent-encoding
    fn routed_url(&self, route: &str, path: &str) -> Url {
        let encoded = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}/{route}/{encoded}"));
        url
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Generate the cache-busting token: 20 characters drawn uniformly from the
/// alphanumeric alphabet. Not a security token.
fn archive_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ARCHIVE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("http://localhost:8888/", Arc::new(NoCookies)).unwrap()
    }

    fn builder_with_xsrf(value: &str) -> RequestBuilder {
        let cookies = MemoryCookies::new([(XSRF_COOKIE_NAME.to_string(), value.to_string())]);
        RequestBuilder::new("http://localhost:8888/", Arc::new(cookies)).unwrap()
    }

    fn query_map(url: &str) -> HashMap<String, String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Token properties
    // -----------------------------------------------------------------------

    #[test]
    fn token_is_twenty_alphanumeric_characters() {
        for format in ArchiveFormat::concrete() {
            let url = builder()
                .build_download_url("data/reports", format, false, false)
                .unwrap();
            let token = query_map(&url)["archiveToken"].clone();
            assert_eq!(token.len(), 20);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn identical_inputs_differ_only_in_token() {
        let b = builder();
        let first = b
            .build_download_url("proj", ArchiveFormat::TarGz, true, false)
            .unwrap();
        let second = b
            .build_download_url("proj", ArchiveFormat::TarGz, true, false)
            .unwrap();

        let mut q1 = query_map(&first);
        let mut q2 = query_map(&second);
        let t1 = q1.remove("archiveToken").unwrap();
        let t2 = q2.remove("archiveToken").unwrap();

        assert_ne!(t1, t2, "tokens must make repeated URLs unique");
        assert_eq!(q1, q2);
        assert_eq!(
            Url::parse(&first).unwrap().path(),
            Url::parse(&second).unwrap().path()
        );
    }

    // -----------------------------------------------------------------------
    // Format and flag parameters
    // -----------------------------------------------------------------------

    #[test]
    fn every_format_is_appended_verbatim() {
        for format in ArchiveFormat::concrete() {
            let url = builder()
                .build_download_url("data", format, false, false)
                .unwrap();
            assert_eq!(query_map(&url)["archiveFormat"], format.as_str());
        }
    }

    #[test]
    fn flags_are_rendered_as_true_false_strings() {
        let url = builder()
            .build_download_url("data", ArchiveFormat::Zip, true, false)
            .unwrap();
        let query = query_map(&url);
        assert_eq!(query["followSymlinks"], "true");
        assert_eq!(query["downloadHidden"], "false");
    }

    #[test]
    fn unset_sentinel_is_rejected() {
        let err = builder()
            .build_download_url("data", ArchiveFormat::Unset, false, false)
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedFormat { .. }));
    }

    // -----------------------------------------------------------------------
    // Path encoding
    // -----------------------------------------------------------------------

    #[test]
    fn path_is_encoded_per_segment_preserving_separators() {
        let url = builder()
            .build_download_url(
                "my folder/sub+dir/übung",
                ArchiveFormat::Zip,
                false,
                false,
            )
            .unwrap();
        let path = Url::parse(&url).unwrap().path().to_string();
        assert_eq!(path, "/directories/my%20folder/sub%2Bdir/%C3%BCbung");
    }

    #[test]
    fn base_url_prefix_is_preserved() {
        let b = RequestBuilder::new("http://localhost:8888/prefix/", Arc::new(NoCookies)).unwrap();
        let url = b.build_extract_url("data/a.zip").unwrap();
        assert!(url.starts_with("http://localhost:8888/prefix/extract-archive/data/a.zip"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            RequestBuilder::new("mailto:someone@example.com", Arc::new(NoCookies)),
            Err(Error::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            RequestBuilder::new("not a url", Arc::new(NoCookies)),
            Err(Error::InvalidBaseUrl(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Anti-forgery cookie
    // -----------------------------------------------------------------------

    #[test]
    fn xsrf_cookie_is_appended_when_present() {
        let url = builder_with_xsrf("2|abc|def")
            .build_download_url("data", ArchiveFormat::Zip, false, false)
            .unwrap();
        assert_eq!(query_map(&url)["_xsrf"], "2|abc|def");
    }

    #[test]
    fn missing_xsrf_cookie_is_simply_omitted() {
        let url = builder()
            .build_download_url("data", ArchiveFormat::Zip, false, false)
            .unwrap();
        assert!(!query_map(&url).contains_key("_xsrf"));

        let extract = builder().build_extract_url("data/a.zip").unwrap();
        assert!(!extract.contains("_xsrf"));
    }

    #[test]
    fn extract_url_carries_xsrf_but_no_token() {
        let url = builder_with_xsrf("tok").build_extract_url("data/a.tar.gz").unwrap();
        let query = query_map(&url);
        assert_eq!(query["_xsrf"], "tok");
        assert!(!query.contains_key("archiveToken"));
        assert!(!query.contains_key("archiveFormat"));
    }
}
