use async_trait::async_trait;
use reqwest::Url;

use super::{ContentError, ContentResult, ContentStore, FetchResponse};

/// Reads fragments from a site served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpContentStore {
    pub fn new(base_url: &str) -> ContentResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            http: reqwest::Client::new(),
        })
    }

    /// Resolves a site-relative path the way a browser resolves a relative
    /// `fetch` against the page URL.
    pub fn endpoint(&self, path: &str) -> ContentResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ContentError::InvalidSource(format!("{}: {}", path, err)))
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch(&self, path: &str) -> ContentResult<FetchResponse> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchResponse { status, body })
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

fn normalize_base_url(base_url: &str) -> ContentResult<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ContentError::InvalidSource("empty base url".to_string()));
    }

    // Without a trailing slash `join` would replace the last segment.
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&with_slash).map_err(|err| ContentError::InvalidSource(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution() {
        let store = HttpContentStore::new("https://example.org/book").unwrap();
        assert_eq!(
            store.endpoint("chapters/chapter1.html").unwrap().as_str(),
            "https://example.org/book/chapters/chapter1.html"
        );
        assert_eq!(
            store.endpoint("../chapters/chapter1.html").unwrap().as_str(),
            "https://example.org/chapters/chapter1.html"
        );
        assert_eq!(
            store.endpoint("/chapters/chapter1.html").unwrap().as_str(),
            "https://example.org/chapters/chapter1.html"
        );
    }

    #[test]
    fn test_rejects_blank_and_malformed_urls() {
        assert!(matches!(
            HttpContentStore::new("  "),
            Err(ContentError::InvalidSource(_))
        ));
        assert!(matches!(
            HttpContentStore::new("not a url"),
            Err(ContentError::InvalidSource(_))
        ));
    }
}
