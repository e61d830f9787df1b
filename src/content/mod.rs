pub mod dir;
pub mod error;
pub mod http;

use async_trait::async_trait;

use crate::logging;

pub use dir::DirContentStore;
pub use error::{ContentError, ContentResult};
pub use http::HttpContentStore;

/// Prefixes tried, in order, in front of a unit's primary path.
pub const DEFAULT_PATH_PREFIXES: [&str; 3] = ["", "../", "/"];

/// Response to a fragment request. Ordinary HTTP error statuses come back
/// here rather than as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of chapter, menu and terminal page fragments.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the fragment at a site-relative path. Transport faults are
    /// returned as `Err`; HTTP statuses are reported through the response.
    async fn fetch(&self, path: &str) -> ContentResult<FetchResponse>;

    /// Human readable description of where fragments come from.
    fn describe(&self) -> String;
}

/// Expands a primary path into the ordered list of locations to try.
pub fn candidate_paths(primary: &str, prefixes: &[String]) -> Vec<String> {
    let trimmed = primary.trim_start_matches("./").trim_start_matches('/');
    let mut candidates: Vec<String> = Vec::with_capacity(prefixes.len().max(1));

    if prefixes.is_empty() {
        candidates.push(trimmed.to_string());
    }
    for prefix in prefixes {
        let candidate = format!("{}{}", prefix, trimmed);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}

/// Tries each candidate in order and returns the first successful body.
/// Transport faults and HTTP failures are treated alike; the error keeps the
/// reason of the last attempt.
pub async fn fetch_first(
    store: &dyn ContentStore,
    candidates: &[String],
) -> ContentResult<String> {
    let mut last_reason = String::from("no candidate paths");

    for path in candidates {
        match store.fetch(path).await {
            Ok(response) if response.is_success() => {
                logging::debug(&format!("Fetched {} ({} bytes)", path, response.body.len()));
                return Ok(response.body);
            }
            Ok(response) => {
                last_reason = format!("HTTP error! status: {}", response.status);
                logging::debug(&format!("{} answered {}", path, response.status));
            }
            Err(err) => {
                last_reason = err.to_string();
                logging::debug(&format!("{} failed: {}", path, err));
            }
        }
    }

    Err(ContentError::Exhausted {
        attempts: candidates.len(),
        reason: last_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct ScriptedStore {
        pages: HashMap<String, String>,
        broken: Vec<String>,
        requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentStore for ScriptedStore {
        async fn fetch(&self, path: &str) -> ContentResult<FetchResponse> {
            self.requests.lock().unwrap().push(path.to_string());
            if self.broken.iter().any(|p| p == path) {
                return Err(ContentError::Transport("connection refused".to_string()));
            }
            Ok(self
                .pages
                .get(path)
                .map(|body| FetchResponse::ok(body.clone()))
                .unwrap_or_else(FetchResponse::not_found))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn prefixes() -> Vec<String> {
        DEFAULT_PATH_PREFIXES.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_candidate_paths_default_prefixes() {
        assert_eq!(
            candidate_paths("chapters/chapter5.html", &prefixes()),
            vec![
                "chapters/chapter5.html",
                "../chapters/chapter5.html",
                "/chapters/chapter5.html",
            ]
        );
    }

    #[test]
    fn test_candidate_paths_dedup_and_empty() {
        let doubled = vec!["".to_string(), "".to_string(), "/".to_string()];
        assert_eq!(candidate_paths("/toc.html", &doubled), vec!["toc.html", "/toc.html"]);
        assert_eq!(candidate_paths("./toc.html", &[]), vec!["toc.html"]);
    }

    #[tokio::test]
    async fn test_fetch_first_falls_through_to_later_candidate() {
        let store = ScriptedStore {
            pages: HashMap::from([("/a.html".to_string(), "<p>A</p>".to_string())]),
            broken: vec!["../a.html".to_string()],
            requests: Mutex::new(Vec::new()),
        };
        let body = fetch_first(&store, &candidate_paths("a.html", &prefixes()))
            .await
            .unwrap();
        assert_eq!(body, "<p>A</p>");
        assert_eq!(store.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_first_stops_at_first_success() {
        let store = ScriptedStore {
            pages: HashMap::from([("a.html".to_string(), "first".to_string())]),
            broken: Vec::new(),
            requests: Mutex::new(Vec::new()),
        };
        fetch_first(&store, &candidate_paths("a.html", &prefixes()))
            .await
            .unwrap();
        assert_eq!(*store.requests.lock().unwrap(), vec!["a.html".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_first_reports_last_reason() {
        let store = ScriptedStore {
            pages: HashMap::new(),
            broken: vec!["/a.html".to_string()],
            requests: Mutex::new(Vec::new()),
        };
        let err = fetch_first(&store, &candidate_paths("a.html", &prefixes()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ContentError::Exhausted {
                attempts: 3,
                reason: "Transport error: connection refused".to_string()
            }
        );
    }
}
