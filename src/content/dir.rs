use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::{ContentResult, ContentStore, FetchResponse};

/// Reads fragments from a site checked out on the local filesystem.
///
/// Paths resolve like URLs against the site root: a leading `/` is
/// root-relative and `..` may step above the root, mirroring a site served
/// from a sub-directory.
#[derive(Debug, Clone)]
pub struct DirContentStore {
    root: PathBuf,
}

impl DirContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(part) => resolved.push(part),
                _ => {}
            }
        }
        resolved
    }
}

#[async_trait]
impl ContentStore for DirContentStore {
    async fn fetch(&self, path: &str) -> ContentResult<FetchResponse> {
        let file = self.resolve(path);
        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(err) => Err(err.into()),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_existing_and_reports_missing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("chapters")).unwrap();
        std::fs::write(dir.path().join("chapters/chapter1.html"), "<h1>One</h1>").unwrap();

        let store = DirContentStore::new(dir.path());
        let found = store.fetch("chapters/chapter1.html").await.unwrap();
        assert!(found.is_success());
        assert_eq!(found.body, "<h1>One</h1>");

        let missing = store.fetch("chapters/chapter2.html").await.unwrap();
        assert_eq!(missing.status, 404);
        assert!(!missing.is_success());
    }

    #[test]
    fn test_resolve_rooted_and_parent_paths() {
        let store = DirContentStore::new("/srv/site/book");
        assert_eq!(
            store.resolve("/chapters/a.html"),
            PathBuf::from("/srv/site/book/chapters/a.html")
        );
        assert_eq!(
            store.resolve("../chapters/a.html"),
            PathBuf::from("/srv/site/chapters/a.html")
        );
        assert_eq!(
            store.resolve("./toc.html"),
            PathBuf::from("/srv/site/book/toc.html")
        );
    }

    #[tokio::test]
    async fn test_parent_candidate_reads_sibling_directory() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("book")).unwrap();
        std::fs::write(dir.path().join("toc.html"), "menu").unwrap();

        let store = DirContentStore::new(dir.path().join("book"));
        assert_eq!(store.fetch("../toc.html").await.unwrap().body, "menu");
    }
}
