//! Shipping a serialized document to a repository host.
//!
//! The editor only sees the [`Publisher`] trait. Calls run on a worker
//! thread through [`PublishHandle`] so the caller keeps processing events;
//! the result comes back over a channel.

mod local;

pub use local::LocalRepoPublisher;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::DocumentDetails;

/// Failure modes a repository host can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("network error: {0}")]
    Network(String),
    /// The branch or file changed remotely.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request itself is unusable (missing fields, unknown repository).
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Everything needed to commit one file and optionally open a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    /// `owner/name` on the host.
    pub repository: String,
    pub branch: String,
    /// Directory inside the repository, joined with `filename`.
    pub path: String,
    pub filename: String,
    pub content: String,
    pub commit_message: String,
    #[serde(rename = "createPR")]
    pub create_pr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_description: Option<String>,
}

fn slug(name: &str) -> String {
    let stem = name.strip_suffix(".md").unwrap_or(name);
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl PublishRequest {
    /// Request with the defaults the publish dialog proposes for a document.
    ///
    /// The file goes to `<dir>/v<version>/<name>.md` (`dir` defaults to
    /// `docs`) on branch `docs/<name>-<version>`, with a pull request.
    pub fn for_document(repository: &str, details: &DocumentDetails, content: String) -> Self {
        let name = if details.file_name.is_empty() {
            "untitled".to_string()
        } else {
            slug(&details.file_name)
        };
        let version = if details.file_version.is_empty() {
            "1.0"
        } else {
            details.file_version.as_str()
        };
        let dir = details.file_path.trim_matches('/');
        let dir = if dir.is_empty() { "docs" } else { dir };
        let filename = format!("{name}.md");
        Self {
            repository: repository.to_string(),
            branch: format!("docs/{name}-{version}"),
            path: format!("{dir}/v{version}/"),
            commit_message: format!("docs: update {filename} (v{version})"),
            create_pr: true,
            pr_title: Some(format!("Update documentation: {filename}")),
            pr_description: Some(format!("Pull request for changes to {filename}")),
            filename,
            content,
        }
    }

    /// Path of the file inside the repository, with duplicate slashes
    /// collapsed.
    pub fn destination(&self) -> String {
        let joined = format!("{}/{}", self.path, self.filename);
        joined
            .split('/')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Pull requests are only opened from a side branch.
    pub fn wants_pull_request(&self) -> bool {
        self.create_pr && !matches!(self.branch.as_str(), "main" | "master")
    }

    /// # Errors
    /// Returns [`PublishError::Rejected`] when repository, filename or
    /// content is empty.
    pub fn validate(&self) -> Result<(), PublishError> {
        let missing: Vec<&str> = [
            ("repository", &self.repository),
            ("filename", &self.filename),
            ("content", &self.content),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PublishError::Rejected(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub id: String,
    pub branch: String,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub description: String,
    pub source: String,
    pub destination: String,
}

/// What the host reports back after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub commit: CommitInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestInfo>,
    pub file_url: String,
}

/// A repository host.
pub trait Publisher: Send + Sync {
    /// Commit `request.content` and open a pull request if asked to.
    ///
    /// # Errors
    /// Returns the host's failure; nothing is retried.
    fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError>;
}

pub type PublishResult = Result<PublishReceipt, PublishError>;

/// A publish running on a worker thread.
pub struct PublishHandle {
    rx: Receiver<PublishResult>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl PublishHandle {
    /// Validate `request` and start publishing it in the background.
    pub fn spawn(publisher: Arc<dyn Publisher>, request: PublishRequest) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let worker = thread::spawn(move || {
            let _scope = crate::perf::scope("publish");
            let result = request
                .validate()
                .and_then(|()| publisher.publish(&request));
            crate::perf::log_event(
                "publish.finished",
                format!("{} ok={}", request.destination(), result.is_ok()),
            );
            if !flag.load(Ordering::SeqCst) {
                let _ = tx.send(result);
            }
        });
        Self {
            rx,
            cancelled,
            worker: Some(worker),
        }
    }

    /// The result, once the worker has one.
    pub fn poll(&mut self) -> Option<PublishResult> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(PublishError::Network(
                    "publish worker stopped without a result".to_string(),
                )))
            }
        }
    }

    /// Block until the worker finishes.
    pub fn wait(mut self) -> PublishResult {
        let result = self.rx.recv().unwrap_or_else(|_| {
            Err(PublishError::Network(
                "publish worker stopped without a result".to_string(),
            ))
        });
        self.join();
        result
    }

    /// Discard the result. The host call itself cannot be interrupted and
    /// finishes in the background.
    pub fn cancel(self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    fn details(name: &str, path: &str, version: &str) -> DocumentDetails {
        DocumentDetails {
            file_name: name.to_string(),
            file_path: path.to_string(),
            file_version: version.to_string(),
        }
    }

    /// Records requests and answers with a fixed result.
    struct Scripted {
        result: PublishResult,
        seen: Mutex<Vec<PublishRequest>>,
    }

    impl Publisher for Scripted {
        fn publish(&self, request: &PublishRequest) -> PublishResult {
            self.seen.lock().unwrap().push(request.clone());
            self.result.clone()
        }
    }

    fn receipt() -> PublishReceipt {
        PublishReceipt {
            commit: CommitInfo {
                id: "1".to_string(),
                branch: "docs/guide-2.0".to_string(),
                path: "docs/v2.0/guide.md".to_string(),
                message: "m".to_string(),
            },
            pull_request: None,
            file_url: "file:///tmp/guide.md".to_string(),
        }
    }

    #[test]
    fn test_for_document_defaults() {
        let request =
            PublishRequest::for_document("acme/docs", &details("Guide.md", "", "2.0"), "x".into());
        assert_eq!(request.branch, "docs/guide-2.0");
        assert_eq!(request.destination(), "docs/v2.0/guide.md");
        assert_eq!(request.commit_message, "docs: update guide.md (v2.0)");
        assert_eq!(
            request.pr_title.as_deref(),
            Some("Update documentation: guide.md")
        );
        assert!(request.wants_pull_request());
    }

    #[test]
    fn test_for_document_uses_file_path_and_fallbacks() {
        let request =
            PublishRequest::for_document("acme/docs", &details("", "/manual/", ""), "x".into());
        assert_eq!(request.destination(), "manual/v1.0/untitled.md");
        assert_eq!(request.branch, "docs/untitled-1.0");
    }

    #[test]
    fn test_slug_cleans_names() {
        assert_eq!(slug("Getting Started!.md"), "getting-started");
        assert_eq!(slug("api_v2"), "api-v2");
    }

    #[test]
    fn test_destination_collapses_slashes() {
        let mut request =
            PublishRequest::for_document("acme/docs", &DocumentDetails::default(), "x".into());
        request.path = "//a///b/".to_string();
        request.filename = "c.md".to_string();
        assert_eq!(request.destination(), "a/b/c.md");
    }

    #[test]
    fn test_no_pull_request_from_main() {
        let mut request =
            PublishRequest::for_document("acme/docs", &DocumentDetails::default(), "x".into());
        for branch in ["main", "master"] {
            request.branch = branch.to_string();
            assert!(!request.wants_pull_request());
        }
        request.branch = "feature".to_string();
        request.create_pr = false;
        assert!(!request.wants_pull_request());
    }

    #[test]
    fn test_validate_names_missing_fields() {
        let mut request =
            PublishRequest::for_document("", &DocumentDetails::default(), String::new());
        request.filename.clear();
        assert_eq!(
            request.validate(),
            Err(PublishError::Rejected(
                "missing required fields: repository, filename, content".to_string()
            ))
        );
    }

    #[test]
    fn test_request_wire_names() {
        let request =
            PublishRequest::for_document("acme/docs", &DocumentDetails::default(), "x".into());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["createPR"], true);
        assert!(value.get("commitMessage").is_some());
        assert!(value.get("prTitle").is_some());
    }

    #[test]
    fn test_handle_delivers_result() {
        let publisher = Arc::new(Scripted {
            result: Ok(receipt()),
            seen: Mutex::new(Vec::new()),
        });
        let request =
            PublishRequest::for_document("acme/docs", &details("guide", "", "2.0"), "x".into());
        let handle = PublishHandle::spawn(publisher.clone(), request.clone());
        assert_eq!(handle.wait(), Ok(receipt()));
        assert_eq!(*publisher.seen.lock().unwrap(), vec![request]);
    }

    #[test]
    fn test_handle_poll_eventually_yields() {
        let publisher = Arc::new(Scripted {
            result: Err(PublishError::Authentication("bad token".to_string())),
            seen: Mutex::new(Vec::new()),
        });
        let request =
            PublishRequest::for_document("acme/docs", &DocumentDetails::default(), "x".into());
        let mut handle = PublishHandle::spawn(publisher, request);
        let result = loop {
            if let Some(result) = handle.poll() {
                break result;
            }
            thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(
            result,
            Err(PublishError::Authentication("bad token".to_string()))
        );
    }

    #[test]
    fn test_invalid_request_never_reaches_publisher() {
        let publisher = Arc::new(Scripted {
            result: Ok(receipt()),
            seen: Mutex::new(Vec::new()),
        });
        let request =
            PublishRequest::for_document("acme/docs", &DocumentDetails::default(), String::new());
        let result = PublishHandle::spawn(publisher.clone(), request).wait();
        assert!(matches!(result, Err(PublishError::Rejected(_))));
        assert!(publisher.seen.lock().unwrap().is_empty());
    }
}
