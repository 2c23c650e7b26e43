use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CommitInfo, PublishError, PublishReceipt, PublishRequest, Publisher, PullRequestInfo};

const META_DIR: &str = ".docblocks";

/// Publishes into a directory tree laid out like a repository host:
/// `<root>/<owner>/<name>/<branch>/<path>`.
///
/// Repositories must already exist under the root. Each commit appends a
/// line to `.docblocks/commits.jsonl` inside the repository; pull requests
/// are written to `.docblocks/pulls/<number>.json`.
#[derive(Debug, Clone)]
pub struct LocalRepoPublisher {
    root: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct CommitRecord {
    branch: String,
    path: String,
    message: String,
}

/// Reject anything but a plain relative path: no root, drive prefix, `.`
/// or `..` segments.
fn inside_repository(what: &str, value: &str) -> Result<(), PublishError> {
    let path = Path::new(value);
    let plain = path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if plain {
        Ok(())
    } else {
        Err(PublishError::Rejected(format!(
            "{what} escapes the repository: {value}"
        )))
    }
}

fn io_error(context: &str, path: &Path, err: &std::io::Error) -> PublishError {
    PublishError::Network(format!("{context} {}: {err}", path.display()))
}

impl LocalRepoPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repository_dir(&self, repository: &str) -> Result<PathBuf, PublishError> {
        let parts: Vec<&str> = repository.split('/').collect();
        let valid = parts.len() == 2
            && parts
                .iter()
                .all(|part| !part.is_empty() && *part != "." && *part != "..");
        if !valid {
            return Err(PublishError::Rejected(format!(
                "repository must look like owner/name, got `{repository}`"
            )));
        }
        let dir = self.root.join(repository);
        if !dir.is_dir() {
            return Err(PublishError::Rejected(format!(
                "unknown repository `{repository}`"
            )));
        }
        Ok(dir)
    }

    fn append_commit(&self, meta: &Path, record: &CommitRecord) -> Result<String, PublishError> {
        let log = meta.join("commits.jsonl");
        let previous = match fs::read_to_string(&log) {
            Ok(text) => text.lines().count(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => 0,
            Err(err) => return Err(io_error("failed to read", &log, &err)),
        };
        let line = serde_json::to_string(record)
            .map_err(|err| PublishError::Rejected(err.to_string()))?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log)
            .map_err(|err| io_error("failed to open", &log, &err))?;
        writeln!(file, "{line}").map_err(|err| io_error("failed to write", &log, &err))?;
        Ok((previous + 1).to_string())
    }

    fn open_pull_request(
        &self,
        meta: &Path,
        request: &PublishRequest,
    ) -> Result<PullRequestInfo, PublishError> {
        let pulls = meta.join("pulls");
        fs::create_dir_all(&pulls).map_err(|err| io_error("failed to create", &pulls, &err))?;
        let open = fs::read_dir(&pulls)
            .map_err(|err| io_error("failed to list", &pulls, &err))?
            .filter_map(Result::ok)
            .count();
        let info = PullRequestInfo {
            number: open as u64 + 1,
            title: request
                .pr_title
                .clone()
                .unwrap_or_else(|| format!("Update {}", request.filename)),
            description: request
                .pr_description
                .clone()
                .unwrap_or_else(|| format!("Automated update of {}", request.filename)),
            source: request.branch.clone(),
            destination: "main".to_string(),
        };
        let path = pulls.join(format!("{}.json", info.number));
        let json = serde_json::to_string_pretty(&info)
            .map_err(|err| PublishError::Rejected(err.to_string()))?;
        fs::write(&path, json).map_err(|err| io_error("failed to write", &path, &err))?;
        Ok(info)
    }
}

impl Publisher for LocalRepoPublisher {
    fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        request.validate()?;
        let repo = self.repository_dir(&request.repository)?;
        let destination = request.destination();
        inside_repository("branch", &request.branch)?;
        inside_repository("path", &destination)?;

        let target = repo.join(&request.branch).join(&destination);
        if target.is_dir() {
            return Err(PublishError::Conflict(format!(
                "{destination} is a directory on {}",
                request.branch
            )));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| io_error("failed to create", parent, &err))?;
        }
        fs::write(&target, &request.content)
            .map_err(|err| io_error("failed to write", &target, &err))?;
        tracing::debug!(path = %target.display(), "published document");

        let meta = repo.join(META_DIR);
        fs::create_dir_all(&meta).map_err(|err| io_error("failed to create", &meta, &err))?;
        let record = CommitRecord {
            branch: request.branch.clone(),
            path: destination.clone(),
            message: request.commit_message.clone(),
        };
        let id = self.append_commit(&meta, &record)?;

        let pull_request = if request.wants_pull_request() {
            Some(self.open_pull_request(&meta, request)?)
        } else {
            None
        };

        Ok(PublishReceipt {
            commit: CommitInfo {
                id,
                branch: record.branch,
                path: record.path,
                message: record.message,
            },
            pull_request,
            file_url: format!("file://{}", target.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::editor::DocumentDetails;

    fn request(content: &str) -> PublishRequest {
        let details = DocumentDetails {
            file_name: "guide.md".to_string(),
            file_path: String::new(),
            file_version: "2.0".to_string(),
        };
        PublishRequest::for_document("acme/docs", &details, content.to_string())
    }

    #[test]
    fn test_publish_writes_file_commit_and_pull_request() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acme/docs")).unwrap();
        let publisher = LocalRepoPublisher::new(dir.path());

        let receipt = publisher.publish(&request("# Guide")).unwrap();

        let written = dir.path().join("acme/docs/docs/guide-2.0/docs/v2.0/guide.md");
        assert_eq!(fs::read_to_string(written).unwrap(), "# Guide");
        assert_eq!(receipt.commit.id, "1");
        assert_eq!(receipt.commit.path, "docs/v2.0/guide.md");
        let pr = receipt.pull_request.unwrap();
        assert_eq!(pr.number, 1);
        assert_eq!(pr.title, "Update documentation: guide.md");
        assert_eq!(pr.source, "docs/guide-2.0");

        let again = publisher.publish(&request("# Guide v2")).unwrap();
        assert_eq!(again.commit.id, "2");
        assert_eq!(again.pull_request.unwrap().number, 2);
    }

    #[test]
    fn test_publish_to_main_skips_pull_request() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acme/docs")).unwrap();
        let publisher = LocalRepoPublisher::new(dir.path());
        let mut req = request("body");
        req.branch = "main".to_string();
        let receipt = publisher.publish(&req).unwrap();
        assert!(receipt.pull_request.is_none());
    }

    #[test]
    fn test_unknown_repository_is_rejected() {
        let dir = tempdir().unwrap();
        let publisher = LocalRepoPublisher::new(dir.path());
        assert!(matches!(
            publisher.publish(&request("x")),
            Err(PublishError::Rejected(_))
        ));
        let mut req = request("x");
        req.repository = "../escape".to_string();
        assert!(matches!(
            publisher.publish(&req),
            Err(PublishError::Rejected(_))
        ));
    }

    #[test]
    fn test_branch_or_path_outside_repository_is_rejected() {
        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acme/docs")).unwrap();
        let publisher = LocalRepoPublisher::new(dir.path());

        let mut absolute = request("x");
        absolute.branch = elsewhere.path().display().to_string();
        let mut parent = request("x");
        parent.branch = "docs/../../other".to_string();
        let mut dotted = request("x");
        dotted.path = "../../outside/".to_string();
        let mut empty = request("x");
        empty.branch = String::new();

        for req in [absolute, parent, dotted, empty] {
            assert!(
                matches!(publisher.publish(&req), Err(PublishError::Rejected(_))),
                "{req:?}"
            );
        }
        assert_eq!(fs::read_dir(elsewhere.path()).unwrap().count(), 0);
        assert!(!dir.path().join("outside").exists());
    }

    #[test]
    fn test_directory_in_the_way_is_a_conflict() {
        let dir = tempdir().unwrap();
        let blocked = dir.path().join("acme/docs/docs/guide-2.0/docs/v2.0/guide.md");
        fs::create_dir_all(blocked).unwrap();
        let publisher = LocalRepoPublisher::new(dir.path());
        assert!(matches!(
            publisher.publish(&request("x")),
            Err(PublishError::Conflict(_))
        ));
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acme/docs")).unwrap();
        let publisher = LocalRepoPublisher::new(dir.path());
        assert!(matches!(
            publisher.publish(&request("  ")),
            Err(PublishError::Rejected(_))
        ));
    }
}
