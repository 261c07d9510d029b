//! GitLab API helpers for storing and retrieving a pipeline's coverage score
//! as a commit status.

use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use serde::Deserialize;
use url::Url;

use crate::baseline::BaselineSource;

pub const DEFAULT_API_BASE: &str = "https://gitlab.com/api/v4";

const PER_PAGE: usize = 100;
const TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one GitLab project. An empty token sends anonymous requests,
/// which public projects answer.
pub struct Client {
    agent: ureq::Agent,
    base_url: Url,
    token: String,
    project_id: String,
}

#[derive(Deserialize)]
struct Commit {
    id: String,
}

/// The subset of a commit status we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coverage: Option<f64>,
}

impl Client {
    pub fn new(base_url: &str, token: &str, project_id: &str) -> Result<Self> {
        if project_id.is_empty() {
            bail!("a GitLab project id is required");
        }
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid GitLab API base URL {base_url:?}"))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            bail!("invalid GitLab API base URL {:?}", base_url.as_str());
        }
        Ok(Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            base_url,
            token: token.to_string(),
            project_id: project_id.to_string(),
        })
    }

    /// `{base}/projects/{project_id}/{segments..}`, each segment escaped
    /// as a whole so `/` in a project path or ref becomes `%2F`.
    fn project_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("GitLab API base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["projects", self.project_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        if self.token.is_empty() {
            request
        } else {
            request.set("PRIVATE-TOKEN", &self.token)
        }
    }

    /// Resolve `git_ref` (branch, tag or SHA) to the SHA of its latest commit.
    pub fn latest_commit(&self, git_ref: &str) -> Result<String> {
        let url = self.project_url(&["repository", "commits", git_ref])?;
        let commit: Commit = match self.authorize(self.agent.get(url.as_str())).call() {
            Ok(resp) => resp.into_json().context("Failed to parse commit JSON")?,
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                bail!("GitLab API error fetching commit {git_ref:?} (HTTP {code}): {body}");
            }
            Err(e) => bail!("Failed to fetch commit {git_ref:?}: {e}"),
        };
        Ok(commit.id)
    }

    /// All statuses named `pipeline` on commit `sha`, across every page.
    pub fn commit_statuses(&self, sha: &str, pipeline: &str) -> Result<Vec<CommitStatus>> {
        let url = self.project_url(&["repository", "commits", sha, "statuses"])?;
        let mut statuses = Vec::new();
        let mut page = 1u32;
        loop {
            let resp = self
                .authorize(self.agent.get(url.as_str()))
                .query("name", pipeline)
                .query("all", "true")
                .query("per_page", &PER_PAGE.to_string())
                .query("page", &page.to_string())
                .call();
            let batch: Vec<CommitStatus> = match resp {
                Ok(resp) => resp.into_json().context("Failed to parse commit statuses JSON")?,
                Err(ureq::Error::Status(code, resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    bail!("GitLab API error listing commit statuses (HTTP {code}): {body}");
                }
                Err(e) => bail!("Failed to list commit statuses: {e}"),
            };
            let done = batch.len() < PER_PAGE;
            statuses.extend(batch);
            if done {
                break;
            }
            page += 1;
        }
        Ok(statuses)
    }

    /// Record `coverage` for `pipeline` on `git_ref`. When `sha` is not given
    /// the status goes on the ref's latest commit.
    pub fn write(&self, pipeline: &str, git_ref: &str, sha: Option<&str>, coverage: f64) -> Result<()> {
        let sha = match sha {
            Some(sha) if !sha.is_empty() => sha.to_string(),
            _ => self
                .latest_commit(git_ref)
                .with_context(|| format!("error getting latest commit hash from {git_ref:?}"))?,
        };

        let url = self.project_url(&["statuses", sha.as_str()])?;
        let resp = self
            .authorize(self.agent.post(url.as_str()))
            .send_json(serde_json::json!({
                "state": "success",
                "ref": git_ref,
                "name": pipeline,
                "coverage": coverage,
            }));
        match resp {
            Ok(_) => {}
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                bail!("GitLab API error setting commit status (HTTP {code}): {body}");
            }
            Err(e) => bail!("Failed to set commit status: {e}"),
        }
        log::info!("Recorded coverage {coverage:.2} for {pipeline} on {git_ref} ({sha})");
        Ok(())
    }
}

impl BaselineSource for Client {
    fn read(&self, pipeline: &str, git_ref: &str) -> Result<Option<f64>> {
        let sha = self
            .latest_commit(git_ref)
            .with_context(|| format!("error getting latest commit hash from {git_ref:?}"))?;
        let statuses = self
            .commit_statuses(&sha, pipeline)
            .context("error getting commit status")?;
        Ok(best_coverage(&statuses))
    }
}

/// The highest coverage recorded across `statuses`, ignoring statuses that
/// carry none.
#[must_use]
pub fn best_coverage(statuses: &[CommitStatus]) -> Option<f64> {
    statuses
        .iter()
        .filter_map(|s| s.coverage)
        .fold(None, |best, c| match best {
            Some(b) if b >= c => Some(b),
            _ => Some(c),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(coverage: Option<f64>) -> CommitStatus {
        CommitStatus {
            name: "pipecover".to_string(),
            coverage,
        }
    }

    #[test]
    fn test_best_coverage() {
        let statuses = vec![status(Some(61.2)), status(None), status(Some(75.0)), status(Some(70.1))];
        assert_eq!(best_coverage(&statuses), Some(75.0));
    }

    #[test]
    fn test_best_coverage_none() {
        assert_eq!(best_coverage(&[]), None);
        assert_eq!(best_coverage(&[status(None)]), None);
    }

    #[test]
    fn test_commit_status_json() {
        let json = r#"[
            {"id": 1, "sha": "abc", "name": "pipecover", "status": "success", "coverage": 81.9},
            {"id": 2, "sha": "abc", "name": "pipecover", "status": "success", "coverage": null},
            {"id": 3, "sha": "abc", "name": "pipecover", "status": "success"}
        ]"#;
        let statuses: Vec<CommitStatus> = serde_json::from_str(json).unwrap();
        assert_eq!(statuses.len(), 3);
        assert_eq!(best_coverage(&statuses), Some(81.9));
    }

    #[test]
    fn test_project_url() {
        let client = Client::new("https://gitlab.example.com/api/v4/", "t", "acme/svc").unwrap();
        assert_eq!(
            client.project_url(&["statuses", "abc"]).unwrap().as_str(),
            "https://gitlab.example.com/api/v4/projects/acme%2Fsvc/statuses/abc"
        );
    }

    #[test]
    fn test_project_url_escapes_segments() {
        let client = Client::new(DEFAULT_API_BASE, "t", "1234").unwrap();
        assert_eq!(
            client
                .project_url(&["repository", "commits", "feature/a b"])
                .unwrap()
                .as_str(),
            "https://gitlab.com/api/v4/projects/1234/repository/commits/feature%2Fa%20b"
        );
        assert_eq!(
            client
                .project_url(&["repository", "commits", "v1.2-rc_1~x", "statuses"])
                .unwrap()
                .as_str(),
            "https://gitlab.com/api/v4/projects/1234/repository/commits/v1.2-rc_1~x/statuses"
        );
    }

    #[test]
    fn test_token_header_only_when_set() {
        let client = Client::new(DEFAULT_API_BASE, "secret", "1").unwrap();
        let req = client.authorize(client.agent.get("https://gitlab.com/api/v4"));
        assert_eq!(req.header("PRIVATE-TOKEN"), Some("secret"));

        let anonymous = Client::new(DEFAULT_API_BASE, "", "1").unwrap();
        let req = anonymous.authorize(anonymous.agent.get("https://gitlab.com/api/v4"));
        assert_eq!(req.header("PRIVATE-TOKEN"), None);
    }

    #[test]
    fn test_client_validation() {
        assert!(Client::new(DEFAULT_API_BASE, "t", "").is_err());
        assert!(Client::new("gitlab.com", "t", "1").is_err());
        assert!(Client::new("ftp://gitlab.com/api/v4", "t", "1").is_err());
        assert!(Client::new("mailto:ops@example.com", "t", "1").is_err());
    }
}
