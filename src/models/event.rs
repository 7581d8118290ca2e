use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// The subset of a GitHub `issues` webhook payload the bot reads.
#[derive(Debug, Deserialize)]
pub struct IssueEvent {
    pub issue: Option<Issue>,

    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: Option<u64>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    pub node_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

/// Issue data validated for a single triage run.
#[derive(Debug, Clone)]
pub struct TriageIssue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub node_id: Option<String>,
    pub owner: String,
    pub repo: String,
}

impl IssueEvent {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read event payload {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Event payload is not valid JSON")
    }

    /// `repository` is an `owner/repo` override, taking precedence over the payload.
    pub fn into_triage_issue(self, repository: Option<&str>) -> Result<TriageIssue> {
        let issue = self
            .issue
            .ok_or_else(|| anyhow!("Couldn't find issue info in current context"))?;
        let number = issue
            .number
            .ok_or_else(|| anyhow!("Couldn't find issue number in current context"))?;
        let body = issue
            .body
            .ok_or_else(|| anyhow!("Couldn't find issue body in current context"))?;

        let full_name = match repository {
            Some(name) => name.to_string(),
            None => self
                .repository
                .map(|r| r.full_name)
                .ok_or_else(|| anyhow!("Couldn't find repository in current context"))?,
        };
        let (owner, repo) = full_name
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
            .ok_or_else(|| anyhow!("Repository must look like owner/repo, got {full_name:?}"))?;

        Ok(TriageIssue {
            number,
            title: issue.title,
            body,
            node_id: issue.node_id,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAYLOAD: &str = r####"{
        "action": "opened",
        "issue": {
            "number": 42,
            "node_id": "I_kwDOA",
            "title": "[Issue]: hipcc crashes",
            "body": "### Problem Description\n\nboom"
        },
        "repository": { "full_name": "ROCm/HIP" }
    }"####;

    #[test]
    fn reads_issue_and_repository() {
        let issue = IssueEvent::from_json(PAYLOAD)
            .unwrap()
            .into_triage_issue(None)
            .unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.owner, "ROCm");
        assert_eq!(issue.repo, "HIP");
        assert_eq!(issue.node_id.as_deref(), Some("I_kwDOA"));
        assert!(issue.body.starts_with("### Problem"));
    }

    #[test]
    fn repository_override_wins() {
        let issue = IssueEvent::from_json(PAYLOAD)
            .unwrap()
            .into_triage_issue(Some("ROCm/ROCm"))
            .unwrap();
        assert_eq!(issue.repo, "ROCm");
    }

    #[test]
    fn null_body_is_fatal() {
        let raw = r#"{"issue": {"number": 1, "title": "t", "body": null},
                      "repository": {"full_name": "a/b"}}"#;
        let err = IssueEvent::from_json(raw)
            .unwrap()
            .into_triage_issue(None)
            .unwrap_err();
        assert!(err.to_string().contains("issue body"));
    }

    #[test]
    fn empty_body_is_accepted() {
        let raw = r#"{"issue": {"number": 1, "title": "t", "body": ""},
                      "repository": {"full_name": "a/b"}}"#;
        let issue = IssueEvent::from_json(raw)
            .unwrap()
            .into_triage_issue(None)
            .unwrap();
        assert_eq!(issue.body, "");
        assert!(issue.node_id.is_none());
    }

    #[test]
    fn missing_issue_is_fatal() {
        let raw = r#"{"repository": {"full_name": "a/b"}}"#;
        let err = IssueEvent::from_json(raw)
            .unwrap()
            .into_triage_issue(None)
            .unwrap_err();
        assert!(err.to_string().contains("issue info"));
    }

    #[test]
    fn missing_number_is_fatal() {
        let raw = r#"{"issue": {"title": "t", "body": ""}, "repository": {"full_name": "a/b"}}"#;
        let res = IssueEvent::from_json(raw).unwrap().into_triage_issue(None);
        assert!(res.is_err());
    }

    #[test]
    fn malformed_repository_is_rejected() {
        let res = IssueEvent::from_json(PAYLOAD)
            .unwrap()
            .into_triage_issue(Some("no-slash"));
        assert!(res.is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PAYLOAD.as_bytes()).unwrap();
        let event = IssueEvent::from_path(file.path()).unwrap();
        assert!(event.issue.is_some());
    }
}
