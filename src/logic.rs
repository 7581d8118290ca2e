use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApiError;
use crate::models::event::TriageIssue;
use crate::models::graphql::GraphQLResponse;
use crate::models::projects::{
    AddItemData, DashboardProject, DashboardRow, OrganizationData, ProjectId, UpdateFieldData,
};
use crate::utils::constants::{
    ADD_ISSUE_TO_PROJECT_MUTATION, COMPONENT_COLUMN, GET_DASHBOARD_ROW_QUERY,
    GET_PROJECT_ID_QUERY, GITHUB_API_VERSION, GPU_COLUMN, OS_COLUMN, REQUEST_TIMEOUT_SECS,
    ROCM_VERSION_COLUMN, SET_COLUMN_VALUE_MUTATION, USER_AGENT,
};
use crate::utils::labels::TriagePlan;

#[derive(Debug, Deserialize)]
struct RestError {
    message: String,
}

/// Outcome of each best-effort step of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: Vec<&'static str>,
    pub failed: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

impl RunReport {
    fn record<T>(&mut self, step: &'static str, result: Result<T, ApiError>) -> Option<T> {
        match result {
            Ok(value) => {
                info!(step, "Step succeeded");
                self.succeeded.push(step);
                Some(value)
            }
            Err(e) => {
                error!(step, error = %e, "Step failed");
                self.failed.push(step);
                None
            }
        }
    }

    fn skip(&mut self, step: &'static str, reason: &str) {
        warn!(step, reason, "Step skipped");
        self.skipped.push(step);
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?)
}

pub fn graphql_body(query: &str, variables: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "query": query,
        "variables": variables,
    })
}

pub struct BotState {
    pub client: Client,
    pub token: String,
    pub api_url: String,
    pub graphql_url: String,
    pub organization: String,
    pub project_number: u64,
    pub issue: TriageIssue,
    pub plan: TriagePlan,
    pub dry_run: bool,
}

impl BotState {
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RestError>(&text)
            .map(|e| e.message)
            .unwrap_or(text);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .json(&graphql_body(query, variables))
            .send()
            .await?;
        let text = Self::check_status(response).await?.text().await?;
        let parsed: GraphQLResponse<T> = serde_json::from_str(&text)?;
        parsed.into_data()
    }

    #[instrument(skip(self), fields(issue = self.issue.number))]
    pub async fn add_labels(&self, labels: &[String]) -> Result<(), ApiError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/labels",
            self.api_url.trim_end_matches('/'),
            self.issue.owner,
            self.issue.repo,
            self.issue.number,
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(&serde_json::json!({ "labels": labels }))
            .send()
            .await?;
        Self::check_status(response).await?;
        info!("Added {} labels to issue #{}", labels.len(), self.issue.number);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_project_id(&self) -> Result<String, ApiError> {
        let variables = serde_json::json!({
            "org": self.organization,
            "number": self.project_number,
        });
        let data: OrganizationData<ProjectId> =
            self.graphql(GET_PROJECT_ID_QUERY, variables).await?;
        Ok(data.into_project()?.id)
    }

    #[instrument(skip(self))]
    pub async fn add_issue_to_project(
        &self,
        project_id: &str,
        issue_node_id: &str,
    ) -> Result<String, ApiError> {
        let variables = serde_json::json!({
            "projectId": project_id,
            "contentId": issue_node_id,
        });
        let data: AddItemData = self
            .graphql(ADD_ISSUE_TO_PROJECT_MUTATION, variables)
            .await?;
        data.add_item
            .and_then(|payload| payload.item)
            .map(|item| item.id)
            .ok_or(ApiError::MissingData("addProjectV2ItemById.item"))
    }

    #[instrument(skip(self))]
    pub async fn get_dashboard_row(&self) -> Result<DashboardRow, ApiError> {
        let variables = serde_json::json!({
            "org": self.organization,
            "number": self.project_number,
            "gpuColumn": GPU_COLUMN,
            "rocmColumn": ROCM_VERSION_COLUMN,
            "componentColumn": COMPONENT_COLUMN,
            "osColumn": OS_COLUMN,
        });
        let data: OrganizationData<DashboardProject> =
            self.graphql(GET_DASHBOARD_ROW_QUERY, variables).await?;
        Ok(data.into_project()?.into())
    }

    #[instrument(skip(self, text))]
    pub async fn set_column_value(
        &self,
        column_id: &str,
        row_id: &str,
        project_id: &str,
        text: &str,
    ) -> Result<(), ApiError> {
        let variables = serde_json::json!({
            "fieldId": column_id,
            "itemId": row_id,
            "projectId": project_id,
            "text": text,
        });
        let data: UpdateFieldData = self
            .graphql(SET_COLUMN_VALUE_MUTATION, variables)
            .await?;
        data.update
            .map(|_| ())
            .ok_or(ApiError::MissingData("updateProjectV2ItemFieldValue"))
    }

    fn log_plan(&self) {
        for (field, value) in self.plan.fields.iter() {
            debug!(section = %field, value, "Extracted section");
        }
        for field in self.plan.fields.missing() {
            warn!(section = %field, "Issue body is missing a template section");
        }
        info!(
            issue = self.issue.number,
            labels = ?self.plan.labels,
            components = ?self.plan.components,
            "Triage plan"
        );
        info!(
            gpu = %self.plan.gpu_text(),
            rocm = %self.plan.rocm_text(),
            component = %self.plan.component_text(),
            os = %self.plan.os_text(),
            "Dashboard values"
        );
    }

    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        self.log_plan();

        if self.dry_run {
            info!("Dry run, not calling the GitHub API");
            for step in [
                "add-labels",
                "get-project-id",
                "add-issue-to-project",
                "get-dashboard-row",
                "set-columns",
            ] {
                report.skip(step, "dry run");
            }
            return report;
        }

        if self.plan.labels.is_empty() {
            report.skip("add-labels", "no recognized labels");
        } else {
            let result = self.add_labels(&self.plan.labels).await;
            report.record("add-labels", result);
        }

        let project_id = {
            let result = self.get_project_id().await;
            report.record("get-project-id", result)
        };

        let item_id = match (&project_id, &self.issue.node_id) {
            (Some(project_id), Some(node_id)) => {
                let result = self.add_issue_to_project(project_id, node_id).await;
                report.record("add-issue-to-project", result)
            }
            (None, _) => {
                report.skip("add-issue-to-project", "no project id");
                None
            }
            (_, None) => {
                report.skip("add-issue-to-project", "issue has no node id");
                None
            }
        };

        let dashboard = {
            let result = self.get_dashboard_row().await;
            report.record("get-dashboard-row", result)
        };

        let (Some(project_id), Some(dashboard)) = (project_id, dashboard) else {
            report.skip("set-columns", "project or dashboard unavailable");
            return report;
        };
        let Some(row_id) = item_id.or(dashboard.latest_row_id.clone()) else {
            report.skip("set-columns", "project has no rows");
            return report;
        };

        let gpu = self.plan.gpu_text();
        let rocm = self.plan.rocm_text();
        let component = self.plan.component_text();
        let columns = [
            ("set-gpu-column", &dashboard.gpu_column_id, gpu.as_str()),
            ("set-rocm-column", &dashboard.rocm_version_column_id, rocm.as_str()),
            ("set-component-column", &dashboard.component_column_id, component.as_str()),
            ("set-os-column", &dashboard.os_column_id, self.plan.os_text()),
        ];
        for (step, column_id, text) in columns {
            match column_id {
                Some(column_id) => {
                    let result = self
                        .set_column_value(column_id, &row_id, &project_id, text)
                        .await;
                    report.record(step, result);
                }
                None => report.skip(step, "column not found on project"),
            }
        }

        report
    }
}
