use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct OrganizationData<T> {
    pub organization: Option<Organization<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Organization<T> {
    #[serde(rename = "projectV2")]
    pub project_v2: Option<T>,
}

impl<T> OrganizationData<T> {
    pub fn into_project(self) -> Result<T, ApiError> {
        self.organization
            .ok_or(ApiError::MissingData("organization"))?
            .project_v2
            .ok_or(ApiError::MissingData("projectV2"))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddItemData {
    #[serde(rename = "addProjectV2ItemById")]
    pub add_item: Option<AddItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemPayload {
    pub item: Option<Node>,
}

#[derive(Debug, Deserialize)]
pub struct Node {
    pub id: String,
}

/// A `field(name:)` lookup; non-text fields come back as an empty object.
#[derive(Debug, Deserialize)]
pub struct FieldRef {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardProject {
    pub gpu_column: Option<FieldRef>,
    pub rocm_version_column: Option<FieldRef>,
    pub component_column: Option<FieldRef>,
    pub os_column: Option<FieldRef>,
    pub items: Items,
}

#[derive(Debug, Deserialize)]
pub struct Items {
    pub nodes: Vec<Node>,
}

/// Column ids of the tracked fields plus the most recently added row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    pub gpu_column_id: Option<String>,
    pub rocm_version_column_id: Option<String>,
    pub component_column_id: Option<String>,
    pub os_column_id: Option<String>,
    pub latest_row_id: Option<String>,
}

fn column_id(field: Option<FieldRef>) -> Option<String> {
    field.and_then(|f| f.id)
}

impl From<DashboardProject> for DashboardRow {
    fn from(project: DashboardProject) -> Self {
        DashboardRow {
            gpu_column_id: column_id(project.gpu_column),
            rocm_version_column_id: column_id(project.rocm_version_column),
            component_column_id: column_id(project.component_column),
            os_column_id: column_id(project.os_column),
            latest_row_id: project.items.nodes.into_iter().last().map(|n| n.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateFieldData {
    #[serde(rename = "updateProjectV2ItemFieldValue")]
    pub update: Option<IgnoredAny>,
}
