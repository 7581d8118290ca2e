pub const GITHUB_API_VERSION: &str = "2022-11-28";
pub const USER_AGENT: &str = "rocm-triage-bot/0.1";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Repository whose issues carry the component in the body.
pub const UMBRELLA_REPO: &str = "ROCm";

pub const GPU_COLUMN: &str = "GPUs";
pub const ROCM_VERSION_COLUMN: &str = "ROCmVersions";
pub const COMPONENT_COLUMN: &str = "Component";
pub const OS_COLUMN: &str = "OS";

pub const GET_PROJECT_ID_QUERY: &str = r#"
    query GetProjectId($org: String!, $number: Int!) {
        organization(login: $org) {
            projectV2(number: $number) {
                id
            }
        }
    }
"#;

pub const ADD_ISSUE_TO_PROJECT_MUTATION: &str = r#"
    mutation AddIssueToProject($projectId: ID!, $contentId: ID!) {
        addProjectV2ItemById(input: { projectId: $projectId, contentId: $contentId }) {
            item { id }
        }
    }
"#;

pub const GET_DASHBOARD_ROW_QUERY: &str = r#"
    query GetDashboardRow(
        $org: String!,
        $number: Int!,
        $gpuColumn: String!,
        $rocmColumn: String!,
        $componentColumn: String!,
        $osColumn: String!
    ) {
        organization(login: $org) {
            projectV2(number: $number) {
                gpu_column: field(name: $gpuColumn) { ... on ProjectV2Field { id } }
                rocm_version_column: field(name: $rocmColumn) { ... on ProjectV2Field { id } }
                component_column: field(name: $componentColumn) { ... on ProjectV2Field { id } }
                os_column: field(name: $osColumn) { ... on ProjectV2Field { id } }
                items(last: 1) {
                    nodes { __typename id }
                }
            }
        }
    }
"#;

pub const SET_COLUMN_VALUE_MUTATION: &str = r#"
    mutation SetColumnValue($fieldId: ID!, $itemId: ID!, $projectId: ID!, $text: String!) {
        updateProjectV2ItemFieldValue(input: {
            fieldId: $fieldId,
            itemId: $itemId,
            projectId: $projectId,
            value: { text: $text }
        }) {
            clientMutationId
        }
    }
"#;
