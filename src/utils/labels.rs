use tracing::warn;

use crate::utils::constants::UMBRELLA_REPO;
use crate::utils::fields::IssueFields;
use crate::utils::vocabulary::ControlledVocabulary;

pub const DOCUMENTATION_LABEL: &str = "Documentation";
pub const FEATURE_REQUEST_LABEL: &str = "Feature Request";

const ROCM_PREFIX: &str = "ROCm ";

fn split_entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|e| !e.is_empty())
}

/// Recognized GPU labels in input order. Duplicates are kept.
pub fn normalize_gpus(raw: &str, vocab: &ControlledVocabulary) -> Vec<String> {
    split_entries(raw)
        .filter_map(|entry| match vocab.gpu_label(entry) {
            Some(label) => Some(label.to_string()),
            None => {
                warn!(entry, "Dropping unrecognized GPU");
                None
            }
        })
        .collect()
}

fn rocm_label(entry: &str) -> String {
    let has_prefix = entry
        .get(..4)
        .is_some_and(|p| p.eq_ignore_ascii_case("rocm"));
    if has_prefix {
        format!("{ROCM_PREFIX}{}", entry[4..].trim_start())
    } else {
        format!("{ROCM_PREFIX}{entry}")
    }
}

/// Supported ROCm versions as `ROCm X.Y.Z` labels, in input order.
pub fn normalize_rocm_versions(raw: &str, vocab: &ControlledVocabulary) -> Vec<String> {
    split_entries(raw)
        .filter_map(|entry| {
            let label = rocm_label(entry);
            if vocab.is_rocm_version(&label) {
                Some(label)
            } else {
                warn!(entry, "Dropping unsupported ROCm version");
                None
            }
        })
        .collect()
}

pub fn title_tags(title: &str) -> Vec<&'static str> {
    let title = title.to_lowercase();
    let mut tags = Vec::new();
    if title.contains("documentation") {
        tags.push(DOCUMENTATION_LABEL);
    }
    if title.contains("feature") {
        tags.push(FEATURE_REQUEST_LABEL);
    }
    tags
}

/// Issues filed against the umbrella repository name their components in the body.
pub fn resolve_components(repo: &str, component_field: &str) -> Vec<String> {
    if repo == UMBRELLA_REPO {
        split_entries(component_field).map(str::to_string).collect()
    } else {
        vec![repo.to_string()]
    }
}

/// Board cells drop the vendor and family words: "AMD Instinct MI300X" becomes "MI300X".
pub fn gpu_column_text(gpus: &[String]) -> String {
    gpus.iter()
        .map(|gpu| {
            ["Instinct ", "Radeon "]
                .iter()
                .find_map(|family| gpu.find(family).map(|at| &gpu[at + family.len()..]))
                .unwrap_or(gpu)
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn rocm_column_text(versions: &[String]) -> String {
    versions
        .iter()
        .map(|v| v.strip_prefix(ROCM_PREFIX).unwrap_or(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Everything a run derives from the issue before touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriagePlan {
    pub fields: IssueFields,
    pub gpus: Vec<String>,
    pub rocm_versions: Vec<String>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
}

impl TriagePlan {
    pub fn build(title: &str, repo: &str, fields: IssueFields, vocab: &ControlledVocabulary) -> Self {
        let gpus = normalize_gpus(fields.gpu(), vocab);
        let rocm_versions = normalize_rocm_versions(fields.rocm_versions(), vocab);
        let components = resolve_components(repo, fields.component());

        let mut labels: Vec<String> = Vec::new();
        let candidates = gpus
            .iter()
            .chain(&rocm_versions)
            .cloned()
            .chain(title_tags(title).into_iter().map(str::to_string));
        for label in candidates {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }

        TriagePlan {
            fields,
            gpus,
            rocm_versions,
            labels,
            components,
        }
    }

    pub fn gpu_text(&self) -> String {
        gpu_column_text(&self.gpus)
    }

    pub fn rocm_text(&self) -> String {
        rocm_column_text(&self.rocm_versions)
    }

    pub fn component_text(&self) -> String {
        self.components.join(", ")
    }

    pub fn os_text(&self) -> &str {
        self.fields.os()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fields::IssueTemplate;
    use pretty_assertions::assert_eq;

    fn vocab() -> ControlledVocabulary {
        ControlledVocabulary::default()
    }

    #[test]
    fn gpus_are_alias_matched_in_order() {
        assert_eq!(
            normalize_gpus("AMD Instinct MI300X, rx7900xtx", &vocab()),
            vec!["AMD Instinct MI300X", "AMD Radeon RX 7900 XTX"]
        );
    }

    #[test]
    fn unknown_gpus_are_dropped_and_duplicates_kept() {
        assert_eq!(
            normalize_gpus("mi300x, GeForce RTX 4090, MI300X, ", &vocab()),
            vec!["AMD Instinct MI300X", "AMD Instinct MI300X"]
        );
    }

    #[test]
    fn gpu_output_is_always_in_vocabulary() {
        let vocab = vocab();
        let out = normalize_gpus("mi250, mi2500, radeon vii, vii, 7900, w7900", &vocab);
        for label in &out {
            assert!(vocab.gpus().iter().any(|g| &g.label == label));
        }
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn rocm_versions_accept_bare_and_prefixed() {
        assert_eq!(
            normalize_rocm_versions("6.2.1, ROCm 6.2.1, rocm6.1.0", &vocab()),
            vec!["ROCm 6.2.1", "ROCm 6.2.1", "ROCm 6.1.0"]
        );
    }

    #[test]
    fn unsupported_rocm_versions_are_dropped() {
        assert_eq!(
            normalize_rocm_versions("6.2.1, 5.9.0", &vocab()),
            vec!["ROCm 6.2.1"]
        );
        assert!(normalize_rocm_versions("", &vocab()).is_empty());
    }

    #[test]
    fn title_tags_are_case_insensitive() {
        assert_eq!(title_tags("DOCUMENTATION fix"), vec![DOCUMENTATION_LABEL]);
        assert_eq!(title_tags("documentation fix"), vec![DOCUMENTATION_LABEL]);
        assert_eq!(
            title_tags("[Feature]: Documentation for hipify"),
            vec![DOCUMENTATION_LABEL, FEATURE_REQUEST_LABEL]
        );
        assert!(title_tags("[Issue]: segfault").is_empty());
    }

    #[test]
    fn umbrella_repo_uses_component_field() {
        assert_eq!(
            resolve_components("ROCm", "HIPIFY, Thrust"),
            vec!["HIPIFY", "Thrust"]
        );
        assert_eq!(resolve_components("rocBLAS", "HIPIFY"), vec!["rocBLAS"]);
        assert!(resolve_components("ROCm", "").is_empty());
    }

    #[test]
    fn column_texts_are_compact() {
        let gpus = vec![
            "AMD Instinct MI300X".to_string(),
            "AMD Radeon RX 7900 XTX".to_string(),
            "Custom GPU".to_string(),
        ];
        assert_eq!(gpu_column_text(&gpus), "MI300X,RX 7900 XTX,Custom GPU");
        assert_eq!(
            rocm_column_text(&["ROCm 6.2.1".to_string(), "ROCm 6.1.0".to_string()]),
            "6.2.1,6.1.0"
        );
    }

    #[test]
    fn plan_combines_and_dedups_labels() {
        let body = "### GPU\n\nAMD Instinct MI300X, mi300x, rx7900xtx\n\n\
            ### ROCm Version\n\n6.2.1, 5.9.0\n\n\
            ### ROCm Component\n\nHIPIFY, Thrust\n\n";
        let fields = IssueTemplate::default().extract(body);
        let plan = TriagePlan::build("[Feature]: more docs", "ROCm", fields, &vocab());
        assert_eq!(
            plan.labels,
            vec![
                "AMD Instinct MI300X",
                "AMD Radeon RX 7900 XTX",
                "ROCm 6.2.1",
                "Feature Request",
            ]
        );
        assert_eq!(plan.gpus.len(), 3);
        assert_eq!(plan.component_text(), "HIPIFY, Thrust");
        assert_eq!(plan.rocm_text(), "6.2.1");
        assert_eq!(plan.os_text(), "");
    }
}
