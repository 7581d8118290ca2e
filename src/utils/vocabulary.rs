use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GpuModel {
    pub label: String,

    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    rocm_versions: Vec<String>,
    gpus: Vec<GpuModel>,
}

/// Supported GPU models and ROCm releases that may become issue labels.
#[derive(Debug, Clone)]
pub struct ControlledVocabulary {
    rocm_versions: HashSet<String>,
    gpus: Vec<GpuModel>,
    gpu_lookup: HashMap<String, usize>,
}

/// Lowercase with all whitespace removed, the key used for alias lookup.
pub fn alias_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl ControlledVocabulary {
    /// Fails when two GPU models claim the same spelling.
    pub fn new<I, S>(rocm_versions: I, gpus: Vec<GpuModel>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut gpu_lookup: HashMap<String, usize> = HashMap::new();
        for (idx, model) in gpus.iter().enumerate() {
            for spelling in std::iter::once(&model.label).chain(&model.aliases) {
                let key = alias_key(spelling);
                if key.is_empty() {
                    continue;
                }
                if let Some(&other) = gpu_lookup.get(&key) {
                    if other != idx {
                        bail!(
                            "GPU spelling {spelling:?} maps to both {:?} and {:?}",
                            gpus[other].label,
                            model.label
                        );
                    }
                }
                gpu_lookup.insert(key, idx);
            }
        }

        Ok(ControlledVocabulary {
            rocm_versions: rocm_versions.into_iter().map(Into::into).collect(),
            gpus,
            gpu_lookup,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read vocabulary {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid vocabulary {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(raw)?;
        Self::new(file.rocm_versions, file.gpus)
    }

    /// Canonical label for a free-text GPU entry, if it is a known spelling.
    pub fn gpu_label(&self, raw: &str) -> Option<&str> {
        self.gpu_lookup
            .get(&alias_key(raw))
            .map(|&idx| self.gpus[idx].label.as_str())
    }

    pub fn is_rocm_version(&self, label: &str) -> bool {
        self.rocm_versions.contains(label)
    }

    pub fn gpus(&self) -> &[GpuModel] {
        &self.gpus
    }
}

fn gpu(label: &str, aliases: &[&str]) -> GpuModel {
    GpuModel {
        label: label.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

impl Default for ControlledVocabulary {
    fn default() -> Self {
        let rocm_versions = [
            "ROCm 5.7.0",
            "ROCm 5.7.1",
            "ROCm 6.0.0",
            "ROCm 6.0.2",
            "ROCm 6.1.0",
            "ROCm 6.1.1",
            "ROCm 6.1.2",
            "ROCm 6.2.0",
            "ROCm 6.2.1",
            "ROCm 6.2.2",
            "ROCm 6.2.4",
            "ROCm 6.3.0",
            "ROCm 6.3.1",
        ];
        let gpus = vec![
            gpu("AMD Instinct MI300X", &["mi300x", "instinct mi300x"]),
            gpu("AMD Instinct MI300A", &["mi300a", "instinct mi300a"]),
            gpu("AMD Instinct MI250X", &["mi250x", "instinct mi250x"]),
            gpu("AMD Instinct MI250", &["mi250", "instinct mi250"]),
            gpu("AMD Instinct MI210", &["mi210", "instinct mi210"]),
            gpu("AMD Instinct MI100", &["mi100", "instinct mi100"]),
            gpu("AMD Instinct MI50", &["mi50", "instinct mi50"]),
            gpu(
                "AMD Radeon RX 7900 XTX",
                &["rx7900xtx", "7900xtx", "radeon rx 7900 xtx"],
            ),
            gpu(
                "AMD Radeon RX 7900 XT",
                &["rx7900xt", "7900xt", "radeon rx 7900 xt"],
            ),
            gpu(
                "AMD Radeon RX 7900 GRE",
                &["rx7900gre", "7900gre", "radeon rx 7900 gre"],
            ),
            gpu(
                "AMD Radeon Pro W7900",
                &["w7900", "pro w7900", "radeon pro w7900"],
            ),
            gpu(
                "AMD Radeon Pro W7800",
                &["w7800", "pro w7800", "radeon pro w7800"],
            ),
            gpu(
                "AMD Radeon Pro W6800",
                &["w6800", "pro w6800", "radeon pro w6800"],
            ),
            gpu(
                "AMD Radeon Pro VII",
                &["provii", "radeon pro vii", "radeon vii pro"],
            ),
            gpu("AMD Radeon VII", &["radeonvii", "radeon vii", "vega 20"]),
        ];
        // Built-in aliases are distinct by construction.
        ControlledVocabulary::new(rocm_versions, gpus)
            .unwrap_or_else(|e| unreachable!("built-in vocabulary is invalid: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_key_strips_whitespace_and_case() {
        assert_eq!(alias_key("  AMD Radeon\tRX 7900 XTX "), "amdradeonrx7900xtx");
    }

    #[test]
    fn canonical_labels_map_to_themselves() {
        let vocab = ControlledVocabulary::default();
        for model in vocab.gpus() {
            assert_eq!(vocab.gpu_label(&model.label), Some(model.label.as_str()));
        }
    }

    #[test]
    fn aliases_map_to_canonical_label() {
        let vocab = ControlledVocabulary::default();
        for model in vocab.gpus() {
            for alias in &model.aliases {
                assert_eq!(vocab.gpu_label(alias), Some(model.label.as_str()));
            }
        }
        assert_eq!(vocab.gpu_label("RX7900XTX"), Some("AMD Radeon RX 7900 XTX"));
    }

    #[test]
    fn near_misses_are_rejected() {
        let vocab = ControlledVocabulary::default();
        assert_eq!(vocab.gpu_label("mi300"), None);
        assert_eq!(vocab.gpu_label("rx 7900"), None);
        assert_eq!(vocab.gpu_label(""), None);
    }

    #[test]
    fn rejects_ambiguous_aliases() {
        let err = ControlledVocabulary::new(
            ["ROCm 6.2.1"],
            vec![gpu("A", &["x"]), gpu("B", &["X "])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("maps to both"));
    }

    #[test]
    fn loads_alternate_vocabulary_from_json() {
        let vocab = ControlledVocabulary::from_json(
            r#"{"rocm_versions": ["ROCm 7.0.0"],
                "gpus": [{"label": "AMD Instinct MI355X", "aliases": ["mi355x"]}]}"#,
        )
        .unwrap();
        assert!(vocab.is_rocm_version("ROCm 7.0.0"));
        assert!(!vocab.is_rocm_version("ROCm 6.2.1"));
        assert_eq!(vocab.gpu_label("MI355X"), Some("AMD Instinct MI355X"));
    }

    #[test]
    fn missing_vocabulary_file_is_an_error() {
        assert!(ControlledVocabulary::from_path(Path::new("/nonexistent/vocab.json")).is_err());
    }
}
