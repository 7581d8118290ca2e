//! Splits an issue-form body into its named sections.
//!
//! GitHub renders an issue form as a sequence of `### <Heading>` blocks, each
//! followed by a blank line and the answer. The headings are owned by the
//! issue template, so they are configured through [`IssueTemplate`] rather
//! than hard-coded in the parser.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Description,
    Os,
    Cpu,
    Gpu,
    RocmVersions,
    Component,
    Steps,
    RocmInfo,
    AdditionalInfo,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Description,
        Field::Os,
        Field::Cpu,
        Field::Gpu,
        Field::RocmVersions,
        Field::Component,
        Field::Steps,
        Field::RocmInfo,
        Field::AdditionalInfo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Os => "os",
            Field::Cpu => "cpu",
            Field::Gpu => "gpu",
            Field::RocmVersions => "rocmVersions",
            Field::Component => "component",
            Field::Steps => "steps",
            Field::RocmInfo => "rocmInfo",
            Field::AdditionalInfo => "additionalInfo",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub field: Field,
    pub delimiter: String,
}

/// Ordered section delimiters of the bug-report template.
#[derive(Debug, Clone)]
pub struct IssueTemplate {
    sections: Vec<Section>,
}

impl IssueTemplate {
    /// Each heading is turned into a delimiter by appending the blank line that follows it.
    pub fn new<I, S>(headings: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let sections = headings
            .into_iter()
            .map(|(field, heading)| Section {
                field,
                delimiter: format!("{}\n\n", heading.into()),
            })
            .collect();
        IssueTemplate { sections }
    }

    pub fn extract(&self, body: &str) -> IssueFields {
        let body: Cow<'_, str> = if body.contains('\r') {
            Cow::Owned(body.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(body)
        };

        // (field, heading start, content start) for every delimiter found.
        let mut located: Vec<(Field, usize, usize)> = Vec::with_capacity(self.sections.len());
        let mut missing = Vec::new();
        let mut cursor = 0;
        for section in &self.sections {
            match body[cursor..].find(&section.delimiter) {
                Some(offset) => {
                    let start = cursor + offset;
                    let content = start + section.delimiter.len();
                    located.push((section.field, start, content));
                    cursor = content;
                }
                None => missing.push(section.field),
            }
        }

        let mut fields = IssueFields {
            missing,
            ..IssueFields::default()
        };
        for (i, &(field, _, content)) in located.iter().enumerate() {
            let end = located
                .get(i + 1)
                .map_or(body.len(), |&(_, next_start, _)| next_start);
            fields.values[field.index()] = body[content..end].trim().to_string();
        }
        fields
    }
}

impl Default for IssueTemplate {
    fn default() -> Self {
        IssueTemplate::new([
            (Field::Description, "### Problem Description"),
            (Field::Os, "### Operating System"),
            (Field::Cpu, "### CPU"),
            (Field::Gpu, "### GPU"),
            (Field::RocmVersions, "### ROCm Version"),
            (Field::Component, "### ROCm Component"),
            (Field::Steps, "### Steps to Reproduce"),
            (
                Field::RocmInfo,
                "### (Optional for Linux users) Output of /opt/rocm/bin/rocminfo --support",
            ),
            (Field::AdditionalInfo, "### Additional Information"),
        ])
    }
}

/// Trimmed section texts; a section whose heading is absent is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFields {
    values: [String; 9],
    missing: Vec<Field>,
}

impl IssueFields {
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn missing(&self) -> &[Field] {
        &self.missing
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    pub fn os(&self) -> &str {
        self.get(Field::Os)
    }

    pub fn gpu(&self) -> &str {
        self.get(Field::Gpu)
    }

    pub fn rocm_versions(&self) -> &str {
        self.get(Field::RocmVersions)
    }

    pub fn component(&self) -> &str {
        self.get(Field::Component)
    }
}
