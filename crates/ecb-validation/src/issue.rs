use serde::Serialize;
use std::fmt;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Makes the report invalid
    Issue,
    Warning,
    Info,
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A component slot lost its value
    MissingComponent,
    /// An object-reference member holds no live object
    MissingReference,
    /// A parentless node outside the registered root set
    DetachedRoot,
    /// Siblings sharing a name, so their paths are ambiguous
    DuplicateSiblingName,
    EmptyName,
    Inactive,
    DisabledComponent,
    /// Component type unknown to the registry; its members were not checked
    UnregisteredType,
}

impl Category {
    /// Severity every finding of this category carries
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Category::MissingComponent => Severity::Issue,
            Category::MissingReference
            | Category::DetachedRoot
            | Category::DuplicateSiblingName
            | Category::EmptyName => Severity::Warning,
            Category::Inactive | Category::DisabledComponent | Category::UnregisteredType => Severity::Info,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::MissingComponent => "missing_component",
            Category::MissingReference => "missing_reference",
            Category::DetachedRoot => "detached_root",
            Category::DuplicateSiblingName => "duplicate_sibling_name",
            Category::EmptyName => "empty_name",
            Category::Inactive => "inactive",
            Category::DisabledComponent => "disabled_component",
            Category::UnregisteredType => "unregistered_type",
        };
        f.write_str(name)
    }
}

/// One finding, tied to the path of the node it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub node_path: String,
    pub category: Category,
    pub message: String,
}

impl ValidationIssue {
    #[must_use]
    pub fn new(category: Category, node_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: category.severity(),
            node_path: node_path.into(),
            category,
            message: message.into(),
        }
    }
}

/// Aggregate validation result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total_nodes_visited: usize,
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,
    pub valid: bool,
}

impl ValidationReport {
    /// Split findings by severity; `valid` iff there are no issues
    #[must_use]
    pub fn from_findings(total_nodes_visited: usize, findings: Vec<ValidationIssue>) -> Self {
        let mut report = Self {
            total_nodes_visited,
            ..Self::default()
        };
        for finding in findings {
            match finding.severity {
                Severity::Issue => report.issues.push(finding),
                Severity::Warning => report.warnings.push(finding),
                Severity::Info => report.info.push(finding),
            }
        }
        report.valid = report.issues.is_empty();
        report
    }
}
