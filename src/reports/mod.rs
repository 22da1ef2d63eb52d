//! Report catalog — literal compliance, security, and accessibility findings.
//!
//! DESIGN
//! ======
//! The three datasets are `'static` literals in `data`. The only logic here
//! is the severity→display mapping and the sum/average aggregation behind
//! the summary counters in `summary`.

pub mod data;
pub mod summary;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use summary::{DashboardSummary, ReportSummary, SeverityCounts};

// =============================================================================
// SEVERITY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Low, Severity::Medium, Severity::High, Severity::Critical];

    #[must_use]
    pub fn display(self) -> SeverityDisplay {
        match self {
            Severity::Low => SeverityDisplay { label: "Low", icon: "info", color: "#3b82f6" },
            Severity::Medium => SeverityDisplay { label: "Medium", icon: "alert-circle", color: "#eab308" },
            Severity::High => SeverityDisplay { label: "High", icon: "alert-triangle", color: "#f97316" },
            Severity::Critical => SeverityDisplay { label: "Critical", icon: "x-octagon", color: "#dc2626" },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeverityDisplay {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

// =============================================================================
// DATASET TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub title: &'static str,
    pub description: &'static str,
    /// Regulation or guideline the finding cites.
    pub reference: &'static str,
    pub location: &'static str,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub display_name: &'static str,
    /// 0–100.
    pub score: u8,
    pub issues: &'static [Issue],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: &'static str,
    pub categories: &'static [Category],
}

impl Report {
    pub fn issues(&self) -> impl Iterator<Item = &'static Issue> {
        self.categories.iter().flat_map(|category| category.issues.iter())
    }
}

// =============================================================================
// KIND
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("unknown report kind: {0}")]
    UnknownKind(String),
}

impl crate::frame::ErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "E_UNKNOWN_REPORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Compliance,
    Security,
    Accessibility,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Compliance, ReportKind::Security, ReportKind::Accessibility];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Compliance => "compliance",
            ReportKind::Security => "security",
            ReportKind::Accessibility => "accessibility",
        }
    }

    #[must_use]
    pub fn report(self) -> &'static Report {
        match self {
            ReportKind::Compliance => &data::COMPLIANCE,
            ReportKind::Security => &data::SECURITY,
            ReportKind::Accessibility => &data::ACCESSIBILITY,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownKind(s.to_owned()))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
