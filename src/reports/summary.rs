//! Summary counters over the literal datasets.

use serde::Serialize;

use super::{Report, ReportKind, Severity};
use crate::services::upload::UploadStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    #[must_use]
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    fn record(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Low => &mut self.low,
            Severity::Medium => &mut self.medium,
            Severity::High => &mut self.high,
            Severity::Critical => &mut self.critical,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub kind: ReportKind,
    pub title: &'static str,
    pub categories: usize,
    pub total_issues: usize,
    pub by_severity: SeverityCounts,
    /// Mean category score; 0 for a report with no categories.
    pub average_score: f64,
}

impl ReportSummary {
    #[must_use]
    pub fn of(report: &Report) -> Self {
        let mut by_severity = SeverityCounts::default();
        let mut total_issues = 0;
        for issue in report.issues() {
            by_severity.record(issue.severity);
            total_issues += 1;
        }
        Self {
            kind: report.kind,
            title: report.title,
            categories: report.categories.len(),
            total_issues,
            by_severity,
            average_score: mean(report.categories.iter().map(|category| f64::from(category.score))),
        }
    }
}

/// Dashboard cards: the three report summaries plus upload statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub reports: Vec<ReportSummary>,
    /// Mean of the per-report average scores.
    pub overall_average_score: f64,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub uploads: UploadStats,
}

impl DashboardSummary {
    #[must_use]
    pub fn build(uploads: UploadStats) -> Self {
        let reports: Vec<ReportSummary> = ReportKind::ALL
            .into_iter()
            .map(|kind| ReportSummary::of(kind.report()))
            .collect();
        Self {
            overall_average_score: mean(reports.iter().map(|summary| summary.average_score)),
            total_issues: reports.iter().map(|summary| summary.total_issues).sum(),
            critical_issues: reports.iter().map(|summary| summary.by_severity.critical).sum(),
            reports,
            uploads,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0.0), |(sum, count), value| (sum + value, count + 1.0));
    if count > 0.0 { sum / count } else { 0.0 }
}
