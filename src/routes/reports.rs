//! Report routes — literal datasets plus their summary counters.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::reports::{DashboardSummary, Report, ReportKind, ReportSummary, Severity, SeverityDisplay};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SeverityLegend {
    pub severity: Severity,
    #[serde(flatten)]
    pub display: SeverityDisplay,
}

#[derive(Debug, Serialize)]
pub struct ReportView {
    pub report: &'static Report,
    pub summary: ReportSummary,
    pub legend: Vec<SeverityLegend>,
}

impl ReportView {
    #[must_use]
    pub fn of(kind: ReportKind) -> Self {
        let report = kind.report();
        Self {
            report,
            summary: ReportSummary::of(report),
            legend: Severity::ALL
                .into_iter()
                .map(|severity| SeverityLegend { severity, display: severity.display() })
                .collect(),
        }
    }
}

/// `GET /api/reports` — dashboard summary cards.
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(DashboardSummary::build(state.simulator.stats().await))
}

/// `GET /api/reports/:kind`
pub async fn get_report(Path(kind): Path<String>) -> Result<Json<ReportView>, StatusCode> {
    let kind: ReportKind = kind.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(ReportView::of(kind)))
}

#[cfg(test)]
#[path = "reports_test.rs"]
mod tests;
