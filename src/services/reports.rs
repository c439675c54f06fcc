//! Report downloads.

use crate::domain::entity::EntityKind;
use crate::domain::report::ReportKind;
use crate::forms::list::ListParams;
use crate::gateway::{ExportFile, SharedGateway};
use crate::screens::Screen;
use crate::screens::reports::ReportsScreen;
use crate::services::{ServiceError, ServiceResult};

/// Fetches the backend-rendered PDF of the selected report tab, honouring
/// the same search and filters as the list.
pub async fn export_pdf(gateway: &SharedGateway, raw_query: &str) -> ServiceResult<ExportFile> {
    let params = ListParams::parse(raw_query, ReportsScreen::FILTERS, 1);
    let report = ReportKind::from_code(params.query.filters().get("report").map(String::as_str));
    let query = params.query.with_filter("report", report.code());

    let mut file = gateway
        .export(EntityKind::Reports, &query, "pdf")
        .await
        .map_err(|err| {
            log::error!("Failed to export the {} report: {err}", report.code());
            ServiceError::from(err)
        })?;

    if file.file_name.is_none() {
        file.file_name = Some(format!("{}-report.pdf", report.code()));
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::gateway::mock::MockGateway;

    #[tokio::test]
    async fn report_tab_is_forwarded_and_named() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_export()
            .withf(|kind, query, format| {
                *kind == EntityKind::Reports
                    && format == "pdf"
                    && query.filters().get("report").map(String::as_str) == Some("revenue")
                    && query.filters().get("date_range").map(String::as_str) == Some("30d")
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(ExportFile {
                    content_type: "application/pdf".to_string(),
                    file_name: None,
                    bytes: b"%PDF-1.7".to_vec(),
                })
            });
        let gateway: SharedGateway = Arc::new(gateway);

        let file = export_pdf(&gateway, "report=revenue&date_range=30d")
            .await
            .unwrap();

        assert_eq!(file.file_name.as_deref(), Some("revenue-report.pdf"));
        assert!(file.bytes.starts_with(b"%PDF"));
    }
}
