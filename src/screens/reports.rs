use crate::domain::entity::EntityKind;
use crate::domain::report::ReportRow;
use crate::list::filters::FilterSpec;
use crate::screens::audit_logs::DATE_RANGE;
use crate::screens::{Screen, or_dash};

pub struct ReportsScreen;

impl Screen for ReportsScreen {
    const KIND: EntityKind = EntityKind::Reports;
    const COLUMNS: &'static [&'static str] = &["Course", "Learner", "Completion", "Completed on", "Amount"];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec {
            key: "report",
            label: "Report",
            options: &[
                ("completion", "Completion"),
                ("enrollment", "Enrollment"),
                ("revenue", "Revenue"),
            ],
        },
        DATE_RANGE,
    ];

    type Item = ReportRow;

    fn row_id(item: &ReportRow) -> i64 {
        item.id
    }

    fn row_cells(item: &ReportRow) -> Vec<String> {
        vec![
            item.course.clone(),
            or_dash(item.learner.as_deref()),
            item.completion
                .map(|completion| completion.to_string())
                .unwrap_or_else(|| "-".to_string()),
            item.completed_on
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
            item.amount
                .map(|amount| format!("{amount:.2}"))
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}
