//! Downloadable assessment report.
//!
//! A [`Report`] is an immutable snapshot of one submission. [`ReportFormatter`] lays
//! it out on A4 pages and serializes the result as a PDF.

mod layout;
mod pdf;

use chrono::NaiveDateTime;
use serde::Serialize;

pub use layout::{PageCursor, PageGeometry, Placement};

use self::pdf::{Font, PdfWriter};
use super::domain::{FormAnswers, PatientDetails};
use super::prediction::RiskLabel;

pub const REPORT_TITLE: &str = "Cervical Cancer Risk Assessment Report";
pub const REPORT_FILE_NAME: &str = "cervical_cancer_report.pdf";
pub const REPORT_CONTENT_TYPE: mime::Mime = mime::APPLICATION_PDF;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    pub value: String,
}

impl ReportEntry {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }

    pub fn line(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// Snapshot of everything printed in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub display_name: String,
    pub generated_at: NaiveDateTime,
    pub label: RiskLabel,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(
        patient: &PatientDetails,
        answers: &FormAnswers,
        label: RiskLabel,
        generated_at: NaiveDateTime,
    ) -> Self {
        let detail = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();

        let mut entries = vec![
            ReportEntry::new("Name", detail(&patient.name)),
            ReportEntry::new("Location", detail(&patient.location)),
            ReportEntry::new("Country", detail(&patient.country)),
        ];
        entries.extend(
            answers
                .answer_labels()
                .into_iter()
                .map(|(field, value)| ReportEntry::new(field.report_label(), value)),
        );

        Self {
            display_name: patient.display_name().to_string(),
            generated_at,
            label,
            entries,
        }
    }
}

/// Serialized document ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub file_name: &'static str,
    pub content_type: mime::Mime,
}

/// Offsets from the top edge of the first page.
mod offsets {
    pub const TITLE: f64 = 50.0;
    pub const DATE: f64 = 80.0;
    pub const PATIENT: f64 = 100.0;
    pub const RESULT: f64 = 120.0;
    pub const DETAILS_HEADING: f64 = 150.0;
    pub const FIRST_ENTRY: f64 = 170.0;
}

const HEADER_X: f64 = 40.0;
const ENTRY_X: f64 = 60.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter {
    geometry: PageGeometry,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn render(&self, report: &Report) -> RenderedDocument {
        let geometry = self.geometry;
        let mut writer = PdfWriter::new(geometry.width, geometry.height);

        let title_width = Font::HelveticaBold.text_width(REPORT_TITLE, 14.0);
        writer.text(
            0,
            Font::HelveticaBold,
            14.0,
            geometry.width / 2.0 - title_width / 2.0,
            geometry.from_top(offsets::TITLE),
            REPORT_TITLE,
        );

        let header = [
            (
                offsets::DATE,
                format!("Date: {}", report.generated_at.format(TIMESTAMP_FORMAT)),
            ),
            (
                offsets::PATIENT,
                format!("Patient Name: {}", report.display_name),
            ),
            (
                offsets::RESULT,
                format!("Prediction Result: {}", report.label.label()),
            ),
        ];
        for (offset, line) in &header {
            writer.text(
                0,
                Font::Helvetica,
                10.0,
                HEADER_X,
                geometry.from_top(*offset),
                line,
            );
        }

        writer.text(
            0,
            Font::HelveticaBold,
            12.0,
            HEADER_X,
            geometry.from_top(offsets::DETAILS_HEADING),
            "Entered Details:",
        );

        let mut cursor = PageCursor::new(geometry, geometry.from_top(offsets::FIRST_ENTRY));
        for entry in &report.entries {
            let Placement { page, y } = cursor.place();
            writer.text(page, Font::Helvetica, 10.0, ENTRY_X, y, &entry.line());
        }
        let page_count = cursor.finish();
        debug_assert_eq!(page_count, writer.page_count());

        RenderedDocument {
            bytes: writer.finish(),
            page_count,
            file_name: REPORT_FILE_NAME,
            content_type: REPORT_CONTENT_TYPE,
        }
    }
}
