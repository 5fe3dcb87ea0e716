//! Output formatting for carestat reports
//!
//! Two formatters implement [`OutputFormatter`]:
//! - [`TableFormatter`] renders terminal tables with `prettytable`
//! - [`JsonFormatter`] renders the report structures as pretty-printed JSON
//!
//! # Examples
//!
//! ```
//! use carestat::output::get_formatter;
//! use carestat::scaffold::{YearRange, build_empty_report};
//! use carestat_core::aggregation_types::BreakdownVariant;
//!
//! let report = build_empty_report(YearRange::new(2025, 2025).unwrap(), BreakdownVariant::Locality);
//!
//! let table = get_formatter(false).format_report("Requests", &report);
//! assert!(table.contains("2025-01"));
//!
//! let json = get_formatter(true).format_report("Requests", &report);
//! assert!(json.contains("\"years\""));
//! ```

use carestat_core::aggregation_types::{
    AttendanceAllowanceCounts, AttendanceAllowanceCrossSection, AttendanceAllowanceReport,
    BreakdownVariant, CrossSection, Report,
};
use carestat_core::breakdown::{DimensionBreakdown, ServiceBreakdown};
use prettytable::{Cell, Row, Table, format, row};
use serde::Serialize;
use serde_json::json;

/// Renders report structures for display
pub trait OutputFormatter {
    /// Format a monthly hours report
    fn format_report(&self, title: &str, report: &Report) -> String;

    /// Format a point-in-time weekly-hours snapshot
    fn format_cross_section(&self, title: &str, section: &CrossSection) -> String;

    /// Format a monthly attendance-allowance report
    fn format_attendance_report(&self, title: &str, report: &AttendanceAllowanceReport)
    -> String;

    /// Format an attendance-allowance snapshot
    fn format_attendance_cross_section(&self, section: &AttendanceAllowanceCrossSection)
    -> String;
}

/// Terminal tables
pub struct TableFormatter;

impl TableFormatter {
    fn format_hours(hours: f64) -> String {
        format!("{hours:.2}")
    }

    fn dimension_title(variant: BreakdownVariant) -> &'static str {
        match variant {
            BreakdownVariant::Locality => "Localities",
            BreakdownVariant::Deprivation => "Deprivation",
        }
    }

    /// `Name 1.50, Other 2.00` in order of first appearance
    fn format_services(services: &ServiceBreakdown) -> String {
        services
            .iter()
            .map(|s| format!("{} {}", s.name, Self::format_hours(s.total_hours)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn format_dimensions(breakdown: &DimensionBreakdown) -> String {
        breakdown
            .iter()
            .map(|b| format!("{} {}", b.name, Self::format_hours(b.total_hours)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn counts_row(label: String, counts: &AttendanceAllowanceCounts, bold: bool) -> Row {
        if bold {
            row![
                b -> label,
                br -> counts.requested,
                br -> counts.requested_high,
                br -> counts.receiving,
                br -> counts.receiving_high,
                br -> counts.receiving_high_and_requested_high
            ]
        } else {
            row![
                label,
                r -> counts.requested,
                r -> counts.requested_high,
                r -> counts.receiving,
                r -> counts.receiving_high,
                r -> counts.receiving_high_and_requested_high
            ]
        }
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }
}

impl OutputFormatter for TableFormatter {
    fn format_report(&self, title: &str, report: &Report) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Month",
            b -> "Hours",
            b -> "Services",
            b -> Self::dimension_title(report.variant)
        ]);

        for year in &report.years {
            for month in &year.months {
                table.add_row(row![
                    format!("{}-{:02}", year.year, month.month),
                    r -> Self::format_hours(month.tally.total_hours),
                    Self::format_services(&month.tally.services),
                    Self::format_dimensions(&month.tally.breakdown)
                ]);
            }
            table.add_row(row![
                b -> year.year,
                br -> Self::format_hours(year.tally.total_hours),
                Self::format_services(&year.tally.services),
                Self::format_dimensions(&year.tally.breakdown)
            ]);
            table.add_row(Row::new(vec![Cell::new(""); 4]));
        }

        table.add_row(row![
            b -> "TOTAL",
            br -> Self::format_hours(report.total_hours()),
            "",
            ""
        ]);

        format!("{title}\n{table}")
    }

    fn format_cross_section(&self, title: &str, section: &CrossSection) -> String {
        let mut services = Self::new_table();
        services.set_titles(row![b -> "Service", b -> "Weekly Hours"]);
        for service in section.tally.services.iter() {
            services.add_row(row![
                service.name,
                r -> Self::format_hours(service.total_hours)
            ]);
        }
        services.add_row(row![
            b -> "TOTAL",
            br -> Self::format_hours(section.tally.total_hours)
        ]);

        let mut dimensions = Self::new_table();
        dimensions.set_titles(row![
            b -> Self::dimension_title(section.variant),
            b -> "Weekly Hours",
            b -> "Services"
        ]);
        for bucket in section.tally.breakdown.iter() {
            dimensions.add_row(row![
                bucket.name,
                r -> Self::format_hours(bucket.total_hours),
                Self::format_services(&bucket.services)
            ]);
        }

        format!("{title} as of {}\n{services}\n{dimensions}", section.as_of)
    }

    fn format_attendance_report(
        &self,
        title: &str,
        report: &AttendanceAllowanceReport,
    ) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Month",
            b -> "Requested",
            b -> "Requested High",
            b -> "Receiving",
            b -> "Receiving High",
            b -> "High (Requested High)"
        ]);

        for year in &report.years {
            for month in &year.months {
                table.add_row(Self::counts_row(
                    format!("{}-{:02}", year.year, month.month),
                    &month.counts,
                    false,
                ));
            }
            table.add_row(Self::counts_row(year.year.to_string(), &year.counts, true));
        }

        format!("{title}\n{table}")
    }

    fn format_attendance_cross_section(
        &self,
        section: &AttendanceAllowanceCrossSection,
    ) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "",
            b -> "Requested",
            b -> "Requested High",
            b -> "Receiving",
            b -> "Receiving High",
            b -> "High (Requested High)"
        ]);
        table.add_row(Self::counts_row(
            "Open clients".to_string(),
            &section.overall,
            false,
        ));
        table.add_row(Self::counts_row(
            "Confirmed this month".to_string(),
            &section.this_month,
            false,
        ));

        format!("Attendance allowance as of {}\n{table}", section.as_of)
    }
}

/// Pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render(title: &str, key: &str, body: &impl Serialize) -> String {
        let output = json!({
            "title": title,
            key: body,
        });
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, title: &str, report: &Report) -> String {
        Self::render(title, "report", report)
    }

    fn format_cross_section(&self, title: &str, section: &CrossSection) -> String {
        Self::render(title, "crossSection", section)
    }

    fn format_attendance_report(
        &self,
        title: &str,
        report: &AttendanceAllowanceReport,
    ) -> String {
        Self::render(title, "report", report)
    }

    fn format_attendance_cross_section(
        &self,
        section: &AttendanceAllowanceCrossSection,
    ) -> String {
        Self::render("Attendance allowance", "crossSection", section)
    }
}

/// Pick a formatter for the `--json` flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
