use std::fmt::Write;

use chrono::Utc;

use crate::models::{RiskLevel, StudentRecord};
use crate::risk;

/// One export row: column name to formatted value, in column order.
pub type ReportRow = Vec<(&'static str, String)>;

pub const RISK_ANALYSIS: &str = "risk-analysis";
pub const HIGH_RISK: &str = "high-risk";
pub const ATTENDANCE: &str = "attendance";

/// Attendance below this percentage counts as inadequate.
const ATTENDANCE_REQUIREMENT: f64 = 75.0;

fn percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

fn score_percent(score: f64) -> String {
    format!("{}%", (score * 100.0).round() as i64)
}

fn notes_field(student: &StudentRecord) -> String {
    if student.intervention_notes.is_empty() {
        "None".to_string()
    } else {
        student.intervention_notes.join("; ")
    }
}

/// Projects the cohort into rows for the requested report type, optionally
/// scoped to one department first. An unrecognized report type falls back to
/// dumping every record field as-is rather than failing.
pub fn report_rows(
    students: &[StudentRecord],
    report_type: &str,
    department: Option<&str>,
) -> Vec<ReportRow> {
    let scoped: Vec<&StudentRecord> = students
        .iter()
        .filter(|student| department.map_or(true, |name| student.department == name))
        .collect();

    match report_type {
        RISK_ANALYSIS => scoped.iter().map(|s| risk_analysis_row(s)).collect(),
        HIGH_RISK => scoped
            .iter()
            .filter(|student| student.risk_level == RiskLevel::High)
            .map(|s| high_risk_row(s))
            .collect(),
        ATTENDANCE => scoped.iter().map(|s| attendance_row(s)).collect(),
        _ => scoped.iter().map(|s| record_row(s)).collect(),
    }
}

fn risk_analysis_row(student: &StudentRecord) -> ReportRow {
    vec![
        ("Name", student.name.clone()),
        ("Roll No", student.roll_no.clone()),
        ("Department", student.department.clone()),
        ("Risk Level", student.risk_level.to_string()),
        ("Risk Score", score_percent(student.risk_score)),
        ("Attendance", percent(student.attendance)),
        ("Grades", student.grades.to_string()),
        ("Subject Backs", student.number_of_backs.to_string()),
        ("Fee Status", student.fee_status().to_string()),
    ]
}

fn high_risk_row(student: &StudentRecord) -> ReportRow {
    vec![
        ("Name", student.name.clone()),
        ("Roll No", student.roll_no.clone()),
        ("Department", student.department.clone()),
        ("Email", student.email.clone()),
        ("Risk Level", student.risk_level.to_string()),
        ("Risk Score", score_percent(student.risk_score)),
        ("Attendance", percent(student.attendance)),
        ("Grades", student.grades.to_string()),
        ("Subject Backs", student.number_of_backs.to_string()),
        ("Fee Status", student.fee_status().to_string()),
        ("Intervention Notes", notes_field(student)),
    ]
}

fn attendance_row(student: &StudentRecord) -> ReportRow {
    let status = if student.attendance >= ATTENDANCE_REQUIREMENT {
        "Adequate"
    } else {
        "Below Requirement"
    };

    vec![
        ("Name", student.name.clone()),
        ("Roll No", student.roll_no.clone()),
        ("Department", student.department.clone()),
        ("Attendance", percent(student.attendance)),
        ("Attendance Status", status.to_string()),
    ]
}

// Fallback projection: every stored field, unformatted, under its dataset
// field name.
fn record_row(student: &StudentRecord) -> ReportRow {
    vec![
        ("id", student.id.clone()),
        ("name", student.name.clone()),
        ("rollNo", student.roll_no.clone()),
        ("email", student.email.clone()),
        ("phone", student.phone.clone()),
        ("department", student.department.clone()),
        ("semester", student.semester.to_string()),
        ("attendance", student.attendance.to_string()),
        ("grades", student.grades.to_string()),
        ("numberOfBacks", student.number_of_backs.to_string()),
        ("feePayment", student.fee_payment.to_string()),
        ("riskLevel", student.risk_level.to_string()),
        ("riskScore", student.risk_score.to_string()),
        ("interventionNotes", student.intervention_notes.join("; ")),
    ]
}

/// Serializes rows as CSV: a header from the first row's column order, then
/// every value double-quoted. Embedded quotes are doubled so quoted fields
/// survive commas and line breaks; empty input yields an empty string.
pub fn to_csv(rows: &[ReportRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let header = first
        .iter()
        .map(|(column, _)| *column)
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![header];
    for row in rows {
        let line = row
            .iter()
            .map(|(_, value)| format!("\"{}\"", value.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Download name convention: `<report-type>-report-<ISO date>.csv`.
pub fn report_filename(report_type: &str) -> String {
    format!("{report_type}-report-{}.csv", Utc::now().date_naive())
}

/// Plain-text cohort summary for the dashboard view.
pub fn build_summary(students: &[StudentRecord]) -> String {
    let overview = risk::cohort_overview(students);
    let distribution = risk::risk_distribution(students);
    let departments = risk::department_stats(students);

    let mut output = String::new();
    let _ = writeln!(output, "# ASTITVA Cohort Summary");
    let _ = writeln!(output, "Generated on {}", Utc::now().date_naive());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Total students: {}", overview.total_students);
    let _ = writeln!(
        output,
        "- Average attendance: {}%",
        overview.average_attendance
    );
    let _ = writeln!(
        output,
        "- Students with subject backs: {}",
        overview.with_backs
    );
    let _ = writeln!(output, "- Pending fee payments: {}", overview.pending_fees);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Distribution");
    let _ = writeln!(output, "- High: {}", distribution.high);
    let _ = writeln!(output, "- Medium: {}", distribution.medium);
    let _ = writeln!(output, "- Low: {}", distribution.low);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Departments");
    if departments.is_empty() {
        let _ = writeln!(output, "No students loaded.");
    } else {
        for summary in &departments {
            let _ = writeln!(
                output,
                "- {}: {} students ({} high, {} medium, {} low)",
                summary.department,
                summary.total,
                summary.high_risk,
                summary.medium_risk,
                summary.low_risk
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## High Risk Students");
    let high_risk: Vec<&StudentRecord> = students
        .iter()
        .filter(|student| student.risk_level == RiskLevel::High)
        .collect();
    if high_risk.is_empty() {
        let _ = writeln!(output, "No students currently classified as high risk.");
    } else {
        for student in high_risk {
            let _ = writeln!(
                output,
                "- {} ({}, {}) score {}. {}",
                student.name,
                student.roll_no,
                student.department,
                score_percent(student.risk_score),
                student.risk_explanation()
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(
        name: &str,
        roll_no: &str,
        department: &str,
        attendance: f64,
        risk_level: RiskLevel,
    ) -> StudentRecord {
        StudentRecord {
            id: roll_no.to_string(),
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            email: format!("{}@college.edu", roll_no.to_lowercase()),
            phone: "+91 90000 00000".to_string(),
            department: department.to_string(),
            semester: 5,
            attendance,
            grades: 6.5,
            number_of_backs: 2,
            fee_payment: false,
            risk_level,
            risk_score: 0.87,
            intervention_notes: Vec::new(),
        }
    }

    fn columns(row: &ReportRow) -> Vec<&'static str> {
        row.iter().map(|(column, _)| *column).collect()
    }

    #[test]
    fn risk_analysis_rows_cover_all_students_with_fixed_columns() {
        let students = vec![
            student("Rohit Singh", "CSE003", "CSE", 45.0, RiskLevel::High),
            student("Sneha Reddy", "ECE001", "ECE", 88.0, RiskLevel::Low),
        ];

        let rows = report_rows(&students, RISK_ANALYSIS, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            columns(&rows[0]),
            vec![
                "Name",
                "Roll No",
                "Department",
                "Risk Level",
                "Risk Score",
                "Attendance",
                "Grades",
                "Subject Backs",
                "Fee Status"
            ]
        );
        // 0.87 rounds to 87%
        assert!(rows[0].contains(&("Risk Score", "87%".to_string())));
        assert!(rows[0].contains(&("Fee Status", "Pending".to_string())));
    }

    #[test]
    fn high_risk_report_keeps_only_high_risk_students() {
        let students = vec![
            student("Rohit Singh", "CSE003", "CSE", 45.0, RiskLevel::High),
            student("Sneha Reddy", "ECE001", "ECE", 88.0, RiskLevel::Low),
        ];

        let rows = report_rows(&students, HIGH_RISK, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            columns(&rows[0]),
            vec![
                "Name",
                "Roll No",
                "Department",
                "Email",
                "Risk Level",
                "Risk Score",
                "Attendance",
                "Grades",
                "Subject Backs",
                "Fee Status",
                "Intervention Notes"
            ]
        );
        assert!(rows[0].contains(&("Intervention Notes", "None".to_string())));
    }

    #[test]
    fn high_risk_report_joins_notes_with_semicolons() {
        let mut flagged = student("Rohit Singh", "CSE003", "CSE", 45.0, RiskLevel::High);
        flagged.intervention_notes = vec![
            "2026-08-01: Called parents".to_string(),
            "2026-08-12: Counselling scheduled".to_string(),
        ];

        let rows = report_rows(&[flagged], HIGH_RISK, None);
        assert!(rows[0].contains(&(
            "Intervention Notes",
            "2026-08-01: Called parents; 2026-08-12: Counselling scheduled".to_string()
        )));
    }

    #[test]
    fn attendance_status_boundary_is_inclusive_at_75() {
        let students = vec![
            student("Priya Patel", "CSE002", "CSE", 74.0, RiskLevel::Medium),
            student("Aarav Sharma", "CSE001", "CSE", 75.0, RiskLevel::Low),
        ];

        let rows = report_rows(&students, ATTENDANCE, None);
        assert_eq!(
            columns(&rows[0]),
            vec!["Name", "Roll No", "Department", "Attendance", "Attendance Status"]
        );
        assert!(rows[0].contains(&("Attendance Status", "Below Requirement".to_string())));
        assert!(rows[1].contains(&("Attendance Status", "Adequate".to_string())));
    }

    #[test]
    fn department_scope_applies_before_projection() {
        let students = vec![
            student("Rohit Singh", "CSE003", "CSE", 45.0, RiskLevel::High),
            student("Akash Verma", "ME002", "ME", 58.0, RiskLevel::High),
        ];

        let rows = report_rows(&students, RISK_ANALYSIS, Some("ME"));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains(&("Name", "Akash Verma".to_string())));
    }

    #[test]
    fn unknown_report_type_dumps_records_verbatim() {
        let students = vec![student("Rohit Singh", "CSE003", "CSE", 45.0, RiskLevel::High)];

        let rows = report_rows(&students, "academic", None);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            columns(&rows[0]),
            vec![
                "id",
                "name",
                "rollNo",
                "email",
                "phone",
                "department",
                "semester",
                "attendance",
                "grades",
                "numberOfBacks",
                "feePayment",
                "riskLevel",
                "riskScore",
                "interventionNotes"
            ]
        );
        assert!(rows[0].contains(&("riskScore", "0.87".to_string())));
        assert!(rows[0].contains(&("feePayment", "false".to_string())));
    }

    #[test]
    fn csv_output_matches_expected_layout() {
        let rows = vec![
            vec![("Name", "A".to_string()), ("Risk Level", "High".to_string())],
            vec![("Name", "B".to_string()), ("Risk Level", "Low".to_string())],
        ];

        assert_eq!(to_csv(&rows), "Name,Risk Level\n\"A\",\"High\"\n\"B\",\"Low\"");
    }

    #[test]
    fn csv_of_no_rows_is_empty() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let rows = vec![vec![("Name", "Rohit \"Ro\" Singh".to_string())]];
        assert_eq!(to_csv(&rows), "Name\n\"Rohit \"\"Ro\"\" Singh\"");
    }

    #[test]
    fn filename_follows_download_convention() {
        let name = report_filename(HIGH_RISK);
        assert!(name.starts_with("high-risk-report-"));
        assert!(name.ends_with(".csv"));
        assert_eq!(
            name,
            format!("high-risk-report-{}.csv", Utc::now().date_naive())
        );
    }

    #[test]
    fn summary_mentions_high_risk_students_with_explanations() {
        let students = vec![
            student("Rohit Singh", "CSE003", "CSE", 45.0, RiskLevel::High),
            student("Sneha Reddy", "ECE001", "ECE", 88.0, RiskLevel::Low),
        ];

        let summary = build_summary(&students);
        assert!(summary.contains("Total students: 2"));
        assert!(summary.contains("- High: 1"));
        assert!(summary.contains("CSE: 1 students (1 high, 0 medium, 0 low)"));
        assert!(summary.contains("Rohit Singh (CSE003, CSE) score 87%."));
        assert!(summary.contains("low attendance (45%)"));
    }

    #[test]
    fn summary_of_empty_cohort_reads_cleanly() {
        let summary = build_summary(&[]);
        assert!(summary.contains("Total students: 0"));
        assert!(summary.contains("No students loaded."));
        assert!(summary.contains("No students currently classified as high risk."));
    }
}
