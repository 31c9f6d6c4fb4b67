use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::models::{RiskLevel, StudentRecord};

/// Loads the cohort for this invocation: a CSV or JSON dataset when a path
/// is given, the bundled sample cohort otherwise.
pub fn load_dataset(path: Option<&Path>) -> anyhow::Result<Vec<StudentRecord>> {
    let Some(path) = path else {
        return Ok(sample_students());
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        _ => anyhow::bail!(
            "unsupported dataset format for {}, expected a .csv or .json file",
            path.display()
        ),
    }
}

pub fn load_csv(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<String>,
        name: String,
        roll_no: String,
        email: String,
        phone: Option<String>,
        department: String,
        semester: u8,
        attendance: f64,
        grades: f64,
        number_of_backs: u32,
        fee_payment: String,
        risk_level: String,
        risk_score: f64,
        intervention_notes: Option<String>,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;
    let mut students = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2; // header is line 1
        let row = result.with_context(|| format!("invalid row at line {line} of {}", path.display()))?;

        let risk_level: RiskLevel = row
            .risk_level
            .parse()
            .with_context(|| format!("line {line} ({})", row.roll_no))?;
        let fee_payment = parse_fee_flag(&row.fee_payment)
            .with_context(|| format!("line {line} ({})", row.roll_no))?;

        let record = StudentRecord {
            id: row
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("import-{}", Uuid::new_v4())),
            name: row.name,
            roll_no: row.roll_no,
            email: row.email,
            phone: row.phone.unwrap_or_default(),
            department: row.department,
            semester: row.semester,
            attendance: row.attendance,
            grades: row.grades,
            number_of_backs: row.number_of_backs,
            fee_payment,
            risk_level,
            risk_score: row.risk_score,
            intervention_notes: split_notes(row.intervention_notes.as_deref()),
        };

        validate_record(&record).with_context(|| format!("line {line} ({})", record.roll_no))?;
        students.push(record);
    }

    Ok(students)
}

pub fn load_json(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let students: Vec<StudentRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid student dataset in {}", path.display()))?;

    for student in &students {
        validate_record(student).with_context(|| format!("record {}", student.roll_no))?;
    }

    Ok(students)
}

// Upload template allows Yes/No as well as True/False for the fee column.
fn parse_fee_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "paid" => Ok(true),
        "no" | "false" | "pending" => Ok(false),
        other => anyhow::bail!("unrecognized fee payment flag {other:?}"),
    }
}

fn split_notes(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|note| !note.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_record(student: &StudentRecord) -> anyhow::Result<()> {
    if !(0.0..=100.0).contains(&student.attendance) {
        anyhow::bail!("attendance {} outside 0-100", student.attendance);
    }
    if !(0.0..=10.0).contains(&student.grades) {
        anyhow::bail!("grades {} outside 0-10", student.grades);
    }
    if !(0.0..=1.0).contains(&student.risk_score) {
        anyhow::bail!("risk score {} outside 0-1", student.risk_score);
    }
    if student.semester == 0 {
        anyhow::bail!("semester must be at least 1");
    }
    Ok(())
}

/// The demo cohort shipped with the dashboard, used when no dataset is given.
pub fn sample_students() -> Vec<StudentRecord> {
    fn record(
        id: &str,
        name: &str,
        roll_no: &str,
        phone: &str,
        department: &str,
        semester: u8,
        attendance: f64,
        grades: f64,
        number_of_backs: u32,
        fee_payment: bool,
        risk_level: RiskLevel,
        risk_score: f64,
        notes: &[&str],
    ) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            email: format!(
                "{}@college.edu",
                name.to_lowercase().replace(' ', ".")
            ),
            phone: phone.to_string(),
            department: department.to_string(),
            semester,
            attendance,
            grades,
            number_of_backs,
            fee_payment,
            risk_level,
            risk_score,
            intervention_notes: notes.iter().map(|note| note.to_string()).collect(),
        }
    }

    vec![
        record(
            "1",
            "Aarav Sharma",
            "CSE001",
            "+91 98765 43210",
            "CSE",
            5,
            92.0,
            8.5,
            0,
            true,
            RiskLevel::Low,
            0.12,
            &[],
        ),
        record(
            "2",
            "Priya Patel",
            "CSE002",
            "+91 98765 43211",
            "CSE",
            5,
            68.0,
            6.2,
            1,
            false,
            RiskLevel::Medium,
            0.55,
            &["2026-07-20: Reminded about pending fees"],
        ),
        record(
            "3",
            "Rohit Singh",
            "CSE003",
            "+91 98765 43212",
            "CSE",
            5,
            45.0,
            4.8,
            3,
            false,
            RiskLevel::High,
            0.89,
            &[
                "2026-07-28: Called parents about attendance",
                "2026-08-10: Counselling session scheduled",
            ],
        ),
        record(
            "4",
            "Kavya Nair",
            "CSE004",
            "+91 98765 43213",
            "CSE",
            5,
            95.0,
            9.1,
            0,
            true,
            RiskLevel::Low,
            0.08,
            &[],
        ),
        record(
            "5",
            "Sneha Reddy",
            "ECE001",
            "+91 87654 32109",
            "ECE",
            3,
            88.0,
            7.9,
            0,
            true,
            RiskLevel::Low,
            0.18,
            &[],
        ),
        record(
            "6",
            "Deepak Joshi",
            "ECE002",
            "+91 87654 32110",
            "ECE",
            3,
            72.0,
            5.9,
            2,
            false,
            RiskLevel::High,
            0.81,
            &["2026-08-05: Extra tutorials recommended"],
        ),
        record(
            "7",
            "Ananya Iyer",
            "ME001",
            "+91 76543 21098",
            "ME",
            7,
            79.0,
            7.1,
            0,
            true,
            RiskLevel::Medium,
            0.42,
            &[],
        ),
        record(
            "8",
            "Akash Verma",
            "ME002",
            "+91 76543 21099",
            "ME",
            7,
            58.0,
            5.2,
            2,
            false,
            RiskLevel::High,
            0.77,
            &[],
        ),
    ]
}
