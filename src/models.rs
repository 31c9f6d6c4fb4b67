use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Dropout risk classification carried on every record. Levels are assigned
/// upstream by the prediction pipeline; this crate only aggregates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => anyhow::bail!("unknown risk level {other:?}, expected Low, Medium or High"),
        }
    }
}

/// One student in the loaded cohort. Field names follow the upload template:
/// attendance is a percentage in [0, 100], grades a score in [0, 10] and
/// `risk_score` the model probability in [0, 1] behind `risk_level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub roll_no: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub semester: u8,
    pub attendance: f64,
    pub grades: f64,
    pub number_of_backs: u32,
    pub fee_payment: bool,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    #[serde(default)]
    pub intervention_notes: Vec<String>,
}

impl StudentRecord {
    pub fn fee_status(&self) -> &'static str {
        if self.fee_payment {
            "Paid"
        } else {
            "Pending"
        }
    }

    /// Returns a copy with a dated note appended. Records are values; the
    /// caller decides whether the copy replaces the stored one.
    pub fn with_note(&self, text: &str) -> StudentRecord {
        let mut updated = self.clone();
        updated
            .intervention_notes
            .push(format!("{}: {}", Utc::now().date_naive(), text.trim()));
        updated
    }

    /// Individual risk factors behind the classification, in the order the
    /// advisory staff reviews them.
    pub fn risk_factors(&self) -> Vec<String> {
        let mut factors = Vec::new();
        if self.attendance < 75.0 {
            factors.push(format!("low attendance ({}%)", self.attendance));
        }
        if self.grades < 6.0 {
            factors.push(format!("poor grades ({}/10)", self.grades));
        }
        if self.number_of_backs > 0 {
            factors.push(format!("{} subject backs", self.number_of_backs));
        }
        if !self.fee_payment {
            factors.push("pending fee payment".to_string());
        }
        factors
    }

    pub fn risk_explanation(&self) -> String {
        let factors = self.risk_factors();
        if factors.is_empty() {
            "Good academic performance with no major risk factors.".to_string()
        } else {
            format!("Risk factors: {}.", factors.join(", "))
        }
    }
}

/// Counts per risk bucket across a cohort. Always carries all three buckets;
/// buckets without members stay at zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Per-department risk breakdown. The three risk counts sum to `total`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSummary {
    pub department: String,
    pub total: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
}

impl DepartmentSummary {
    pub fn new(department: &str) -> Self {
        DepartmentSummary {
            department: department.to_string(),
            total: 0,
            high_risk: 0,
            medium_risk: 0,
            low_risk: 0,
        }
    }
}

/// Headline cohort metrics for the summary view.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortOverview {
    pub total_students: usize,
    pub average_attendance: u32,
    pub with_backs: usize,
    pub pending_fees: usize,
}
