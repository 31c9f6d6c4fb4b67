use std::collections::HashMap;

use crate::models::{CohortOverview, DepartmentSummary, RiskDistribution, RiskLevel, StudentRecord};

/// Counts students per risk bucket. Every bucket is present in the result,
/// so the three counts always sum to the cohort size.
pub fn risk_distribution(students: &[StudentRecord]) -> RiskDistribution {
    let mut distribution = RiskDistribution::default();
    for student in students {
        match student.risk_level {
            RiskLevel::Low => distribution.low += 1,
            RiskLevel::Medium => distribution.medium += 1,
            RiskLevel::High => distribution.high += 1,
        }
    }
    distribution
}

/// Groups the cohort by exact department name, in first-seen order. The
/// department set is whatever the data contains, not a fixed list.
pub fn department_stats(students: &[StudentRecord]) -> Vec<DepartmentSummary> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<DepartmentSummary> = Vec::new();

    for student in students {
        let index = *positions
            .entry(student.department.clone())
            .or_insert_with(|| {
                summaries.push(DepartmentSummary::new(&student.department));
                summaries.len() - 1
            });

        let summary = &mut summaries[index];
        summary.total += 1;
        match student.risk_level {
            RiskLevel::High => summary.high_risk += 1,
            RiskLevel::Medium => summary.medium_risk += 1,
            RiskLevel::Low => summary.low_risk += 1,
        }
    }

    summaries
}

/// Headline metrics for the dashboard summary. Average attendance is rounded
/// to the nearest whole percent and zero for an empty cohort.
pub fn cohort_overview(students: &[StudentRecord]) -> CohortOverview {
    let total_students = students.len();
    let average_attendance = if total_students == 0 {
        0
    } else {
        let sum: f64 = students.iter().map(|student| student.attendance).sum();
        (sum / total_students as f64).round() as u32
    };

    CohortOverview {
        total_students,
        average_attendance,
        with_backs: students
            .iter()
            .filter(|student| student.number_of_backs > 0)
            .count(),
        pending_fees: students
            .iter()
            .filter(|student| !student.fee_payment)
            .count(),
    }
}
