use crate::models::{RiskLevel, StudentRecord};

/// Conjunction of the three list filters: free-text search, risk level and
/// department. `None` means "All" for the two exact-match filters and an
/// empty query matches every record.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub query: String,
    pub risk: Option<RiskLevel>,
    pub department: Option<String>,
}

impl StudentFilter {
    pub fn matches(&self, student: &StudentRecord) -> bool {
        let query = self.query.to_lowercase();
        let matches_query = query.is_empty()
            || student.name.to_lowercase().contains(&query)
            || student.roll_no.to_lowercase().contains(&query)
            || student.email.to_lowercase().contains(&query);

        let matches_risk = self
            .risk
            .map_or(true, |level| student.risk_level == level);
        let matches_department = self
            .department
            .as_deref()
            .map_or(true, |department| student.department == department);

        matches_query && matches_risk && matches_department
    }

    /// Stable filter: survivors keep their relative order from the input.
    pub fn apply<'a>(&self, students: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        students
            .iter()
            .filter(|student| self.matches(student))
            .collect()
    }
}
