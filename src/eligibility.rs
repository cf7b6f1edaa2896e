use crate::model::{Scholarship, Student};
use std::fmt;

/// A scholarship condition a student can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Condition {
    Rank,
    Category,
    Income,
    Marks,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rank => "rank",
            Self::Category => "category",
            Self::Income => "income",
            Self::Marks => "marks",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Eligible,
    /// At least one configured condition failed.
    Failed(Vec<Condition>),
    /// The scholarship does not configure any condition.
    NoCriteria,
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligible => f.write_str("eligible"),
            Self::NoCriteria => f.write_str("no criteria configured"),
            Self::Failed(conditions) => {
                f.write_str("failed ")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
        }
    }
}

/// Check every condition configured on the scholarship. Absent fields
/// are not checked.
pub fn check(student: &Student, scholarship: &Scholarship) -> Verdict {
    if !scholarship.has_criteria() {
        return Verdict::NoCriteria;
    }
    let mut failed = Vec::new();
    if scholarship.min_rank.is_some_and(|r| student.rank > r) {
        failed.push(Condition::Rank);
    }
    if scholarship.category.is_some_and(|c| student.category != c) {
        failed.push(Condition::Category);
    }
    if scholarship.max_income.is_some_and(|i| student.income > i) {
        failed.push(Condition::Income);
    }
    if scholarship.min_marks.is_some_and(|m| student.marks_12th < m) {
        failed.push(Condition::Marks);
    }
    if failed.is_empty() {
        Verdict::Eligible
    } else {
        Verdict::Failed(failed)
    }
}

pub fn is_eligible(student: &Student, scholarship: &Scholarship) -> bool {
    check(student, scholarship).is_eligible()
}

pub fn eligible_scholarships<'a>(
    student: &Student,
    scholarships: &'a [Scholarship],
) -> Vec<&'a Scholarship> {
    scholarships
        .iter()
        .filter(|s| is_eligible(student, s))
        .collect()
}
