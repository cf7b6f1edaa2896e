use super::Student;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ScholarshipId(pub i64);

impl fmt::Display for ScholarshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CategoryId(pub i64);

/// Order in which eligible applicants get served.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortingCriterion {
    RankAscending,
    IncomeAscending,
    /// Applicants keep the order in which the store returned them.
    #[default]
    Unspecified,
}

impl SortingCriterion {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Self::RankAscending,
            Some(2) => Self::IncomeAscending,
            _ => Self::Unspecified,
        }
    }

    /// Stable sort, so that ties keep their incoming order.
    pub fn sort(self, students: &mut [Student]) {
        match self {
            Self::RankAscending => students.sort_by_key(|s| s.rank),
            Self::IncomeAscending => students.sort_by(|a, b| a.income.total_cmp(&b.income)),
            Self::Unspecified => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scholarship {
    pub id: ScholarshipId,
    pub name: String,
    /// Worst (numerically highest) rank still accepted.
    pub min_rank: Option<i64>,
    pub category: Option<CategoryId>,
    pub max_income: Option<f64>,
    pub min_marks: Option<f64>,
    pub sorting: SortingCriterion,
    pub capacity: u32,
}

impl Scholarship {
    pub fn has_criteria(&self) -> bool {
        self.min_rank.is_some()
            || self.category.is_some()
            || self.max_income.is_some()
            || self.min_marks.is_some()
    }
}

impl fmt::Display for Scholarship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentId;

    fn student(id: i64, rank: i64, income: f64) -> Student {
        Student {
            id: StudentId(id),
            rank,
            category: CategoryId(1),
            income,
            marks_12th: 80.0,
        }
    }

    fn ids(students: &[Student]) -> Vec<i64> {
        students.iter().map(|s| s.id.0).collect()
    }

    #[test]
    fn test_criterion_codes() {
        assert_eq!(
            SortingCriterion::from_code(Some(1)),
            SortingCriterion::RankAscending
        );
        assert_eq!(
            SortingCriterion::from_code(Some(2)),
            SortingCriterion::IncomeAscending
        );
        assert_eq!(
            SortingCriterion::from_code(Some(7)),
            SortingCriterion::Unspecified
        );
        assert_eq!(
            SortingCriterion::from_code(None),
            SortingCriterion::Unspecified
        );
    }

    #[test]
    fn test_sort() {
        let students = vec![
            student(1, 30, 5000.0),
            student(2, 10, 9000.0),
            student(3, 10, 1000.0),
            student(4, 20, 1000.0),
        ];
        let mut by_rank = students.clone();
        SortingCriterion::RankAscending.sort(&mut by_rank);
        assert_eq!(ids(&by_rank), vec![2, 3, 4, 1]);
        let mut by_income = students.clone();
        SortingCriterion::IncomeAscending.sort(&mut by_income);
        assert_eq!(ids(&by_income), vec![3, 4, 1, 2]);
        let mut untouched = students.clone();
        SortingCriterion::Unspecified.sort(&mut untouched);
        assert_eq!(ids(&untouched), vec![1, 2, 3, 4]);
    }
}
