use crate::eligibility;
use crate::model::{Scholarship, ScholarshipId, Student, StudentId};
use crate::store::{RecordStore, StoreError};
use eyre::{Result, WrapErr, bail, eyre};
use tracing::info;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
}

async fn find_student<S: RecordStore>(store: &S, student: StudentId) -> Result<Student> {
    store
        .students_by_id(&[student])
        .await
        .wrap_err("cannot load student")?
        .pop()
        .ok_or_else(|| eyre!("unknown student {student}"))
}

/// Scholarships the student is eligible for, in store order.
pub async fn eligible_for<S: RecordStore>(
    store: &S,
    student: StudentId,
) -> Result<(Student, Vec<Scholarship>)> {
    let student = find_student(store, student).await?;
    let scholarships = store
        .scholarships()
        .await
        .wrap_err("cannot load scholarships")?;
    let eligible = eligibility::eligible_scholarships(&student, &scholarships)
        .into_iter()
        .cloned()
        .collect();
    Ok((student, eligible))
}

/// Record a pending application. Ineligible students cannot apply.
pub async fn apply<S: RecordStore>(
    store: &S,
    student: StudentId,
    scholarship: ScholarshipId,
) -> Result<ApplyOutcome> {
    let record = find_student(store, student).await?;
    let target = store
        .scholarships()
        .await
        .wrap_err("cannot load scholarships")?
        .into_iter()
        .find(|s| s.id == scholarship)
        .ok_or_else(|| eyre!("unknown scholarship {scholarship}"))?;
    let verdict = eligibility::check(&record, &target);
    if !verdict.is_eligible() {
        bail!("student {student} cannot apply for {target}: {verdict}");
    }
    match store.insert_application(student, scholarship).await {
        Ok(()) => {
            info!(%student, scholarship = %target, "Application recorded");
            Ok(ApplyOutcome::Applied)
        }
        Err(StoreError::Duplicate(_)) => Ok(ApplyOutcome::AlreadyApplied),
        Err(e) => Err(e).wrap_err("cannot record application"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApplicationStatus, CategoryId, SortingCriterion};
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        let student = Student {
            id: StudentId(1),
            rank: 300,
            category: CategoryId(4),
            income: 25_000.0,
            marks_12th: 82.0,
        };
        let scholarship = |id, min_rank| Scholarship {
            id: ScholarshipId(id),
            name: format!("Rank {min_rank}"),
            min_rank: Some(min_rank),
            category: Some(CategoryId(4)),
            max_income: None,
            min_marks: None,
            sorting: SortingCriterion::RankAscending,
            capacity: 1,
        };
        MemoryStore::new(
            vec![student],
            vec![scholarship(1, 100), scholarship(2, 500), scholarship(3, 1000)],
        )
    }

    #[tokio::test]
    async fn test_eligible_for() {
        let (student, eligible) = eligible_for(&store(), StudentId(1)).await.unwrap();
        assert_eq!(student.id, StudentId(1));
        assert_eq!(
            eligible.iter().map(|s| s.id.0).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(eligible_for(&store(), StudentId(2)).await.is_err());
    }

    #[tokio::test]
    async fn test_apply() {
        let store = store();
        assert_eq!(
            apply(&store, StudentId(1), ScholarshipId(2)).await.unwrap(),
            ApplyOutcome::Applied
        );
        assert_eq!(
            apply(&store, StudentId(1), ScholarshipId(2)).await.unwrap(),
            ApplyOutcome::AlreadyApplied
        );
        assert_eq!(
            store.applications().await[0].status,
            ApplicationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_apply_refused() {
        let store = store();
        assert!(apply(&store, StudentId(1), ScholarshipId(1)).await.is_err());
        assert!(apply(&store, StudentId(1), ScholarshipId(9)).await.is_err());
        assert!(store.applications().await.is_empty());
    }
}
