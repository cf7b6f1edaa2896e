use super::{RecordStore, StoreError};
use crate::model::{
    Application, ApplicationStatus, Award, Scholarship, ScholarshipId, Student, StudentId,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    students: Vec<Student>,
    scholarships: Vec<Scholarship>,
    applications: Vec<Application>,
    assigned: Vec<(StudentId, ScholarshipId)>,
    accepted: Vec<(StudentId, ScholarshipId)>,
}

impl Tables {
    fn scholarship_mut(&mut self, id: ScholarshipId) -> Result<&mut Scholarship, StoreError> {
        self.scholarships
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("scholarship {id}")))
    }

    fn awards(&self, pairs: &[(StudentId, ScholarshipId)], student: StudentId) -> Vec<Award> {
        pairs
            .iter()
            .filter(|&&(s, _)| s == student)
            .filter_map(|&(s, p)| {
                self.scholarships.iter().find(|x| x.id == p).map(|x| Award {
                    student: s,
                    scholarship: p,
                    scholarship_name: x.name.clone(),
                })
            })
            .collect()
    }
}

/// In-memory record store, with the same semantics as the SQL tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new(mut students: Vec<Student>, scholarships: Vec<Scholarship>) -> Self {
        students.sort_by_key(|s| s.id);
        Self {
            tables: RwLock::new(Tables {
                students,
                scholarships,
                ..Tables::default()
            }),
        }
    }

    pub fn with_applications<I>(mut self, applications: I) -> Self
    where
        I: IntoIterator<Item = (StudentId, ScholarshipId, ApplicationStatus)>,
    {
        self.tables
            .get_mut()
            .applications
            .extend(
                applications
                    .into_iter()
                    .map(|(student, scholarship, status)| Application {
                        student,
                        scholarship,
                        status,
                    }),
            );
        self
    }

    pub fn with_assignments<I>(mut self, assigned: I) -> Self
    where
        I: IntoIterator<Item = (StudentId, ScholarshipId)>,
    {
        self.tables.get_mut().assigned.extend(assigned);
        self
    }

    pub fn with_accepted<I>(mut self, accepted: I) -> Self
    where
        I: IntoIterator<Item = (StudentId, ScholarshipId)>,
    {
        self.tables.get_mut().accepted.extend(accepted);
        self
    }

    pub async fn applications(&self) -> Vec<Application> {
        self.tables.read().await.applications.clone()
    }

    pub async fn assignments(&self) -> Vec<(StudentId, ScholarshipId)> {
        self.tables.read().await.assigned.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn students_by_id(&self, ids: &[StudentId]) -> Result<Vec<Student>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .students
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn scholarships(&self) -> Result<Vec<Scholarship>, StoreError> {
        Ok(self.tables.read().await.scholarships.clone())
    }

    async fn pending_applicants(
        &self,
        scholarship: ScholarshipId,
    ) -> Result<Vec<StudentId>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .applications
            .iter()
            .filter(|a| a.scholarship == scholarship && a.status == ApplicationStatus::Pending)
            .map(|a| a.student)
            .collect())
    }

    async fn remaining_capacity(&self, scholarship: ScholarshipId) -> Result<u32, StoreError> {
        self.tables
            .read()
            .await
            .scholarships
            .iter()
            .find(|s| s.id == scholarship)
            .map(|s| s.capacity)
            .ok_or_else(|| StoreError::NotFound(format!("scholarship {scholarship}")))
    }

    async fn set_capacity(
        &self,
        scholarship: ScholarshipId,
        capacity: u32,
    ) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .scholarship_mut(scholarship)?
            .capacity = capacity;
        Ok(())
    }

    async fn is_assigned(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .assigned
            .contains(&(student, scholarship)))
    }

    async fn insert_assignment(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.assigned.contains(&(student, scholarship)) {
            return Err(StoreError::Duplicate(format!(
                "assignment of scholarship {scholarship} to student {student}"
            )));
        }
        tables.assigned.push((student, scholarship));
        Ok(())
    }

    async fn set_application_status(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        for application in &mut self.tables.write().await.applications {
            if application.student == student && application.scholarship == scholarship {
                application.status = status;
            }
        }
        Ok(())
    }

    async fn insert_application(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .applications
            .iter()
            .any(|a| a.student == student && a.scholarship == scholarship)
        {
            return Err(StoreError::Duplicate(format!(
                "application of student {student} for scholarship {scholarship}"
            )));
        }
        tables.applications.push(Application {
            student,
            scholarship,
            status: ApplicationStatus::Pending,
        });
        Ok(())
    }

    async fn applications_of(&self, student: StudentId) -> Result<Vec<Application>, StoreError> {
        let mut applications = self
            .tables
            .read()
            .await
            .applications
            .iter()
            .filter(|a| a.student == student)
            .cloned()
            .collect::<Vec<_>>();
        applications.sort_by_key(|a| a.scholarship);
        Ok(applications)
    }

    async fn assigned_scholarships(&self, student: StudentId) -> Result<Vec<Award>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.awards(&tables.assigned, student))
    }

    async fn accepted_scholarships(&self, student: StudentId) -> Result<Vec<Award>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.awards(&tables.accepted, student))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, SortingCriterion};

    fn store() -> MemoryStore {
        let students = (1..=3)
            .rev()
            .map(|id| Student {
                id: StudentId(id),
                rank: id * 10,
                category: CategoryId(1),
                income: 1000.0,
                marks_12th: 70.0,
            })
            .collect();
        let scholarships = vec![Scholarship {
            id: ScholarshipId(7),
            name: "Need-based".into(),
            min_rank: None,
            category: None,
            max_income: Some(5000.0),
            min_marks: None,
            sorting: SortingCriterion::IncomeAscending,
            capacity: 2,
        }];
        MemoryStore::new(students, scholarships)
    }

    #[tokio::test]
    async fn test_students_are_ordered() {
        let store = store();
        let ids = store
            .students_by_id(&[StudentId(3), StudentId(1), StudentId(9)])
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![StudentId(1), StudentId(3)]);
    }

    #[tokio::test]
    async fn test_duplicate_application() {
        let store = store();
        store
            .insert_application(StudentId(1), ScholarshipId(7))
            .await
            .unwrap();
        assert!(matches!(
            store
                .insert_application(StudentId(1), ScholarshipId(7))
                .await,
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(
            store.pending_applicants(ScholarshipId(7)).await.unwrap(),
            vec![StudentId(1)]
        );
    }

    #[tokio::test]
    async fn test_applications_of() {
        let store = store().with_applications([
            (StudentId(2), ScholarshipId(9), ApplicationStatus::Rejected),
            (StudentId(1), ScholarshipId(7), ApplicationStatus::Pending),
            (StudentId(2), ScholarshipId(7), ApplicationStatus::Assigned),
        ]);
        let applications = store.applications_of(StudentId(2)).await.unwrap();
        assert_eq!(
            applications
                .iter()
                .map(|a| (a.scholarship.0, a.status))
                .collect::<Vec<_>>(),
            vec![(7, ApplicationStatus::Assigned), (9, ApplicationStatus::Rejected)]
        );
        assert!(store.applications_of(StudentId(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_scholarship_capacity() {
        assert!(matches!(
            store().remaining_capacity(ScholarshipId(8)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_awards_carry_names() {
        let store = store()
            .with_assignments([(StudentId(2), ScholarshipId(7))])
            .with_accepted([(StudentId(3), ScholarshipId(7))]);
        let assigned = store.assigned_scholarships(StudentId(2)).await.unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].scholarship_name, "Need-based");
        assert!(
            store
                .accepted_scholarships(StudentId(2))
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            store.accepted_scholarships(StudentId(3)).await.unwrap()[0].scholarship,
            ScholarshipId(7)
        );
    }
}
