use crate::model::{
    Application, ApplicationStatus, Award, Scholarship, ScholarshipId, Student, StudentId,
};
use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::sql::SqlStore;

mod memory;
mod sql;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("cannot decode {table} row: {reason}")]
    Decode { table: &'static str, reason: String },

    #[error("duplicate {0}")]
    Duplicate(String),

    #[error("{0} not found")]
    NotFound(String),
}

/// Record storage for the `Students`, `Scholarships`, `Applications`,
/// `AssignedScholarships` and `AcceptedScholarships` tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Students with the given identifiers, by ascending identifier.
    /// Unknown identifiers are ignored.
    async fn students_by_id(&self, ids: &[StudentId]) -> Result<Vec<Student>, StoreError>;

    async fn scholarships(&self) -> Result<Vec<Scholarship>, StoreError>;

    /// Students holding a pending application for the scholarship.
    async fn pending_applicants(
        &self,
        scholarship: ScholarshipId,
    ) -> Result<Vec<StudentId>, StoreError>;

    async fn remaining_capacity(&self, scholarship: ScholarshipId) -> Result<u32, StoreError>;

    async fn set_capacity(
        &self,
        scholarship: ScholarshipId,
        capacity: u32,
    ) -> Result<(), StoreError>;

    async fn is_assigned(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<bool, StoreError>;

    /// Record an assignment, pending the student's acceptance.
    async fn insert_assignment(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<(), StoreError>;

    async fn set_application_status(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError>;

    /// Insert a pending application, failing with `StoreError::Duplicate`
    /// if the student already applied.
    async fn insert_application(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<(), StoreError>;

    /// Every application of the student, by ascending scholarship.
    async fn applications_of(&self, student: StudentId) -> Result<Vec<Application>, StoreError>;

    async fn assigned_scholarships(&self, student: StudentId) -> Result<Vec<Award>, StoreError>;

    async fn accepted_scholarships(&self, student: StudentId) -> Result<Vec<Award>, StoreError>;
}
