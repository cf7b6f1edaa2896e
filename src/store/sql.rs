use super::{RecordStore, StoreError};
use crate::model::{
    Application, ApplicationStatus, Award, CategoryId, Scholarship, ScholarshipId,
    SortingCriterion, Student, StudentId,
};
use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{Any, AnyPool, Decode, Row, Type};
use tracing::trace;

const STUDENT_COLUMNS: &str = "student_id, `rank`, category_id, income, marks_12th";

/// Identifiers bound in a single `IN (...)` lookup, below every driver's
/// bind-parameter limit (999 for older SQLite builds).
const IDS_PER_QUERY: usize = 500;

/// Record store backed by a SQL database reached through `sqlx`'s `Any` driver.
pub struct SqlStore {
    pool: AnyPool,
}

impl SqlStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn awards(&self, table: &str, student: StudentId) -> Result<Vec<Award>, StoreError> {
        let query = format!(
            "SELECT a.student_id, a.scholarship_id, s.scholarship_name FROM {table} a \
             JOIN Scholarships s ON s.scholarship_id = a.scholarship_id \
             WHERE a.student_id = ? ORDER BY a.scholarship_id"
        );
        sqlx::query(&query)
            .bind(student.0)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?
            .iter()
            .map(|row| {
                Ok(Award {
                    student: StudentId(get(row, "awards", "student_id")?),
                    scholarship: ScholarshipId(get(row, "awards", "scholarship_id")?),
                    scholarship_name: get(row, "awards", "scholarship_name")?,
                })
            })
            .collect()
    }
}

fn query_error(e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Duplicate(db.message().to_owned()),
        _ => StoreError::Query(e.to_string()),
    }
}

fn get<'r, T>(row: &'r AnyRow, table: &'static str, column: &str) -> Result<T, StoreError>
where
    T: Decode<'r, Any> + Type<Any>,
{
    row.try_get(column).map_err(|e| StoreError::Decode {
        table,
        reason: e.to_string(),
    })
}

fn decode_student(row: &AnyRow) -> Result<Student, StoreError> {
    Ok(Student {
        id: StudentId(get(row, "Students", "student_id")?),
        rank: get(row, "Students", "rank")?,
        category: CategoryId(get(row, "Students", "category_id")?),
        income: get(row, "Students", "income")?,
        marks_12th: get(row, "Students", "marks_12th")?,
    })
}

fn decode_scholarship(row: &AnyRow) -> Result<Scholarship, StoreError> {
    Ok(Scholarship {
        id: ScholarshipId(get(row, "Scholarships", "scholarship_id")?),
        name: get(row, "Scholarships", "scholarship_name")?,
        min_rank: get(row, "Scholarships", "min_rank")?,
        category: get::<Option<i64>>(row, "Scholarships", "category_req")?.map(CategoryId),
        max_income: get(row, "Scholarships", "max_income")?,
        min_marks: get(row, "Scholarships", "min_marks")?,
        sorting: SortingCriterion::from_code(get(row, "Scholarships", "sorting_criteria")?),
        capacity: clamp_capacity(get(row, "Scholarships", "capacity")?),
    })
}

fn decode_application(row: &AnyRow) -> Result<Application, StoreError> {
    let status: String = get(row, "Applications", "status")?;
    Ok(Application {
        student: StudentId(get(row, "Applications", "student_id")?),
        scholarship: ScholarshipId(get(row, "Applications", "scholarship_id")?),
        status: status.parse().map_err(|reason| StoreError::Decode {
            table: "Applications",
            reason,
        })?,
    })
}

fn clamp_capacity(capacity: i64) -> u32 {
    u32::try_from(capacity.max(0)).unwrap_or(u32::MAX)
}

#[async_trait]
impl RecordStore for SqlStore {
    async fn students_by_id(&self, ids: &[StudentId]) -> Result<Vec<Student>, StoreError> {
        let mut students = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(IDS_PER_QUERY) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let query = format!(
                "SELECT {STUDENT_COLUMNS} FROM Students WHERE student_id IN ({placeholders})"
            );
            let mut query = sqlx::query(&query);
            for id in chunk {
                query = query.bind(id.0);
            }
            for row in query.fetch_all(&self.pool).await.map_err(query_error)? {
                students.push(decode_student(&row)?);
            }
        }
        students.sort_by_key(|s| s.id);
        students.dedup_by_key(|s| s.id);
        Ok(students)
    }

    async fn scholarships(&self) -> Result<Vec<Scholarship>, StoreError> {
        sqlx::query(
            "SELECT scholarship_id, scholarship_name, min_rank, category_req, max_income, \
             min_marks, sorting_criteria, capacity FROM Scholarships ORDER BY scholarship_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?
        .iter()
        .map(decode_scholarship)
        .collect()
    }

    async fn pending_applicants(
        &self,
        scholarship: ScholarshipId,
    ) -> Result<Vec<StudentId>, StoreError> {
        sqlx::query(
            "SELECT student_id FROM Applications WHERE scholarship_id = ? AND status = ? \
             ORDER BY student_id",
        )
        .bind(scholarship.0)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?
        .iter()
        .map(|row| Ok(StudentId(get(row, "Applications", "student_id")?)))
        .collect()
    }

    async fn remaining_capacity(&self, scholarship: ScholarshipId) -> Result<u32, StoreError> {
        let row = sqlx::query("SELECT capacity FROM Scholarships WHERE scholarship_id = ?")
            .bind(scholarship.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?
            .ok_or_else(|| StoreError::NotFound(format!("scholarship {scholarship}")))?;
        Ok(clamp_capacity(get(&row, "Scholarships", "capacity")?))
    }

    async fn set_capacity(
        &self,
        scholarship: ScholarshipId,
        capacity: u32,
    ) -> Result<(), StoreError> {
        trace!(%scholarship, %capacity, "Updating scholarship capacity");
        sqlx::query("UPDATE Scholarships SET capacity = ? WHERE scholarship_id = ?")
            .bind(i64::from(capacity))
            .bind(scholarship.0)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn is_assigned(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM AssignedScholarships \
             WHERE student_id = ? AND scholarship_id = ?",
        )
        .bind(student.0)
        .bind(scholarship.0)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;
        Ok(get::<i64>(&row, "AssignedScholarships", "n")? > 0)
    }

    async fn insert_assignment(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO AssignedScholarships (student_id, scholarship_id, status) \
             VALUES (?, ?, 'pending')",
        )
        .bind(student.0)
        .bind(scholarship.0)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn set_application_status(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE Applications SET status = ? WHERE student_id = ? AND scholarship_id = ?")
            .bind(status.as_str())
            .bind(student.0)
            .bind(scholarship.0)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn insert_application(
        &self,
        student: StudentId,
        scholarship: ScholarshipId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO Applications (student_id, scholarship_id, status) VALUES (?, ?, ?)",
        )
        .bind(student.0)
        .bind(scholarship.0)
        .bind(ApplicationStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn applications_of(&self, student: StudentId) -> Result<Vec<Application>, StoreError> {
        sqlx::query(
            "SELECT student_id, scholarship_id, status FROM Applications \
             WHERE student_id = ? ORDER BY scholarship_id",
        )
        .bind(student.0)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?
        .iter()
        .map(decode_application)
        .collect()
    }

    async fn assigned_scholarships(&self, student: StudentId) -> Result<Vec<Award>, StoreError> {
        self.awards("AssignedScholarships", student).await
    }

    async fn accepted_scholarships(&self, student: StudentId) -> Result<Vec<Award>, StoreError> {
        self.awards("AcceptedScholarships", student).await
    }
}
