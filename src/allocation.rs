use crate::eligibility::{self, Verdict};
use crate::model::{ApplicationStatus, Scholarship, ScholarshipId, Student, StudentId};
use crate::store::{RecordStore, StoreError};
use tracing::{debug, error, info, instrument, trace, warn};

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Perform reads only; capacity is then tracked locally.
    pub dry_run: bool,
    /// Mark the applications of ineligible students as rejected.
    pub reject_ineligible: bool,
}

/// What happened to one scholarship during a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub scholarship: ScholarshipId,
    pub name: String,
    pub starting_capacity: u32,
    /// Students assigned during this run, in assignment order.
    pub assigned: Vec<Student>,
    pub ineligible: Vec<StudentId>,
    /// Students skipped because the store already held their assignment.
    pub already_assigned: Vec<StudentId>,
    /// Store operations which failed and were skipped.
    pub failures: usize,
    pub remaining_capacity: u32,
}

impl Outcome {
    fn new(scholarship: &Scholarship) -> Self {
        Self {
            scholarship: scholarship.id,
            name: scholarship.name.clone(),
            starting_capacity: scholarship.capacity,
            assigned: Vec::new(),
            ineligible: Vec::new(),
            already_assigned: Vec::new(),
            failures: 0,
            remaining_capacity: scholarship.capacity,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_capacity == 0
    }
}

pub struct Allocator<'a, S: RecordStore> {
    store: &'a S,
    options: Options,
}

impl<'a, S: RecordStore> Allocator<'a, S> {
    pub fn new(store: &'a S, options: Options) -> Self {
        Allocator { store, options }
    }

    /// Assign every scholarship in turn. Only the failure to load the
    /// scholarships themselves is fatal; other store errors are logged
    /// and the item at hand is skipped.
    #[instrument(skip_all, fields(dry_run = self.options.dry_run))]
    pub async fn assign(&self) -> Result<Vec<Outcome>, StoreError> {
        info!("Starting scholarship assignment process");
        let scholarships = self.store.scholarships().await?;
        let mut outcomes = Vec::with_capacity(scholarships.len());
        for scholarship in &scholarships {
            outcomes.push(self.assign_scholarship(scholarship).await);
        }
        info!(
            scholarships = %outcomes.len(),
            assigned = %outcomes.iter().map(|o| o.assigned.len()).sum::<usize>(),
            "Scholarship assignment process completed"
        );
        Ok(outcomes)
    }

    #[instrument(skip_all, fields(scholarship = %scholarship))]
    async fn assign_scholarship(&self, scholarship: &Scholarship) -> Outcome {
        info!(capacity = %scholarship.capacity, "Processing scholarship");
        let mut outcome = Outcome::new(scholarship);
        if !scholarship.has_criteria() {
            warn!("Scholarship has no eligibility criteria, nobody can be assigned");
        }
        let applicants = match self.load_applicants(scholarship.id).await {
            Ok(applicants) => applicants,
            Err(e) => {
                error!(error = %e, "Cannot load applicants");
                outcome.failures += 1;
                return outcome;
            }
        };
        let mut eligible = Vec::with_capacity(applicants.len());
        for student in applicants {
            match eligibility::check(&student, scholarship) {
                Verdict::Eligible => eligible.push(student),
                verdict => {
                    trace!(student = %student.id, %verdict, "Applicant is not eligible");
                    self.reject(&student, scholarship, &mut outcome).await;
                    outcome.ineligible.push(student.id);
                }
            }
        }
        scholarship.sorting.sort(&mut eligible);
        debug!(
            eligible = %eligible.len(),
            ineligible = %outcome.ineligible.len(),
            sorting = ?scholarship.sorting,
            "Sorted eligible applicants"
        );
        for student in eligible {
            let budget = outcome.starting_capacity - outcome.assigned.len() as u32;
            if budget == 0 {
                break;
            }
            let remaining = match self.store.remaining_capacity(scholarship.id).await {
                Ok(stored) => stored.min(budget),
                Err(e) => {
                    warn!(student = %student.id, error = %e, "Cannot re-read capacity, skipping student");
                    outcome.failures += 1;
                    continue;
                }
            };
            outcome.remaining_capacity = remaining;
            if remaining == 0 {
                info!("Capacity exhausted");
                break;
            }
            match self.store.is_assigned(student.id, scholarship.id).await {
                Ok(false) => {}
                Ok(true) => {
                    debug!(student = %student.id, "Student already holds this scholarship");
                    outcome.already_assigned.push(student.id);
                    continue;
                }
                Err(e) => {
                    warn!(student = %student.id, error = %e, "Cannot check prior assignment, skipping student");
                    outcome.failures += 1;
                    continue;
                }
            }
            if self.award(&student, scholarship, remaining, &mut outcome).await {
                outcome.remaining_capacity = remaining - 1;
                outcome.assigned.push(student);
            }
        }
        outcome
    }

    async fn load_applicants(&self, scholarship: ScholarshipId) -> Result<Vec<Student>, StoreError> {
        let ids = self.store.pending_applicants(scholarship).await?;
        if ids.is_empty() {
            debug!("No pending applications");
            return Ok(Vec::new());
        }
        self.store.students_by_id(&ids).await
    }

    /// Write the assignment and its consequences. Returns `false` if the
    /// assignment itself could not be recorded.
    async fn award(
        &self,
        student: &Student,
        scholarship: &Scholarship,
        remaining: u32,
        outcome: &mut Outcome,
    ) -> bool {
        if self.options.dry_run {
            info!(student = %student.id, "Would assign scholarship");
            return true;
        }
        if let Err(e) = self.store.insert_assignment(student.id, scholarship.id).await {
            error!(student = %student.id, error = %e, "Cannot assign scholarship");
            outcome.failures += 1;
            return false;
        }
        info!(student = %student.id, "Assigned scholarship");
        if let Err(e) = self.store.set_capacity(scholarship.id, remaining - 1).await {
            error!(error = %e, "Cannot update scholarship capacity");
            outcome.failures += 1;
        }
        if let Err(e) = self
            .store
            .set_application_status(student.id, scholarship.id, ApplicationStatus::Assigned)
            .await
        {
            error!(student = %student.id, error = %e, "Cannot update application status");
            outcome.failures += 1;
        }
        true
    }

    async fn reject(&self, student: &Student, scholarship: &Scholarship, outcome: &mut Outcome) {
        if !self.options.reject_ineligible || self.options.dry_run {
            return;
        }
        if let Err(e) = self
            .store
            .set_application_status(student.id, scholarship.id, ApplicationStatus::Rejected)
            .await
        {
            error!(student = %student.id, error = %e, "Cannot reject application");
            outcome.failures += 1;
        }
    }
}
