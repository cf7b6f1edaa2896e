pub use self::application::{Application, ApplicationStatus, Award};
pub use self::scholarship::{CategoryId, Scholarship, ScholarshipId, SortingCriterion};
pub use self::student::{Student, StudentId};

mod application;
mod scholarship;
mod student;
