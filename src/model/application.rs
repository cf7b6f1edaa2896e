use super::{ScholarshipId, StudentId};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ApplicationStatus {
    Pending,
    Assigned,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown application status {other:?}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Application {
    pub student: StudentId,
    pub scholarship: ScholarshipId,
    pub status: ApplicationStatus,
}

/// A scholarship granted to (or accepted by) a student.
#[derive(Clone, Debug, PartialEq)]
pub struct Award {
    pub student: StudentId,
    pub scholarship: ScholarshipId,
    pub scholarship_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Assigned,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("Pending".parse::<ApplicationStatus>().is_err());
    }
}
