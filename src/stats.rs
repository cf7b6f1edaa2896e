use crate::allocation::Outcome;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    pub scholarships: usize,
    pub exhausted: usize,
    pub assigned: usize,
    pub ineligible: usize,
    pub already_assigned: usize,
    pub failures: usize,
}

pub fn statistics(outcomes: &[Outcome]) -> Statistics {
    outcomes.iter().fold(
        Statistics {
            scholarships: outcomes.len(),
            ..Statistics::default()
        },
        |s, o| Statistics {
            exhausted: s.exhausted + usize::from(o.is_exhausted()),
            assigned: s.assigned + o.assigned.len(),
            ineligible: s.ineligible + o.ineligible.len(),
            already_assigned: s.already_assigned + o.already_assigned.len(),
            failures: s.failures + o.failures,
            ..s
        },
    )
}
