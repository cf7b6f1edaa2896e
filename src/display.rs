use crate::allocation::Outcome;
use crate::model::Award;
use crate::stats;

pub fn display_details(outcomes: &[Outcome]) {
    let mut outcomes = outcomes.iter().collect::<Vec<_>>();
    outcomes.sort_by_key(|o| o.name.clone());
    for o in outcomes {
        if !o.assigned.is_empty() {
            println!(
                "{} ({}/{} awarded):",
                o.name,
                o.assigned.len(),
                o.starting_capacity
            );
            for s in &o.assigned {
                println!(
                    "  - student {} (rank {}, income {}, marks {})",
                    s.id, s.rank, s.income, s.marks_12th
                );
            }
            println!();
        }
    }
}

pub fn display_stats(outcomes: &[Outcome]) {
    let stats = stats::statistics(outcomes);
    println!(
        "Scholarships processed/exhausted: {}/{}",
        stats.scholarships, stats.exhausted
    );
    println!(
        "Applicants assigned/ineligible/already assigned: {}/{}/{}",
        stats.assigned, stats.ineligible, stats.already_assigned
    );
    if stats.failures > 0 {
        println!("Failed store operations: {}", stats.failures);
    }
}

pub fn display_unawarded(outcomes: &[Outcome]) {
    let mut names = outcomes
        .iter()
        .filter(|o| o.assigned.is_empty())
        .map(|o| o.name.as_str())
        .collect::<Vec<_>>();
    names.sort_unstable();
    if !names.is_empty() {
        println!("Scholarships without any new award:");
        for name in names {
            println!("  - {name}");
        }
    }
}

pub fn display_awards(title: &str, awards: &[Award]) {
    println!("{title}:");
    for a in awards {
        println!("  - {} (#{})", a.scholarship_name, a.scholarship);
    }
}
