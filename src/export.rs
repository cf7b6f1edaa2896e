use crate::allocation::Outcome;
use eyre::{Result, WrapErr};
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Debug, Serialize)]
struct AwardRecord<'a> {
    scholarship_id: i64,
    scholarship_name: &'a str,
    student_id: i64,
    rank: i64,
    income: f64,
    marks_12th: f64,
}

fn records(outcomes: &[Outcome]) -> impl Iterator<Item = AwardRecord<'_>> {
    outcomes.iter().flat_map(|o| {
        o.assigned.iter().map(move |s| AwardRecord {
            scholarship_id: o.scholarship.0,
            scholarship_name: &o.name,
            student_id: s.id.0,
            rank: s.rank,
            income: s.income,
            marks_12th: s.marks_12th,
        })
    })
}

pub fn write_awards<W: io::Write>(outcomes: &[Outcome], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records(outcomes) {
        writer
            .serialize(record)
            .wrap_err("cannot serialize award")?;
    }
    writer.flush().wrap_err("cannot write awards")?;
    Ok(())
}

pub fn export_awards(outcomes: &[Outcome], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("cannot create {}", path.display()))?;
    write_awards(outcomes, file)
}
