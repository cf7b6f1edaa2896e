use bursary::allocation::{Allocator, Options};
use bursary::applications::{self, ApplyOutcome};
use bursary::config::{Config, get_config, get_flag};
use bursary::display::{display_awards, display_details, display_stats, display_unawarded};
use bursary::export::export_awards;
use bursary::model::{ScholarshipId, StudentId};
use bursary::stats::statistics;
use bursary::store::{RecordStore, SqlStore};
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr, bail, eyre};
use std::path::{Path, PathBuf};
use tracing::{Level, info};

const DEFAULT_CONFIG: &str = "bursary.toml";

#[derive(Parser)]
#[command(version, author, about)]
struct Args {
    /// Use FILE instead of bursary.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Database URL, overriding store.url
    #[arg(short, long, value_name = "URL")]
    database: Option<String>,
    /// Set verbosity level
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Assign scholarships to pending applicants (default)
    Assign {
        /// Do not write back results to database
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Export the awards to a CSV file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List the scholarships a student is eligible for
    Eligible {
        #[arg(short, long)]
        student: i64,
    },
    /// Apply for a scholarship on behalf of a student
    Apply {
        #[arg(short, long)]
        student: i64,
        #[arg(short = 'S', long)]
        scholarship: i64,
    },
    /// List the applications of a student and their status
    Applications {
        #[arg(short, long)]
        student: i64,
    },
    /// List the scholarships assigned to a student
    Assigned {
        #[arg(short, long)]
        student: i64,
    },
    /// List the scholarships a student has accepted
    Accepted {
        #[arg(short, long)]
        student: i64,
    },
}

fn load_config(file: Option<&Path>) -> Result<Config> {
    match file {
        Some(file) => Config::load(file),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG)),
        None => Ok(Config::default()),
    }
}

async fn assign<S: RecordStore>(
    store: &S,
    config: &Config,
    dry_run: bool,
    output: Option<&Path>,
) -> Result<()> {
    let options = Options {
        dry_run,
        reject_ineligible: get_flag(config, "allocation", "reject_ineligible")?.unwrap_or(false),
    };
    let outcomes = Allocator::new(store, options)
        .assign()
        .await
        .wrap_err("cannot load scholarships")?;
    display_details(&outcomes);
    display_stats(&outcomes);
    display_unawarded(&outcomes);
    if let Some(output) = output {
        export_awards(&outcomes, output)?;
        info!(file = %output.display(), "Awards exported");
    }
    let failures = statistics(&outcomes).failures;
    if failures > 0 {
        bail!("{failures} store operations failed during assignment");
    }
    Ok(())
}

async fn eligible<S: RecordStore>(store: &S, student: StudentId) -> Result<()> {
    let (student, eligible) = applications::eligible_for(store, student).await?;
    if eligible.is_empty() {
        println!("Student {} is not eligible for any scholarship", student.id);
    } else {
        println!("Scholarships student {} is eligible for:", student.id);
        for s in eligible {
            println!("  - {s}");
        }
    }
    Ok(())
}

async fn apply<S: RecordStore>(
    store: &S,
    student: StudentId,
    scholarship: ScholarshipId,
) -> Result<()> {
    match applications::apply(store, student, scholarship).await? {
        ApplyOutcome::Applied => {
            println!("Student {student} applied for scholarship {scholarship}");
        }
        ApplyOutcome::AlreadyApplied => {
            println!("Student {student} has already applied for scholarship {scholarship}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = load_config(args.config.as_deref())?;
    let url = match args.database {
        Some(url) => url,
        None => get_config(&config, "store", "url")?
            .ok_or_else(|| eyre!("store.url is not configured and no --database given"))?,
    };
    let store = SqlStore::connect(&url)
        .await
        .wrap_err("cannot connect to database")?;
    match args.command.unwrap_or(Command::Assign {
        dry_run: false,
        output: None,
    }) {
        Command::Assign { dry_run, output } => {
            assign(&store, &config, dry_run, output.as_deref()).await
        }
        Command::Eligible { student } => eligible(&store, StudentId(student)).await,
        Command::Apply {
            student,
            scholarship,
        } => apply(&store, StudentId(student), ScholarshipId(scholarship)).await,
        Command::Applications { student } => {
            let applications = store.applications_of(StudentId(student)).await?;
            if applications.is_empty() {
                println!("Student {student} has not applied for any scholarship");
            } else {
                println!("Applications of student {student}:");
                for a in applications {
                    println!("  - scholarship {} ({})", a.scholarship, a.status);
                }
            }
            Ok(())
        }
        Command::Assigned { student } => {
            let awards = store.assigned_scholarships(StudentId(student)).await?;
            if awards.is_empty() {
                println!("No scholarship assigned to student {student}");
            } else {
                display_awards(&format!("Scholarships assigned to student {student}"), &awards);
            }
            Ok(())
        }
        Command::Accepted { student } => {
            let awards = store.accepted_scholarships(StudentId(student)).await?;
            if awards.is_empty() {
                println!("Nothing accepted so far");
            } else {
                display_awards("Accepted scholarships", &awards);
            }
            Ok(())
        }
    }
}
