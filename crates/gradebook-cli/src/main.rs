//! Gradebook - autograder result aggregation CLI
//!
//! ## Commands
//!
//! - `update`: scan recent CI grading runs and append new rows to the
//!   gradebook CSV
//! - `grade`: run a checks manifest against one submission and write its
//!   result document

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use gradebook_ci::{detect_repo, GhCli, GradebookMerger, MergeConfig};
use gradebook_grader::{load_manifest, CheckRunner, SubmissionIdentity};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Autograder gradebook pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate new grading results into the gradebook
    Update {
        /// Repository slug (OWNER/REPO); derived from the local git remote
        /// when omitted
        #[arg(long)]
        repo: Option<String>,

        /// Workflow name
        #[arg(long, default_value = "Autograde")]
        workflow: String,

        /// Artifact name
        #[arg(long, default_value = "autograder_result")]
        artifact: String,

        /// How many recent runs to scan
        #[arg(long, default_value_t = 50)]
        limit: u32,

        /// Gradebook CSV path
        #[arg(long, default_value = "autograder/gradebook.csv")]
        out: PathBuf,
    },

    /// Grade one submission with a checks manifest
    Grade {
        /// Checks manifest (JSON array of {id, command, points})
        #[arg(long)]
        checks: PathBuf,

        /// Submission directory; falls back to $STUDENT_DIR
        #[arg(long)]
        student_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    gradebook_core::init_tracing(cli.json, cli.verbose);

    match cli.command {
        Commands::Update {
            repo,
            workflow,
            artifact,
            limit,
            out,
        } => cmd_update(repo, workflow, artifact, limit, out).await,
        Commands::Grade {
            checks,
            student_dir,
        } => cmd_grade(&checks, student_dir).await,
    }
}

async fn cmd_update(
    repo: Option<String>,
    workflow: String,
    artifact: String,
    limit: u32,
    out: PathBuf,
) -> Result<()> {
    let repo = match repo.map(|r| r.trim().to_string()) {
        Some(r) if !r.is_empty() => r,
        _ => detect_repo(Path::new("."))?,
    };
    info!(repo = %repo, workflow = %workflow, "updating gradebook");

    let config = MergeConfig {
        repo,
        workflow,
        artifact,
        limit,
        out,
    };

    let outcome = GradebookMerger::run(&GhCli, &config).await?;
    if outcome.rows.is_empty() {
        println!("No new rows to append.");
    } else {
        println!(
            "Appended {} rows to {}",
            outcome.appended(),
            outcome.gradebook.display()
        );
    }
    Ok(())
}

async fn cmd_grade(checks: &Path, student_dir: Option<PathBuf>) -> Result<()> {
    let identity = match student_dir {
        Some(dir) => SubmissionIdentity::new(dir),
        None => SubmissionIdentity::from_env()?,
    };

    let specs = load_manifest(checks)?;
    info!(submission = %identity.dir().display(), checks = specs.len(), "grading submission");
    let (doc, _runs) = CheckRunner::run_all(identity, &specs).await?;
    println!("SCORE: {}/{}", doc.earned, doc.max);
    Ok(())
}
