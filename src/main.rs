//! git-timelapse - step through the revision history of a single file.
//!
//! # Usage
//! ```bash
//! git-timelapse src/lib.rs                # newest revision vs its predecessor
//! git-timelapse src/lib.rs --revision 3   # third revision vs its predecessor
//! git-timelapse src/lib.rs --json         # dump the history as JSON
//! git-timelapse src/lib.rs -v             # timing diagnostics on stderr
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_timelapse::error::AppError;
use git_timelapse::git::GitRepository;
use git_timelapse::git::diff::unified_diff;
use git_timelapse::models::CommitInfo;
use git_timelapse::patch::{Alignment, Direction, Patch, TextBuffer};
use git_timelapse::render;

/// Step through the revision history of a single tracked file
#[derive(Parser)]
#[command(name = "git-timelapse")]
#[command(about = "Side-by-side history viewer for one tracked file", long_about = None)]
struct Cli {
    /// Path to the tracked file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Revision to show, 1-based as printed in the listing (default: newest)
    #[arg(short, long)]
    revision: Option<usize>,

    /// Diff display mode
    #[arg(short, long, value_enum, default_value_t = Mode::Aligned)]
    mode: Mode,

    /// Print the history as JSON instead of rendering a diff
    #[arg(long)]
    json: bool,

    /// Pane width for the side-by-side view
    #[arg(long, default_value_t = 60)]
    width: usize,

    /// Enable verbose timing diagnostics
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Each revision's real text, changed lines marked in the gutter
    Regular,
    /// Placeholder-padded panes with matching line counts
    Aligned,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "git_timelapse=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<AppError>() {
            Some(
                AppError::InvalidPatchShape(_)
                | AppError::MalformedHunk(_)
                | AppError::HunkApplyMismatch { .. },
            ) => eprintln!("✗ Failed to apply patch: {err}"),
            Some(_) => eprintln!("✗ Failed to read repository: {err}"),
            None => eprintln!("✗ {err}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let file = if cli.file.is_absolute() {
        cli.file.clone()
    } else {
        cwd.join(&cli.file)
    };

    let repo = GitRepository::discover(file.parent().unwrap_or(&cwd))?;
    let rel = repo.rel_path(&file)?;
    let head = repo.resolve_revision("HEAD")?;

    let walk_started = Instant::now();
    let history = repo.find_commits(head, &rel, |oid| debug!(%oid, "matched commit"))?;
    debug!(
        elapsed_ms = walk_started.elapsed().as_millis() as u64,
        commits = history.len(),
        "history walk"
    );

    if history.is_empty() {
        println!("no history found for {rel}");
        return Ok(());
    }

    if cli.json {
        let infos: Vec<CommitInfo> = history
            .iter()
            .map(|oid| repo.commit_info(oid, true))
            .collect::<Result<_, _>>()?;
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!("history of {rel} ({} revisions):", history.len());
    for (i, oid) in history.iter().enumerate() {
        let info = repo.commit_info(oid, true)?;
        let date = chrono::DateTime::from_timestamp(info.timestamp, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let summary = info
            .message
            .as_deref()
            .and_then(|m| m.lines().next())
            .unwrap_or("");
        println!(
            "{:>4}  {:.10}  {}  {:<20}  {}",
            i + 1,
            info.oid,
            date,
            info.author.name,
            summary
        );
    }
    println!();

    let index = cli.revision.unwrap_or(history.len());
    let current = index
        .checked_sub(1)
        .and_then(|i| history.get(i))
        .ok_or_else(|| {
            anyhow::anyhow!("revision {index} out of range 1..={}", history.len())
        })?;
    let previous = history.predecessor(current);

    let current_bytes = history.read_file(&repo, current)?;

    let Some(previous) = previous else {
        println!("revision {index} is the first revision of {rel}:");
        print!("{}", render::single_pane(&TextBuffer::from_bytes(&current_bytes)));
        return Ok(());
    };

    let previous_bytes = history.read_file(&repo, previous)?;

    let diff_started = Instant::now();
    let diff_text = unified_diff(&previous_bytes, &current_bytes, &rel)?;
    debug!(
        elapsed_ms = diff_started.elapsed().as_millis() as u64,
        "diff generated"
    );

    println!(
        "revision {index}: {:.10} -> {:.10}",
        previous.to_string(),
        current.to_string()
    );

    if diff_text.is_empty() {
        println!("(no content change between these revisions)");
        print!("{}", render::single_pane(&TextBuffer::from_bytes(&current_bytes)));
        return Ok(());
    }

    let patch = Patch::parse(&diff_text)?;

    let render_started = Instant::now();
    let (left, right) = match cli.mode {
        Mode::Regular => {
            // Left pane: the before text with outgoing lines marked,
            // reconstructed backwards from the current revision. Right
            // pane: the current text produced by a verified forward
            // application of the same patch.
            let mut left = TextBuffer::from_bytes(&current_bytes);
            left.apply(&patch, Direction::Backward, Alignment::Plain)?;
            let mut right = TextBuffer::from_bytes(&previous_bytes);
            right.apply(&patch, Direction::Forward, Alignment::Plain)?;
            (left, right)
        }
        Mode::Aligned => {
            let mut left = TextBuffer::from_bytes(&previous_bytes);
            left.apply(&patch, Direction::Forward, Alignment::Aligned)?;
            let mut right = TextBuffer::from_bytes(&current_bytes);
            right.apply(&patch, Direction::Backward, Alignment::Aligned)?;
            (left, right)
        }
    };
    debug!(
        elapsed_ms = render_started.elapsed().as_millis() as u64,
        "patch applied"
    );

    print!("{}", render::side_by_side(&left, &right, cli.width));
    Ok(())
}
