//! git-duet-prepare-commit-msg - append Co-authored-by trailers
//!
//! Installed as a prepare-commit-msg hook when trailer mode is on. Adds
//! one `Co-authored-by:` trailer per configured committer via
//! `git interpret-trailers`.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Parser;
use duetkit::Configuration;
use duetkit_cli as cli;
use regex::Regex;

#[derive(Parser, Debug)]
#[command(
    name = "git-duet-prepare-commit-msg",
    version,
    about = "Append Co-authored-by trailers to the commit message"
)]
struct Args {
    /// Path to the commit message file (passed by git)
    commit_msg_file: PathBuf,

    /// Commit message source (passed by git; e.g. "commit" for --amend)
    commit_msg_source: Option<String>,
}

fn main() {
    cli::init_tracing();
    if let Err(err) = run(Args::parse()) {
        cli::exit_with(err);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Configuration::from_env()?;
    let store = cli::author_store(&config)?;

    let committers = store.get_committers()?.unwrap_or_default();
    if committers.is_empty() {
        return Ok(());
    }

    let commit_msg = fs::read_to_string(&args.commit_msg_file)
        .with_context(|| format!("cannot read {}", args.commit_msg_file.display()))?;

    let trailer_pattern = Regex::new(r"Co-authored-by:\s.+\s<.+>").expect("static regex");
    let trailer_exists = trailer_pattern.is_match(&commit_msg);

    // Rebasing and cherry-picking reuse messages without changing
    // authorship; an existing trailer means leave the message alone
    // unless this is an amend (source "commit")
    if trailer_exists && args.commit_msg_source.as_deref() != Some("commit") {
        return Ok(());
    }

    // git's default addIfDifferentNeighbor would still duplicate
    // trailers separated by other lines
    store.set_unnamespaced_key("trailer.ifexists", "addIfDifferent")?;

    for committer in &committers {
        let trailer = format!("Co-authored-by: {} <{}>", committer.name, committer.email);
        let status = Command::new("git")
            .args(["interpret-trailers", "--in-place", "--trailer", &trailer])
            .arg(&args.commit_msg_file)
            .status()
            .context("cannot invoke git interpret-trailers")?;
        if !status.success() {
            bail!("git interpret-trailers exited with {status}");
        }
    }

    // Separate a fresh trailer block from the subject with a blank line
    if trailer_exists || args.commit_msg_source.as_deref() == Some("commit") {
        return Ok(());
    }
    let commit_msg = fs::read_to_string(&args.commit_msg_file)?;
    fs::write(&args.commit_msg_file, format!("\n{commit_msg}"))?;

    Ok(())
}
