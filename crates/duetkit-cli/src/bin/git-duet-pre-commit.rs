//! git-duet-pre-commit - refuse commits under stale pair state
//!
//! Installed as a pre-commit hook; exits non-zero when the pair hasn't
//! been re-declared within the staleness cutoff.

use std::process;
use std::sync::Arc;

use clap::Parser;
use duetkit::{is_stale, Configuration, GitBackend, PairStore, Scope};
use duetkit_cli as cli;

#[derive(Parser, Debug)]
#[command(
    name = "git-duet-pre-commit",
    version,
    about = "Fail when pair state is stale"
)]
struct Args {}

fn main() {
    cli::init_tracing();
    let _ = Args::parse();
    if let Err(err) = run() {
        cli::exit_with(err);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Configuration::from_env()?;
    let store = PairStore::new(
        Arc::new(GitBackend::new()),
        config.namespace.clone(),
        Scope::Default,
    );

    if is_stale(store.get_mtime()?, config.stale_cutoff) {
        eprintln!("your git duet settings are stale");
        eprintln!("update them with `git duet` or `git solo`.");
        process::exit(1);
    }

    Ok(())
}
