//! git-duet-commit - commit as the current pair
//!
//! Runs `git commit` with the pair's identity in the environment, adds
//! `--signoff` when a committer is configured, and rotates the author
//! afterwards when rotation is enabled.

use std::process;

use clap::Parser;
use duetkit::Configuration;
use duetkit_cli as cli;
use duetkit_cli::WrappedGit;

#[derive(Parser, Debug)]
#[command(
    name = "git-duet-commit",
    version,
    about = "git commit with pair authorship",
    disable_help_flag = true
)]
struct Args {
    /// Arguments forwarded to `git commit`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    cli::init_tracing();
    match run(Args::parse()) {
        Ok(code) => process::exit(code),
        Err(err) => cli::exit_with(err),
    }
}

fn run(args: Args) -> anyhow::Result<i32> {
    let config = Configuration::from_env()?;
    let store = cli::author_store(&config)?;

    let wrapped = WrappedGit {
        subcommand: "commit",
        signoff: true,
        args: args.args,
    };
    wrapped.execute(&config, &store)
}
