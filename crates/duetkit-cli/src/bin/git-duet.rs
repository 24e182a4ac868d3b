//! git-duet - set or show the current pair
//!
//! With no initials, prints the current assignment. With two or more,
//! the first becomes the author and the rest the committer list.

use anyhow::bail;
use clap::Parser;
use duetkit::{Configuration, Registry};
use duetkit_cli as cli;

#[derive(Parser, Debug)]
#[command(name = "git-duet", version, about = "Set or show the current pair")]
struct Args {
    /// Silence output
    #[arg(short, long)]
    quiet: bool,

    /// Change global config
    #[arg(short, long)]
    global: bool,

    /// Print the current assignment as JSON
    #[arg(long)]
    json: bool,

    /// Author initials followed by one or more committer initials
    initials: Vec<String>,
}

fn main() {
    cli::init_tracing();
    if let Err(err) = run(Args::parse()) {
        cli::exit_with(err);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Configuration::from_env()?;
    let store = cli::setter_store(&config, args.global);

    if args.initials.is_empty() {
        let author = store.get_author()?;
        let mut committers = store.get_committers()?.unwrap_or_default();
        if committers.is_empty() {
            // A solo author drives and commits
            committers.extend(author.clone());
        }

        if args.json {
            cli::print_json(author.as_ref(), &committers)?;
        } else {
            cli::print_author(author.as_ref());
            cli::print_committers(&committers);
        }

        if config.co_authored_by {
            cli::install_prepare_commit_msg_hook()?;
        }
        return Ok(());
    }

    if args.initials.len() < 2 {
        bail!("must specify at least two sets of initials");
    }

    // Resolve everything before writing so unknown initials leave the
    // configured state untouched
    let registry = Registry::from_file(&config.pairs_file, config.email_lookup.clone())?;
    let author = registry.by_initials(&args.initials[0])?;
    let committers = args.initials[1..]
        .iter()
        .map(|initials| registry.by_initials(initials))
        .collect::<duetkit::Result<Vec<_>>>()?;

    store.set_author(&author)?;
    store.set_committers(&committers)?;

    if !args.quiet {
        cli::print_author(Some(&author));
        cli::print_committers(&committers);
    }

    if config.co_authored_by {
        cli::install_prepare_commit_msg_hook()?;
    }

    Ok(())
}
