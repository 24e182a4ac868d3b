//! git-team - set a mob of three or more
//!
//! Same shape as git-duet with a longer committer list; rotation then
//! cycles the whole mob through the driver's seat.

use anyhow::bail;
use clap::Parser;
use duetkit::{Configuration, Registry};
use duetkit_cli as cli;

#[derive(Parser, Debug)]
#[command(name = "git-team", version, about = "Set a mob of three or more")]
struct Args {
    /// Silence output
    #[arg(short, long)]
    quiet: bool,

    /// Change global config
    #[arg(short, long)]
    global: bool,

    /// Author initials followed by the rest of the mob
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
            committers.extend(author.clone());
        }

        cli::print_author(author.as_ref());
        cli::print_committers(&committers);
        return Ok(());
    }

    if args.initials.len() <= 2 {
        bail!("must specify more than two sets of initials");
    }

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

    Ok(())
}
