//! git-solo - drop back to a single author
//!
//! Sets the author and clears the committer list so commits carry one
//! identity again.

use clap::Parser;
use duetkit::{Configuration, Registry};
use duetkit_cli as cli;

#[derive(Parser, Debug)]
#[command(name = "git-solo", version, about = "Set a single author")]
struct Args {
    /// Silence output
    #[arg(short, long)]
    quiet: bool,

    /// Change global config
    #[arg(short, long)]
    global: bool,

    /// Author initials; omit to show the current author
    initials: Option<String>,
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

    let Some(initials) = args.initials else {
        cli::print_author(store.get_author()?.as_ref());
        return Ok(());
    };

    let registry = Registry::from_file(&config.pairs_file, config.email_lookup.clone())?;
    let author = registry.by_initials(&initials)?;

    store.set_author(&author)?;
    store.clear_committer()?;

    if !args.quiet {
        cli::print_author(Some(&author));
    }

    Ok(())
}
