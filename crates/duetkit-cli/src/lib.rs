//! Shared glue for the git-duet binaries
//!
//! Each binary parses its own flags and calls into the duetkit library;
//! this crate holds what they share: store construction, output
//! formatting, the wrapped-git executor, and hook installation.

use std::fs;
use std::io::Read;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{self, Command};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use duetkit::{Configuration, GitBackend, Pair, PairStore, Scope};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PREPARE_COMMIT_MSG_HOOK: &str =
    "#!/usr/bin/env bash\nexec git-duet-prepare-commit-msg \"$@\"\n";

/// Install a tracing subscriber driven by `GIT_DUET_LOG` (same grammar
/// as `RUST_LOG`); silent by default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("GIT_DUET_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the error and exit with its reserved code (86 for unknown
/// initials, 1 otherwise).
pub fn exit_with(err: anyhow::Error) -> ! {
    eprintln!("{err:#}");
    let code = err
        .downcast_ref::<duetkit::Error>()
        .map_or(1, duetkit::Error::exit_code);
    process::exit(code)
}

/// Store for setter commands (`git-duet`, `git-solo`, `git-team`):
/// Default scope unless pinned global by flag or environment.
pub fn setter_store(config: &Configuration, global_flag: bool) -> PairStore {
    let scope = if global_flag || config.global {
        Scope::Global
    } else {
        Scope::Default
    };
    PairStore::new(Arc::new(GitBackend::new()), config.namespace.clone(), scope)
        .mirror_user_config(config.set_user_config)
}

/// Store for commands that need an author to exist (wrapped subcommands
/// and hooks): pinned Global when configured so, otherwise whichever
/// scope actually holds the author.
pub fn author_store(config: &Configuration) -> duetkit::Result<PairStore> {
    let backend = Arc::new(GitBackend::new());
    if config.global {
        Ok(
            PairStore::new(backend, config.namespace.clone(), Scope::Global)
                .mirror_user_config(config.set_user_config),
        )
    } else {
        PairStore::author_config(backend, &config.namespace, config.set_user_config)
    }
}

/// Print the author the way the wrappers export it.
pub fn print_author(author: Option<&Pair>) {
    if let Some(author) = author {
        println!("GIT_AUTHOR_NAME='{}'", author.name);
        println!("GIT_AUTHOR_EMAIL='{}'", author.email);
    }
}

/// Print the committer at the wheel next, plus the co-author roster when
/// more than one is configured.
pub fn print_committers(committers: &[Pair]) {
    let Some(first) = committers.first() else {
        return;
    };

    println!("GIT_COMMITTER_NAME='{}'", first.name);
    println!("GIT_COMMITTER_EMAIL='{}'", first.email);

    if committers.len() > 1 {
        println!("\n# Co-authored-by:");
        for committer in committers {
            println!("#  {} <{}>", committer.name, committer.email);
        }
    }
}

/// Print the current assignment as JSON for scripting.
pub fn print_json(author: Option<&Pair>, committers: &[Pair]) -> Result<()> {
    let value = serde_json::json!({
        "author": author,
        "committers": committers,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// A git subcommand run with the pair's identity in the environment.
pub struct WrappedGit {
    pub subcommand: &'static str,
    pub signoff: bool,
    pub args: Vec<String>,
}

impl WrappedGit {
    /// Run the subcommand with `GIT_AUTHOR_*`/`GIT_COMMITTER_*` taken
    /// from the store, then rotate the author when configured and the
    /// command succeeded. Returns the subcommand's exit code.
    pub fn execute(&self, config: &Configuration, store: &PairStore) -> Result<i32> {
        let author = store
            .get_author()?
            .ok_or(duetkit::Error::AuthorNotConfigured)?;
        let committers = store.get_committers()?.unwrap_or_default();
        let (args, committer) = self.plan(&author, &committers);

        debug!(subcommand = self.subcommand, "running wrapped git");
        let status = Command::new("git")
            .arg(self.subcommand)
            .args(&args)
            .env("GIT_AUTHOR_NAME", &author.name)
            .env("GIT_AUTHOR_EMAIL", &author.email)
            .env("GIT_COMMITTER_NAME", &committer.name)
            .env("GIT_COMMITTER_EMAIL", &committer.email)
            .status()
            .with_context(|| format!("cannot invoke git {}", self.subcommand))?;

        if status.success() && config.rotate_author {
            store.rotate_author()?;
        }

        Ok(status.code().unwrap_or(1))
    }

    /// Decide the forwarded arguments and the committing identity:
    /// with a committer configured and signoff on, the front committer
    /// commits and `--signoff` is prepended; otherwise the author
    /// commits alone.
    fn plan(&self, author: &Pair, committers: &[Pair]) -> (Vec<String>, Pair) {
        let mut args = self.args.clone();
        let committer = if self.signoff && !committers.is_empty() {
            args.insert(0, "--signoff".to_string());
            committers[0].clone()
        } else {
            author.clone()
        };
        (args, committer)
    }
}

/// Install the prepare-commit-msg hook into the repository.
///
/// Leaves an existing hook alone when it already dispatches to
/// `git-duet-prepare-commit-msg`; refuses to clobber anything else.
pub fn install_prepare_commit_msg_hook() -> Result<()> {
    let hook_path = local_hook_path("prepare-commit-msg")?;

    if hook_path.exists() {
        let mut contents = String::new();
        fs::File::open(&hook_path)?.read_to_string(&mut contents)?;
        if contents.contains("git-duet-prepare-commit-msg") {
            return Ok(());
        }
        bail!("can't install hook: file {} already exists", hook_path.display());
    }

    if let Some(hooks_dir) = hook_path.parent() {
        fs::create_dir_all(hooks_dir)?;
    }
    fs::write(&hook_path, PREPARE_COMMIT_MSG_HOOK)?;
    #[cfg(unix)]
    fs::set_permissions(&hook_path, fs::Permissions::from_mode(0o755))?;

    debug!(path = %hook_path.display(), "installed prepare-commit-msg hook");
    Ok(())
}

fn local_hook_path(name: &str) -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .context("cannot invoke git rev-parse")?;
    if !output.status.success() {
        bail!(
            "git rev-parse --git-dir: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let git_dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(git_dir).join("hooks").join(name))
}
