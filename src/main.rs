//! Docblocks - a block-based documentation editor core.
//!
//! # Usage
//!
//! ```bash
//! docblocks export guide.json
//! docblocks export --format html guide.json -o guide.html
//! docblocks apply guide.json edits.json
//! docblocks nav content/docs --prefix /docs/1.0
//! docblocks publish guide.json --repository acme/docs --publish-root /srv/repos
//! docblocks palette
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use docblocks::block::{default_content_named, palette};
use docblocks::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use docblocks::document::{self, SavedDocument};
use docblocks::editor::{EditorState, run_script};
use docblocks::nav::build_nav;
use docblocks::perf;
use docblocks::publish::LocalRepoPublisher;
use docblocks::session::EditorSession;

/// Block-based documentation editor core
#[derive(Parser, Debug)]
#[command(name = "docblocks", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Number of undo steps kept
    #[arg(long, global = true, value_name = "N")]
    history_limit: Option<usize>,

    /// Repository to publish to (owner/name)
    #[arg(long, global = true)]
    repository: Option<String>,

    /// Branch to publish to
    #[arg(long, global = true)]
    branch: Option<String>,

    /// Directory holding the repositories `publish` writes into
    #[arg(long, global = true, value_name = "DIR")]
    publish_root: Option<PathBuf>,

    /// Docs directory for `nav`
    #[arg(long, global = true, value_name = "DIR")]
    docs_root: Option<PathBuf>,

    /// Print timing for serialization and scripts
    #[arg(long, global = true)]
    perf: bool,

    /// Write debug events to a file
    #[arg(long, global = true, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Markdown,
    Html,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a saved document as Markdown or HTML
    Export {
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
        #[arg(long, value_enum, default_value = "markdown")]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Replay a JSON action script against a document and save it
    Apply {
        /// Document to edit; created if missing
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// Save to a different file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the navigation tree of a docs directory as JSON
    Nav {
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,
        /// Link prefix for every path
        #[arg(long, default_value = "/docs")]
        prefix: String,
    },
    /// Publish a document's Markdown into a local repository tree
    Publish {
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
        /// Commit without opening a pull request
        #[arg(long)]
        no_pr: bool,
    },
    /// List insertable blocks, or print one block's default content
    Palette {
        #[arg(value_name = "KIND")]
        kind: Option<String>,
        #[arg(long)]
        variant: Option<String>,
    },
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("Failed to write to stdout")
        }
    }
}

fn export(path: &Path, format: Format, output: Option<&Path>, flags: &ConfigFlags) -> Result<()> {
    let state = document::open(path, flags.history_limit())?;
    let text = match format {
        Format::Markdown => state.to_markdown(),
        Format::Html => state.to_html(),
    };
    write_output(output, &text)
}

fn apply(path: &Path, script: &Path, output: Option<&Path>, flags: &ConfigFlags) -> Result<()> {
    let state = if path.exists() {
        document::open(path, flags.history_limit())?
    } else {
        EditorState::with_history_limit(flags.history_limit())
    };
    let json = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let (state, report) = run_script(state, &json)
        .with_context(|| format!("Failed to apply {}", script.display()))?;
    for (position, error) in &report.rejected {
        eprintln!("[warn] action {position}: {error}");
    }
    let target = output.unwrap_or(path);
    SavedDocument::from_state(&state).save(target)?;
    eprintln!(
        "applied {} action(s), {} rejected; saved {}",
        report.applied,
        report.rejected.len(),
        target.display()
    );
    Ok(())
}

fn nav(root: Option<PathBuf>, prefix: &str, flags: &ConfigFlags) -> Result<()> {
    let root = root
        .or_else(|| flags.docs_root.clone())
        .context("No docs root given; pass ROOT or --docs-root")?;
    let tree = build_nav(&root, prefix)?;
    write_output(None, &serde_json::to_string_pretty(&tree)?)
}

fn publish(path: &Path, no_pr: bool, flags: &ConfigFlags) -> Result<()> {
    let repository = flags
        .repository
        .as_deref()
        .context("No repository given; pass --repository owner/name")?;
    let root = flags
        .publish_root
        .clone()
        .context("No publish root given; pass --publish-root DIR")?;
    let state = document::open(path, flags.history_limit())?;
    let mut session = EditorSession::new(state, Arc::new(LocalRepoPublisher::new(root)));

    let mut request = session.publish_request(repository);
    if let Some(branch) = &flags.branch {
        request.branch.clone_from(branch);
    }
    request.create_pr = !no_pr;
    session.start_publish(request);

    match session.wait_publish() {
        Some(Ok(receipt)) => write_output(None, &serde_json::to_string_pretty(&receipt)?),
        Some(Err(err)) => Err(err.into()),
        None => anyhow::bail!("publish did not start"),
    }
}

fn show_palette(kind: Option<&str>, variant: Option<&str>) -> Result<()> {
    let json = match kind {
        Some(kind) => serde_json::to_string_pretty(&default_content_named(kind, variant)?)?,
        None => serde_json::to_string_pretty(&palette())?,
    };
    write_output(None, &json)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("DOCBLOCKS_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(%err, path = ?debug_log_path, "failed to open debug log");
    }

    let Some(command) = cli.command else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No command given; run `docblocks --help`");
    };

    match command {
        Command::Export {
            document,
            format,
            output,
        } => export(&document, format, output.as_deref(), &effective),
        Command::Apply {
            document,
            script,
            output,
        } => apply(&document, &script, output.as_deref(), &effective),
        Command::Nav { root, prefix } => nav(root, &prefix, &effective),
        Command::Publish { document, no_pr } => publish(&document, no_pr, &effective),
        Command::Palette { kind, variant } => show_palette(kind.as_deref(), variant.as_deref()),
    }
}
