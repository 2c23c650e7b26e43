use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::editor::DEFAULT_HISTORY_LIMIT;

/// Defaults read from flag files and the command line.
///
/// Flag files hold the same `--flag value` tokens the CLI accepts, one or
/// more per line; `#` starts a comment line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub history_limit: Option<usize>,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub publish_root: Option<PathBuf>,
    pub docs_root: Option<PathBuf>,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for values it sets.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            history_limit: other.history_limit.or(self.history_limit),
            repository: other.repository.clone().or_else(|| self.repository.clone()),
            branch: other.branch.clone().or_else(|| self.branch.clone()),
            publish_root: other
                .publish_root
                .clone()
                .or_else(|| self.publish_root.clone()),
            docs_root: other.docs_root.clone().or_else(|| self.docs_root.clone()),
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("docblocks").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("docblocks")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("docblocks").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("docblocks")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".docblocksrc")
}

/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
/// Returns an error if the file or its directory cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# docblocks defaults (saved with --save)".to_string()];
    if let Some(limit) = flags.history_limit {
        lines.push(format!("--history-limit {limit}"));
    }
    if let Some(repository) = &flags.repository {
        lines.push(format!("--repository {repository}"));
    }
    if let Some(branch) = &flags.branch {
        lines.push(format!("--branch {branch}"));
    }
    if let Some(root) = &flags.publish_root {
        lines.push(format!("--publish-root {}", root.display()));
    }
    if let Some(root) = &flags.docs_root {
        lines.push(format!("--docs-root {}", root.display()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Value of `--name value` or `--name=value` at `tokens[*i]`, advancing
/// past a separate value token.
fn flag_value<'a>(tokens: &'a [String], i: &mut usize, name: &str) -> Option<&'a str> {
    let token = tokens[*i].as_str();
    if token == name {
        let value = tokens.get(*i + 1)?;
        *i += 1;
        return Some(value);
    }
    token.strip_prefix(name)?.strip_prefix('=')
}

/// Pick the known flags out of `tokens`, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] == "--perf" {
            flags.perf = true;
        } else if let Some(value) = flag_value(tokens, &mut i, "--history-limit") {
            match value.parse() {
                Ok(limit) => flags.history_limit = Some(limit),
                Err(_) => tracing::warn!(value, "ignoring invalid --history-limit"),
            }
        } else if let Some(value) = flag_value(tokens, &mut i, "--repository") {
            flags.repository = Some(value.to_string());
        } else if let Some(value) = flag_value(tokens, &mut i, "--branch") {
            flags.branch = Some(value.to_string());
        } else if let Some(value) = flag_value(tokens, &mut i, "--publish-root") {
            flags.publish_root = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--docs-root") {
            flags.docs_root = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--debug-log") {
            flags.debug_log = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}
