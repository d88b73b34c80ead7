use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "sitekit.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OPEN_DELAY_MS: u64 = 1000;
pub const DEFAULT_FIX_TARGET: &str = "js/views/zero-trust-executive-platform.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressSetting {
    Auto,
    Silent,
    Verbose,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root_dir: Option<PathBuf>,
    pub open_browser: Option<bool>,
    pub open_delay_ms: Option<u64>,
    pub mime_types: Option<BTreeMap<String, String>>,
    pub fix_target: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub progress: Option<ProgressSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root_dir: Option<PathBuf>,
    pub open_browser: Option<bool>,
    pub open_delay_ms: Option<u64>,
    pub fix_target: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub progress: Option<ProgressSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root_dir: Option<PathBuf>,
    pub open_browser: Option<bool>,
    pub open_delay_ms: Option<u64>,
    pub verbose: Option<bool>,
    pub no_progress: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeDefaults {
    pub host: String,
    pub port: u16,
    pub root_dir: PathBuf,
    pub open_browser: bool,
    pub open_delay_ms: u64,
    pub mime_types: BTreeMap<String, String>,
    pub verbose: bool,
    pub progress: ProgressSetting,
}

impl Default for ServeDefaults {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root_dir: PathBuf::from("."),
            open_browser: true,
            open_delay_ms: DEFAULT_OPEN_DELAY_MS,
            mime_types: BTreeMap::new(),
            verbose: false,
            progress: ProgressSetting::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixDefaults {
    pub target: PathBuf,
}

pub fn load_file_config(explicit_path: Option<&Path>, cwd: &Path) -> Result<Option<FileConfig>> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                return Ok(None);
            }
            candidate
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let parsed: FileConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    Ok(Some(parsed))
}

impl EnvConfig {
    pub fn from_current_env() -> Self {
        Self {
            host: env::var("SITEKIT_HOST").ok(),
            port: env::var("SITEKIT_PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            root_dir: env::var_os("SITEKIT_ROOT").map(PathBuf::from),
            open_browser: env::var("SITEKIT_OPEN").ok().and_then(|v| parse_bool(&v)),
            open_delay_ms: env::var("SITEKIT_OPEN_DELAY_MS")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            fix_target: env::var_os("SITEKIT_FIX_TARGET").map(PathBuf::from),
            verbose: env::var("SITEKIT_VERBOSE").ok().and_then(|v| parse_bool(&v)),
            progress: env::var("SITEKIT_PROGRESS")
                .ok()
                .and_then(|v| parse_progress(&v)),
        }
    }
}

pub fn resolve_serve_defaults(
    cli: &CliServeOverrides,
    env_cfg: &EnvConfig,
    file_cfg: Option<&FileConfig>,
) -> ServeDefaults {
    let base = ServeDefaults::default();

    let host = cli
        .host
        .clone()
        .or_else(|| env_cfg.host.clone())
        .or_else(|| file_cfg.and_then(|c| c.host.clone()))
        .unwrap_or(base.host);

    let port = cli
        .port
        .or(env_cfg.port)
        .or(file_cfg.and_then(|c| c.port))
        .unwrap_or(base.port);

    let root_dir = cli
        .root_dir
        .clone()
        .or_else(|| env_cfg.root_dir.clone())
        .or_else(|| file_cfg.and_then(|c| c.root_dir.clone()))
        .unwrap_or(base.root_dir);

    let open_browser = cli
        .open_browser
        .or(env_cfg.open_browser)
        .or(file_cfg.and_then(|c| c.open_browser))
        .unwrap_or(base.open_browser);

    let open_delay_ms = cli
        .open_delay_ms
        .or(env_cfg.open_delay_ms)
        .or(file_cfg.and_then(|c| c.open_delay_ms))
        .unwrap_or(base.open_delay_ms);

    let mime_types = file_cfg
        .and_then(|c| c.mime_types.clone())
        .unwrap_or(base.mime_types);

    let verbose = cli
        .verbose
        .or(env_cfg.verbose)
        .or(file_cfg.and_then(|c| c.verbose))
        .unwrap_or(base.verbose);

    let mut progress = env_cfg
        .progress
        .or(file_cfg.and_then(|c| c.progress))
        .unwrap_or(base.progress);

    if cli.no_progress == Some(true) {
        progress = ProgressSetting::Silent;
    }

    ServeDefaults {
        host,
        port,
        root_dir,
        open_browser,
        open_delay_ms,
        mime_types,
        verbose,
        progress,
    }
}

pub fn resolve_fix_defaults(
    cli_target: Option<&Path>,
    env_cfg: &EnvConfig,
    file_cfg: Option<&FileConfig>,
) -> FixDefaults {
    let target = cli_target
        .map(Path::to_path_buf)
        .or_else(|| env_cfg.fix_target.clone())
        .or_else(|| file_cfg.and_then(|c| c.fix_target.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIX_TARGET));
    FixDefaults { target }
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_progress(input: &str) -> Option<ProgressSetting> {
    match input.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(ProgressSetting::Auto),
        "silent" => Some(ProgressSetting::Silent),
        "verbose" => Some(ProgressSetting::Verbose),
        _ => None,
    }
}
