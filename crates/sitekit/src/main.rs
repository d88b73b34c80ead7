use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sitekit_config::{
    CliServeOverrides, EnvConfig, ProgressSetting, load_file_config, resolve_fix_defaults,
    resolve_serve_defaults,
};
use sitekit_repair::repair_file;
use sitekit_serve::{
    MimeMap, ProgressMode, ServerConfig, ShutdownSignal, StaticServer, schedule_browser_open,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "sitekit",
    version,
    about = "Static file server and one-off JavaScript repair tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve a directory over HTTP and open it in the default browser.
    Serve(ServeArgs),
    /// Patch known syntax damage in a JavaScript file, keeping a .backup copy.
    Fix {
        /// File to repair. Defaults to the configured fix target.
        file: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Document root. Defaults to the current directory.
    #[arg(long)]
    dir: Option<PathBuf>,
    #[arg(long, conflicts_with = "no_open")]
    open: bool,
    #[arg(long)]
    no_open: bool,
    #[arg(long)]
    open_delay_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    verbose: bool,
    #[arg(long)]
    no_progress: bool,
}

fn progress_mode(setting: ProgressSetting, verbose: bool) -> ProgressMode {
    match setting {
        ProgressSetting::Silent => ProgressMode::Silent,
        ProgressSetting::Verbose => ProgressMode::Verbose,
        ProgressSetting::Auto if verbose => ProgressMode::Verbose,
        ProgressSetting::Auto => ProgressMode::Minimal,
    }
}

fn open_override(open: bool, no_open: bool) -> Option<bool> {
    match (open, no_open) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed resolving current directory")
}

fn serve_command(args: ServeArgs) -> Result<()> {
    let cwd = current_dir()?;
    let file_cfg = load_file_config(args.config.as_deref(), &cwd)?;
    let env_cfg = EnvConfig::from_current_env();
    let overrides = CliServeOverrides {
        host: args.host,
        port: args.port,
        root_dir: args.dir,
        open_browser: open_override(args.open, args.no_open),
        open_delay_ms: args.open_delay_ms,
        verbose: args.verbose.then_some(true),
        no_progress: args.no_progress.then_some(true),
    };
    let resolved = resolve_serve_defaults(&overrides, &env_cfg, file_cfg.as_ref());
    let progress = progress_mode(resolved.progress, resolved.verbose);
    if matches!(progress, ProgressMode::Verbose) {
        eprintln!("[sitekit] serve settings: {resolved:?}");
    }

    let server = StaticServer::bind(ServerConfig {
        host: resolved.host,
        port: resolved.port,
        root_dir: resolved.root_dir,
        mime: MimeMap::default().with_overrides(resolved.mime_types),
        progress,
    })?;

    let shutdown = ShutdownSignal::new();
    shutdown.install_interrupt_handler()?;

    let url = server.url();
    println!("serving {} at {url}", server.root_dir().display());
    println!("press Ctrl+C to stop");

    if resolved.open_browser {
        schedule_browser_open(url, Duration::from_millis(resolved.open_delay_ms))
            .context("failed scheduling browser launch")?;
    }

    server.serve_until(&shutdown);
    println!("server stopped");
    Ok(())
}

fn fix_command(file: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let cwd = current_dir()?;
    // Only a failed read of the target file may stop a repair.
    let file_cfg = load_file_config(config, &cwd).unwrap_or_else(|err| {
        eprintln!("warning: ignoring config: {err:#}");
        None
    });
    let env_cfg = EnvConfig::from_current_env();
    let resolved = resolve_fix_defaults(file, &env_cfg, file_cfg.as_ref());

    let outcome = repair_file(&resolved.target)?;
    println!("created backup {}", outcome.backup_path.display());
    for line in outcome.report.diagnostic_lines() {
        println!("{line}");
    }
    if !outcome.report.changed() {
        println!("no changes needed");
    }
    println!("wrote {}", outcome.path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve_command(args),
        Commands::Fix { file, config } => fix_command(file.as_deref(), config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, open_override, progress_mode};
    use clap::CommandFactory;
    use sitekit_config::ProgressSetting;
    use sitekit_serve::ProgressMode;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn auto_progress_follows_verbose_flag() {
        assert_eq!(progress_mode(ProgressSetting::Auto, false), ProgressMode::Minimal);
        assert_eq!(progress_mode(ProgressSetting::Auto, true), ProgressMode::Verbose);
        assert_eq!(progress_mode(ProgressSetting::Silent, true), ProgressMode::Silent);
    }

    #[test]
    fn open_flags_map_to_override() {
        assert_eq!(open_override(false, false), None);
        assert_eq!(open_override(true, false), Some(true));
        assert_eq!(open_override(false, true), Some(false));
    }
}
