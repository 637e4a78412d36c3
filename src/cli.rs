//! Command-line front end: expand a glob, cache bust each match and write the results.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CacheBustConfig;
use crate::discovery::require_matching_files;
use crate::options::{EventListeners, PipelineOptions};
use crate::pipeline::cache_bust;

/// Fingerprint opted-in asset references in HTML files.
#[derive(Debug, Parser)]
#[command(name = "asset-cache-bust", version, about)]
pub struct Cli {
    /// Glob used to locate HTML files to fingerprint, e.g. '*.html' or 'site/**/*.html'.
    pub input: String,

    /// Write fingerprinted HTML below this directory instead of overwriting the inputs.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory used as root for asset URLs. Defaults to the current directory.
    #[arg(long)]
    pub asset_root: Option<PathBuf>,

    /// Root that replaces the original one in rewritten URLs, e.g. https://cdn.example.com.
    #[arg(long)]
    pub replace_asset_root: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Install the global `tracing` subscriber for the requested verbosity.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbosity {
            0 => EnvFilter::new("asset_cache_bust=info"),
            1 => EnvFilter::new("asset_cache_bust=debug"),
            _ => EnvFilter::new("asset_cache_bust=trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Settings resolved from flags, the configuration file and defaults.
#[derive(Debug)]
struct RunSettings {
    working_dir: PathBuf,
    asset_root: PathBuf,
    output_dir: PathBuf,
    options: PipelineOptions,
}

impl RunSettings {
    fn resolve(cli: &Cli, working_dir: PathBuf) -> Result<Self> {
        let config = CacheBustConfig::discover(&working_dir);

        let asset_root = cli
            .asset_root
            .clone()
            .or_else(|| config.asset_root_path(&working_dir))
            .unwrap_or_else(|| working_dir.clone());

        let output_dir = cli
            .output
            .clone()
            .or_else(|| config.output.as_deref().map(|dir| PathBuf::from(dir.trim())))
            .unwrap_or_else(|| PathBuf::from("."));

        let mut options = config
            .pipeline_options()
            .context("invalid cache busting configuration")?;
        if let Some(root) = &cli.replace_asset_root {
            options.replace_asset_root = Some(root.clone());
        }
        options.event_listeners = EventListeners::with_info(|message| info!("{message}"));

        Ok(Self {
            working_dir,
            asset_root,
            output_dir,
            options,
        })
    }

    fn output_path(&self, relative: &Path) -> PathBuf {
        let output_dir = if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.working_dir.join(&self.output_dir)
        };
        output_dir.join(self.relative_to_working_dir(relative))
    }

    /// Express an input path below the working directory so it can be re-rooted under the
    /// output directory. Absolute paths elsewhere keep only their normal components.
    fn relative_to_working_dir(&self, input: &Path) -> PathBuf {
        if !input.is_absolute() {
            return input.to_path_buf();
        }
        match input.strip_prefix(&self.working_dir) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => input
                .components()
                .filter(|component| matches!(component, Component::Normal(_)))
                .collect(),
        }
    }
}

/// Process every file matched by the CLI glob, stopping at the first fatal error.
pub async fn run(cli: Cli) -> Result<()> {
    let started = Instant::now();
    let working_dir = std::env::current_dir().context("failed to determine working directory")?;
    let settings = RunSettings::resolve(&cli, working_dir)?;

    let files = require_matching_files(&settings.working_dir, &cli.input)?;
    for relative in files {
        process_file(&settings, &relative).await?;
    }

    info!("Success!");
    info!("Time consumed: {:.2?}", started.elapsed());
    Ok(())
}

async fn process_file(settings: &RunSettings, relative: &Path) -> Result<()> {
    let source = settings.working_dir.join(relative);
    let original = fs::read_to_string(&source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    info!("Read file: {}", relative.display());

    let busted = cache_bust(
        Some(original.as_str()),
        Some(settings.asset_root.as_path()),
        &settings.options,
    )
        .await
        .with_context(|| format!("failed to cache bust {}", relative.display()))?
        .unwrap_or_default();

    let destination = settings.output_path(relative);
    if busted == original {
        info!(
            "No cache busting replacements have been made. Skipping file: {}",
            destination.display()
        );
        return Ok(());
    }

    write_output(&destination, &busted)?;
    info!("Wrote file: {}", destination.display());
    Ok(())
}

fn write_output(destination: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(destination, contents)
        .with_context(|| format!("failed to write {}", destination.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("asset-cache-bust").chain(args.iter().copied()))
    }

    fn site() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("css/site.css"), "body {}").unwrap();
        fs::write(
            root.join("index.html"),
            r#"<link href="/css/site.css" rel="stylesheet" data-finger-print>"#,
        )
        .unwrap();
        fs::write(root.join("plain.html"), "<p>plain</p>").unwrap();
        dir
    }

    #[test]
    fn parses_flags() {
        let parsed = cli(&["*.html", "-o", "out", "--asset-root", "public", "-vv"]);
        assert_eq!(parsed.input, "*.html");
        assert_eq!(parsed.output, Some(PathBuf::from("out")));
        assert_eq!(parsed.asset_root, Some(PathBuf::from("public")));
        assert_eq!(parsed.verbose, 2);
    }

    #[test]
    fn flags_override_configuration() {
        let dir = site();
        fs::write(
            dir.path().join(crate::config::DEFAULT_CONFIG_FILE),
            r#"{ "output": "dist", "replaceAssetRoot": "http://config" }"#,
        )
        .unwrap();

        let parsed = cli(&["*.html", "--replace-asset-root", "http://flag"]);
        let settings = RunSettings::resolve(&parsed, dir.path().to_path_buf()).unwrap();

        assert_eq!(settings.asset_root, dir.path());
        assert_eq!(settings.output_dir, PathBuf::from("dist"));
        assert_eq!(settings.options.replace_root(), Some("http://flag"));
    }

    #[tokio::test]
    async fn writes_changed_files_to_output_directory() {
        let dir = site();
        let parsed = cli(&["*.html", "-o", "out"]);
        let settings = RunSettings::resolve(&parsed, dir.path().to_path_buf()).unwrap();

        process_file(&settings, Path::new("index.html")).await.unwrap();
        process_file(&settings, Path::new("plain.html")).await.unwrap();

        let written = fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(written.contains("/css/site.css?v="));
        assert!(!dir.path().join("out/plain.html").exists());
    }

    #[test]
    fn surfaces_invalid_listener_configuration() {
        let dir = site();
        fs::write(
            dir.path().join(crate::config::DEFAULT_CONFIG_FILE),
            r#"{ "eventListeners": { "info": "console" } }"#,
        )
        .unwrap();

        let parsed = cli(&["*.html"]);
        assert!(RunSettings::resolve(&parsed, dir.path().to_path_buf()).is_err());
    }

    #[tokio::test]
    async fn keeps_absolute_inputs_under_output_directory() {
        let dir = site();
        let parsed = cli(&["*.html", "-o", "out"]);
        let settings = RunSettings::resolve(&parsed, dir.path().to_path_buf()).unwrap();
        let absolute = dir.path().join("index.html");

        process_file(&settings, &absolute).await.unwrap();

        let written = fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(written.contains("/css/site.css?v="));
        let original = fs::read_to_string(&absolute).unwrap();
        assert!(!original.contains("?v="));
    }

    #[test]
    fn re_roots_absolute_paths_outside_the_working_directory() {
        let dir = site();
        let parsed = cli(&["*.html", "-o", "out"]);
        let settings = RunSettings::resolve(&parsed, dir.path().to_path_buf()).unwrap();
        let elsewhere = tempdir().unwrap();
        let absolute = elsewhere.path().join("page.html");

        let destination = settings.output_path(&absolute);
        assert!(destination.starts_with(dir.path().join("out")));
        assert!(destination.ends_with("page.html"));
    }
}
