//! CLI entry point for lsweb.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use lsweb_core::{
    DownloadEngine, SourceSpec, build_source, filter_links, limit_links, render_links,
};
use tracing::{debug, info, warn};

mod app_config;
mod cli;

use app_config::{load_default_file_config, merge_settings};
use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = load_default_file_config().context("Failed to load configuration")?;
    let settings = merge_settings(&args, file_config.as_ref());
    debug!(config = ?settings.config, format = %settings.output_format, "settings resolved");

    let spec = match (&args.url, &args.input_file) {
        (Some(url), _) if args.gh => SourceSpec::GithubReleases(url.clone()),
        (Some(url), _) => SourceSpec::WebPage(url.clone()),
        (None, Some(path)) => SourceSpec::LocalFile(path.clone()),
        (None, None) => bail!("either --url or --input-file is required"),
    };

    let source = build_source(spec, &settings.config).context("Failed to initialize HTTP client")?;
    info!(source = source.name(), location = %source.location(), "Reading links");

    let extraction = source
        .links()
        .await
        .with_context(|| format!("Failed to read links from {}", source.location()))?;

    if !extraction.malformed.is_empty() {
        warn!(
            count = extraction.malformed_count(),
            "Skipped malformed links"
        );
    }

    let mut links = extraction.links;
    if let Some(pattern) = &args.filter {
        links = filter_links(&links, pattern)
            .with_context(|| format!("Invalid --filter pattern '{pattern}'"))?;
    }
    let links = limit_links(links, args.limit);
    info!(count = links.len(), "Found links");

    if args.should_list() {
        let rendered = render_links(&links, settings.output_format);
        write_listing(&rendered, args.output_file.as_deref())?;
    }

    if args.download {
        if links.is_empty() {
            info!("No links to download");
            return Ok(());
        }

        tokio::fs::create_dir_all(&args.output_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory '{}'",
                    args.output_dir.display()
                )
            })?;

        let engine = DownloadEngine::new(&settings.config, &args.output_dir)
            .context("Failed to initialize download client")?;
        let show_progress = !args.no_progress && !args.quiet && io::stderr().is_terminal();

        let stats = if args.simultaneous {
            engine
                .download_all_concurrently(&links, show_progress)
                .await
        } else {
            engine.download_all(&links, show_progress).await
        }
        .context("Download failed")?;

        info!(
            completed = stats.completed(),
            failed = stats.failures(),
            total = stats.total(),
            "Download complete"
        );
    }

    Ok(())
}

fn write_listing(rendered: &str, output_file: Option<&Path>) -> Result<()> {
    let mut text = rendered.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }

    match output_file {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(path = %path.display(), "Wrote link listing");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
