//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use lsweb_core::OutputFormat;

/// List or download the files linked from a web page.
///
/// lsweb reads links from a page, a local file, or a GitHub repository's
/// releases, then prints them or downloads them.
#[derive(Parser, Debug)]
#[command(name = "lsweb")]
#[command(author, version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "input_file"])))]
pub struct Args {
    /// Page URL to read links from (a repository URL with --gh)
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Local HTML, JSON or text file to read links from
    #[arg(short = 'i', long)]
    pub input_file: Option<PathBuf>,

    /// Treat --url as a GitHub repository and list its release assets
    #[arg(long, requires = "url", conflicts_with = "input_file")]
    pub gh: bool,

    /// Print the links (the default when --download is not given)
    #[arg(short = 'L', long)]
    pub list: bool,

    /// Download the links
    #[arg(short = 'D', long)]
    pub download: bool,

    /// Download in parallel instead of one at a time
    #[arg(short = 'S', long)]
    pub simultaneous: bool,

    /// Listing format: txt, json, numbered or html
    #[arg(short = 'O', long)]
    pub output_format: Option<OutputFormat>,

    /// Write the listing to this file instead of stdout
    #[arg(short = 'F', long)]
    pub output_file: Option<PathBuf>,

    /// Keep only links matching this regular expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Keep only the first N links (0 for all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum simultaneous downloads
    #[arg(short = 'c', long)]
    pub max_concurrent: Option<usize>,

    /// Replace files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    pub ignore_cert: bool,

    /// Directory downloads are written to
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Hide download progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Links are listed unless only `--download` was asked for.
    #[must_use]
    pub fn should_list(&self) -> bool {
        self.list || !self.download
    }
}
