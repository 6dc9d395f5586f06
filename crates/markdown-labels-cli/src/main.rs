use anyhow::{Context, Result};
use clap::Parser;
use markdown_labels_config::Config;
use markdown_labels_engine::{LabelMode, Labels, parse_markdown};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "markdown-labels")]
#[command(about = "Numbers headings and lists in a markdown file and resolves ## references")]
struct Args {
    /// Markdown file to label
    file: PathBuf,

    /// Config file to use instead of ~/.config/markdown-labels/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label lists with CSS counters instead of inserted text
    #[arg(long)]
    css: bool,

    /// Heading template, e.g. "1.,H.1.,*"
    #[arg(long)]
    h_labels: Option<String>,

    /// Heading level the heading template starts at
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    h_level: Option<u8>,

    /// Template for top-level ordered lists
    #[arg(long)]
    ol_labels: Option<String>,

    /// Template for top-level unordered lists
    #[arg(long)]
    ul_labels: Option<String>,

    /// Write generated CSS to this file instead of inlining it
    #[arg(long)]
    stylesheet: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    let loaded = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let mut config = loaded.unwrap_or_else(|| {
        log::debug!("No config file found, using defaults");
        Config::default()
    });

    // Command-line flags win over the config file
    let labels = &mut config.labels;
    if args.css {
        labels.mode = LabelMode::Css;
    }
    if let Some(h_labels) = &args.h_labels {
        labels.h_labels = Some(h_labels.clone());
    }
    if let Some(h_level) = args.h_level {
        labels.h_level = h_level;
    }
    if let Some(ol_labels) = &args.ol_labels {
        labels.ol_labels = Some(ol_labels.clone());
    }
    if let Some(ul_labels) = &args.ul_labels {
        labels.ul_labels = Some(ul_labels.clone());
    }
    if let Some(stylesheet) = &args.stylesheet {
        config.stylesheet_path = Some(stylesheet.clone());
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut doc = parse_markdown(&content);
    let output = Labels::new(config.labels)
        .apply(&mut doc)
        .with_context(|| format!("Failed to label {}", args.file.display()))?;
    log::info!(
        "Labelled {} with {} warning(s)",
        args.file.display(),
        output.warnings.len()
    );

    if !output.stylesheet.is_empty() {
        match &config.stylesheet_path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, &output.stylesheet)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => print!("<style>\n{}</style>\n", output.stylesheet),
        }
    }
    println!("{}", doc.to_html());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
