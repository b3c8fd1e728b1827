//! Command-line arguments and the conversion pipeline.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use markplate::template::{MiniJinjaEngine, TemplateEngine, TemplateRegistry};
use markplate::{parse, RenderConfig, TemplateRenderer};

/// Convert markdown to HTML, overriding elements with templates.
#[derive(Debug, Parser)]
#[command(name = "markplate", version)]
pub struct Args {
    /// Markdown input file [default: stdin]
    pub input: Option<PathBuf>,

    /// HTML output file [default: stdout]
    pub output: Option<PathBuf>,

    /// Template directory or YAML template bundle
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable typographic substitutions
    #[arg(long)]
    pub no_smartypants: bool,

    /// Use `--` as em dash instead of LaTeX-style dashes
    #[arg(long = "no-latexdashes")]
    pub no_latex_dashes: bool,

    /// Only convert 1/2, 1/4 and 3/4 to fractions
    #[arg(long)]
    pub no_fractions: bool,

    /// Generate a complete HTML page
    #[arg(long)]
    pub page: bool,

    /// Page title [default: first heading]
    #[arg(long, requires = "page")]
    pub title: Option<String>,

    /// Stylesheet to link from the page
    #[arg(long, value_name = "URL", requires = "page")]
    pub css: Option<String>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// The configuration file (if any) with command-line overrides applied.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(template) = &self.template {
            config.templates = Some(template.clone());
        }

        let html = &mut config.html;
        if self.no_smartypants {
            html.smartypants = false;
        }
        if self.no_latex_dashes {
            html.smartypants_latex_dashes = false;
        }
        if self.no_fractions {
            html.smartypants_fractions = false;
        }
        if self.page {
            html.complete_page = true;
        }
        if let Some(title) = &self.title {
            html.title = Some(title.clone());
        }
        if let Some(css) = &self.css {
            html.css = Some(css.clone());
        }

        Ok(config)
    }
}

/// Builds the renderer described by `config`, loading its templates.
pub fn build_renderer(config: &RenderConfig) -> Result<TemplateRenderer> {
    let engine: Option<Box<dyn TemplateEngine>> = match &config.templates {
        Some(path) => {
            let mut registry = TemplateRegistry::new();
            registry
                .add_path(path)
                .with_context(|| format!("failed to load templates from {}", path.display()))?;
            let engine = MiniJinjaEngine::from_registry(&registry)
                .with_context(|| format!("failed to compile templates from {}", path.display()))?;
            tracing::info!(path = %path.display(), names = registry.len(), "templates loaded");
            Some(Box::new(engine))
        }
        None => None,
    };
    Ok(TemplateRenderer::with_html(engine, config.html.clone()))
}

/// Runs one conversion.
pub fn run(args: &Args) -> Result<()> {
    let config = args.render_config()?;
    let renderer = build_renderer(&config)?;

    let markdown = read_input(args.input.as_deref())?;
    let document = parse(&markdown, &config.extensions);
    let html = renderer.render(&document).context("rendering failed")?;

    write_output(args.output.as_deref(), &html)
}

/// Reads the markdown source. Invalid UTF-8 is replaced with U+FFFD.
fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            bytes
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_output(path: Option<&Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write stdout")
        }
    }
}
