//! blockpage CLI - render page documents to HTML

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use blockpage::{
    check_page, load_page, parse_document, render_html, render_not_found, DirectorySource,
    HtmlConfig, PageView, Result,
};

#[derive(Parser)]
#[command(name = "blockpage")]
#[command(version)]
#[command(about = "Render block-based page documents to HTML", long_about = None)]
struct Cli {
    /// Renderer configuration (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit a complete HTML document
    #[arg(short, long, global = true)]
    standalone: bool,

    /// Show debug logging (skipped and malformed blocks)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page document file ("-" for stdin)
    Render {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render `<ROOT>/<OWNER>/<SLUG>.json`, or the not-found page
    ServePage {
        /// Directory holding one sub-directory per owner
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        owner: String,

        slug: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List blocks that would render as nothing
    Check {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = load_config(cli.config.as_deref(), cli.standalone).and_then(|config| {
        match cli.command {
            Commands::Render { input, output } => cmd_render(&input, output.as_deref(), &config),
            Commands::ServePage {
                root,
                owner,
                slug,
                output,
            } => cmd_page(&root, &owner, &slug, output.as_deref(), &config),
            Commands::Check { input } => cmd_check(&input),
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>, standalone: bool) -> Result<HtmlConfig> {
    let mut config = match path {
        Some(path) => HtmlConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => HtmlConfig::default(),
    };
    if standalone {
        config.standalone = true;
    }
    Ok(config)
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, html)?,
        None => print!("{}", html),
    }
    Ok(())
}

fn cmd_render(input: &Path, output: Option<&Path>, config: &HtmlConfig) -> Result<ExitCode> {
    let doc = parse_document(&read_input(input)?)?;
    let html = blockpage::render::render(&doc, config)?;
    write_output(output, &html)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_page(
    root: &Path,
    owner: &str,
    slug: &str,
    output: Option<&Path>,
    config: &HtmlConfig,
) -> Result<ExitCode> {
    let source = DirectorySource::new(root);

    match load_page(&source, owner, slug) {
        PageView::Found(page) => {
            write_output(output, &render_html(&page, config)?)?;
            Ok(ExitCode::SUCCESS)
        }
        PageView::NotFound(not_found) => {
            write_output(output, &render_not_found(&not_found, config)?)?;
            Ok(ExitCode::from(2))
        }
    }
}

fn cmd_check(input: &Path) -> Result<ExitCode> {
    let doc = parse_document(&read_input(input)?)?;
    let diagnostics = check_page(&doc);

    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }

    if diagnostics.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
