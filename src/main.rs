use boom::scaffold::MetadataEdit;
use boom::site::Site;
use boom::{config, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boom")]
#[command(about = "Static site generator for markdown content trees")]
#[command(long_about = "\
Static site generator for markdown content trees

Every markdown file becomes a page, every directory a paginated listing of
its files and sub-directories, and every tag a listing of the files using it.

Site structure:

  my-site/
  ├── boom.toml                 # Optional config (run 'boom gen-config')
  ├── content/
  │   ├── _index.md             # Metadata and body of the root listing
  │   ├── about.md              # → /about
  │   └── blog/
  │       ├── _index.md         # theme, templates, pagination inherited below
  │       └── hello.md          # → /blog/hello
  ├── themes/
  │   └── paper/                # tera templates: directory.html, file.html,
  │                             # tagfiles.html; other files copied as-is
  └── assets/                   # → public/assets

Front matter is TOML between two '+++' lines:

  +++
  title = \"Hello\"
  create_time = 2024-03-01T09:00:00Z
  tags = [\"rust\", \"notes\"]
  +++

URLs:
  /blog             first page of the blog listing
  /blog/2           second page
  /blog/tag-rust    files tagged 'rust' below /blog
  /blog/hello       a single file")]
#[command(version)]
struct Cli {
    /// Site root holding boom.toml and the content directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the whole site into the output directory
    Build {
        /// Output directory (overrides output_dir in boom.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Build draft content too
        #[arg(long)]
        drafts: bool,
        /// Resolve metadata and load themes afresh for every page
        #[arg(long)]
        no_cache: bool,
        /// Minify the generated HTML
        #[arg(long)]
        minify: bool,
    },
    /// Render every page in memory and report problems, without writing files
    Check {
        /// Check draft content too
        #[arg(long)]
        drafts: bool,
    },
    /// Print the template data of one URL as JSON
    Inspect {
        /// Site URL, e.g. /blog/2 or /blog/tag-rust
        url: String,
        /// Treat draft content as published
        #[arg(long)]
        drafts: bool,
    },
    /// Create a content file, or update the front matter of an existing one
    New {
        /// Path inside the content directory, e.g. blog/hello
        path: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Tag to add (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Mark the content as a draft
        #[arg(long)]
        draft: bool,
    },
    /// Print a stock boom.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build {
            output: output_dir,
            drafts,
            no_cache,
            minify,
        } => {
            let mut site = Site::open(&cli.root)?;
            let config = site.config_mut();
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            config.build.drafts |= drafts;
            config.build.cache &= !no_cache;
            config.build.minify |= minify;
            config.validate()?;

            println!("==> Building {}", site.content_path().display());
            let report = site.build()?;
            output::print_build_report(&report);
            println!("==> Build complete: {}", report.output.display());
        }
        Command::Check { drafts } => {
            let mut site = Site::open(&cli.root)?;
            site.config_mut().build.drafts |= drafts;
            println!("==> Checking {}", site.content_path().display());
            let report = site.check()?;
            output::print_check_report(&report);
        }
        Command::Inspect { url, drafts } => {
            let mut site = Site::open(&cli.root)?;
            site.config_mut().build.drafts |= drafts;
            let inspection = site.inspect(&url)?;
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
        Command::New {
            path,
            title,
            description,
            author,
            tags,
            draft,
        } => {
            let site = Site::open(&cli.root)?;
            let edit = MetadataEdit {
                title,
                description,
                author,
                tags,
                draft,
            };
            let (path, record) = site.new_content(&path, &edit, chrono::Utc::now())?;
            output::print_new_content(&path, &record);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` or else by `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "boom=debug" } else { "boom=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
