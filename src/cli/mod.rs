//! Command-line interface for tplc.
//!
//! # Available Commands
//!
//! - `render` - Render templates with a data file, partials and front matter
//! - `slugify` - Print the slug of a string
//! - `escape` - Escape a string for a URI component or a regular expression
//!
//! # Command Usage Patterns
//!
//! ```bash
//! # Render a page that extends a layout, with site data
//! tplc render pages/first.tpl --data data.json --partial _layout.tpl
//!
//! # Several pages in one run, sharing one base context
//! tplc render first.tpl second.tpl third/third.tpl --data data.json
//!
//! # Writing to a file with custom renderer options
//! tplc render pages/first.tpl --data data.json --partial _layout.tpl \
//!     --options tplc.json --output public/first.html
//!
//! # Text helpers
//! tplc slugify "Hello, World!"            # hello-world
//! tplc slugify --camel HTTPServerName     # http-server-name
//! tplc escape --method uri "a b&c"        # a%20b%26c
//! tplc escape --method regexp "1.5*2"     # 1\.5\*2
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//!
//! `RUST_LOG` overrides both.

mod escape;
mod render;
mod slugify;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use escape::EscapeCommand;
pub use render::RenderCommand;
pub use slugify::SlugifyCommand;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set; `None` disables logging.
    pub log_level: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// Logs go to stderr so rendered output on stdout stays clean. Safe to call
    /// more than once; later calls are ignored.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Template compiler: render templates with JSON data, front matter and layouts.
#[derive(Parser)]
#[command(
    name = "tplc",
    about = "Template compiler - render Tera templates with JSON data and front matter",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging to stderr)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one or more templates.
    ///
    /// See [`RenderCommand`] for options.
    Render(RenderCommand),

    /// Print the slug of a string.
    Slugify(SlugifyCommand),

    /// Escape a string for a URI component or a regular expression.
    Escape(EscapeCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    ///
    /// Verbose maps to `debug`, quiet disables logging, and the default is `warn`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Render(cmd) => cmd.execute().await,
            Commands::Slugify(cmd) => cmd.execute(),
            Commands::Escape(cmd) => cmd.execute(),
        }
    }
}
