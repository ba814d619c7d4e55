//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// OpenGraph metadata for wiki pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print debug messages (skipped annotations, lookups)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config path to load and whether it must exist.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the OpenGraph metadata of one page
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Check a site file for problems the resolver would skip over
    #[command(visible_alias = "v")]
    Validate {
        /// Site fixture file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        site: PathBuf,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Site fixture file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub site: PathBuf,

    /// Page reference, e.g. `Blog.Hello`
    #[arg(short, long)]
    pub page: String,

    /// Render as this user (guest when omitted)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Requested locale, e.g. `fr`
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<meta property=".." content="..">` lines
    Html,
    /// JSON object of property → values
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "ogmeta", "render", "site.toml", "--page", "Blog.Hello", "-u", "alice", "-f", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Render { args } => {
                assert_eq!(args.site, PathBuf::from("site.toml"));
                assert_eq!(args.page, "Blog.Hello");
                assert_eq!(args.user.as_deref(), Some("alice"));
                assert_eq!(args.locale, None);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_config_path_default_is_optional() {
        let cli = Cli::try_parse_from(["ogmeta", "validate", "site.toml"]).unwrap();
        assert_eq!(cli.config_path(), (PathBuf::from(DEFAULT_CONFIG_FILE), false));

        let cli = Cli::try_parse_from(["ogmeta", "-C", "og.toml", "v", "site.toml"]).unwrap();
        assert_eq!(cli.config_path(), (PathBuf::from("og.toml"), true));
    }

    #[test]
    fn test_render_requires_page() {
        assert!(Cli::try_parse_from(["ogmeta", "render", "site.toml"]).is_err());
    }
}
