//! Command-line surface: `papyr build` and `papyr serve`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Papyr static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (defaults to the current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: papyr.toml)
    #[arg(short = 'C', long, default_value = "papyr.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Build arguments shared by `build` and `serve`.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Where to write the site, relative to the project root
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Treat any per-document error as fatal
    #[arg(long)]
    pub strict: bool,

    /// Include draft documents in the output
    #[arg(long = "include-drafts")]
    pub include_drafts: bool,

    /// Minify HTML and XML output
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the site from memory. Rebuild on change automatically
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind
        #[arg(short, long)]
        interface: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Rebuild when content changes
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let cli = Cli::parse_from([
            "papyr",
            "build",
            "--destination",
            "dist",
            "--strict",
            "--include-drafts",
        ]);
        let Commands::Build { build_args } = &cli.command else {
            panic!("expected build command");
        };
        assert_eq!(build_args.destination, Some(PathBuf::from("dist")));
        assert!(build_args.strict);
        assert!(build_args.include_drafts);
        assert!(cli.is_build());
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from(["papyr", "serve", "--port", "8000", "--watch", "false"]);
        let Commands::Serve { port, watch, .. } = &cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(*port, Some(8000));
        assert_eq!(*watch, Some(false));
        assert!(cli.is_serve());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["papyr", "build"]);
        assert_eq!(cli.config, PathBuf::from("papyr.toml"));
        assert!(cli.root.is_none());
    }
}
