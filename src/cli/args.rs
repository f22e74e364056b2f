//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_CONFIG_FILE, FreezeOverrides, HashAlgorithm, MissingPolicy, is_blank_dir};
use crate::utils::path::absolutize;

/// Content-addressed asset freezing for static sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: freeze.toml)
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the selected subcommand asked for verbose output.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Freeze { args } => args.verbose,
            Commands::Resolve { args } => args.verbose,
            Commands::Init { .. } => false,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a freeze.toml template
    #[command(visible_alias = "i")]
    Init {
        /// Target file (defaults to --config)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: Option<PathBuf>,

        /// Print the template instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Freeze the files linked from stylesheets into an output directory
    #[command(visible_alias = "f")]
    Freeze {
        #[command(flatten)]
        args: FreezeArgs,
    },

    /// Re-resolve a written freeze map for its current location
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },
}

/// Freeze command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct FreezeArgs {
    /// Directory scanned for `.css` files
    #[arg(value_name = "INPUT_DIR", value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Directory receiving stylesheets, frozen files and the freeze map
    #[arg(short, long, value_name = "OUTPUT_DIR", value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Shard directory depth (0 = flat)
    #[arg(short, long)]
    pub nesting_level: Option<usize>,

    /// Freeze map file name
    #[arg(short, long = "map-file")]
    pub map_file: Option<String>,

    /// Write freeze map paths relative to this directory
    #[arg(short = 'b', long, value_hint = clap::ValueHint::DirPath)]
    pub map_base_dir: Option<PathBuf>,

    /// Fail stylesheets that link missing files instead of keeping the link
    #[arg(short, long)]
    pub strict: bool,

    /// Digest for frozen file names (sha1, blake3)
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl FreezeArgs {
    /// Config overrides carried by these flags.
    pub fn overrides(&self) -> FreezeOverrides {
        FreezeOverrides {
            nesting_level: self.nesting_level,
            map_file_name: self.map_file.clone(),
            map_base_dir: base_dir_override(self.map_base_dir.as_deref()),
            on_missing: self.strict.then_some(MissingPolicy::Error),
            hash: self.hash,
        }
    }
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Freeze map to rewrite in place
    #[arg(value_name = "MAP_FILE", value_hint = clap::ValueHint::FilePath)]
    pub map_file: PathBuf,

    /// Write freeze map paths relative to this directory
    #[arg(short = 'b', long, value_hint = clap::ValueHint::DirPath)]
    pub map_base_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl ResolveArgs {
    pub fn overrides(&self) -> FreezeOverrides {
        FreezeOverrides {
            map_base_dir: base_dir_override(self.map_base_dir.as_deref()),
            ..Default::default()
        }
    }
}

fn base_dir_override(dir: Option<&Path>) -> Option<PathBuf> {
    dir.filter(|dir| !is_blank_dir(dir)).map(absolutize)
}
