use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dvdforged")]
#[command(author, version, about = "DVD-Video table of contents authoring tool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write VIDEO_TS.IFO and VIDEO_TS.BUP for the titlesets under a disc directory
    Toc {
        /// Disc directory (the parent of VIDEO_TS)
        #[arg(required = true)]
        dir: PathBuf,

        /// TOML menu project describing the Video Manager menus
        #[arg(short, long)]
        menus: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read back a titleset control file, or every titleset in a VIDEO_TS directory
    Scan {
        /// VTS_nn_0.IFO file or VIDEO_TS directory
        #[arg(required = true)]
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
