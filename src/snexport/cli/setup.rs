use clap::{Parser, Subcommand, ValueEnum};
use snexport::model::ExportMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snexport", bin_name = "snexport", version)]
#[command(
    about = "Export Supernote notes as Markdown, page images or searchable PDFs",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub vault: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Transcript only
    Markdown,
    /// Page images plus a transcript embedding them
    Images,
    /// Searchable PDF
    Pdf,
}

impl From<ModeArg> for ExportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Markdown => ExportMode::Markdown,
            ModeArg::Images => ExportMode::MarkdownWithImages,
            ModeArg::Pdf => ExportMode::Pdf,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a note into the vault
    Export {
        /// Note path, relative to the vault root
        note: String,

        #[arg(long, value_enum, default_value_t = ModeArg::Markdown)]
        mode: ModeArg,

        /// Pages to render, e.g. 1,3 or 2-4 (images and PDF only)
        #[arg(long)]
        pages: Option<String>,
    },

    /// Save a single page as an image
    Image {
        note: String,
        /// 1-based page number
        page: usize,
    },

    /// Show a note's pages and recognized text
    Inspect { note: String },

    /// Tell whether a note name is a daily note
    Classify { name: String },

    /// Print the current time formatted with a date pattern
    Timestamp {
        /// Pattern to use instead of the configured daily-note pattern
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Show or change configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },

    /// Write a default configuration file
    Init,
}
