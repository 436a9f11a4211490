//! Command line interface for the VerseCast theme editor
//!
//! Every subcommand opens the theme it names, drives an editing session and
//! saves through the local store, so themes can be managed without the UI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use versecast_core::ThemeVariant;

/// VerseCast CLI arguments
///
/// Examples:
///   versecast list --variant bible              # Themes in the Bible namespace
///   versecast new --variant song "Evening"      # Create and apply a song theme
///   versecast move-line -v bible <ID> 3 0       # Move the fourth line to the top
///   versecast hide-line -v bible <ID> reference # Hide the Hebrew reference
///   versecast config --max-boxes 2              # Change editor settings
#[derive(Parser, Debug, Clone)]
#[command(
    name = "versecast",
    version,
    about = "Theme editor for VerseCast live text overlays"
)]
pub struct CliArgs {
    /// Directory holding the theme database
    ///
    /// Defaults to the platform data directory, e.g. ~/.local/share/versecast.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Variant namespace selector shared by theme commands
#[derive(clap::Args, Debug, Clone)]
pub struct VariantArg {
    /// Theme variant: generic, bible or song (namespaces are accepted too)
    #[arg(long, short = 'v', default_value = "generic")]
    pub variant: ThemeVariant,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List themes of a variant
    List {
        #[command(flatten)]
        variant: VariantArg,
    },

    /// Print a theme as its normalized record
    Show {
        #[command(flatten)]
        variant: VariantArg,
        id: String,
    },

    /// Create a theme from defaults, save and apply it
    New {
        #[command(flatten)]
        variant: VariantArg,
        name: String,
    },

    /// Broadcast an existing theme to the displays
    Apply {
        #[command(flatten)]
        variant: VariantArg,
        id: String,
    },

    /// Delete a user theme
    Delete {
        #[command(flatten)]
        variant: VariantArg,
        id: String,
    },

    /// Add a background box to a theme
    AddBox {
        #[command(flatten)]
        variant: VariantArg,
        id: String,
    },

    /// Move a line within the layer order
    MoveLine {
        #[command(flatten)]
        variant: VariantArg,
        id: String,
        from: usize,
        to: usize,
    },

    /// Hide (or with --show, reveal) one line of a theme
    HideLine {
        #[command(flatten)]
        variant: VariantArg,
        id: String,
        line: String,
        #[arg(long)]
        show: bool,
    },

    /// Show or change editor settings
    Config {
        /// How long the saved indicator stays up, in milliseconds
        #[arg(long = "saved-status-ms")]
        saved_status_ms: Option<u64>,

        /// Background box limit per theme (at most 3)
        #[arg(long = "max-boxes")]
        max_boxes: Option<usize>,
    },
}

impl CliArgs {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("versecast")
        })
    }
}
