use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ratecard",
    version,
    about = "Convert hand-authored rate card and supplier listings into JSON fixtures",
    after_help = "Paths default to the [paths] section of ratecard.toml in the project root. \
                  Each converter replaces only its own top-level key in the document; \
                  all other keys are kept as they are."
)]
pub struct Cli {
    /// Project root that relative paths and ratecard.toml are resolved against
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Pretty-print the JSON summary
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by the commands that write the fixture document.
#[derive(Args, Debug, Clone, Default)]
pub struct DocumentArgs {
    /// JSON document to merge into (overrides paths.document)
    #[arg(short, long)]
    pub document: Option<String>,

    /// Print the merged document instead of writing it
    #[arg(long)]
    pub preview: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse the rate card text and merge its items under RATE_CARD_DATA.
    ///
    /// The text holds a specs region and a pricing region separated by the
    /// section marker. A missing marker aborts the run without writing.
    Extract {
        /// Rate card text (overrides paths.rate_card_source)
        #[arg(short, long)]
        source: Option<String>,
        #[command(flatten)]
        doc: DocumentArgs,
    },

    /// Insert placeholder rate card records if RATE_CARD_DATA is missing entirely
    Restore {
        #[command(flatten)]
        doc: DocumentArgs,
    },

    /// Convert the supplier listing and merge it under PROVIDER_GROUPS_DATA
    Suppliers {
        /// Supplier listing (overrides paths.suppliers_source)
        #[arg(short, long)]
        source: Option<String>,
        #[command(flatten)]
        doc: DocumentArgs,
    },

    /// Show the effective configuration
    Show {
        /// Write the effective settings to ratecard.toml
        #[arg(long)]
        write_defaults: bool,
    },
}
