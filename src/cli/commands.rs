use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `Afterword` - reads a bookshelf photo and recommends what to read, watch
/// and listen to next.
#[derive(Parser, Debug)]
#[command(name = "afterword")]
#[command(version = "0.1.0")]
#[command(about = "Bookshelf photo analysis with cross-media recommendations.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service
    Serve {
        /// Port to listen on (default: gateway.port from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default: gateway.host from config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Analyze one local shelf photo and print the result as JSON
    Analyze {
        /// Path to a JPEG, PNG, GIF or WebP image
        image: PathBuf,

        /// Print compact JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Spawn the configured tool provider and list the tools it offers
    Tools,
}
