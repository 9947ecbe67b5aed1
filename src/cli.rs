use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Links,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[derive(Parser)]
#[command(
    name = "ytview",
    about = "YouTube transcript relay and viewer",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Config file (defaults to ~/.config/ytview/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show request details on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the transcript relay HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (also read from $PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the web client
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Fetch a transcript and record it in recent videos
    Fetch {
        /// YouTube video URL or video ID (reads from stdin if omitted)
        url: Option<String>,

        /// Relay base URL, e.g. http://localhost:5000 (scrapes directly if omitted)
        #[arg(short, long)]
        relay: Option<String>,

        /// Output format: text (default), json, links (per-line player URLs)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List recently viewed videos
    History {
        /// Forget all recent videos
        #[arg(long)]
        clear: bool,
    },

    /// Show or change the theme preference
    Theme {
        #[arg(value_enum)]
        value: Option<ThemeArg>,
    },
}
