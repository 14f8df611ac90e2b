//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:9090";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Parser)]
#[command(name = "policy-console", about = "Manage streaming policies on a policy API server")]
pub struct Cli {
    /// Base URL of the policy API
    #[arg(
        long,
        global = true,
        env = "POLICY_CONSOLE_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub api_url: Url,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "POLICY_CONSOLE_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout: u64,

    /// JSON file overriding the REST endpoint templates
    #[arg(long, global = true, env = "POLICY_CONSOLE_ENDPOINTS")]
    pub endpoints: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all saved policies
    List,
    /// List the policies that use a fragment
    ByFragment {
        fragment_type: String,
        fragment_id: String,
    },
    /// Create a policy from a JSON draft
    Create { file: PathBuf },
    /// Delete a policy
    Delete { id: String },
    /// Launch a policy
    Run { id: String },
    /// Print the demo policy fixture
    Fake,
    /// Stop a running policy described by a JSON file
    Stop { file: PathBuf },
    /// Overwrite a saved policy from a JSON draft
    Save { file: PathBuf },
    /// Run the description step of the creation wizard on a JSON draft
    Describe {
        file: PathBuf,
        /// Write the resulting draft back to the file when the step passes
        #[arg(long)]
        write: bool,
    },
    /// Print the option lists of the description form
    Options,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::ByFragment { .. } => "by-fragment",
            Command::Create { .. } => "create",
            Command::Delete { .. } => "delete",
            Command::Run { .. } => "run",
            Command::Fake => "fake",
            Command::Stop { .. } => "stop",
            Command::Save { .. } => "save",
            Command::Describe { .. } => "describe",
            Command::Options => "options",
        }
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}
