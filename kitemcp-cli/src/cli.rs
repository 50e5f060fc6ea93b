use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "kitemcp")]
#[command(version)]
#[command(about = "An MCP server for trading on Zerodha Kite")]
#[command(long_about = "
kitemcp is an MCP (Model Context Protocol) server that exposes Zerodha Kite
Connect operations as tools: logging in, reading the profile and placing
market orders.

The API key and secret are read from KITE_API_KEY and KITE_API_SECRET.

Example usage:
  kitemcp serve       # Run as MCP server
  kitemcp login-url   # Print the Kite login URL
  kitemcp tools       # List the tools the server exposes
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs kitemcp as an MCP server on stdin/stdout. The server exposes:

- GetAuthorize: the Kite login URL
- GetSession: exchange the request_token from the login redirect for a session
- GetProfile: the logged-in user's profile
- BuyStock / SellStock: CNC market orders on NSE

When stdin is not a terminal, logs are written to ~/.kitemcp/mcp.log
(override the file name with KITEMCP_LOG_FILE).

Example:
  kitemcp serve
  kitemcp serve --no-profile-refresh
")]
    Serve {
        /// Do not fetch the profile again after a successful order
        #[arg(long)]
        no_profile_refresh: bool,
    },
    /// Print the Kite Connect login URL
    #[command(long_about = "
Prints the URL that starts the Kite Connect login flow for the configured
API key. After logging in, Kite redirects with a request_token that can be
passed to the GetSession tool.

Exit codes:
  0 - URL printed
  2 - KITE_API_KEY or KITE_API_SECRET missing or invalid
")]
    LoginUrl,
    /// List the tools exposed by the server
    Tools {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[allow(dead_code)]
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    /// True when `serve` is talking to an MCP client rather than a person
    pub fn is_mcp_mode(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { .. })) && !io::stdin().is_terminal()
    }
}
