use std::process;
mod cli;
mod error;
mod exit_codes;
mod logging;
mod tools;

use clap::CommandFactory;
use cli::{Cli, Commands, OutputFormat};
use error::{handle_cli_result, CliError, CliResult};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Fast path for help - avoid initializing logging
    if cli.command.is_none() {
        let exit_code = match Cli::command().print_help() {
            Ok(()) => EXIT_SUCCESS,
            Err(_) => EXIT_WARNING,
        };
        process::exit(exit_code);
    }

    let level = logging::log_level(cli.quiet, cli.debug, cli.verbose);
    logging::init_logging(level, cli.is_mcp_mode());

    let exit_code = match cli.command {
        Some(Commands::Serve { no_profile_refresh }) => {
            tracing::info!("Starting MCP server");
            handle_cli_result(run_server(no_profile_refresh).await)
        }
        Some(Commands::LoginUrl) => handle_cli_result(run_login_url().await),
        Some(Commands::Tools { format }) => run_tools(format),
        None => EXIT_SUCCESS,
    };

    process::exit(exit_code);
}

fn load_config(no_profile_refresh: bool) -> CliResult<kitemcp::Config> {
    let mut config = kitemcp::Config::from_env()?;
    if no_profile_refresh {
        config.refresh_profile_after_order = false;
    }
    tracing::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

async fn run_server(no_profile_refresh: bool) -> CliResult<()> {
    use kitemcp::mcp::McpServer;
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    let config = load_config(no_profile_refresh)?;
    let server = McpServer::from_config(&config)?;
    tracing::info!(
        "MCP server ready with {} tools (profile refresh after order: {})",
        server.list_tool_names().len(),
        config.refresh_profile_after_order
    );

    // Set up cancellation token
    let ct = CancellationToken::new();
    let ct_clone = ct.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
        }
        ct_clone.cancel();
    });

    // Start the rmcp SDK server with stdio transport
    let running = serve_server(server, stdio())
        .await
        .map_err(|e| CliError::new(format!("MCP server error: {e}"), EXIT_WARNING))?;
    tracing::info!("MCP server started successfully");

    tokio::select! {
        quit = running.waiting() => match quit {
            Ok(reason) => tracing::info!("MCP client disconnected: {:?}", reason),
            Err(e) => {
                return Err(CliError::new(format!("MCP server task failed: {e}"), EXIT_WARNING));
            }
        },
        _ = ct.cancelled() => tracing::info!("MCP server cancelled"),
    }

    tracing::info!("MCP server exited successfully");
    Ok(())
}

async fn run_login_url() -> CliResult<()> {
    use kitemcp::broker::KiteConnectClient;
    use kitemcp::BrokerClient;

    let config = load_config(false)?;
    let client = KiteConnectClient::new(&config)
        .map_err(|e| CliError::from_error("Failed to create Kite client", e, EXIT_ERROR))?;
    let url = client
        .login_url()
        .await
        .map_err(|e| CliError::from_error("Failed to build login URL", e, EXIT_WARNING))?;

    println!("{url}");
    Ok(())
}

fn run_tools(format: OutputFormat) -> i32 {
    match tools::run_tools_command(format) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("Tools error: {}", e);
            EXIT_ERROR
        }
    }
}
