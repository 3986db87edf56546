use std::path::PathBuf;

use clap::Parser;

use tester_agent::cli::{Cli, Commands};
use tester_agent::config::loader::filter_tools;
use tester_agent::fix::ChatCompletionSuggester;
use tester_agent::mcp::registry::all_tool_metadata;
use tester_agent::mcp::{http, server, tools_core, tools_git};
use tester_agent::observability::init_logging;
use tester_agent::project::Project;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let project = Project::load(root, cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { http: Some(addr) } => http::run_http_server(project, &addr).await?,
        Commands::Serve { http: None } => server::run_server(project).await?,
        Commands::Cycle { iterations } => {
            let suggester = ChatCompletionSuggester::from_config(&project.config.model)?;
            let log = tools_core::handle_automated_cycle(&project, &suggester, iterations).await;
            println!("{log}");
        }
        Commands::Tools => {
            for tool in filter_tools(&project.config, &all_tool_metadata()) {
                println!("{:<20} {:<10} {}", tool.name, tool.category, tool.description);
            }
        }
        Commands::Metrics => println!("{}", tools_git::handle_update_metrics(&project)),
    }
    Ok(())
}
