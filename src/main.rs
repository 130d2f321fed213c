use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use codeagent::commands::{fix_file, generate_project, show_status, show_tree};
use codeagent::models::ConfigOverrides;

/// codeagent - generate, edit and fix project files from model responses
#[derive(Parser)]
#[command(name = "codeagent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding generated projects
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate or edit project files for a task
    Generate {
        /// Task description (e.g., "Create a Flask app with 3 routes")
        task: String,

        /// Override the model to use
        #[arg(long)]
        model: Option<String>,

        /// Override the Ollama URL
        #[arg(long)]
        url: Option<String>,

        /// Call the model instead of using mock responses
        #[arg(long)]
        live: bool,

        /// Disable streaming output
        #[arg(long)]
        no_stream: bool,
    },

    /// Fix simple syntax errors in a project file
    Fix {
        /// File path relative to the generated project
        file: String,
    },

    /// Show the generated project's file tree
    Tree {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show tracked files and their status
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let base_overrides = ConfigOverrides {
        project_dir: cli.project_dir,
        ..Default::default()
    };

    let result = match cli.command {
        Commands::Generate {
            task,
            model,
            url,
            live,
            no_stream,
        } => {
            let overrides = ConfigOverrides {
                model,
                url,
                live,
                no_stream,
                ..base_overrides
            };
            generate_project(&working_dir, &task, overrides).await.map(|_| ())
        }

        Commands::Fix { file } => fix_file(&working_dir, &file, base_overrides).map(|_| ()),

        Commands::Tree { json } => show_tree(&working_dir, base_overrides, json),

        Commands::Status => show_status(&working_dir, base_overrides, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
