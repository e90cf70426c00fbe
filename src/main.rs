//! Taskbrief CLI - task list with AI summaries
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use taskbrief::agent::RstructorClient;
use taskbrief::engine::RetryPolicy;
use taskbrief::{api, service, Config, NewTask, Source, SummaryEngine, TaskStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskbrief")]
#[command(author, version, about = "Task list with validated AI summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Mark the task as already done
        #[arg(long)]
        done: bool,
    },
    /// List all tasks
    List,
    /// Replace the fields of a task
    Update {
        id: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        done: Option<bool>,
    },
    /// Mark a task as done
    Done { id: u64 },
    /// Remove a task
    Remove { id: u64 },
    /// Summarise the task list
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        bind: Option<std::net::SocketAddr>,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "taskbrief", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load()?;
    let store = TaskStore::open(config.storage.path.join("tasks"))?;

    match cli.command {
        Commands::Add {
            title,
            description,
            done,
        } => {
            let task = store.create(NewTask {
                title,
                description,
                is_done: done,
            })?;
            println!("Added task {}: {}", task.id, task.title.bold());
        }
        Commands::List => {
            let tasks = store.list()?;
            if tasks.is_empty() {
                println!("No tasks yet.");
            }
            for task in tasks {
                let marker = if task.is_done {
                    "[x]".green()
                } else {
                    "[ ]".yellow()
                };
                print!("{} {:>4}  {}", marker, task.id, task.title);
                if let Some(description) = &task.description {
                    print!(" - {}", description.dimmed());
                }
                println!();
            }
        }
        Commands::Update {
            id,
            title,
            description,
            done,
        } => {
            let current = store
                .get(id)?
                .ok_or_else(|| anyhow::anyhow!("task {} not found", id))?;
            let task = store.update(
                id,
                NewTask {
                    title: title.unwrap_or(current.title),
                    description: description.or(current.description),
                    is_done: done.unwrap_or(current.is_done),
                },
            )?;
            println!("Updated task {}: {}", task.id, task.title.bold());
        }
        Commands::Done { id } => {
            let current = store
                .get(id)?
                .ok_or_else(|| anyhow::anyhow!("task {} not found", id))?;
            store.update(
                id,
                NewTask {
                    title: current.title,
                    description: current.description,
                    is_done: true,
                },
            )?;
            println!("Task {} done ✅", id);
        }
        Commands::Remove { id } => {
            if store.delete(id)? {
                println!("Removed task {}", id);
            } else {
                anyhow::bail!("task {} not found", id);
            }
        }
        Commands::Summary { json } => {
            let tasks = store.list()?;
            let client = RstructorClient::from_config(&config);
            let engine = SummaryEngine::new(RetryPolicy::from_config(&config.engine));
            let result = service::generate_task_summary_with(&engine, &tasks, &client).await;
            let summary = &result.summary;

            if json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                if result.source == Source::Fallback {
                    println!("{}\n", "⚠️  Model unavailable, showing a local summary".yellow());
                }
                println!(
                    "📋 {} tasks: {} done, {} pending\n",
                    summary.count, summary.done_count, summary.pending_count
                );
                println!("✅ Done:");
                println!("  {}\n", summary.description_done);
                println!("⏳ Pending:");
                println!("  {}\n", summary.description_pending);
                if !summary.priority_order.is_empty() {
                    println!("📌 Suggested order:");
                    for (i, title) in summary.priority_order.iter().enumerate() {
                        println!("  {}. {}", i + 1, title);
                    }
                }
            }
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let client = Arc::new(RstructorClient::from_config(&config));
            api::serve(&config, store, client).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
