use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use todo_store::todo::{Filter, Priority};

#[derive(Parser, Debug)]
#[command(name = "todo-store")]
#[command(about = "A terminal todo list with a store, effects and a posts importer", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StorageArgs {
    /// Directory holding todos.json (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Simulated repository latency in milliseconds (overrides config)
    #[arg(long, global = true)]
    pub latency_ms: Option<u64>,

    /// Keep todos in memory only; nothing is read or written on disk
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print todos
    List {
        #[arg(short, long, default_value_t = Filter::All)]
        filter: Filter,

        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a todo
    Add {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    /// Flip a todo between done and not done
    Toggle { id: u64 },
    /// Change fields of a todo
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a todo
    Delete { id: u64 },
    /// Show a page of remote posts
    Posts {
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Show one post in full, with its author
        #[arg(long, conflicts_with = "page")]
        id: Option<u64>,
    },
}
