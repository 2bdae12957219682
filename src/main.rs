mod app;
mod cli;
mod ui;

use todo_store::api::PostsClient;
use todo_store::config::Config;
use todo_store::import::{ImportPanel, PostsLoaded};
use todo_store::storage::{
    FileKeyValueStore, KeyValueStore, Latency, MemoryKeyValueStore, PersistenceGateway,
    TodoRepository,
};
use todo_store::store::{Action, EffectCoordinator, Selectors, StoreRuntime};
use todo_store::toast::ToastService;
use todo_store::todo::{CreateTodoRequest, Filter, Origin, Priority, Todo, UpdateTodoRequest};
use todo_store::utils::paths::{ensure_directories_exist, get_crash_log_path, get_logs_dir};

use anyhow::{Result, anyhow, bail};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands, StorageArgs};
use std::fs;
use std::io::Write;
use std::panic;
use std::sync::Arc;
use tokio::sync::mpsc;
use ui::theme::Theme;

/// Install a panic hook that writes crash information to a log file
fn install_crash_handler() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Ok(crash_log_path) = get_crash_log_path() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut crash_report = format!("=== CRASH at {} ===\n", timestamp);

            if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
                crash_report.push_str(&format!("Message: {}\n", message));
            } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
                crash_report.push_str(&format!("Message: {}\n", message));
            }

            if let Some(location) = panic_info.location() {
                crash_report.push_str(&format!(
                    "Location: {}:{}:{}\n",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }

            crash_report.push_str(&format!(
                "\nBacktrace:\n{}\n\n",
                std::backtrace::Backtrace::force_capture()
            ));

            if let Some(parent) = crash_log_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(mut file) = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log_path)
            {
                let _ = file.write_all(crash_report.as_bytes());
                eprintln!("\nCrash logged to: {}", crash_log_path.display());
            }
        }

        default_hook(panic_info);
    }));
}

/// Initialize file-based logging for the TUI mode.
///
/// Logs are written to ~/.todo-store/logs/todo-store.log, rolled daily.
/// Log level can be controlled with RUST_LOG env var (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "todo-store.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

/// Subcommands print to stdout, so diagnostics go to stderr and stay quiet.
fn init_cli_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_repository(config: &Config, args: &StorageArgs) -> Result<Arc<TodoRepository>> {
    let store: Box<dyn KeyValueStore> = if args.ephemeral {
        Box::new(MemoryKeyValueStore::new())
    } else {
        let dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => config.data_dir()?,
        };
        tracing::debug!(dir = %dir.display(), "Using file storage");
        Box::new(FileKeyValueStore::new(dir))
    };

    let latency = match args.latency_ms {
        Some(ms) => Latency::from_millis(ms),
        None => config.latency(),
    };

    Ok(Arc::new(TodoRepository::open(
        PersistenceGateway::new(store),
        latency,
    )))
}

fn main() -> Result<()> {
    install_crash_handler();

    let cli = Cli::parse();
    let config = Config::load()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(command) => {
            init_cli_logging();
            let repository = open_repository(&config, &cli.storage)?;
            runtime.block_on(run_command(command, repository, &config))
        }
        None => {
            // Guard must be kept alive for the duration of the app
            let _log_guard = init_file_logging();
            ensure_directories_exist()?;

            tracing::info!("todo-store starting");
            let repository = open_repository(&config, &cli.storage)?;
            runtime.block_on(run_interactive(repository, &config))?;
            tracing::info!("todo-store exiting gracefully");
            Ok(())
        }
    }
}

async fn run_interactive(repository: Arc<TodoRepository>, config: &Config) -> Result<()> {
    let (results_tx, results) = mpsc::unbounded_channel::<Action>();
    let (posts_tx, posts) = mpsc::unbounded_channel::<PostsLoaded>();

    let state = app::AppState::new(
        EffectCoordinator::new(repository, results_tx),
        ToastService::new(config.toast_duration()),
        ImportPanel::new(config.posts_per_page),
        PostsClient::new(config.api_base_url.clone())?,
        posts_tx,
        Theme::from_config(config),
    );

    ui::run_tui(state, ui::Channels { results, posts }).await
}

async fn run_command(command: Commands, repository: Arc<TodoRepository>, config: &Config) -> Result<()> {
    let mut runtime = StoreRuntime::new(repository);

    match command {
        Commands::List { filter, search } => {
            handle_list(&mut runtime, filter, search).await?;
        }
        Commands::Add {
            title,
            description,
            priority,
        } => {
            handle_add(&mut runtime, title, description, priority).await?;
        }
        Commands::Toggle { id } => {
            let todo = expect_todo(runtime.dispatch_and_settle(Action::ToggleTodo(id)).await)?;
            let verb = if todo.completed { "completed" } else { "reopened" };
            println!("✓ Task {verb}: {}", format_todo(&todo));
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            completed,
        } => {
            let request = UpdateTodoRequest {
                id,
                title,
                description,
                completed,
                priority,
            };
            if request.is_empty() {
                bail!("Nothing to change. Pass --title, --description, --priority or --completed");
            }
            let todo = expect_todo(runtime.dispatch_and_settle(Action::UpdateTodo(request)).await)?;
            println!("✓ Task updated: {}", format_todo(&todo));
        }
        Commands::Delete { id } => {
            match runtime.dispatch_and_settle(Action::DeleteTodo(id)).await {
                Some(Action::DeleteTodoSuccess(id)) => println!("✓ Task {id} deleted"),
                other => return Err(failure(other)),
            }
        }
        Commands::Posts { id: Some(id), .. } => {
            handle_post(config, id).await?;
        }
        Commands::Posts { page, id: None } => {
            handle_posts(config, page).await?;
        }
    }

    Ok(())
}

async fn handle_list(runtime: &mut StoreRuntime, filter: Filter, search: Option<String>) -> Result<()> {
    match runtime.dispatch_and_settle(Action::LoadTodos).await {
        Some(Action::LoadTodosSuccess(_)) => {}
        other => return Err(failure(other)),
    }
    runtime.dispatch(Action::SetFilter(filter));
    if let Some(term) = search {
        runtime.dispatch(Action::SetSearchTerm(term));
    }

    let mut selectors = Selectors::new();
    let state = runtime.state();
    let todos = selectors.filtered_todos(state);

    if todos.is_empty() {
        println!("No todos!");
        return Ok(());
    }

    for todo in todos.iter() {
        println!("{}", format_todo(todo));
        if let Some(description) = &todo.description {
            println!("      {description}");
        }
    }
    println!(
        "\n{} total · {} active · {} completed",
        selectors.todos_count(state),
        selectors.active_count(state),
        selectors.completed_count(state)
    );

    Ok(())
}

async fn handle_add(
    runtime: &mut StoreRuntime,
    title: String,
    description: Option<String>,
    priority: Priority,
) -> Result<()> {
    let mut request = CreateTodoRequest::new(title, priority).with_origin(Origin::Manual);
    request.description = description;

    let todo = expect_todo(runtime.dispatch_and_settle(Action::CreateTodo(request)).await)?;
    println!("✓ Todo added: {}", format_todo(&todo));
    Ok(())
}

async fn handle_posts(config: &Config, page: usize) -> Result<()> {
    let client = PostsClient::new(config.api_base_url.clone())?;
    let mut panel = ImportPanel::new(config.posts_per_page);

    panel.begin_load(page);
    let result = client.get_posts().await;
    panel.finish_load(PostsLoaded { page, result });

    if let Some(error) = &panel.error {
        bail!("{error}");
    }
    if panel.posts().is_empty() {
        println!("No posts on page {page}");
        return Ok(());
    }

    for post in panel.posts() {
        println!("#{:<4} {}", post.id(), post.post.title);
    }
    println!(
        "\npage {} of {} · {} posts",
        panel.current_page(),
        panel.total_pages(),
        panel.total_posts()
    );
    Ok(())
}

async fn handle_post(config: &Config, id: u64) -> Result<()> {
    let client = PostsClient::new(config.api_base_url.clone())?;
    let post = client.get_post(id).await?;
    let author = match client.get_user(post.user_id).await {
        Ok(user) => format!("{} (@{})", user.name, user.username),
        Err(e) => {
            tracing::warn!(user_id = post.user_id, error = %e, "Could not load post author");
            format!("user {}", post.user_id)
        }
    };

    println!("#{} {}", post.id, post.title);
    println!("by {author}\n");
    println!("{}", post.body);
    Ok(())
}

fn expect_todo(result: Option<Action>) -> Result<Todo> {
    match result {
        Some(
            Action::CreateTodoSuccess(todo)
            | Action::UpdateTodoSuccess(todo)
            | Action::ToggleTodoSuccess(todo),
        ) => Ok(todo),
        other => Err(failure(other)),
    }
}

fn failure(result: Option<Action>) -> anyhow::Error {
    match result.as_ref().and_then(Action::failure_message) {
        Some(message) => anyhow!("{message}"),
        None => anyhow!("Unexpected result: {result:?}"),
    }
}

fn format_todo(todo: &Todo) -> String {
    let checkbox = if todo.completed { "[x]" } else { "[ ]" };
    format!("{:>3}. {} {} ({})", todo.id, checkbox, todo.title, todo.priority)
}
