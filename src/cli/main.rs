/**
 * Taskboard CLI Entry Point
 *
 * Loads the board from the configured store, applies at most one action and
 * saves the result. Also prints the board, the task list or the contact list.
 */

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::sync::Arc;

    use taskboard_sync::board::{Board, BoardAction};
    use taskboard_sync::remote::{ErrorPolicy, MessageSink};
    use taskboard_sync::shared::{AppConfig, Task, TaskStatus};

    const USAGE: &str = "usage: taskboard [--config PATH] <board|tasks|contacts|ACTION [ARGS...]>";

    /// User messages go straight to the terminal
    struct ConsoleSink;

    impl MessageSink for ConsoleSink {
        fn render(&self, message: &str) {
            eprintln!("! {}", message);
        }
    }

    struct Invocation {
        config_path: Option<PathBuf>,
        command: String,
        args: Vec<String>,
    }

    fn parse_invocation(mut raw: Vec<String>) -> Result<Invocation, String> {
        let mut config_path = None;
        if raw.first().map(String::as_str) == Some("--config") {
            if raw.len() < 2 {
                return Err("--config needs a path".to_string());
            }
            config_path = Some(PathBuf::from(raw.remove(1)));
            raw.remove(0);
        }
        if raw.is_empty() {
            return Err(USAGE.to_string());
        }
        let command = raw.remove(0);
        Ok(Invocation {
            config_path,
            command,
            args: raw,
        })
    }

    fn print_task(task: &Task) {
        let (done, total) = task.subtask_progress();
        println!(
            "  [{}] {} ({:?}, due {}) {}/{} subtasks",
            task.id.map(|id| id.to_string()).unwrap_or_default(),
            task.title,
            task.priority,
            if task.due_date.is_empty() { "-" } else { task.due_date.as_str() },
            done,
            total
        );
    }

    pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
        let invocation = parse_invocation(std::env::args().skip(1).collect())?;

        let config = AppConfig::load_from(invocation.config_path.as_deref())?;
        tracing::debug!("Using store at {}", config.base_url);

        let policy = ErrorPolicy::new().with_page_renderer(Arc::new(ConsoleSink));
        let board = Board::connect(config, Arc::new(policy))?;
        let report = board.reload().await;
        if !report.is_complete() {
            tracing::warn!("Continuing without: {}", report.failed().join(", "));
        }

        match invocation.command.as_str() {
            "board" => {
                for status in TaskStatus::ALL {
                    let column = board.column(status).await;
                    println!("{} ({})", status.as_str(), column.len());
                    column.iter().for_each(print_task);
                }
            }
            "tasks" => {
                for task in board.tasks().all().await {
                    print_task(&task);
                }
            }
            "contacts" => {
                for contact in board.contact_list().await {
                    println!(
                        "  [{}] {} {} <{}> {}",
                        contact.id.map(|id| id.to_string()).unwrap_or_default(),
                        contact.initials(),
                        contact.name,
                        contact.mail,
                        contact.phone
                    );
                }
            }
            name => {
                let action = BoardAction::from_args(name, &invocation.args)?;
                let action_name = action.name();
                let outcome = board.dispatch(action).await?;
                let saved = board.save().await?;
                tracing::info!("Saved: {:?}", saved);
                println!("{} {:?}", action_name, outcome);
            }
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    cli::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
