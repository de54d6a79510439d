use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use task_tracker::{
    application::task_service::TaskService,
    config::AppConfig,
    domain::{repository::TaskRepository, task::{TaskId, TaskStatus}},
    infrastructure::sqlite_repo::SqliteTaskRepository,
    view::controller::{Screen, ScreenController, UiEvent},
};

const TICK_RATE: Duration = Duration::from_millis(200);
const HELP: &str = "commands: list | add <title> | <YYYY-MM-DD> [| <description>] | status <id> <pending|in_progress|completed> | done <id> | delete <id> | quit";

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let repo = SqliteTaskRepository::connect(&config.database_url).await?;
    repo.init().await?;
    tracing::info!(database_url = %config.database_url, "task store ready");

    let mut controller = ScreenController::new(TaskService::new(repo), config.error_display);
    controller.handle(UiEvent::ScreenEntered(Screen::List), Instant::now()).await;
    print_screen(&controller);
    println!("{HELP}");

    let res = run(&mut controller).await;

    controller.shutdown().await;
    tracing::info!("shutdown");
    res
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Add { title: String, due_date: String, description: String },
    Status { id: TaskId, value: String },
    Delete(TaskId),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let id = |raw: &str| raw.parse::<i64>().ok().map(TaskId);
    match verb {
        "list" | "ls" => Some(Command::List),
        "quit" | "q" | "exit" => Some(Command::Quit),
        "add" => {
            let mut parts = rest.splitn(3, '|').map(str::trim);
            let title = parts.next().unwrap_or_default().to_string();
            let due_date = parts.next().unwrap_or_default().to_string();
            let description = parts.next().unwrap_or_default().to_string();
            Some(Command::Add { title, due_date, description })
        }
        "status" => {
            let (raw_id, value) = rest.split_once(' ')?;
            Some(Command::Status { id: id(raw_id)?, value: value.trim().to_string() })
        }
        "done" => Some(Command::Status { id: id(rest)?, value: TaskStatus::Completed.to_string() }),
        "delete" | "rm" => Some(Command::Delete(id(rest)?)),
        _ => None,
    }
}

async fn run<R: TaskRepository>(controller: &mut ScreenController<R>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK_RATE);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => controller.tick(Instant::now()),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() { continue; }
                let Some(command) = parse_command(&line) else {
                    println!("{HELP}");
                    continue;
                };
                let event = match command {
                    Command::Quit => break,
                    Command::List => UiEvent::ScreenEntered(Screen::List),
                    Command::Add { title, due_date, description } => {
                        controller.handle(UiEvent::ScreenEntered(Screen::AddTask), Instant::now()).await;
                        let form = controller.add_screen_mut();
                        form.title = title;
                        form.due_date = due_date;
                        form.description = description;
                        UiEvent::SubmitPressed
                    }
                    Command::Status { id, value } => UiEvent::StatusChanged { id, value },
                    Command::Delete(id) => UiEvent::DeletePressed(id),
                };
                controller.handle(event, Instant::now()).await;
                print_screen(controller);
            }
        }
    }
    Ok(())
}

fn print_screen<R: TaskRepository>(controller: &ScreenController<R>) {
    if let Some(failure) = controller.last_failure() {
        println!("! {failure}");
    }
    if let Some(notice) = controller.notice() {
        println!("- {notice}");
    }
    match controller.current_screen() {
        Screen::AddTask => {
            if let Some(message) = controller.add_screen().error_message() {
                println!("! {message}");
            }
        }
        Screen::List => {
            let list = controller.list();
            if let Some(placeholder) = list.placeholder() {
                println!("{placeholder}");
            }
            for item in list.items() {
                let mark = match item.status() { TaskStatus::Pending => "[ ]", TaskStatus::InProgress => "[~]", TaskStatus::Completed => "[x]" };
                let overdue = if item.is_overdue() { "  (overdue)" } else { "" };
                println!("{mark} {:>3}  {}  due {}{overdue}", item.id(), item.title(), item.due_date());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_optional_description() {
        assert_eq!(
            parse_command("add Write report | 2025-05-01"),
            Some(Command::Add { title: "Write report".into(), due_date: "2025-05-01".into(), description: String::new() })
        );
        assert_eq!(
            parse_command("add Call | 2025-05-02 | dentist"),
            Some(Command::Add { title: "Call".into(), due_date: "2025-05-02".into(), description: "dentist".into() })
        );
    }

    #[test]
    fn parses_id_commands() {
        assert_eq!(parse_command("done 3"), Some(Command::Status { id: TaskId(3), value: "completed".into() }));
        assert_eq!(parse_command("status 2 in_progress"), Some(Command::Status { id: TaskId(2), value: "in_progress".into() }));
        assert_eq!(parse_command("delete 7"), Some(Command::Delete(TaskId(7))));
        assert_eq!(parse_command("delete seven"), None);
        assert_eq!(parse_command("frobnicate"), None);
    }
}
