//! Terminal host for the todo screen.
//!
//! # Responsibility
//! - Mount the same view model the mobile UI uses and render its snapshot.
//! - Translate typed commands into view model intents.
//!
//! Reads `TODO_DB_PATH`, `TODO_LOG_LEVEL` and `TODO_LOG_DIR`.

use log::warn;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;
use todo_core::{Todo, TodoApp, TodoConfig, TodoUiState, TodoViewModel};
use tokio::runtime::Runtime;
use tokio::sync::watch::{self, error::RecvError};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{error::Elapsed, timeout};

const LOAD_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_PERIOD: Duration = Duration::from_millis(50);

const HELP: &str = "commands:
  add <title> [| <description>]   add a todo
  toggle <n>                      flip completion of item n
  delete <n>                      delete item n
  clear                           dismiss the current error
  list                            show the list again
  help                            show this help
  quit                            exit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add { title: String, description: String },
    Toggle(usize),
    Delete(usize),
    Clear,
    List,
    Help,
    Quit,
    Invalid(String),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("todo_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = TodoConfig::from_env();
    config.init_logging()?;

    let runtime = Runtime::new().map_err(|err| format!("runtime start failed: {err}"))?;
    let app = TodoApp::open(&config).map_err(|err| format!("store open failed: {err}"))?;
    let view_model = app.view_model(runtime.handle().clone());
    let mut ui_state = view_model.ui_state();

    runtime.block_on(async {
        let outcome = timeout(LOAD_TIMEOUT, ui_state.wait_for(|ui| !ui.is_loading))
            .await
            .map(|loaded| loaded.map(drop));
        if let Some(warning) = load_warning(outcome) {
            warn!("{warning}");
        }
    });
    println!("todo_cli {} ({})", todo_core::core_version(), config.db_path.display());
    render(&view_model.snapshot());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|err| format!("stdout flush failed: {err}"))?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.map_err(|err| format!("stdin read failed: {err}"))?;
        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Help => println!("{HELP}"),
            Command::List => render(&view_model.snapshot()),
            Command::Invalid(message) => println!("{message}"),
            Command::Clear => {
                view_model.clear_error();
                render(&view_model.snapshot());
            }
            Command::Add { title, description } => {
                ui_state.borrow_and_update();
                view_model.show_add_dialog();
                let intent = view_model.add_todo(title, description);
                settle(&runtime, &mut ui_state, intent);
                if view_model.snapshot().show_add_dialog {
                    // Failed add; a terminal has no dialog to keep open.
                    view_model.hide_add_dialog();
                }
                render(&view_model.snapshot());
            }
            Command::Toggle(position) => {
                act_on_item(
                    &runtime,
                    &view_model,
                    &mut ui_state,
                    position,
                    TodoViewModel::toggle_todo,
                );
            }
            Command::Delete(position) => {
                act_on_item(
                    &runtime,
                    &view_model,
                    &mut ui_state,
                    position,
                    TodoViewModel::delete_todo,
                );
            }
        }
    }
}

fn act_on_item(
    runtime: &Runtime,
    view_model: &TodoViewModel,
    ui_state: &mut watch::Receiver<TodoUiState>,
    position: usize,
    intent: fn(&TodoViewModel, Todo) -> JoinHandle<()>,
) {
    let Some(todo) = item_at(view_model, position) else {
        println!("no item {position}");
        return;
    };
    ui_state.borrow_and_update();
    let handle = intent(view_model, todo);
    settle(runtime, ui_state, handle);
    render(&view_model.snapshot());
}

/// Waits for `intent` and then until the state stops changing.
fn settle(
    runtime: &Runtime,
    ui_state: &mut watch::Receiver<TodoUiState>,
    intent: JoinHandle<()>,
) {
    runtime.block_on(async {
        if let Some(warning) = intent_warning(intent.await) {
            warn!("{warning}");
        }
        while let Ok(Ok(())) = timeout(QUIET_PERIOD, ui_state.changed()).await {}
    });
}

/// Log line for a first load that failed or never finished.
fn load_warning(outcome: Result<Result<(), RecvError>, Elapsed>) -> Option<String> {
    match outcome {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(format!("event=cli_load module=cli status=error error={err}")),
        Err(_) => Some(format!(
            "event=cli_load module=cli status=timeout waited_ms={}",
            LOAD_TIMEOUT.as_millis()
        )),
    }
}

/// Log line for an intent task that panicked or was cancelled.
fn intent_warning(result: Result<(), JoinError>) -> Option<String> {
    result
        .err()
        .map(|err| format!("event=cli_intent module=cli status=error error={err}"))
}

fn item_at(view_model: &TodoViewModel, position: usize) -> Option<Todo> {
    let index = position.checked_sub(1)?;
    view_model.snapshot().todos.into_iter().nth(index)
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
            Command::Add {
                title: title.to_string(),
                description: description.to_string(),
            }
        }
        "toggle" => parse_position(rest).map_or_else(Command::Invalid, Command::Toggle),
        "delete" | "rm" => parse_position(rest).map_or_else(Command::Invalid, Command::Delete),
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command `{other}`; type `help`")),
    };
    Some(command)
}

fn parse_position(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(format!("expected an item number, got `{value}`")),
    }
}

fn render(state: &TodoUiState) {
    if state.is_loading {
        println!("loading...");
    } else if state.todos.is_empty() {
        println!("no todos yet");
    } else {
        for (index, todo) in state.todos.iter().enumerate() {
            let mark = if todo.is_completed { 'x' } else { ' ' };
            if todo.description.is_empty() {
                println!("{:>3}. [{mark}] {}", index + 1, todo.title);
            } else {
                println!("{:>3}. [{mark}] {} - {}", index + 1, todo.title, todo.description);
            }
        }
    }

    if let Some(error) = &state.error {
        println!("error: {error} (type `clear` to dismiss)");
    }
}
