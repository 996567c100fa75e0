use std::path::Path;
use std::sync::Arc;

use chrono::Local;

use crate::board::{Abort, Board, PersistMode, Transition};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{LoadedConfig, load_config};
use crate::io::http::HttpClient;
use crate::io::logging::init_cli_logging;
use crate::io::remote::HttpBackend;
use crate::model::status::{Direction, Status};
use crate::model::task::{Category, Priority, TaskDraft, TaskId};
use crate::ops::search::matching_tasks;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let loaded = load_config(cli.config.as_deref().map(Path::new), cli.base_url.as_deref())?;

    // No subcommand: the TUI sets up its own file logging
    let Some(cmd) = cli.command else {
        return crate::tui::run(loaded);
    };
    init_cli_logging(cli.verbose);

    let mut board = open_board(&loaded)?;
    match cmd {
        // Read commands
        Commands::Board => cmd_board(&board, json),
        Commands::Show(args) => cmd_show(&board, args, json),
        Commands::Search(args) => cmd_search(&mut board, args, json),
        Commands::Users => cmd_users(&board, json),

        // Write commands
        Commands::Move(args) => cmd_move(&mut board, args, json),
        Commands::Advance(args) => cmd_step(&mut board, args, Direction::Forward, json),
        Commands::Retreat(args) => cmd_step(&mut board, args, Direction::Back, json),
        Commands::Check(args) => cmd_check(&mut board, args, json),
        Commands::Delete(args) => cmd_delete(&mut board, args, json),
        Commands::Add(args) => cmd_add(&mut board, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Connect to the configured backend and load the board. Writes complete
/// before the command returns.
fn open_board(loaded: &LoadedConfig) -> Result<Board, Box<dyn std::error::Error>> {
    let http = HttpClient::new(&loaded.config.backend)?;
    let backend = Arc::new(HttpBackend::new(http));
    let mut board = Board::new(backend, loaded.config.board.clone(), PersistMode::Inline);
    board.load()?;
    Ok(board)
}

fn find_task_id(board: &Board, id: &str) -> Result<TaskId, String> {
    let id = TaskId::new(id.trim());
    if board.task(&id).is_none() {
        return Err(format!("task not found: {}", id));
    }
    Ok(id)
}

/// Turn the first failed write into an error
fn check_persisted(board: &mut Board) -> CmdResult {
    match board.drain_reports().into_iter().next() {
        Some(failure) => Err(format!(
            "could not save task {}: {}",
            failure.task_id, failure.error
        )
        .into()),
        None => Ok(()),
    }
}

fn print_move(board: &Board, id: &TaskId, from: Status, to: Status, json: bool) -> CmdResult {
    if json {
        let out = MoveJson {
            id: id.to_string(),
            from,
            to,
            changed: from != to,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    let title = board.task(id).map(|t| t.title.as_str()).unwrap_or("");
    if from == to {
        println!("{} \"{}\" already in {}", id, title, to.label());
    } else {
        println!("{} \"{}\" {} \u{2192} {}", id, title, from.label(), to.label());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_board(board: &Board, json: bool) -> CmdResult {
    if json {
        let columns: Vec<ColumnJson> = Status::ALL
            .iter()
            .map(|&status| ColumnJson {
                status,
                label: status.label(),
                tasks: board.store().in_status(status).map(task_to_json).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    let mut first = true;
    for status in Status::ALL {
        if !first {
            println!();
        }
        first = false;
        let tasks: Vec<_> = board.store().in_status(status).collect();
        println!("{}", format_column_header(status, tasks.len()));
        if tasks.is_empty() {
            println!("  {}", board.settings().placeholders.message(status));
        }
        for task in tasks {
            println!("  {}", format_task_line(task, board.users()));
        }
    }
    Ok(())
}

fn cmd_show(board: &Board, args: ShowArgs, json: bool) -> CmdResult {
    let id = find_task_id(board, &args.id)?;
    let Some(task) = board.task(&id) else {
        return Err(format!("task not found: {}", id).into());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        for line in format_task_detail(task, board.users()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(board: &mut Board, args: SearchArgs, json: bool) -> CmdResult {
    let any = board.set_filter(&args.term);
    let hits = matching_tasks(board.filter(), board.store());

    if json {
        let tasks: Vec<TaskJson> = hits.into_iter().map(task_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }
    if !any {
        println!("No results found");
        return Ok(());
    }
    for task in hits {
        println!("{:<16} {}", task.status.label(), format_task_line(task, board.users()));
    }
    Ok(())
}

fn cmd_users(board: &Board, json: bool) -> CmdResult {
    let users = board.users().users();
    if json {
        let out: Vec<UserJson> = users.iter().map(user_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for user in users {
        println!(
            "{:<4} {:<24} {}",
            user.initials, user.full_name, user.color_class
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_move(board: &mut Board, args: MoveArgs, json: bool) -> CmdResult {
    let status = parse_status(&args.status).map_err(Box::<dyn std::error::Error>::from)?;
    let id = find_task_id(board, &args.id)?;
    let transition = board.move_to(&id, status);
    check_persisted(board)?;
    match transition {
        Transition::Moved { id, from, to } => print_move(board, &id, from, to, json),
        Transition::Unchanged { id, status } => print_move(board, &id, status, status, json),
        Transition::Aborted(reason) => Err(abort_message(&reason).into()),
    }
}

fn cmd_step(board: &mut Board, args: IdArg, direction: Direction, json: bool) -> CmdResult {
    let id = find_task_id(board, &args.id)?;
    let transition = board.move_one_column(&id, direction);
    check_persisted(board)?;
    match transition {
        Transition::Moved { id, from, to } => print_move(board, &id, from, to, json),
        Transition::Unchanged { id, status } => print_move(board, &id, status, status, json),
        // Clamped at the edge of the board: report and succeed
        Transition::Aborted(Abort::AtBoundary(status)) => print_move(board, &id, status, status, json),
        Transition::Aborted(reason) => Err(abort_message(&reason).into()),
    }
}

fn cmd_check(board: &mut Board, args: CheckArgs, json: bool) -> CmdResult {
    let id = find_task_id(board, &args.id)?;
    let count = board.task(&id).map_or(0, |t| t.subtasks.len());
    if args.n == 0 || args.n > count {
        return Err(format!(
            "subtask {} out of range: task {} has {} subtask(s)",
            args.n, id, count
        )
        .into());
    }
    let index = args.n - 1;
    let done = board
        .toggle_subtask(&id, index)
        .ok_or_else(|| format!("task not found: {}", id))?;
    check_persisted(board)?;

    let Some(task) = board.task(&id) else {
        return Err(format!("task not found: {}", id).into());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        let mark = if done { 'x' } else { ' ' };
        let text = task.subtasks.get(index).map(String::as_str).unwrap_or("");
        println!("{} {}. [{}] {}", id, args.n, mark, text);
    }
    Ok(())
}

fn cmd_delete(board: &mut Board, args: IdArg, json: bool) -> CmdResult {
    let id = find_task_id(board, &args.id)?;
    board.delete_task(&id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": id.as_str() }));
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

fn cmd_add(board: &mut Board, args: AddArgs, json: bool) -> CmdResult {
    let mut draft = TaskDraft::new(&args.title, &args.description, &args.due).with_subtasks(
        args.subtask
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    );
    draft.prio = Priority::parse(&args.prio);
    if let Some(ref category) = args.category {
        draft.category = Category::parse(category);
    }
    draft.assigned_users = args.assign;

    let id = board.create_task(&draft, Local::now().date_naive())?;
    if json {
        let out = CreatedJson { id: id.to_string() };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("created {}", id);
    }
    Ok(())
}

fn abort_message(reason: &Abort) -> String {
    match reason {
        Abort::NoPayload => "nothing to move".to_string(),
        Abort::NotACard(payload) => format!("not a task card: {}", payload),
        Abort::UnknownTask(id) => format!("task not found: {}", id),
        Abort::UnknownColumn(column) => format!("no such column: {}", column),
        Abort::AtBoundary(status) => format!("already in {}", status.label()),
    }
}
