use std::io::{self, BufRead, Write};

use balloon_pop::config::{normalize_seed, resolve_config};
use balloon_pop::engine::GameEngine;
use balloon_pop::logging::{default_session_id, emit_log, now_ms, LogLevel};
use balloon_pop::protocol::{parse_command, ClientCommand};
use balloon_pop::types::{Cell, ClickOutcome, IgnoredReason, Snapshot};
use clap::Parser;
use serde::Serialize;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    rows: Option<i64>,
    #[arg(long)]
    columns: Option<i64>,
    /// Chance in percent (0-100) that a cell starts with a balloon.
    #[arg(long)]
    probability: Option<i64>,
    #[arg(long)]
    seed: Option<u64>,
    /// Read JSON commands and answer with one JSON line per command.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CommandReply {
    Click { outcome: ClickOutcome },
    Rejected { error: String },
    Reset,
    Hint { cells: Vec<Cell> },
    Show,
    Quit,
}

#[derive(Clone, Debug, Serialize)]
struct ReplyLine {
    reply: CommandReply,
    snapshot: Snapshot,
}

fn main() {
    let cli = Cli::parse();
    let seed = cli.seed.map(normalize_seed).unwrap_or_else(rand::random);
    let session_id = default_session_id("play", seed, now_ms());

    let config = match resolve_config(cli.rows, cli.columns, cli.probability) {
        Ok(config) => config,
        Err(error) => {
            emit_log(
                LogLevel::Error,
                "config_rejected",
                &session_id,
                Some(seed),
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };

    let mut engine = GameEngine::with_seed(config, seed);
    emit_log(
        LogLevel::Info,
        "session_started",
        &session_id,
        Some(seed),
        json!({ "config": config, "json": cli.json }),
    );

    if let Err(error) = run(&mut engine, &session_id, cli.json) {
        emit_log(
            LogLevel::Error,
            "io_failed",
            &session_id,
            Some(engine.seed()),
            json!({ "error": error.to_string() }),
        );
        std::process::exit(2);
    }
}

fn run(engine: &mut GameEngine, session_id: &str, json_mode: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    write_reply(&mut stdout, engine, &CommandReply::Show, json_mode)?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = parse_command(&line) else {
            emit_log(
                LogLevel::Warn,
                "invalid_command",
                session_id,
                Some(engine.seed()),
                json!({ "input": line }),
            );
            if !json_mode {
                writeln!(stdout, "commands: <row> <col> | hint | show | reset | quit")?;
            }
            continue;
        };

        let reply = apply_command(engine, command);
        log_reply(engine, session_id, &reply);
        write_reply(&mut stdout, engine, &reply, json_mode)?;
        if matches!(reply, CommandReply::Quit) {
            break;
        }
    }
    Ok(())
}

fn apply_command(engine: &mut GameEngine, command: ClientCommand) -> CommandReply {
    match command {
        ClientCommand::Click { row, col } => match engine.click(row, col) {
            Ok(outcome) => CommandReply::Click { outcome },
            Err(error) => CommandReply::Rejected {
                error: error.to_string(),
            },
        },
        ClientCommand::Reset => {
            engine.reset();
            CommandReply::Reset
        }
        ClientCommand::Hint => CommandReply::Hint {
            cells: engine.legal_cells(),
        },
        ClientCommand::Show => CommandReply::Show,
        ClientCommand::Quit => CommandReply::Quit,
    }
}

fn log_reply(engine: &GameEngine, session_id: &str, reply: &CommandReply) {
    match reply {
        CommandReply::Click {
            outcome: ClickOutcome::Cleared { .. } | ClickOutcome::Failed { .. },
        } => emit_log(
            LogLevel::Info,
            "session_finished",
            session_id,
            Some(engine.seed()),
            json!({ "summary": engine.build_summary() }),
        ),
        CommandReply::Rejected { error } => emit_log(
            LogLevel::Warn,
            "click_out_of_bounds",
            session_id,
            Some(engine.seed()),
            json!({ "error": error }),
        ),
        CommandReply::Reset => emit_log(
            LogLevel::Info,
            "session_reset",
            session_id,
            Some(engine.seed()),
            json!({ "balloons": engine.grid().balloon_count() }),
        ),
        _ => {}
    }
}

fn write_reply(
    out: &mut impl Write,
    engine: &mut GameEngine,
    reply: &CommandReply,
    json_mode: bool,
) -> io::Result<()> {
    let snapshot = engine.build_snapshot(true);
    if json_mode {
        let line = ReplyLine {
            reply: reply.clone(),
            snapshot,
        };
        writeln!(
            out,
            "{}",
            serde_json::to_string(&line).expect("reply line should serialize")
        )?;
        return out.flush();
    }

    let message = describe_reply(reply);
    if !message.is_empty() {
        writeln!(out, "{message}")?;
    }
    if !matches!(reply, CommandReply::Hint { .. } | CommandReply::Quit) {
        write!(out, "{}", snapshot.render_text())?;
    }
    out.flush()
}

fn describe_reply(reply: &CommandReply) -> String {
    match reply {
        CommandReply::Click { outcome } => match outcome {
            ClickOutcome::Popped { size, remaining } => {
                format!("popped {size} balloon(s), {remaining} left")
            }
            ClickOutcome::Cleared { size } => {
                format!("popped {size} balloon(s), board cleared!")
            }
            ClickOutcome::Failed {
                size,
                max_group_size,
            } => format!(
                "that group has {size} balloon(s) but the largest has {max_group_size}; game over, type `reset` to play again"
            ),
            ClickOutcome::Ignored {
                reason: IgnoredReason::NotPlaying,
            } => "the game is over, type `reset` to play again".to_string(),
            ClickOutcome::Ignored {
                reason: IgnoredReason::EmptyCell,
            } => "no balloon there".to_string(),
        },
        CommandReply::Rejected { error } => error.clone(),
        CommandReply::Reset => "new board".to_string(),
        CommandReply::Hint { cells } if cells.is_empty() => "no legal moves".to_string(),
        CommandReply::Hint { cells } => {
            let listed: Vec<String> = cells
                .iter()
                .map(|cell| format!("({}, {})", cell.row, cell.col))
                .collect();
            format!("try {}", listed.join(" or "))
        }
        CommandReply::Show => String::new(),
        CommandReply::Quit => "bye".to_string(),
    }
}
