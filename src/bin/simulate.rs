use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use balloon_pop::config::{normalize_seed, resolve_config, GameConfig};
use balloon_pop::engine::GameEngine;
use balloon_pop::logging::{default_session_id, emit_log, now_ms, LogLevel};
use balloon_pop::rng::Rng;
use balloon_pop::types::{ClickOutcome, RuntimeEvent, SessionStatus};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 20)]
    sessions: usize,
    #[arg(long)]
    rows: Option<i64>,
    #[arg(long)]
    columns: Option<i64>,
    #[arg(long)]
    probability: Option<i64>,
    #[arg(long)]
    seed: Option<u64>,
    /// `optimal` always clicks a largest group, `random` clicks any balloon.
    #[arg(long)]
    strategy: Option<String>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Strategy {
    Optimal,
    Random,
}

impl Strategy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "optimal" => Some(Self::Optimal),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct SessionResultLine {
    session: usize,
    seed: u32,
    strategy: Strategy,
    status: SessionStatus,
    clicks: u32,
    pops: u32,
    popped: usize,
    #[serde(rename = "initialBalloons")]
    initial_balloons: usize,
    #[serde(rename = "initialGroups")]
    initial_groups: usize,
    #[serde(rename = "largestPop")]
    largest_pop: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    click: u32,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct SessionRunResult {
    #[serde(flatten)]
    result: SessionResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "finishedAtIso")]
    finished_at_iso: String,
    config: GameConfig,
    strategy: Strategy,
    #[serde(rename = "sessionCount")]
    session_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "clearRate")]
    clear_rate: f64,
    #[serde(rename = "averagePops")]
    average_pops: f64,
    #[serde(rename = "statusCounts")]
    status_counts: BTreeMap<String, usize>,
    sessions: Vec<SessionResultLine>,
}

fn main() {
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let base_seed = normalize_seed(cli.seed.unwrap_or(run_started_at_ms));
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_session_id("sim", base_seed, run_started_at_ms));

    let config = match resolve_config(cli.rows, cli.columns, cli.probability) {
        Ok(config) => config,
        Err(error) => {
            emit_log(
                LogLevel::Error,
                "config_rejected",
                &run_id,
                Some(base_seed),
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };
    let strategy = match cli.strategy.as_deref() {
        None => Strategy::Optimal,
        Some(raw) => match Strategy::parse(raw) {
            Some(strategy) => strategy,
            None => {
                emit_log(
                    LogLevel::Error,
                    "config_rejected",
                    &run_id,
                    Some(base_seed),
                    json!({ "error": format!("unknown strategy: {raw}") }),
                );
                std::process::exit(2);
            }
        },
    };

    let mut has_anomaly = false;
    let mut session_results = Vec::new();
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for session in 0..cli.sessions {
        let seed = normalize_seed(base_seed as u64 + session as u64);
        emit_log(
            LogLevel::Info,
            "session_started",
            &run_id,
            Some(seed),
            json!({ "session": session, "strategy": strategy }),
        );
        let run = run_session(config, seed, session, strategy);

        for anomaly in &run.anomaly_records {
            emit_log(
                LogLevel::Warn,
                "anomaly_detected",
                &run_id,
                Some(seed),
                json!({ "session": session, "click": anomaly.click, "message": anomaly.message }),
            );
        }
        if !run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += run.anomaly_records.len();
        *status_counts
            .entry(run.result.status.as_str().to_string())
            .or_insert(0) += 1;

        emit_log(
            LogLevel::Info,
            "session_finished",
            &run_id,
            Some(seed),
            json!({
                "session": session,
                "status": run.result.status,
                "pops": run.result.pops,
                "anomalyCount": run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&run.result).expect("session result should serialize")
        );
        session_results.push(run.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        now_ms(),
        config,
        strategy,
        session_results,
        status_counts,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                LogLevel::Error,
                "summary_write_failed",
                &run_id,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        LogLevel::Info,
        "run_finished",
        &run_id,
        None,
        json!({
            "sessionCount": summary.session_count,
            "anomalyCount": summary.anomaly_count,
            "clearRate": summary.clear_rate,
            "averagePops": summary.average_pops,
            "statusCounts": summary.status_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_session(config: GameConfig, seed: u32, session: usize, strategy: Strategy) -> SessionRunResult {
    let mut engine = GameEngine::with_seed(config, seed);
    let mut picker = Rng::new(seed ^ 0x9e37_79b9);
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut clicks = 0u32;
    let mut largest_pop = 0usize;
    let click_limit = config.cell_count() as u32 + 1;

    while !engine.is_ended() {
        let target = match strategy {
            Strategy::Optimal => engine.legal_cells().first().copied(),
            Strategy::Random => {
                let balloons: Vec<_> = engine
                    .grid()
                    .coords()
                    .filter(|cell| engine.grid().has_balloon(*cell))
                    .collect();
                balloons.get(picker.pick_index(balloons.len())).copied()
            }
        };
        let Some(cell) = target else {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                clicks,
                "playing session has no balloon to click".to_string(),
            );
            break;
        };

        clicks += 1;
        match engine.click(cell.row as i64, cell.col as i64) {
            Ok(ClickOutcome::Popped { size, .. } | ClickOutcome::Cleared { size }) => {
                largest_pop = largest_pop.max(size);
            }
            Ok(_) => {}
            Err(error) => push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                clicks,
                format!("click on board cell rejected: {error}"),
            ),
        }

        let snapshot = engine.build_snapshot(true);
        for message in collect_snapshot_anomalies(&engine, &snapshot.events) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                clicks,
                message,
            );
        }

        if clicks > click_limit {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                clicks,
                "click safety limit exceeded".to_string(),
            );
            break;
        }
    }

    if strategy == Strategy::Optimal && engine.status() == SessionStatus::Failed {
        push_anomaly(
            &mut anomalies,
            &mut anomaly_records,
            &mut anomaly_seen,
            clicks,
            "optimal strategy failed a session".to_string(),
        );
    }

    let summary = engine.build_summary();
    SessionRunResult {
        result: SessionResultLine {
            session,
            seed,
            strategy,
            status: summary.status,
            clicks,
            pops: summary.pops,
            popped: summary.popped,
            initial_balloons: summary.initial_balloons,
            initial_groups: summary.initial_groups,
            largest_pop,
            anomalies,
        },
        anomaly_records,
    }
}

fn collect_snapshot_anomalies(engine: &GameEngine, events: &[RuntimeEvent]) -> Vec<String> {
    let mut anomalies = Vec::new();
    let catalog = engine.catalog();
    let balloons = engine.grid().balloon_count();
    if catalog.total_balloons() != balloons {
        anomalies.push(format!(
            "catalog covers {} balloons but the board has {balloons}",
            catalog.total_balloons()
        ));
    }
    if catalog.sizes().windows(2).any(|pair| pair[0] > pair[1]) {
        anomalies.push("catalog is not sorted".to_string());
    }
    if engine.status() == SessionStatus::Cleared && balloons > 0 {
        anomalies.push(format!("cleared session still has {balloons} balloons"));
    }
    if engine.status() == SessionStatus::Playing && balloons == 0 {
        anomalies.push("empty board is still playing".to_string());
    }
    for event in events {
        if let RuntimeEvent::GroupPopped { size, .. } = event {
            if *size == 0 {
                anomalies.push("popped an empty group".to_string());
            }
        }
    }
    anomalies
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    click: u32,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        click,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

#[allow(clippy::too_many_arguments)]
fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    config: GameConfig,
    strategy: Strategy,
    sessions: Vec<SessionResultLine>,
    status_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let session_count = sessions.len();
    let (clear_rate, average_pops) = if session_count == 0 {
        (0.0, 0.0)
    } else {
        let cleared = sessions
            .iter()
            .filter(|line| line.status == SessionStatus::Cleared)
            .count();
        let pops: u64 = sessions.iter().map(|line| line.pops as u64).sum();
        (
            cleared as f64 / session_count as f64,
            pops as f64 / session_count as f64,
        )
    };
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        finished_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        config,
        strategy,
        session_count,
        anomaly_count,
        clear_rate,
        average_pops,
        status_counts,
        sessions,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
