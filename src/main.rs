use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use pj_selection::config::AppConfig;
use pj_selection::error::AppError;
use pj_selection::telemetry;
use pj_selection::workflows::selection::{
    rubric_label, selection_router, FinalOrderView, JsonFileStore, RankingBoard, ScoreSheet,
    SelectionService, QUESTIONS,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "PJ Selection Panel",
    about = "Score structured interviews, rank candidates per role, and build the final list",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with the stored selection panel from the command line
    Selection {
        #[command(subcommand)]
        command: SelectionCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    #[command(flatten)]
    storage: StorageArgs,
}

#[derive(Args, Debug, Default)]
struct StorageArgs {
    /// Override the configured selection state file
    #[arg(long)]
    state_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SheetArgs {
    #[command(flatten)]
    storage: StorageArgs,
    /// CSV score sheet (name,status,q1..q10,notes) to import before running
    #[arg(long)]
    scores: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum SelectionCommand {
    /// Print the interview questions and rubric
    Questions,
    /// Show the top candidates for every role profile
    Rankings(SheetArgs),
    /// Generate the final order suggestion from ten completed interviews
    Plan(SheetArgs),
    /// Show the stored final order and its validation result
    Validate(StorageArgs),
    /// Discard all stored data and start from placeholder candidates
    Reset(StorageArgs),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Selection { command } => run_selection(command),
    }
}

fn open_service(
    config: &AppConfig,
    storage: StorageArgs,
) -> SelectionService<JsonFileStore> {
    let path = storage
        .state_path
        .unwrap_or_else(|| config.storage.state_path.clone());
    SelectionService::new(Arc::new(JsonFileStore::new(path)))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(open_service(&config, args.storage));
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(selection_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "selection panel service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_selection(command: SelectionCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        SelectionCommand::Questions => render_questions(),
        SelectionCommand::Rankings(args) => {
            let service = open_service(&config, args.storage);
            if let Some(path) = args.scores {
                service.import_sheet(&ScoreSheet::from_path(path)?)?;
            }
            render_rankings(&service.rankings()?);
        }
        SelectionCommand::Plan(args) => {
            let service = open_service(&config, args.storage);
            if let Some(path) = args.scores {
                service.import_sheet(&ScoreSheet::from_path(path)?)?;
            }
            let view = service.generate_final_order()?;
            render_final_order(&view);
        }
        SelectionCommand::Validate(storage) => {
            let service = open_service(&config, storage);
            render_final_order(&service.final_order()?);
        }
        SelectionCommand::Reset(storage) => {
            let service = open_service(&config, storage);
            service.reset()?;
            println!("Selection data cleared; ten placeholder candidates restored.");
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_questions() {
    println!("Interview questions");
    for question in &QUESTIONS {
        println!(
            "- Q{} [{}, {}s] {}",
            question.id,
            question.category.label(),
            question.time_limit_secs,
            question.prompt
        );
    }

    println!("\nRubric");
    for score in 0..=4 {
        if let Some(label) = rubric_label(score) {
            println!("- {score}: {label}");
        }
    }
}

fn render_rankings(board: &RankingBoard) {
    println!(
        "Completed interviews: {}/{} ({} remaining)",
        board.completed,
        board.completed + board.remaining,
        board.remaining
    );

    for profile in &board.profiles {
        let tie_note = if profile.tied_at_top { " (practical tie)" } else { "" };
        println!("\n{}{}", profile.label, tie_note);
        if profile.leaders.is_empty() {
            println!("- no completed interviews");
        }
        for (place, candidate) in profile.leaders.iter().enumerate() {
            println!(
                "- #{} {} ({:.2}, overall {:.2})",
                place + 1,
                candidate.name,
                candidate.score(profile.key),
                candidate.profiles.geral
            );
        }
    }

    if board.ready_to_plan {
        println!("\nAll ten interviews complete: final order can be generated.");
    }
}

fn render_final_order(view: &FinalOrderView) {
    if view.entries.is_empty() {
        println!("Final order: none stored");
    } else {
        println!("Final order");
        for placed in &view.entries {
            println!(
                "{:>2}. {} - {} (overall {:.2})",
                placed.position,
                placed.candidate.name,
                placed.role_label,
                placed.candidate.profiles.geral
            );
        }
    }

    if view.ready_for_export {
        println!("\nList validated and ready for export.");
    } else {
        println!("\nValidation issues");
        for violation in &view.violations {
            println!("- {violation}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn cli_parses_plan_with_score_sheet() {
        let cli = Cli::try_parse_from([
            "pj-selection",
            "selection",
            "plan",
            "--scores",
            "entrevistas.csv",
            "--state-path",
            "/tmp/state.json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Selection {
                command: SelectionCommand::Plan(args),
            }) => {
                assert_eq!(args.scores, Some(PathBuf::from("entrevistas.csv")));
                assert_eq!(
                    args.storage.state_path,
                    Some(PathBuf::from("/tmp/state.json"))
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["pj-selection"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
