use std::sync::Arc;

use planboard::api::planner_routes;
use planboard::config::PlannerConfig;
use planboard::period::SystemClock;
use planboard::planner::Planner;
use planboard::store::{LibSqlBackend, RemoteStore};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = PlannerConfig::from_env()?;

    eprintln!("📅 planboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Week numbering: {}", config.week_numbering);

    // ── Database ─────────────────────────────────────────────────────────
    let backend = if config.uses_memory_db() {
        LibSqlBackend::new_memory().await?
    } else {
        LibSqlBackend::new_local(&config.db_path).await?
    };
    let store: Arc<dyn RemoteStore> = Arc::new(backend);
    eprintln!("   Database: {}", config.db_path.display());

    // ── Planner ──────────────────────────────────────────────────────────
    let mut planner = Planner::new(store, Arc::new(SystemClock), config.week_numbering);
    let summary = planner.load_all().await;
    eprintln!(
        "   Loaded: {} to-dos, {} budgets, {} habits, {} diary entries, {} events",
        summary.todos,
        summary.budgets,
        summary.habits,
        summary.diary_entries,
        summary.calendar_events,
    );
    if !summary.failed.is_empty() {
        eprintln!("   Warning: failed to load {}", summary.failed.join(", "));
    }

    // ── HTTP ─────────────────────────────────────────────────────────────
    let app = planner_routes(Arc::new(Mutex::new(planner)));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    eprintln!("   API: http://0.0.0.0:{}/api\n", config.port);
    tracing::info!(port = config.port, "Planner server started");
    axum::serve(listener, app).await?;

    Ok(())
}
