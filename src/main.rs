use focus_board::{
    run_session,
    stats::{build_stats, summary, week_overview},
    storage::ensure_parent_dir,
    AppState, Config, FocusTimer, Store, SystemClock,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    ensure_parent_dir(&config.data_path).await?;

    let store = Store::load(&config.data_path, Arc::new(SystemClock))
        .await?
        .with_roadmap_order(config.roadmap_order);
    info!("loaded {}", store.path().display());

    let state = AppState::new(store);
    {
        let store = state.store.lock().await;
        let dashboard = serde_json::json!({
            "summary": summary(&store),
            "stats": build_stats(&store),
            "weeks": week_overview(&store),
            "roadmap": store.roadmap(),
        });
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        if let Some(id) = config.focus_task.as_deref() {
            if store.find_task(id).is_none() {
                warn!(
                    task = id,
                    "FOCUS_TASK_ID does not match any task, time goes to the daily total only"
                );
            }
        }
    }

    let mut timer = FocusTimer::new();
    timer.set_preset(config.focus_minutes);
    timer.select_task(config.focus_task.clone());

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };
    let report = run_session(&state, &mut timer, shutdown).await?;

    let store = state.store.lock().await;
    info!(
        credited = report.credited_seconds,
        completed = report.completed,
        today = store.today_seconds(),
        "session over"
    );

    Ok(())
}
