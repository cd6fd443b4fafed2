mod app;
mod auth;
mod bookings;
mod config;
mod error;
mod feedback;
mod registrations;
mod sessions;
mod state;
mod tools;
mod users;

use time::UtcOffset;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Must happen before the runtime spawns worker threads: the local
    // offset is indeterminate in a multithreaded process on Unix.
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(local_offset))
}

async fn run(local_offset: UtcOffset) -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "gardenly=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init(local_offset).await?;

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    // Break-glass accounts are seeded once here, not re-checked per login
    auth::bootstrap::provision_accounts(&app_state.db, &app_state.config).await?;

    let app = app::build_app(app_state);
    app::serve(app).await
}
