use classroom_manager::router::init_router;
use classroom_manager::state::init_app_state;
use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classroom_manager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A missing signing secret or unreachable database is fatal.
    let state = match init_app_state().await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = ?err, "startup failed");
            std::process::exit(1);
        }
    };

    let app = init_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("server running on http://{addr}");
    axum::serve(listener, app).await.expect("Server error");
}
