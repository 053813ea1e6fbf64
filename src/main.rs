use raidboard::config::Config;
use raidboard::routes;
use raidboard::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raidboard=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env().expect("invalid configuration");
    let addr = config.listen_addr();
    let state = AppState::new(config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "raidboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
