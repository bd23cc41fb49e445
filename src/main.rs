use postman_mcp::{build_app, config::Config, logging, postman_client::SharedClient, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let shared = SharedClient::new();
    let client = shared.get_instance(
        config.postman_api_key.clone(),
        Some(config.postman_base_url.clone()),
    );
    if !client.has_api_key() {
        warn!("POSTMAN_API_KEY is not set; tool calls will fail until a key is provided");
    }

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config.mcp_token.clone(), client);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        postman_base_url = %config.postman_base_url,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
