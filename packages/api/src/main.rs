use std::env::set_var;
use std::sync::Arc;

use api::config::{ApiConfig, LogFormat, MatchStore};
use api::{build_state, create_app};
use lambda_http::{run, tracing::info, Error};
use shared::repositories::match_repository::{DynamoDbMatchRepository, MatchRepository};
use shared::repositories::memory_match_repository::InMemoryMatchRepository;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().without_time().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format);

    let repository: Arc<dyn MatchRepository + Send + Sync> = match &config.store {
        MatchStore::DynamoDb { table_name } => {
            let aws_config = aws_config::load_from_env().await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            Arc::new(DynamoDbMatchRepository::new(client, table_name.clone()))
        }
        MatchStore::Memory => Arc::new(InMemoryMatchRepository::new()),
    };

    let app = create_app(build_state(&config, repository));

    match config.local_bind_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Serving match API on {}", addr);
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => run(app).await,
    }
}
