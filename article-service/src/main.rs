use article_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = Config::load()?;
    init_tracing(&config)?;

    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!(".env file not found"),
        Err(e) => tracing::warn!("Failed to read .env file: {}", e),
    }

    let result = match config.database.clone() {
        #[cfg(feature = "surrealdb")]
        Some(database) => {
            let store = SurrealArticleStore::connect(&database).await?;
            run(config, store).await
        }
        #[cfg(not(feature = "surrealdb"))]
        Some(_) => {
            tracing::warn!("Database configured but the surrealdb feature is disabled; using in-memory store");
            run(config, MemoryArticleStore::new()).await
        }
        None => {
            tracing::warn!("No database configured; articles are kept in memory");
            run(config, MemoryArticleStore::new()).await
        }
    };

    shutdown_tracing();
    result
}

async fn run<S: ArticleStore>(config: Config, store: S) -> Result<()> {
    let app = build_router(AppState::new(config.clone(), store));
    Server::new(config).serve(app).await
}
