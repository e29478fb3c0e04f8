use clap::Parser;
use learnhub::ai::GeminiClient;
use learnhub::db::Db;
use learnhub::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// libSQL server address, or file:<path> for a local database.
    #[clap(env)]
    url: String,

    /// libSQL authentication token (unused for local files).
    #[arg(long, env, default_value = "")]
    auth_token: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:4000")]
    address: String,

    /// API key for the AI judge/assistant. Leave unset to disable both.
    #[arg(long, env)]
    ai_api_key: Option<String>,

    /// Set the Secure attribute on session cookies (enable behind TLS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,learnhub=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    tracing::info!("learnhub v{} starting", learnhub::utils::VERSION);

    let db = Db::new(args.url, args.auth_token).await?;
    let ai = GeminiClient::new(args.ai_api_key);
    let app = learnhub::router(AppState::new(db, ai, args.secure_cookies));

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, app).await?;

    Ok(())
}
