use clap::Parser;
use ludoteca::db::Db;
use ludoteca::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// libSQL server address
    #[clap(env)]
    url: String,

    /// libSQL authentication token.
    #[clap(env, default_value = "")]
    auth_token: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Public base URL used in verification links.
    #[arg(long, env, default_value = "http://127.0.0.1:1414")]
    base_url: String,

    /// Resend API key; verification emails are skipped when unset.
    #[arg(long, env)]
    resend_api_key: Option<String>,

    /// Mark session cookies as Secure (behind HTTPS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,axum=debug,ludoteca=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(args.url, args.auth_token).await?;
    let state = AppState::new(db, args.resend_api_key, args.base_url, args.secure_cookies);
    let app = ludoteca::router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, app).await?;

    Ok(())
}
