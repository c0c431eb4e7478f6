use std::env;
use std::sync::Arc;

use anyhow::Context;
use cidian_app::{CoreDictionaryController, render};
use cidian_client::HttpDictionaryClient;
use cidian_config::Config;
use cidian_types::RouteParams;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cidian", about = "Browse dictionary entries by pinyin and word head")]
struct Cli {
    /// Dictionary category, defaults to DICTIONARY_TYPE
    #[arg(long = "type")]
    dictionary_type: Option<String>,
    /// Pinyin index, defaults to the pinyin
    #[arg(long)]
    index: Option<String>,
    #[arg(long)]
    pinyin: String,
    /// Word head whose entries are listed
    #[arg(long)]
    head: String,
    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::new();

    let client = Arc::new(
        HttpDictionaryClient::new(&config.api).context("Failed to create dictionary client")?,
    );

    let route = RouteParams {
        dictionary_type: cli
            .dictionary_type
            .unwrap_or_else(|| config.dictionary.default_type.clone()),
        index: cli.index.unwrap_or_else(|| cli.pinyin.clone()),
        pinyin: cli.pinyin,
        word_head: cli.head,
    };

    tracing::info!("Loading {:?} from {}", route, config.api.base_url);

    let controller = CoreDictionaryController::new(
        route,
        client.clone(),
        client,
        config.dictionary.pinyin_indexes.clone(),
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            controller.shutdown();
            return Ok(());
        }
        _ = controller.settled() => {}
    }

    let view = controller.view();
    if cli.json {
        println!("{}", render::render_json(&view).context("Failed to serialize view")?);
    } else {
        print!("{}", render::TextView(&view));
    }

    if view.status.any_failed() {
        anyhow::bail!("Some dictionary data failed to load");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
