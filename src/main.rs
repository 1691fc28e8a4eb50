use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing_subscriber::EnvFilter;
use vetquick::cli::{consult, views, Cli, Commands};
use vetquick::{utils, ConsultSession, DiscardPolicy, LLMClient, RecordStore, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(db) = cli.db {
        settings.storage.db_path = db;
    }
    let store = RecordStore::open(&settings.storage.db_path)?;

    match cli.command.unwrap_or_default() {
        Commands::Chat {
            keep_history,
            reset_on_decline,
        } => {
            if keep_history {
                settings.consult.discard_policy = DiscardPolicy::KeepHistory;
            } else if reset_on_decline {
                settings.consult.discard_policy = DiscardPolicy::ResetConversation;
            }
            handle_chat(settings, store).await
        }
        Commands::Today => views::show_records(&store, true),
        Commands::History => views::show_records(&store, false),
        Commands::Settings => {
            views::show_settings();
            Ok(())
        }
    }
}

async fn handle_chat(settings: Settings, store: RecordStore) -> Result<()> {
    let api_key = Settings::api_key()?;
    let client = LLMClient::new(api_key, settings.llm.clone())?;
    let mut session = ConsultSession::from_settings(&settings, Arc::new(client), store);

    utils::print_header("VetQuick Buddy");
    utils::print_info("반려동물의 증상을 알려 주세요. (/help 로 명령어 보기)");
    utils::print_info(&format!(
        "기록 파일: {}\n",
        session.store().path().display()
    ));

    let mut reader = BufReader::new(io::stdin());
    consult::run(&mut session, &mut reader).await
}
