use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tabqa::application::{AnalyzeUseCase, ChatUseCase};
use tabqa::infrastructure::config::AppConfig;
use tabqa::infrastructure::llm_clients::gateway::{InferenceGateway, ProviderEndpoints};
use tabqa::infrastructure::llm_clients::{HttpTransport, ReqwestTransport};
use tabqa::interfaces::http::{start_server, HttpState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = AppConfig::load().unwrap_or_else(|err| {
        eprintln!("configuration error: {}", err);
        std::process::exit(1);
    });

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(
        Duration::from_secs(config.request_timeout_secs),
    ));
    let gateway = Arc::new(InferenceGateway::new(
        transport,
        config.huggingface_token.clone(),
        ProviderEndpoints {
            table_qa: config.table_qa_url.clone(),
            chat: config.chat_url.clone(),
            chat_completions: config.chat_completions_url.clone(),
        },
    ));

    let state = Arc::new(HttpState {
        analyze_use_case: AnalyzeUseCase::new(gateway.clone()),
        chat_use_case: ChatUseCase::new(gateway),
    });

    info!(host = %config.host, port = config.port, "starting tabqa server");
    start_server(&config, state)?.await
}
