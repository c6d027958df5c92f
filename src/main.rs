use clap::Parser;
use course_etl::utils::logger;
use course_etl::{
    CliConfig, Command, CourseDocument, CourseEngine, CourseError, FileSource, WebhookSource,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting course-etl CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            exit_with(&e);
        }
    };

    let pipeline = config.normalization.build_pipeline();
    tracing::info!(mode = %pipeline.mode(), "Pipeline ready");

    let outcome = match &cli.command {
        Command::Parse { input } => match FileSource::new(input).read().await {
            Ok(raw) => pipeline.process(&raw),
            Err(e) => Err(e),
        },
        Command::Generate { theme, .. } => match WebhookSource::from_config(&config) {
            Ok(source) => {
                CourseEngine::from_config(source, pipeline, &config)
                    .generate(theme)
                    .await
            }
            Err(e) => Err(e),
        },
    };

    match outcome.and_then(|document| render(&document, config.output.pretty)) {
        Ok(body) => println!("{}", body),
        Err(e) => {
            tracing::error!(
                "❌ Course recovery failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            exit_with(&e);
        }
    }
}

fn render(document: &CourseDocument, pretty: bool) -> course_etl::Result<String> {
    let body = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(body)
}

/// Mirrors the HTTP contract: `{ "error": ... }` on stdout, friendly text on stderr.
fn exit_with(e: &CourseError) -> ! {
    let body = serde_json::to_string(&e.to_response())
        .unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string());
    println!("{}", body);
    eprintln!("❌ {}", e.user_friendly_message());

    // 根據 HTTP 狀態決定退出碼
    let exit_code = match e.http_status() {
        400 => 2,
        _ => 1,
    };
    std::process::exit(exit_code);
}
