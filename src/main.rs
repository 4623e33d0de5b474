// main.rs
use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use video_stats_nlu::api::{AskRequest, ErrorResponse};
use video_stats_nlu::config::CONFIG;
use video_stats_nlu::engine::unknown_hint;
use video_stats_nlu::query::IntentParser;

fn main() -> Result<()> {
    // RUST_LOG 优先，其次是配置文件中的级别
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&CONFIG.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let parser = IntentParser::new().with_config(CONFIG.classifier.clone());
    info!(today = %parser.today(), "intent parser ready");

    println!("--- 视频统计问答解析 ---");
    println!(" 输入俄语问题，或 JSON 请求 {{\"text\": ..., \"reference_date\": \"YYYY-MM-DD\"}}");
    println!(" 输入 'quit' 退出");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input == "quit" || input == "exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        // JSON 模式
        let request = if input.starts_with('{') {
            match serde_json::from_str::<AskRequest>(input) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "invalid request");
                    let error = ErrorResponse::new("bad_request", "invalid JSON request")
                        .with_details(e.to_string());
                    println!("{}", serde_json::to_string_pretty(&error)?);
                    continue;
                }
            }
        } else {
            AskRequest::new(input)
        };

        let today = request.reference_date.unwrap_or_else(|| parser.today());
        let result = parser.parse_on(&request.text, today);
        println!("{}", serde_json::to_string_pretty(&result)?);

        if result.is_unknown() {
            println!("{}", unknown_hint(&result.original_query));
        }
    }

    Ok(())
}
