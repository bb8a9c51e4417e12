use chronos_core::{generate_insight, Config, GeminiInsight};
use serde_json::json;

use super::{print_json, resolve_hours, CmdResult};

pub fn run(hours: Option<f64>, config: &Config) -> CmdResult {
    let hours = resolve_hours(hours, config)?;
    let provider = GeminiInsight::from_config(&config.insight)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let text = runtime.block_on(generate_insight(&provider, hours));

    print_json(&json!({
        "elapsedHours": hours,
        "insight": text,
    }))
}
