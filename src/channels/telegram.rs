use serde_json::json;

use crate::models::{DeliveryOutcome, SignalEvent};

/// Post a formatted signal message via the Telegram Bot API.
pub async fn send(
    http: &reqwest::Client,
    bot_token: &str,
    chat_id: &str,
    signal: &SignalEvent,
) -> DeliveryOutcome {
    let url = format!("https://api.telegram.org/bot{}/sendMessage", bot_token);

    let body = json!({
        "chat_id": chat_id,
        "text": format_message(signal),
        "parse_mode": "Markdown",
    });

    match http.post(&url).json(&body).send().await {
        Ok(resp) if resp.status().is_success() => DeliveryOutcome::sent(),
        Ok(resp) => {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            DeliveryOutcome::failed(format!("Telegram API returned {status}: {detail}"))
        }
        Err(e) => DeliveryOutcome::failed(format!("Telegram request failed: {e}")),
    }
}

/// Escape Markdown metacharacters in user-supplied strings. An unbalanced
/// `*` or `_` in a strategy name would otherwise make the Bot API reject the
/// whole message with a parse error.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn format_message(signal: &SignalEvent) -> String {
    let mut text = format!(
        "*{} Signal*\nStrategy: {}\nAsset: {}\nPrice: {}\nTimeframe: {}",
        signal.kind.label(),
        escape_markdown(&signal.strategy_name),
        escape_markdown(&signal.asset),
        signal.price,
        escape_markdown(&signal.timeframe),
    );

    if signal.kind.is_exit_family() {
        if let Some(pnl) = signal.profit_pct {
            text.push_str(&format!("\nP&L: {}%", pnl.round_dp(2)));
        }
    }

    text
}
