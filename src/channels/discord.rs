use serde_json::json;

use crate::models::{DeliveryOutcome, SignalEvent, SignalKind};

const WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

/// Post a signal embed to a Discord webhook. The URL shape is validated
/// before any network call; a malformed URL is a failed outcome with a
/// descriptive error, not a crash.
pub async fn send(
    http: &reqwest::Client,
    webhook_url: &str,
    signal: &SignalEvent,
) -> DeliveryOutcome {
    if let Err(reason) = validate_webhook_url(webhook_url) {
        return DeliveryOutcome::failed(format!("invalid Discord webhook URL: {reason}"));
    }

    match http.post(webhook_url).json(&build_payload(signal)).send().await {
        Ok(resp) if resp.status().is_success() => DeliveryOutcome::sent(),
        Ok(resp) => {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            DeliveryOutcome::failed(format!("Discord webhook returned {status}: {detail}"))
        }
        Err(e) => DeliveryOutcome::failed(format!("Discord request failed: {e}")),
    }
}

/// Expected shape: `https://discord.com/api/webhooks/{id}/{token}` with a
/// numeric id and a single-segment token.
pub fn validate_webhook_url(url: &str) -> Result<(), String> {
    let Some(rest) = url.strip_prefix(WEBHOOK_PREFIX) else {
        return Err(format!("must start with {WEBHOOK_PREFIX}"));
    };

    let mut parts = rest.splitn(2, '/');
    let id = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err("webhook id must be numeric".into());
    }
    if token.is_empty() || token.contains('/') {
        return Err("webhook token is missing or malformed".into());
    }

    Ok(())
}

// Embed accent colors: green for entries and take-profits, red for stops,
// blue for plain exits.
fn embed_color(kind: SignalKind) -> u32 {
    match kind {
        SignalKind::Entry | SignalKind::TakeProfit => 0x2ECC71,
        SignalKind::Exit => 0x3498DB,
        SignalKind::StopLoss => 0xE74C3C,
    }
}

fn build_payload(signal: &SignalEvent) -> serde_json::Value {
    let mut fields = vec![
        json!({ "name": "Strategy", "value": signal.strategy_name, "inline": true }),
        json!({ "name": "Asset", "value": signal.asset, "inline": true }),
        json!({ "name": "Price", "value": signal.price.to_string(), "inline": true }),
        json!({ "name": "Timeframe", "value": signal.timeframe, "inline": true }),
    ];

    if signal.kind.is_exit_family() {
        if let Some(pnl) = signal.profit_pct {
            fields.push(json!({
                "name": "P&L",
                "value": format!("{}%", pnl.round_dp(2)),
                "inline": true,
            }));
        }
    }

    json!({
        "embeds": [{
            "title": format!("{} Signal", signal.kind.label()),
            "color": embed_color(signal.kind),
            "fields": fields,
            "timestamp": signal.timestamp.to_rfc3339(),
        }]
    })
}
