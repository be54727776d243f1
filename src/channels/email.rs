use serde_json::json;

use crate::models::{DeliveryOutcome, SignalEvent, SignalKind};

/// Transactional-email provider settings (HTTP API).
#[derive(Debug, Clone)]
pub struct EmailProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
}

/// Send the signal as a transactional email through the provider's HTTP API.
pub async fn send(
    http: &reqwest::Client,
    provider: &EmailProviderConfig,
    to: &str,
    signal: &SignalEvent,
) -> DeliveryOutcome {
    let payload = json!({
        "from": provider.from_address,
        "to": [to],
        "subject": subject(signal),
        "text": body(signal),
    });

    let result = http
        .post(&provider.api_url)
        .bearer_auth(&provider.api_key)
        .json(&payload)
        .send()
        .await;

    match result {
        Ok(resp) if resp.status().is_success() => DeliveryOutcome::sent(),
        Ok(resp) => {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            DeliveryOutcome::failed(format!("email provider returned {status}: {detail}"))
        }
        Err(e) => DeliveryOutcome::failed(format!("email request failed: {e}")),
    }
}

fn subject(signal: &SignalEvent) -> String {
    match signal.kind {
        SignalKind::Entry => format!("Entry signal: {}", signal.asset),
        SignalKind::Exit => format!("Exit signal: {}", signal.asset),
        SignalKind::StopLoss => format!("Stop loss triggered: {}", signal.asset),
        SignalKind::TakeProfit => format!("Take profit hit: {}", signal.asset),
    }
}

fn body(signal: &SignalEvent) -> String {
    let mut text = format!(
        "Your strategy \"{}\" produced a {} signal.\n\nAsset: {}\nPrice: {}\nTimeframe: {}\nTime: {}",
        signal.strategy_name,
        signal.kind.label().to_lowercase(),
        signal.asset,
        signal.price,
        signal.timeframe,
        signal.timestamp.to_rfc3339(),
    );

    if signal.kind.is_exit_family() {
        if let Some(pnl) = signal.profit_pct {
            text.push_str(&format!("\nP&L: {}%", pnl.round_dp(2)));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn make_signal(kind: SignalKind) -> SignalEvent {
        SignalEvent {
            id: Uuid::new_v4(),
            strategy_id: Uuid::new_v4(),
            strategy_name: "momentum".into(),
            user_id: Uuid::new_v4(),
            kind,
            asset: "SOL/USDT".into(),
            price: Decimal::new(145, 0),
            timestamp: Utc::now(),
            profit_pct: None,
            timeframe: "15m".into(),
        }
    }

    #[test]
    fn test_subject_keyed_by_kind() {
        assert_eq!(
            subject(&make_signal(SignalKind::Entry)),
            "Entry signal: SOL/USDT"
        );
        assert_eq!(
            subject(&make_signal(SignalKind::StopLoss)),
            "Stop loss triggered: SOL/USDT"
        );
        assert_eq!(
            subject(&make_signal(SignalKind::TakeProfit)),
            "Take profit hit: SOL/USDT"
        );
    }

    #[test]
    fn test_body_includes_pnl_for_exit_family() {
        let mut signal = make_signal(SignalKind::Exit);
        signal.profit_pct = Some(Decimal::new(875, 2)); // 8.75
        assert!(body(&signal).contains("P&L: 8.75%"));
    }
}
