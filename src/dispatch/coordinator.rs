use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use metrics::counter;
use rust_decimal::Decimal;
use tokio::time::{sleep_until, timeout, Instant};
use uuid::Uuid;

use crate::channels::SignalSender;
use crate::errors::DispatchError;
use crate::models::{
    ChannelOutcome, DeliveryAttempt, DeliveryOutcome, DeliveryStatus, DispatchDisposition,
    DispatchReport, NotificationChannel, QuotaUsage, SignalEvent, StrategyConfig,
};

use super::gate;
use super::ledger::{quota_day, QuotaLedger};
use super::log::DeliveryLog;

/// Bounded retries for a failed delivery-log append before it is dropped.
const LOG_APPEND_ATTEMPTS: u32 = 3;

/// Tunables for one dispatcher instance.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Timeout applied to each individual channel send.
    pub channel_timeout: Duration,
    /// Deadline for the whole fan-out. Stragglers are finalized as failed so
    /// logging and the quota charge always run.
    pub dispatch_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            channel_timeout: Duration::from_secs(8),
            dispatch_timeout: Duration::from_secs(20),
        }
    }
}

/// Coordinates one signal dispatch: capability gate, quota admission,
/// concurrent channel fan-out, delivery logging, and the single quota charge.
///
/// State machine per invocation:
/// Start -> Gated -> Admitted | Rejected -> Dispatched -> Finalized.
#[derive(Clone)]
pub struct Dispatcher {
    ledger: Arc<dyn QuotaLedger>,
    log: Arc<dyn DeliveryLog>,
    sender: Arc<dyn SignalSender>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        ledger: Arc<dyn QuotaLedger>,
        log: Arc<dyn DeliveryLog>,
        sender: Arc<dyn SignalSender>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            ledger,
            log,
            sender,
            config,
        }
    }

    /// Entry point for the strategy evaluation engine. The signal itself is
    /// already recorded upstream; this call only concerns external
    /// notification, so every non-send path is a normal finalized report.
    pub async fn on_signal_generated(
        &self,
        signal: &SignalEvent,
        strategy: &StrategyConfig,
    ) -> Result<DispatchReport, DispatchError> {
        validate(signal)?;
        counter!("dispatches_total").increment(1);

        if !strategy.signal_notifications_enabled {
            tracing::debug!(
                strategy_id = %strategy.strategy_id,
                "Notifications disabled — skipping dispatch"
            );
            return Ok(DispatchReport::skipped(
                DispatchDisposition::NotificationsDisabled,
            ));
        }

        let eligible = gate::eligible_channels(strategy.tier, &strategy.channels);
        if eligible.is_empty() {
            tracing::debug!(
                strategy_id = %strategy.strategy_id,
                tier = ?strategy.tier,
                "No eligible channels"
            );
            return Ok(DispatchReport::skipped(
                DispatchDisposition::NoEligibleChannels,
            ));
        }

        let day = quota_day(Utc::now());
        let limit = strategy.daily_signal_limit;

        // Advisory pre-check. An unreachable ledger fails open: delivery of a
        // real trading signal takes precedence over strict quota enforcement.
        let admitted = match self
            .ledger
            .check_admission(strategy.strategy_id, day, limit)
            .await
        {
            Ok(admitted) => admitted,
            Err(e) => {
                counter!("quota_failopen_total").increment(1);
                tracing::warn!(
                    error = %e,
                    strategy_id = %strategy.strategy_id,
                    "Quota ledger unreachable — failing open"
                );
                true
            }
        };

        if !admitted {
            counter!("quota_rejections_total").increment(1);
            tracing::info!(
                strategy_id = %strategy.strategy_id,
                limit,
                "Daily notification quota exhausted"
            );
            let usage = self.usage_snapshot(strategy.strategy_id, day).await;
            return Ok(DispatchReport {
                disposition: DispatchDisposition::QuotaExhausted,
                notifications_sent: 0,
                outcomes: Vec::new(),
                usage,
            });
        }

        let outcomes = self.fan_out(signal, &eligible).await;

        for outcome in &outcomes {
            self.append_log(signal, strategy, outcome).await;
        }

        let sent = outcomes
            .iter()
            .filter(|o| o.status == DeliveryStatus::Sent)
            .count();
        counter!("notifications_sent_total").increment(sent as u64);
        counter!("notifications_failed_total").increment((outcomes.len() - sent) as u64);

        // One charge per admitted dispatch, not per channel. A failed send
        // still consumed the attempt, so it is not refunded; a failure here
        // is a ledger-health concern, the notifications are already out.
        let usage = match self.ledger.increment(strategy.strategy_id, day, limit).await {
            Ok(record) => Some(record.usage()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    strategy_id = %strategy.strategy_id,
                    "Quota increment failed after dispatch"
                );
                self.usage_snapshot(strategy.strategy_id, day).await
            }
        };

        Ok(DispatchReport {
            disposition: DispatchDisposition::Dispatched,
            notifications_sent: sent,
            outcomes,
            usage,
        })
    }

    /// Fan out to every eligible channel concurrently. No channel waits on
    /// another; each send carries its own timeout, and the overall join runs
    /// under a dispatch deadline so a hung provider cannot block the logging
    /// or quota steps.
    async fn fan_out(
        &self,
        signal: &SignalEvent,
        eligible: &[&NotificationChannel],
    ) -> Vec<ChannelOutcome> {
        let deadline = Instant::now() + self.config.dispatch_timeout;
        let channel_timeout = self.config.channel_timeout;

        let mut pending: FuturesUnordered<_> = eligible
            .iter()
            .enumerate()
            .map(|(idx, channel)| {
                let sender = Arc::clone(&self.sender);
                let channel = (*channel).clone();
                let signal = signal.clone();
                async move {
                    let outcome = match timeout(channel_timeout, sender.send(&channel, &signal))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => DeliveryOutcome::failed(format!(
                            "send timed out after {}s",
                            channel_timeout.as_secs()
                        )),
                    };
                    (idx, outcome)
                }
            })
            .collect();

        let mut results: Vec<Option<DeliveryOutcome>> = vec![None; eligible.len()];
        loop {
            tokio::select! {
                next = pending.next() => {
                    match next {
                        Some((idx, outcome)) => results[idx] = Some(outcome),
                        None => break,
                    }
                }
                _ = sleep_until(deadline) => {
                    tracing::warn!(
                        signal_id = %signal.id,
                        "Dispatch deadline exceeded — finalizing stragglers as failed"
                    );
                    break;
                }
            }
        }

        eligible
            .iter()
            .zip(results)
            .map(|(channel, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    DeliveryOutcome::failed("dispatch deadline exceeded before send completed")
                });
                ChannelOutcome {
                    channel_kind: channel.kind(),
                    status: outcome.status,
                    error_message: outcome.error_message,
                }
            })
            .collect()
    }

    /// Append one log entry, retrying a bounded number of times. Logging is
    /// observability, not control: after the last attempt the entry is
    /// dropped with an error log and the dispatch still succeeds.
    async fn append_log(
        &self,
        signal: &SignalEvent,
        strategy: &StrategyConfig,
        outcome: &ChannelOutcome,
    ) {
        let attempt = DeliveryAttempt {
            user_id: strategy.user_id,
            signal_id: signal.id,
            channel_kind: outcome.channel_kind,
            outcome: DeliveryOutcome {
                status: outcome.status,
                error_message: outcome.error_message.clone(),
            },
        };

        for n in 1..=LOG_APPEND_ATTEMPTS {
            match self.log.append(&attempt).await {
                Ok(()) => return,
                Err(e) if n < LOG_APPEND_ATTEMPTS => {
                    tracing::warn!(
                        error = %e,
                        attempt = n,
                        channel = %attempt.channel_kind,
                        "Delivery log append failed — retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(50 * u64::from(n))).await;
                }
                Err(e) => {
                    counter!("delivery_log_append_failures_total").increment(1);
                    tracing::error!(
                        error = %e,
                        channel = %attempt.channel_kind,
                        signal_id = %signal.id,
                        "Delivery log append failed — giving up"
                    );
                }
            }
        }
    }

    async fn usage_snapshot(&self, strategy_id: Uuid, day: NaiveDate) -> Option<QuotaUsage> {
        match self.ledger.usage(strategy_id, day).await {
            Ok(record) => Some(record.usage()),
            Err(e) => {
                tracing::warn!(error = %e, %strategy_id, "Failed to read quota usage");
                None
            }
        }
    }
}

fn validate(signal: &SignalEvent) -> Result<(), DispatchError> {
    if signal.strategy_name.trim().is_empty() {
        return Err(DispatchError::InvalidSignal("strategy name is empty".into()));
    }
    if signal.asset.trim().is_empty() {
        return Err(DispatchError::InvalidSignal("asset is empty".into()));
    }
    if signal.price <= Decimal::ZERO {
        return Err(DispatchError::InvalidSignal(format!(
            "price must be positive, got {}",
            signal.price
        )));
    }
    Ok(())
}
