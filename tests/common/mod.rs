use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use signalcast::channels::SignalSender;
use signalcast::dispatch::coordinator::{Dispatcher, DispatcherConfig};
use signalcast::dispatch::ledger::QuotaLedger;
use signalcast::dispatch::log::DeliveryLog;
use signalcast::models::{
    ChannelKind, DeliveryAttempt, DeliveryLogEntry, DeliveryOutcome, NotificationChannel,
    QuotaRecord, SignalEvent, SignalKind, StrategyConfig, SubscriptionTier,
    DEFAULT_DAILY_SIGNAL_LIMIT,
};

/// In-memory quota ledger with the same admission and increment semantics as
/// the Postgres implementation. Test double only; production requires the
/// durable ledger.
#[derive(Default)]
pub struct MemoryLedger {
    records: Mutex<HashMap<(Uuid, NaiveDate), QuotaRecord>>,
    pub increments: AtomicUsize,
    pub offline: AtomicBool,
}

impl MemoryLedger {
    #[allow(dead_code)]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[allow(dead_code)]
    pub fn seed(&self, strategy_id: Uuid, day: NaiveDate, count: i32, limit: i32) {
        let mut record = QuotaRecord::zero(strategy_id, day, limit);
        record.notification_count = count;
        self.records
            .lock()
            .unwrap()
            .insert((strategy_id, day), record);
    }

    #[allow(dead_code)]
    pub fn count(&self, strategy_id: Uuid, day: NaiveDate) -> i32 {
        self.records
            .lock()
            .unwrap()
            .get(&(strategy_id, day))
            .map_or(0, |r| r.notification_count)
    }

    #[allow(dead_code)]
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuotaLedger for MemoryLedger {
    async fn check_admission(
        &self,
        strategy_id: Uuid,
        day: NaiveDate,
        limit: i32,
    ) -> anyhow::Result<bool> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("ledger offline");
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(strategy_id, day))
            .map_or(true, |r| r.notification_count < limit))
    }

    async fn increment(
        &self,
        strategy_id: Uuid,
        day: NaiveDate,
        limit: i32,
    ) -> anyhow::Result<QuotaRecord> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("ledger offline");
        }
        self.increments.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry((strategy_id, day))
            .or_insert_with(|| QuotaRecord::zero(strategy_id, day, limit));
        record.notification_count += 1;
        record.daily_limit = limit;
        Ok(record.clone())
    }

    async fn usage(&self, strategy_id: Uuid, day: NaiveDate) -> anyhow::Result<QuotaRecord> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("ledger offline");
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(strategy_id, day))
            .cloned()
            .unwrap_or_else(|| QuotaRecord::zero(strategy_id, day, DEFAULT_DAILY_SIGNAL_LIMIT)))
    }

    async fn sweep(&self, retain_since: NaiveDate) -> anyhow::Result<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|(_, day), _| *day >= retain_since);
        Ok((before - records.len()) as u64)
    }
}

/// Recording delivery log that can be scripted to fail the next N appends.
#[derive(Default)]
pub struct MemoryLog {
    attempts: Mutex<Vec<DeliveryAttempt>>,
    failures_remaining: AtomicUsize,
}

impl MemoryLog {
    #[allow(dead_code)]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[allow(dead_code)]
    pub fn fail_next(&self, n: usize) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn entries(&self) -> Vec<DeliveryAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryLog for MemoryLog {
    async fn append(&self, attempt: &DeliveryAttempt) -> anyhow::Result<()> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("log store unavailable");
        }

        let mut attempts = self.attempts.lock().unwrap();
        // Same dedup semantics as the unique (signal_id, channel_kind) index
        let duplicate = attempts
            .iter()
            .any(|a| a.signal_id == attempt.signal_id && a.channel_kind == attempt.channel_kind);
        if !duplicate {
            attempts.push(attempt.clone());
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<DeliveryLogEntry>> {
        let attempts = self.attempts.lock().unwrap();
        let entries = attempts
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, a)| a.user_id == user_id)
            .take(limit as usize)
            .map(|(idx, a)| DeliveryLogEntry {
                id: idx as i64,
                user_id: a.user_id,
                signal_id: a.signal_id,
                channel_kind: a.channel_kind.as_str().into(),
                status: a.outcome.status.as_str().into(),
                error_message: a.outcome.error_message.clone(),
                created_at: Utc::now(),
            })
            .collect();
        Ok(entries)
    }
}

/// Records every send and returns a scripted outcome per channel kind
/// (default: sent).
#[derive(Default)]
pub struct ScriptedSender {
    outcomes: Mutex<HashMap<ChannelKind, DeliveryOutcome>>,
    sends: Mutex<Vec<ChannelKind>>,
}

impl ScriptedSender {
    #[allow(dead_code)]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[allow(dead_code)]
    pub fn script(&self, kind: ChannelKind, outcome: DeliveryOutcome) {
        self.outcomes.lock().unwrap().insert(kind, outcome);
    }

    #[allow(dead_code)]
    pub fn sends(&self) -> Vec<ChannelKind> {
        self.sends.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }
}

#[async_trait]
impl SignalSender for ScriptedSender {
    async fn send(&self, channel: &NotificationChannel, _signal: &SignalEvent) -> DeliveryOutcome {
        self.sends.lock().unwrap().push(channel.kind());
        self.outcomes
            .lock()
            .unwrap()
            .get(&channel.kind())
            .cloned()
            .unwrap_or_else(DeliveryOutcome::sent)
    }
}

#[allow(dead_code)]
pub fn make_dispatcher(
    ledger: Arc<MemoryLedger>,
    log: Arc<MemoryLog>,
    sender: Arc<ScriptedSender>,
) -> Dispatcher {
    Dispatcher::new(ledger, log, sender, DispatcherConfig::default())
}

#[allow(dead_code)]
pub fn strategy_config(
    tier: SubscriptionTier,
    channels: Vec<NotificationChannel>,
) -> StrategyConfig {
    StrategyConfig {
        strategy_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        daily_signal_limit: 5,
        signal_notifications_enabled: true,
        tier,
        channels,
    }
}

/// Signal whose strategy/user ids match the given config.
#[allow(dead_code)]
pub fn signal_for(config: &StrategyConfig, kind: SignalKind) -> SignalEvent {
    SignalEvent {
        id: Uuid::new_v4(),
        strategy_id: config.strategy_id,
        strategy_name: "momentum_breakout".into(),
        user_id: config.user_id,
        kind,
        asset: "BTC/USDT".into(),
        price: Decimal::new(42_000, 0),
        timestamp: Utc::now(),
        profit_pct: None,
        timeframe: "4h".into(),
    }
}

#[allow(dead_code)]
pub fn verified_discord() -> NotificationChannel {
    NotificationChannel::Discord {
        webhook_url: "https://discord.com/api/webhooks/1234567890/test-token".into(),
        verified: true,
    }
}

#[allow(dead_code)]
pub fn verified_telegram() -> NotificationChannel {
    NotificationChannel::Telegram {
        bot_token: "12345:test-token".into(),
        chat_id: "-100200300".into(),
        verified: true,
    }
}

#[allow(dead_code)]
pub fn verified_email() -> NotificationChannel {
    NotificationChannel::Email {
        address: "trader@example.com".into(),
        verified: true,
    }
}

#[allow(dead_code)]
pub fn unverified_email() -> NotificationChannel {
    NotificationChannel::Email {
        address: "trader@example.com".into(),
        verified: false,
    }
}
