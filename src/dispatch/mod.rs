pub mod coordinator;
pub mod gate;
pub mod ledger;
pub mod log;

pub use coordinator::{Dispatcher, DispatcherConfig};
pub use ledger::{quota_day, PgQuotaLedger, QuotaLedger};
pub use log::{DeliveryLog, PgDeliveryLog};
