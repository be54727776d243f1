use crate::models::{NotificationChannel, SubscriptionTier};

/// Effective channel set for a dispatch. External notifications are a paid
/// capability, and only channels that passed credential verification are
/// live. Pure function of its inputs.
pub fn eligible_channels(
    tier: SubscriptionTier,
    channels: &[NotificationChannel],
) -> Vec<&NotificationChannel> {
    if !tier.allows_external_notifications() {
        return Vec::new();
    }

    channels.iter().filter(|c| c.is_verified()).collect()
}
