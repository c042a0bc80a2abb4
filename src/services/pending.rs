use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Something a user was asked for and has not sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    AwaitComment { room_id: i64 },
    AwaitPlan { work_date: NaiveDate },
}

#[derive(Debug, Clone)]
struct PendingEntry {
    action: PendingAction,
    expires_at: DateTime<Utc>,
}

/// Per-user conversation state. One entry per user, removed when consumed
/// or once it expires.
#[derive(Debug, Clone)]
pub struct PendingActions {
    entries: Arc<Mutex<HashMap<i64, PendingEntry>>>,
    ttl: Duration,
}

impl PendingActions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Replaces whatever the user had pending.
    pub async fn set(&self, user_id: i64, action: PendingAction, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            user_id,
            PendingEntry {
                action,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Removes and returns the user's pending comment target, if any.
    pub async fn take_comment(&self, user_id: i64, now: DateTime<Utc>) -> Option<i64> {
        self.take_matching(user_id, now, |action| match action {
            PendingAction::AwaitComment { room_id } => Some(*room_id),
            PendingAction::AwaitPlan { .. } => None,
        })
        .await
    }

    /// Removes and returns the date armed with `/upload_plan`, if any.
    pub async fn take_plan_date(&self, user_id: i64, now: DateTime<Utc>) -> Option<NaiveDate> {
        self.take_matching(user_id, now, |action| match action {
            PendingAction::AwaitPlan { work_date } => Some(*work_date),
            PendingAction::AwaitComment { .. } => None,
        })
        .await
    }

    pub async fn clear(&self, user_id: i64) {
        self.entries.lock().await.remove(&user_id);
    }

    pub async fn peek(&self, user_id: i64, now: DateTime<Utc>) -> Option<PendingAction> {
        let entries = self.entries.lock().await;
        entries
            .get(&user_id)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.action.clone())
    }

    async fn take_matching<T>(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        select: impl Fn(&PendingAction) -> Option<T>,
    ) -> Option<T> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(&user_id)?;

        if entry.expires_at <= now {
            entries.remove(&user_id);
            return None;
        }

        let selected = select(&entry.action)?;
        entries.remove(&user_id);
        Some(selected)
    }
}
