use super::BalanceStore;
use crate::models::{BalanceRecord, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process `BalanceStore` with fault injection and call counters.
#[derive(Default)]
pub struct MemoryStore {
    users: Vec<User>,
    balances: Mutex<HashMap<ObjectId, BalanceRecord>>,
    failing: HashSet<ObjectId>,
    null_credits: HashSet<ObjectId>,
    unreadable_balances: bool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    /// Upserts for `user_id` error out.
    pub fn fail_for(mut self, user_id: ObjectId) -> Self {
        self.failing.insert(user_id);
        self
    }

    /// Upserts for `user_id` return a record without credits.
    pub fn null_credits_for(mut self, user_id: ObjectId) -> Self {
        self.null_credits.insert(user_id);
        self
    }

    /// Balance lookups error out, as with a document that does not decode.
    pub fn unreadable_balances(mut self) -> Self {
        self.unreadable_balances = true;
        self
    }

    pub fn seed_balance(self, user_id: ObjectId, credits: f64) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert(user_id, BalanceRecord::new(user_id, Some(credits)));
        self
    }

    pub fn balance_of(&self, user_id: &ObjectId) -> Option<BalanceRecord> {
        self.balances.lock().unwrap().get(user_id).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.balances.lock().unwrap().len()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.iter().find(|u| u.email.as_deref() == Some(email)).cloned())
    }

    async fn list_all_users(&self) -> Result<Vec<User>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.clone())
    }

    async fn find_balance_by_user_id(
        &self,
        user_id: &ObjectId,
    ) -> Result<Option<BalanceRecord>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unreadable_balances {
            return Err(AppError::DatabaseError(
                "invalid type: floating point `1.5`, expected i64".to_string(),
            ));
        }
        Ok(self.balance_of(user_id))
    }

    async fn upsert_balance(
        &self,
        user_id: &ObjectId,
        token_credits: &str,
    ) -> Result<Option<BalanceRecord>, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(user_id) {
            return Err(AppError::StoreWrite("connection reset by peer".to_string()));
        }

        let credits = if self.null_credits.contains(user_id) {
            None
        } else {
            let value = super::coerce_credits(token_credits)?;
            value.as_f64().or_else(|| value.as_i64().map(|n| n as f64))
        };

        let mut balances = self.balances.lock().unwrap();
        let record = balances
            .entry(*user_id)
            .or_insert_with(|| BalanceRecord::new(*user_id, None));
        record.token_credits = credits;

        Ok(Some(record.clone()))
    }
}
