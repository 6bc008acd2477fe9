use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};

/// Documento da collection "balances" (no máximo um por usuário).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BalanceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    /// Absent or null means the write did not land the way we asked.
    #[serde(rename = "tokenCredits", default)]
    pub token_credits: Option<f64>,
    #[serde(rename = "autoRefillEnabled", skip_serializing_if = "Option::is_none", default)]
    pub auto_refill_enabled: Option<bool>,
    #[serde(rename = "refillIntervalValue", skip_serializing_if = "Option::is_none", default)]
    pub refill_interval_value: Option<f64>,
    #[serde(rename = "refillIntervalUnit", skip_serializing_if = "Option::is_none", default)]
    pub refill_interval_unit: Option<String>,
    #[serde(rename = "refillAmount", skip_serializing_if = "Option::is_none", default)]
    pub refill_amount: Option<f64>,
    #[serde(rename = "lastRefill", skip_serializing_if = "Option::is_none", default)]
    pub last_refill: Option<Bson>,
}

impl BalanceRecord {
    pub fn new(user: ObjectId, token_credits: Option<f64>) -> Self {
        Self {
            id: None,
            user,
            token_credits,
            auto_refill_enabled: None,
            refill_interval_value: None,
            refill_interval_unit: None,
            refill_amount: None,
            last_refill: None,
        }
    }
}
