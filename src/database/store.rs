use super::{MongoDB, BALANCES, USERS};
use crate::models::{BalanceRecord, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

/// Persistence operations the balance assignment needs.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list_all_users(&self) -> Result<Vec<User>, AppError>;

    async fn find_balance_by_user_id(&self, user_id: &ObjectId)
        -> Result<Option<BalanceRecord>, AppError>;

    /// Create-if-absent, overwrite-if-present, in one atomic operation.
    /// Returns the document as it stands after the write.
    async fn upsert_balance(
        &self,
        user_id: &ObjectId,
        token_credits: &str,
    ) -> Result<Option<BalanceRecord>, AppError>;
}

/// `BalanceStore` over the application's MongoDB collections.
pub struct MongoBalanceStore {
    db: MongoDB,
}

impl MongoBalanceStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BalanceStore for MongoBalanceStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let collection = self.db.collection::<User>(USERS);

        let user = collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn list_all_users(&self) -> Result<Vec<User>, AppError> {
        let collection = self.db.collection::<User>(USERS);

        let mut cursor = collection.find(doc! {}).await?;

        use futures::stream::StreamExt;
        let mut users = Vec::new();

        while let Some(result) = cursor.next().await {
            users.push(result?);
        }

        Ok(users)
    }

    async fn find_balance_by_user_id(
        &self,
        user_id: &ObjectId,
    ) -> Result<Option<BalanceRecord>, AppError> {
        let collection = self.db.collection::<BalanceRecord>(BALANCES);

        let balance = collection.find_one(doc! { "user": user_id }).await?;
        Ok(balance)
    }

    async fn upsert_balance(
        &self,
        user_id: &ObjectId,
        token_credits: &str,
    ) -> Result<Option<BalanceRecord>, AppError> {
        let credits = coerce_credits(token_credits)?;
        let collection = self.db.collection::<BalanceRecord>(BALANCES);

        let filter = doc! { "user": user_id };

        let update = doc! {
            "$set": { "tokenCredits": credits },
            "$setOnInsert": insert_defaults(),
        };

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))
    }
}

/// Balance schema defaults for a record created by the upsert. Auto-refill
/// always starts switched off, whatever the application config says.
pub fn insert_defaults() -> Document {
    doc! {
        "autoRefillEnabled": false,
        "refillIntervalValue": 30,
        "refillIntervalUnit": "days",
        "refillAmount": 0,
        "lastRefill": mongodb::bson::DateTime::now(),
    }
}

/// `tokenCredits` is a Number in the schema: integers stay integers, other
/// finite numbers become doubles, anything else is rejected.
pub fn coerce_credits(amount: &str) -> Result<Bson, AppError> {
    let trimmed = amount.trim();

    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Bson::Int64(n));
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Bson::Double(n)),
        _ => Err(AppError::StoreWrite(format!(
            "Cast to Number failed for value \"{}\" at path \"tokenCredits\"",
            amount
        ))),
    }
}
