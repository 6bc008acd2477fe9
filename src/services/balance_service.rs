use crate::{
    cli::{Args, Prompt},
    database::BalanceStore,
    models::{BalanceRecord, User},
    utils::AppError,
};

/// Which users one run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    AllUsers,
    Email(String),
}

/// `all` / `--all` in any case selects every user; anything else must look
/// like an email.
pub fn resolve_target(identifier: &str) -> Result<Target, AppError> {
    let lowered = identifier.to_lowercase();
    if lowered == "all" || lowered == "--all" {
        return Ok(Target::AllUsers);
    }

    if !identifier.contains('@') {
        return Err(AppError::InvalidInput("Invalid email address!".to_string()));
    }

    Ok(Target::Email(identifier.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    pub label: String,
    pub reason: String,
}

/// Per-user outcomes of a bulk run, in enumeration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BulkSummary {
    pub success_count: usize,
    pub error_count: usize,
    pub failures: Vec<BulkFailure>,
}

impl BulkSummary {
    pub fn record(&mut self, label: &str, result: Result<BalanceRecord, AppError>) {
        match result {
            Ok(record) => {
                self.success_count += 1;
                log::info!(
                    "✓ Set balance for {}: {}",
                    label,
                    format_credits(&record)
                );
            }
            Err(AppError::UnexpectedWriteResult) => {
                self.error_count += 1;
                log::error!("✗ Failed to set balance for {}", label);
                self.failures.push(BulkFailure {
                    label: label.to_string(),
                    reason: AppError::UnexpectedWriteResult.to_string(),
                });
            }
            Err(e) => {
                self.error_count += 1;
                log::error!("✗ Error setting balance for {}: {}", label, e);
                self.failures.push(BulkFailure {
                    label: label.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Bulk run against an empty user collection.
    NoUsers,
    Single {
        email: String,
        previous: Option<BalanceRecord>,
        balance: BalanceRecord,
    },
    Bulk(BulkSummary),
}

impl Outcome {
    /// Partial bulk failures are reported, never escalated.
    pub fn exit_code(&self) -> i32 {
        0
    }
}

/// Runs one balance assignment end to end.
///
/// Arguments missing from `args` are asked for through `prompt`. Fatal
/// conditions come back as `Err`; a bulk run only fails as a whole when the
/// user enumeration itself fails.
pub async fn set_balance<S, P>(
    store: &S,
    enabled: bool,
    args: Args,
    prompt: &mut P,
) -> Result<Outcome, AppError>
where
    S: BalanceStore + ?Sized,
    P: Prompt + ?Sized,
{
    if !enabled {
        return Err(AppError::ConfigurationDisabled);
    }

    let email = match args.email.filter(|e| !e.is_empty()) {
        Some(email) => email,
        None => prompt.ask("Email (or \"all\" for all users):").await?,
    };

    let amount = match args.amount.filter(|a| !a.is_empty()) {
        Some(amount) => amount,
        None => prompt.ask("amount:").await?,
    };

    let amount = amount.trim().to_string();
    if amount.is_empty() {
        return Err(AppError::InvalidInput("Please specify an amount!".to_string()));
    }

    match resolve_target(&email)? {
        Target::AllUsers => set_balance_for_all(store, &amount).await,
        Target::Email(email) => set_balance_for_user(store, &email, &amount).await,
    }
}

async fn set_balance_for_all<S>(store: &S, amount: &str) -> Result<Outcome, AppError>
where
    S: BalanceStore + ?Sized,
{
    log::info!("Setting balance to {} for all users...", amount);

    let users = store.list_all_users().await?;
    if users.is_empty() {
        log::warn!("No users found in the database.");
        return Ok(Outcome::NoUsers);
    }

    let mut summary = BulkSummary::default();

    for user in &users {
        let result = assign(store, user, amount).await;
        summary.record(user.label(), result);
    }

    log::info!("--------------------------");
    log::info!("Successfully updated {} user(s)", summary.success_count);
    if summary.error_count > 0 {
        log::error!("Failed to update {} user(s)", summary.error_count);
    }

    Ok(Outcome::Bulk(summary))
}

async fn set_balance_for_user<S>(store: &S, email: &str, amount: &str) -> Result<Outcome, AppError>
where
    S: BalanceStore + ?Sized,
{
    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("No user with that email was found!".to_string()))?;

    log::info!("Found user: {}", user.label());

    // Display only: an unreadable current balance must not block the write
    let previous = match store.find_balance_by_user_id(&user.id).await {
        Ok(previous) => previous,
        Err(e) => {
            log::warn!("Could not read current balance: {}", e);
            None
        }
    };
    match &previous {
        Some(balance) => log::info!("Current Balance: {}", format_credits(balance)),
        None => log::info!("User has no balance!"),
    }

    let balance = assign(store, &user, amount).await?;

    log::info!("Balance set successfully!");
    log::info!("New Balance: {}", format_credits(&balance));

    Ok(Outcome::Single {
        email: email.to_string(),
        previous,
        balance,
    })
}

/// Single upsert plus its post-condition: the returned record must carry
/// `tokenCredits`.
async fn assign<S>(store: &S, user: &User, amount: &str) -> Result<BalanceRecord, AppError>
where
    S: BalanceStore + ?Sized,
{
    match store.upsert_balance(&user.id, amount).await? {
        Some(record) if record.token_credits.is_some() => Ok(record),
        other => {
            log::debug!("Unexpected upsert result for {}: {:?}", user.label(), other);
            Err(AppError::UnexpectedWriteResult)
        }
    }
}

fn format_credits(record: &BalanceRecord) -> String {
    record
        .token_credits
        .map(|c| c.to_string())
        .unwrap_or_else(|| "null".to_string())
}
