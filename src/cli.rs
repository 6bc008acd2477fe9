use crate::utils::AppError;
use async_trait::async_trait;
use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Set the token balance of one user, or of every user.
#[derive(Debug, Parser)]
#[command(name = "set-balance", version)]
pub struct Args {
    /// User email, or "all" / "--all" for every user
    #[arg(allow_hyphen_values = true)]
    pub email: Option<String>,

    /// New balance (token credits)
    #[arg(allow_hyphen_values = true, allow_negative_numbers = true)]
    pub amount: Option<String>,
}

impl Args {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.amount.is_none()
    }
}

/// Source of answers for arguments missing from the command line.
#[async_trait]
pub trait Prompt: Send {
    async fn ask(&mut self, question: &str) -> Result<String, AppError>;
}

/// Reads answers line by line from stdin.
pub struct StdinPrompt {
    lines: tokio::io::Lines<BufReader<tokio::io::Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> Result<String, AppError> {
        print!("{}\n> ", question);
        std::io::stdout()
            .flush()
            .map_err(|e| AppError::InvalidInput(format!("Failed to write prompt: {}", e)))?;

        let line = self
            .lines
            .next_line()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read answer: {}", e)))?;

        // EOF answers as empty
        Ok(line.unwrap_or_default().trim().to_string())
    }
}

pub fn print_usage() {
    log::warn!("Usage: set-balance <email|all> <amount>");
    log::warn!("Note: Use \"all\" as email to set balance for all users");
    log::warn!("Note: if you do not pass in the arguments, you will be prompted for them.");
}
