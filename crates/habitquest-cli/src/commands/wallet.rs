//! Wallet commands: balances, spending, premium purchases.

use clap::Subcommand;
use habitquest_core::{Currency, RewardsEngine};

#[derive(Subcommand)]
pub enum WalletAction {
    /// Show balances and the engagement cap
    Show {
        /// User id
        user_id: String,
    },
    /// Spend coins from one currency
    Spend {
        /// User id
        user_id: String,
        /// Currency: achievement, engagement, or premium
        currency: String,
        /// Coins to spend
        amount: i64,
    },
    /// Credit purchased premium coins
    Purchase {
        /// User id
        user_id: String,
        /// Coins purchased
        amount: i64,
    },
}

pub fn run(action: WalletAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RewardsEngine::new()?;

    match action {
        WalletAction::Show { user_id } => {
            let wallet = engine.wallet_balances(&user_id)?;
            println!("{}", serde_json::to_string_pretty(&wallet)?);
        }
        WalletAction::Spend {
            user_id,
            currency,
            amount,
        } => {
            let currency = parse_currency(&currency)?;
            let balance = engine.debit(&user_id, currency, amount)?;
            println!(
                "Spent {amount} {} coins, balance now {balance}",
                currency.name()
            );
        }
        WalletAction::Purchase { user_id, amount } => {
            let balance = engine.credit_purchase(&user_id, amount)?;
            println!("Premium balance: {balance}");
        }
    }
    Ok(())
}

fn parse_currency(tag: &str) -> Result<Currency, String> {
    match tag {
        "achievement" => Ok(Currency::Achievement),
        "engagement" => Ok(Currency::Engagement),
        "premium" => Ok(Currency::Premium),
        _ => Err(format!(
            "unknown currency: {tag} (expected achievement, engagement, or premium)"
        )),
    }
}
