use crate::{Action, TransactionHandle};
use alloy_primitives::{Address, U256};
use amount::format_units;
use client::Account;
use token::TokenProxy;
use tracing::info;

/// Approve input data.
#[derive(Debug, Clone, Copy)]
pub struct Approve {
    pub spender: Address,
    /// Allowance granted, in the token's smallest unit
    pub amount: U256,
    pub decimals: u8,
}

pub struct ApproveAction<'a, T> {
    token: &'a T,
    owner: &'a Account,
    action: Approve,
}

impl<'a, T: TokenProxy> ApproveAction<'a, T> {
    pub const fn new(token: &'a T, owner: &'a Account, action: Approve) -> Self {
        Self {
            token,
            owner,
            action,
        }
    }
}

impl<T> Action for ApproveAction<'_, T>
where
    T: TokenProxy,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        // Any allowance, including zero (revocation), is valid.
        Ok(self.action.spender != Address::ZERO)
    }

    async fn execute(&self) -> eyre::Result<TransactionHandle> {
        if !self.is_ready().await? {
            eyre::bail!("{}: spender is the zero address", self.description());
        }

        let tx_hash = self
            .token
            .approve(self.owner, self.action.spender, self.action.amount)
            .await?;

        info!(tx_hash = %tx_hash, "Approval submitted.");

        Ok(TransactionHandle {
            tx_hash,
            sender: self.owner.address(),
            description: self.description(),
        })
    }

    fn description(&self) -> String {
        format!(
            "Approve {} to spend {} tokens of {}",
            self.action.spender,
            format_units(self.action.amount, self.action.decimals),
            self.owner.address()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{account, MockToken, DEPLOYER_KEY, USER_KEY};

    #[tokio::test]
    async fn test_approve() {
        let deployer = account(DEPLOYER_KEY);
        let user = account(USER_KEY);
        let token = MockToken::default();

        let action = ApproveAction::new(
            &token,
            &user,
            Approve {
                spender: deployer.address(),
                amount: U256::from(100_000u64),
                decimals: 3,
            },
        );

        assert!(action.is_ready().await.unwrap());
        assert!(action.description().contains("spend 100 tokens"));

        let handle = action.execute().await.unwrap();
        assert_eq!(handle.sender, user.address());
        assert_eq!(*token.submitted.lock().unwrap(), vec!["approve"]);
    }

    #[tokio::test]
    async fn test_approve_zero_spender() {
        let user = account(USER_KEY);
        let token = MockToken::default();

        let action = ApproveAction::new(
            &token,
            &user,
            Approve {
                spender: Address::ZERO,
                amount: U256::from(1u64),
                decimals: 18,
            },
        );

        assert!(!action.is_ready().await.unwrap());
        assert!(action.execute().await.is_err());
        assert!(token.submitted.lock().unwrap().is_empty());
    }
}
