use crate::{Action, TransactionHandle};
use alloy_primitives::{Address, U256};
use amount::format_units;
use client::Account;
use token::TokenProxy;
use tracing::{info, warn};

/// Delegated transfer input data.
#[derive(Debug, Clone, Copy)]
pub struct TransferFrom {
    /// Account whose balance is debited
    pub from: Address,
    pub to: Address,
    /// Raw amount in the token's smallest unit
    pub amount: U256,
    pub decimals: u8,
}

/// Moves tokens out of `from` using the allowance granted to `spender`.
pub struct TransferFromAction<'a, T> {
    token: &'a T,
    spender: &'a Account,
    action: TransferFrom,
}

impl<'a, T: TokenProxy> TransferFromAction<'a, T> {
    pub const fn new(token: &'a T, spender: &'a Account, action: TransferFrom) -> Self {
        Self {
            token,
            spender,
            action,
        }
    }
}

impl<T> Action for TransferFromAction<'_, T>
where
    T: TokenProxy,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.amount == U256::ZERO || self.action.to == Address::ZERO {
            return Ok(false);
        }

        let allowance = self
            .token
            .allowance(self.action.from, self.spender.address())
            .await?;
        if allowance < self.action.amount {
            warn!(
                allowance = %allowance,
                amount = %self.action.amount,
                "Allowance too low for transferFrom"
            );
            return Ok(false);
        }

        let balance = self.token.balance_of(self.action.from).await?;
        Ok(balance >= self.action.amount)
    }

    async fn execute(&self) -> eyre::Result<TransactionHandle> {
        if !self.is_ready().await? {
            eyre::bail!(
                "{}: insufficient allowance or balance",
                self.description()
            );
        }

        let tx_hash = self
            .token
            .transfer_from(
                self.spender,
                self.action.from,
                self.action.to,
                self.action.amount,
            )
            .await?;

        info!(tx_hash = %tx_hash, "TransferFrom submitted.");

        Ok(TransactionHandle {
            tx_hash,
            sender: self.spender.address(),
            description: self.description(),
        })
    }

    fn description(&self) -> String {
        format!(
            "Pull {} tokens from {} to {} on behalf of {}",
            format_units(self.action.amount, self.action.decimals),
            self.action.from,
            self.action.to,
            self.spender.address()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{account, MockToken, DEPLOYER_KEY, USER_KEY};

    #[tokio::test]
    async fn test_transfer_from_requires_allowance() {
        let deployer = account(DEPLOYER_KEY);
        let user = account(USER_KEY);
        let mut token = MockToken::default();
        token.balances.insert(user.address(), U256::from(100u64));

        let pull = TransferFrom {
            from: user.address(),
            to: deployer.address(),
            amount: U256::from(10u64),
            decimals: 0,
        };

        let action = TransferFromAction::new(&token, &deployer, pull);
        assert!(!action.is_ready().await.unwrap());
        assert!(action.execute().await.is_err());

        token
            .allowances
            .insert((user.address(), deployer.address()), U256::from(100u64));
        let action = TransferFromAction::new(&token, &deployer, pull);
        assert!(action.is_ready().await.unwrap());

        let handle = action.execute().await.unwrap();
        assert_eq!(handle.sender, deployer.address());
        assert_eq!(*token.submitted.lock().unwrap(), vec!["transferFrom"]);
    }

    #[tokio::test]
    async fn test_transfer_from_requires_balance() {
        let deployer = account(DEPLOYER_KEY);
        let user = account(USER_KEY);
        let mut token = MockToken::default();
        token
            .allowances
            .insert((user.address(), deployer.address()), U256::from(100u64));

        let action = TransferFromAction::new(
            &token,
            &deployer,
            TransferFrom {
                from: user.address(),
                to: deployer.address(),
                amount: U256::from(10u64),
                decimals: 0,
            },
        );

        assert!(!action.is_ready().await.unwrap());
    }
}
