use crate::{events::decode_events, TokenError, TokenEvent, TokenProxy};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use binding::token::ERC20;
use client::Account;
use tracing::debug;

/// ERC20 proxy backed by an alloy provider.
///
/// Write calls are signed by the provider's wallet, so the provider must
/// hold a signer for every account passed in.
#[derive(Debug, Clone)]
pub struct Erc20Proxy<P> {
    provider: P,
    address: Address,
}

impl<P> Erc20Proxy<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    async fn submit(
        &self,
        method: &'static str,
        account: &Account,
        request: TransactionRequest,
    ) -> Result<TxHash, TokenError> {
        let request = account.authorize(request);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| TokenError::call(method, e))?;

        let tx_hash = *pending.tx_hash();
        debug!(method, from = %account.address(), tx_hash = %tx_hash, "Submitted token call");
        Ok(tx_hash)
    }

    /// Token events emitted by a mined transaction.
    ///
    /// Returns an empty list when the receipt is not available yet.
    pub async fn receipt_events(&self, tx_hash: TxHash) -> Result<Vec<TokenEvent>, TokenError> {
        let Some(receipt) = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| TokenError::call("eth_getTransactionReceipt", e))?
        else {
            return Ok(vec![]);
        };

        Ok(decode_events(
            receipt.logs().iter().map(|log| &log.inner),
            self.address,
        ))
    }

    /// Historical `Transfer` events in the inclusive block range.
    pub async fn transfer_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        let logs = contract
            .Transfer_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await
            .map_err(|e| TokenError::call("Transfer", e))?;

        Ok(logs
            .into_iter()
            .map(|(event, _)| TokenEvent::Transfer {
                from: event.from,
                to: event.to,
                value: event.value,
            })
            .collect())
    }

    /// Historical `Approval` events in the inclusive block range.
    pub async fn approval_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        let logs = contract
            .Approval_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await
            .map_err(|e| TokenError::call("Approval", e))?;

        Ok(logs
            .into_iter()
            .map(|(event, _)| TokenEvent::Approval {
                owner: event.owner,
                spender: event.spender,
                value: event.value,
            })
            .collect())
    }
}

impl<P> TokenProxy for Erc20Proxy<P>
where
    P: Provider + Clone,
{
    async fn name(&self) -> Result<String, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        contract
            .name()
            .call()
            .await
            .map_err(|e| TokenError::call("name", e))
    }

    async fn symbol(&self) -> Result<String, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        contract
            .symbol()
            .call()
            .await
            .map_err(|e| TokenError::call("symbol", e))
    }

    async fn decimals(&self) -> Result<u8, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        contract
            .decimals()
            .call()
            .await
            .map_err(|e| TokenError::call("decimals", e))
    }

    async fn total_supply(&self) -> Result<U256, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        contract
            .totalSupply()
            .call()
            .await
            .map_err(|e| TokenError::call("totalSupply", e))
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, TokenError> {
        debug!("Querying erc20 {} balance: address={}", self.address, owner);

        let contract = ERC20::new(self.address, &self.provider);
        contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| TokenError::call("balanceOf", e))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| TokenError::call("allowance", e))
    }

    async fn transfer(
        &self,
        from: &Account,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        let request = contract.transfer(to, amount).into_transaction_request();
        self.submit("transfer", from, request).await
    }

    async fn approve(
        &self,
        owner: &Account,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        let request = contract.approve(spender, amount).into_transaction_request();
        self.submit("approve", owner, request).await
    }

    async fn transfer_from(
        &self,
        spender: &Account,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, TokenError> {
        let contract = ERC20::new(self.address, &self.provider);
        let request = contract
            .transferFrom(from, to, amount)
            .into_transaction_request();
        self.submit("transferFrom", spender, request).await
    }
}
