//! ERC20 token contract bindings.
//!
//! Generated from `abi/IERC20Metadata.json`. Exposes the read methods
//! (`name`, `symbol`, `decimals`, `totalSupply`, `balanceOf`, `allowance`),
//! the write methods (`transfer`, `approve`, `transferFrom`) and the
//! `Transfer` / `Approval` events.

use alloy_sol_types::sol;

sol!(
    #[sol(rpc)]
    ERC20,
    "abi/IERC20Metadata.json"
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn test_selectors_match_erc20() {
        assert_eq!(ERC20::transferCall::SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(ERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(ERC20::transferFromCall::SELECTOR, [0x23, 0xb8, 0x72, 0xdd]);
        assert_eq!(ERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(ERC20::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn test_transfer_event_signature() {
        assert_eq!(
            ERC20::Transfer::SIGNATURE,
            "Transfer(address,address,uint256)"
        );
        assert_eq!(
            ERC20::Approval::SIGNATURE,
            "Approval(address,address,uint256)"
        );
    }

    #[test]
    fn test_encode_transfer_call() {
        let call = ERC20::transferCall {
            to: address!("1111111111111111111111111111111111111111"),
            amount: U256::from(100u64),
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4 + 32 * 2);
        assert_eq!(&encoded[..4], &ERC20::transferCall::SELECTOR);
    }
}
