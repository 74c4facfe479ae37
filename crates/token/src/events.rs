//! Decoding of ERC20 `Transfer` and `Approval` logs.

use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::SolEvent;
use binding::token::ERC20;

/// A decoded token event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
}

impl TokenEvent {
    /// Decode a single log, ignoring anything that is not a token event.
    pub fn decode(log: &Log) -> Option<Self> {
        if let Ok(event) = ERC20::Transfer::decode_log(log) {
            return Some(Self::Transfer {
                from: event.data.from,
                to: event.data.to,
                value: event.data.value,
            });
        }

        if let Ok(event) = ERC20::Approval::decode_log(log) {
            return Some(Self::Approval {
                owner: event.data.owner,
                spender: event.data.spender,
                value: event.data.value,
            });
        }

        None
    }
}

/// Decode every token event emitted by `token` among `logs`.
pub fn decode_events<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
    token: Address,
) -> Vec<TokenEvent> {
    logs.into_iter()
        .filter(|log| log.address == token)
        .filter_map(TokenEvent::decode)
        .collect()
}
