//! End-to-end runs of the token scenario against an in-memory ledger.


use alloy_primitives::U256;
use amount::format_units;
use confirmation::{ConfirmationWaiter, WaitError};
use runner::{
    config::{BalanceReadPolicy, ScenarioSettings},
    BalanceSnapshot, Scenario,
};
use setup::{account, tokens, LedgerToken, LedgerWatcher, DEPLOYER_KEY, USER_KEY};
use std::time::Duration;

/// 74605500.647409 tokens at 18 decimals.
fn deployer_funds() -> U256 {
    U256::from(74_605_500_647_409u64) * U256::from(10u64).pow(U256::from(12u64))
}

#[tokio::test]
async fn test_full_scenario() {
    let deployer = account(DEPLOYER_KEY);
    let user = account(USER_KEY);
    let token = LedgerToken::with_balance(deployer.address(), deployer_funds());
    let waiter = ConfirmationWaiter::new(LedgerWatcher::new(&token, 3));

    let report = Scenario::new(&token, &waiter, &deployer, &user, ScenarioSettings::default())
        .run()
        .await
        .expect("scenario should succeed");

    assert_eq!(report.decimals, 18);
    assert_eq!(format_units(report.initial.deployer, 18), "74605500.647409");
    assert_eq!(
        report.initial,
        BalanceSnapshot {
            deployer: deployer_funds(),
            user: U256::ZERO,
        }
    );

    // The transfer moves exactly 100 tokens.
    assert_eq!(
        report.after_transfer,
        BalanceSnapshot {
            deployer: deployer_funds() - tokens(100),
            user: tokens(100),
        }
    );

    // transferFrom pulls 10 back out of the 100 approved.
    assert_eq!(
        report.final_balances,
        BalanceSnapshot {
            deployer: deployer_funds() - tokens(90),
            user: tokens(90),
        }
    );
    assert_eq!(report.remaining_allowance, tokens(90));
    assert_eq!(format_units(report.final_balances.deployer, 18), "74605410.647409");

    assert_eq!(token.submitted(), vec!["transfer", "approve", "transferFrom"]);
    assert_eq!(report.transactions.len(), 3);
    assert_eq!(report.transactions[0].sender, deployer.address());
    assert_eq!(report.transactions[1].sender, user.address());
    assert_eq!(report.transactions[2].sender, deployer.address());
    for handle in &report.transactions {
        assert_eq!(token.receipt(handle.tx_hash), Some(true));
    }

    let watcher = waiter.watcher();
    assert_eq!(watcher.subscriptions(), 3);
    assert!(watcher.all_unsubscribed());
    // One pending query and one confirming query per transaction.
    assert_eq!(watcher.receipt_queries(), 6);
}

#[tokio::test]
async fn test_reverted_approve_aborts_run() {
    let deployer = account(DEPLOYER_KEY);
    let user = account(USER_KEY);
    let token = LedgerToken {
        revert: Some("approve"),
        ..LedgerToken::with_balance(deployer.address(), deployer_funds())
    };
    let waiter = ConfirmationWaiter::new(LedgerWatcher::new(&token, 3));

    let err = Scenario::new(&token, &waiter, &deployer, &user, ScenarioSettings::default())
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("reverted"), "{err}");
    assert_eq!(token.submitted(), vec!["transfer", "approve"]);
    assert_eq!(token.balance(user.address()), tokens(100));
}

#[tokio::test]
async fn test_transfer_beyond_balance_is_not_submitted() {
    let deployer = account(DEPLOYER_KEY);
    let user = account(USER_KEY);
    let token = LedgerToken::with_balance(deployer.address(), tokens(50));
    let waiter = ConfirmationWaiter::new(LedgerWatcher::new(&token, 3));

    let result = Scenario::new(&token, &waiter, &deployer, &user, ScenarioSettings::default())
        .run()
        .await;

    assert!(result.is_err());
    assert!(token.submitted().is_empty());
    assert_eq!(waiter.watcher().subscriptions(), 0);
}

#[tokio::test]
async fn test_strict_balance_read_failure_aborts() {
    let deployer = account(DEPLOYER_KEY);
    let user = account(USER_KEY);
    let token = LedgerToken {
        fail_balance_reads: true,
        ..LedgerToken::default()
    };
    let waiter = ConfirmationWaiter::new(LedgerWatcher::new(&token, 3));

    let err = Scenario::new(&token, &waiter, &deployer, &user, ScenarioSettings::default())
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("balanceOf"), "{err}");
    assert_eq!(token.balance_reads(), 1);
}

#[tokio::test]
async fn test_zero_on_error_reads_past_failed_balances() {
    let deployer = account(DEPLOYER_KEY);
    let user = account(USER_KEY);
    let token = LedgerToken {
        fail_balance_reads: true,
        ..LedgerToken::default()
    };
    let waiter = ConfirmationWaiter::new(LedgerWatcher::new(&token, 3));
    let settings = ScenarioSettings {
        balance_read_policy: BalanceReadPolicy::ZeroOnError,
        ..ScenarioSettings::default()
    };

    let result = Scenario::new(&token, &waiter, &deployer, &user, settings)
        .run()
        .await;

    // Both snapshot reads are tolerated; the transfer pre-check still fails.
    assert!(result.is_err());
    assert_eq!(token.balance_reads(), 3);
    assert!(token.submitted().is_empty());
}

#[tokio::test]
async fn test_wait_times_out_without_blocks() {
    let deployer = account(DEPLOYER_KEY);
    let user = account(USER_KEY);
    let token = LedgerToken::with_balance(deployer.address(), deployer_funds());
    let waiter = ConfirmationWaiter::new(LedgerWatcher::new(&token, 0))
        .with_timeout(Duration::from_millis(50));

    let err = Scenario::new(&token, &waiter, &deployer, &user, ScenarioSettings::default())
        .run()
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<WaitError>(),
        Some(&WaitError::Timeout(Duration::from_millis(50)))
    );
    assert_eq!(token.submitted(), vec!["transfer"]);
    assert!(waiter.watcher().all_unsubscribed());
}
