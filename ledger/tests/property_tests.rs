//! Property-Based Testing for the token ledger
//!
//! Random operation sequences are applied to a deployed ledger and the
//! invariants are checked after every step:
//! - Conservation (sum of balances equals total supply)
//! - Failed operations leave state unchanged
//! - Allowances are not touched by balance changes

#![allow(clippy::disallowed_methods)]

use proptest::prelude::*;
use spkz_common::{config::DEPLOYER, crypto::Address};
use spkz_ledger::core::{
    genesis::Genesis,
    storage::MemoryStore,
    witness::SignerSet,
    Ledger,
};

const ACCOUNTS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Transfer { from: usize, to: usize, amount: u64 },
    Approve { owner: usize, spender: usize, amount: u64 },
    TransferFrom { spender: usize, from: usize, to: usize, amount: u64 },
    Burn { amount: u64 },
}

fn accounts() -> Vec<Address> {
    let mut accounts = vec![DEPLOYER];
    for i in 1..ACCOUNTS {
        accounts.push(Address::new([i as u8; 20]));
    }
    accounts
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // amounts straddle small balances as well as the full supply
    let amount = prop_oneof![0u64..2_000, 0u64..=u64::MAX].boxed();
    prop_oneof![
        (0..ACCOUNTS, 0..ACCOUNTS, amount.clone())
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (0..ACCOUNTS, 0..ACCOUNTS, amount.clone()).prop_map(|(owner, spender, amount)| {
            Op::Approve {
                owner,
                spender,
                amount,
            }
        }),
        (0..ACCOUNTS, 0..ACCOUNTS, 0..ACCOUNTS, amount.clone()).prop_map(
            |(spender, from, to, amount)| Op::TransferFrom {
                spender,
                from,
                to,
                amount
            }
        ),
        amount.prop_map(|amount| Op::Burn { amount }),
    ]
}

fn deployed() -> Ledger<MemoryStore> {
    let mut ledger = Ledger::new(MemoryStore::default(), Genesis::mainnet());
    ledger.deploy(&SignerSet::single(DEPLOYER)).unwrap();
    // seed every account so transfers have something to move
    for account in accounts().iter().skip(1) {
        ledger
            .transfer(&SignerSet::single(DEPLOYER), &DEPLOYER, account, 1_000)
            .unwrap();
    }
    ledger
}

fn apply(ledger: &mut Ledger<MemoryStore>, accounts: &[Address], op: &Op) -> bool {
    let result = match *op {
        Op::Transfer { from, to, amount } => ledger.transfer(
            &SignerSet::single(accounts[from]),
            &accounts[from],
            &accounts[to],
            amount,
        ),
        Op::Approve {
            owner,
            spender,
            amount,
        } => ledger.approve(
            &SignerSet::single(accounts[owner]),
            &accounts[owner],
            &accounts[spender],
            amount,
        ),
        Op::TransferFrom {
            spender,
            from,
            to,
            amount,
        } => ledger.transfer_from(
            &SignerSet::single(accounts[spender]),
            &accounts[spender],
            &accounts[from],
            &accounts[to],
            amount,
        ),
        Op::Burn { amount } => ledger.burn(&SignerSet::single(DEPLOYER), amount),
    };
    result.is_ok()
}

fn snapshot_state(ledger: &Ledger<MemoryStore>, accounts: &[Address]) -> (u64, Vec<u64>, Vec<u64>) {
    let balances = accounts
        .iter()
        .map(|a| ledger.balance_of(a).unwrap())
        .collect();
    let mut allowances = Vec::new();
    for owner in accounts {
        for spender in accounts {
            allowances.push(ledger.allowance(owner, spender).unwrap());
        }
    }
    (ledger.total_supply().unwrap(), balances, allowances)
}

// Property 1: Conservation across any sequence of operations
proptest! {
    #[test]
    fn test_balances_always_sum_to_supply(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let accounts = accounts();
        let mut ledger = deployed();

        for op in &ops {
            apply(&mut ledger, &accounts, op);
            let (supply, balances, _) = snapshot_state(&ledger, &accounts);
            let sum: u128 = balances.iter().map(|b| *b as u128).sum();
            prop_assert_eq!(sum, supply as u128);
            prop_assert!(supply > 0);
        }
    }
}

// Property 2: A rejected operation leaves every observable value unchanged
proptest! {
    #[test]
    fn test_failed_operation_changes_nothing(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let accounts = accounts();
        let mut ledger = deployed();

        for op in &ops {
            let before = snapshot_state(&ledger, &accounts);
            if !apply(&mut ledger, &accounts, op) {
                prop_assert_eq!(snapshot_state(&ledger, &accounts), before);
            }
        }
    }
}

// Property 3: Plain transfers never modify allowances
proptest! {
    #[test]
    fn test_transfers_leave_allowances_intact(
        approved in 0u64..1_000,
        transfers in prop::collection::vec((1..ACCOUNTS, 0..ACCOUNTS, 0u64..1_500), 1..20),
    ) {
        let accounts = accounts();
        let mut ledger = deployed();
        let owner = accounts[1];
        let spender = accounts[2];
        ledger.approve(&SignerSet::single(owner), &owner, &spender, approved).unwrap();

        for (from, to, amount) in transfers {
            let _ = ledger.transfer(
                &SignerSet::single(accounts[from]),
                &accounts[from],
                &accounts[to],
                amount,
            );
            prop_assert_eq!(ledger.allowance(&owner, &spender).unwrap(), approved);
        }
    }
}
