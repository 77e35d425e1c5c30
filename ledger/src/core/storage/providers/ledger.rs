//! Ledger Provider
//!
//! Typed access to the five ledger key classes: balances, allowances, total
//! supply, contract owner and the deployed flag.

use log::trace;
use spkz_common::{
    config::{ALLOWANCE_PREFIX, BALANCE_PREFIX, DEPLOYED_KEY, OWNER_KEY, SUPPLY_KEY},
    crypto::{Address, ADDRESS_SIZE},
};

use crate::core::{
    error::LedgerError,
    storage::{KeyValueStore, LedgerStorage},
};

pub trait LedgerProvider {
    // ===== Deployment =====

    /// Absent flag reads as not deployed
    fn is_deployed(&self) -> Result<bool, LedgerError>;

    fn set_deployed(&mut self) -> Result<(), LedgerError>;

    // ===== Owner =====

    /// Current owner, `Address::zero()` before deployment
    fn get_owner(&self) -> Result<Address, LedgerError>;

    fn set_owner(&mut self, owner: &Address) -> Result<(), LedgerError>;

    // ===== Supply =====

    fn get_total_supply(&self) -> Result<u64, LedgerError>;

    fn set_total_supply(&mut self, supply: u64) -> Result<(), LedgerError>;

    // ===== Balances =====

    fn get_balance(&self, account: &Address) -> Result<u64, LedgerError>;

    fn set_balance(&mut self, account: &Address, balance: u64) -> Result<(), LedgerError>;

    // ===== Allowances =====

    fn get_allowance(&self, owner: &Address, spender: &Address) -> Result<u64, LedgerError>;

    fn set_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u64,
    ) -> Result<(), LedgerError>;
}

// ===== Key Builders =====

/// Build storage key for an account balance
pub fn build_balance_key(account: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(BALANCE_PREFIX.len() + ADDRESS_SIZE);
    key.extend_from_slice(BALANCE_PREFIX);
    key.extend_from_slice(account.as_bytes());
    key
}

/// Build storage key for an (owner, spender) allowance
pub fn build_allowance_key(owner: &Address, spender: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(ALLOWANCE_PREFIX.len() + ADDRESS_SIZE * 2);
    key.extend_from_slice(ALLOWANCE_PREFIX);
    key.extend_from_slice(owner.as_bytes());
    key.extend_from_slice(spender.as_bytes());
    key
}

impl<S: KeyValueStore> LedgerProvider for LedgerStorage<S> {
    fn is_deployed(&self) -> Result<bool, LedgerError> {
        trace!("is deployed");
        self.load_optional_from_disk(DEPLOYED_KEY)
            .map(|v| v.unwrap_or(false))
    }

    fn set_deployed(&mut self) -> Result<(), LedgerError> {
        trace!("set deployed");
        self.insert_into_disk(DEPLOYED_KEY, &true)
    }

    fn get_owner(&self) -> Result<Address, LedgerError> {
        trace!("get owner");
        self.load_optional_from_disk(OWNER_KEY)
            .map(|v| v.unwrap_or_else(Address::zero))
    }

    fn set_owner(&mut self, owner: &Address) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set owner {}", owner);
        }
        self.insert_into_disk(OWNER_KEY, owner)
    }

    fn get_total_supply(&self) -> Result<u64, LedgerError> {
        trace!("get total supply");
        self.load_optional_from_disk(SUPPLY_KEY)
            .map(|v| v.unwrap_or(0))
    }

    fn set_total_supply(&mut self, supply: u64) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set total supply = {}", supply);
        }
        self.safe_put(SUPPLY_KEY, &supply)
    }

    fn get_balance(&self, account: &Address) -> Result<u64, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get balance for {}", account);
        }
        let key = build_balance_key(account);
        self.load_optional_from_disk(&key).map(|v| v.unwrap_or(0))
    }

    fn set_balance(&mut self, account: &Address, balance: u64) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set balance for {} = {}", account, balance);
        }
        let key = build_balance_key(account);
        self.safe_put(&key, &balance)
    }

    fn get_allowance(&self, owner: &Address, spender: &Address) -> Result<u64, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get allowance {} -> {}", owner, spender);
        }
        let key = build_allowance_key(owner, spender);
        self.load_optional_from_disk(&key).map(|v| v.unwrap_or(0))
    }

    fn set_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set allowance {} -> {} = {}", owner, spender, amount);
        }
        let key = build_allowance_key(owner, spender);
        self.safe_put(&key, &amount)
    }
}
