use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use spkz_common::{
    arithmetic::{checked_add, checked_sub},
    config::{TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL},
    crypto::Address,
    event::LedgerEvent,
};

use super::{
    error::LedgerError,
    events::{EventSink, LogSink},
    genesis::Genesis,
    storage::{KeyValueStore, LedgerProvider, LedgerStorage, SnapshotProvider},
    witness::Witness,
};

/// One element of a `transfer_multi` batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

/// Token ledger state machine.
///
/// Every mutating call runs inside its own storage snapshot. The snapshot is
/// applied only when the whole call succeeds, and the events produced by the
/// call reach the sink only after that commit.
pub struct Ledger<S: KeyValueStore> {
    storage: LedgerStorage<S>,
    genesis: Genesis,
    sink: Box<dyn EventSink>,
}

impl<S: KeyValueStore> Ledger<S> {
    pub fn new(store: S, genesis: Genesis) -> Self {
        Self {
            storage: LedgerStorage::new(store),
            genesis,
            sink: Box::new(LogSink),
        }
    }

    pub fn with_event_sink<E: EventSink + 'static>(mut self, sink: E) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    pub fn storage(&self) -> &LedgerStorage<S> {
        &self.storage
    }

    pub fn into_storage(self) -> LedgerStorage<S> {
        self.storage
    }

    pub fn flush(&mut self) -> Result<(), LedgerError> {
        self.storage.flush()
    }

    fn execute<F>(&mut self, operation: &str, f: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut LedgerStorage<S>, &mut Vec<LedgerEvent>) -> Result<(), LedgerError>,
    {
        self.storage.start_snapshot()?;
        let mut events = Vec::new();
        let result = f(&mut self.storage, &mut events);
        let applied = self.storage.end_snapshot(result.is_ok());

        if let Err(e) = &result {
            debug!("{} rejected: {}", operation, e);
        }
        result?;
        if let Err(e) = &applied {
            warn!("{} failed to commit: {}", operation, e);
        }
        applied?;

        for event in events {
            self.sink.emit(event);
        }

        Ok(())
    }

    // ===== Metadata =====

    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    // ===== Queries =====

    pub fn is_deployed(&self) -> Result<bool, LedgerError> {
        self.storage.is_deployed()
    }

    pub fn total_supply(&self) -> Result<u64, LedgerError> {
        self.storage.get_total_supply()
    }

    pub fn owner(&self) -> Result<Address, LedgerError> {
        self.storage.get_owner()
    }

    pub fn balance_of(&self, account: &Address) -> Result<u64, LedgerError> {
        require_well_formed(account)?;
        self.storage.get_balance(account)
    }

    // Anyone may query an allowance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Result<u64, LedgerError> {
        require_well_formed(owner)?;
        require_well_formed(spender)?;
        self.storage.get_allowance(owner, spender)
    }

    // ===== Operations =====

    /// One-time genesis: owner and full initial supply go to the deployer.
    pub fn deploy(&mut self, witness: &dyn Witness) -> Result<(), LedgerError> {
        let genesis = self.genesis.clone();
        self.execute("deploy", |storage, events| {
            require_witness(witness, genesis.deployer())?;
            if storage.is_deployed()? {
                return Err(LedgerError::AlreadyDeployed);
            }

            events.push(genesis.apply(storage)?);
            Ok(())
        })
    }

    pub fn transfer(
        &mut self,
        witness: &dyn Witness,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.execute("transfer", |storage, events| {
            require_witness(witness, from)?;
            apply_transfer(storage, from, to, amount)?;
            events.push(LedgerEvent::Transfer {
                from: Some(*from),
                to: *to,
                amount,
            });
            Ok(())
        })
    }

    /// Applies every transfer in order; the first failure rolls back the whole batch.
    pub fn transfer_multi(
        &mut self,
        witness: &dyn Witness,
        transfers: &[TransferRequest],
    ) -> Result<(), LedgerError> {
        self.execute("transferMulti", |storage, events| {
            for request in transfers {
                require_witness(witness, &request.from)?;
                apply_transfer(storage, &request.from, &request.to, request.amount)?;
                events.push(LedgerEvent::Transfer {
                    from: Some(request.from),
                    to: request.to,
                    amount: request.amount,
                });
            }
            Ok(())
        })
    }

    /// Delegated transfer: `spender` moves `amount` out of `from` within its allowance.
    pub fn transfer_from(
        &mut self,
        witness: &dyn Witness,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.execute("transferFrom", |storage, events| {
            require_witness(witness, spender)?;
            require_well_formed(from)?;
            require_well_formed(to)?;
            require_positive(amount)?;

            let allowance = checked_sub(storage.get_allowance(from, spender)?, amount)?;
            apply_transfer(storage, from, to, amount)?;
            storage.set_allowance(from, spender, allowance)?;

            events.push(LedgerEvent::Transfer {
                from: Some(*from),
                to: *to,
                amount,
            });
            Ok(())
        })
    }

    /// Overwrites the allowance; capped by the owner balance at this moment only.
    pub fn approve(
        &mut self,
        witness: &dyn Witness,
        owner: &Address,
        spender: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.execute("approve", |storage, events| {
            require_witness(witness, owner)?;
            require_well_formed(spender)?;

            let balance = storage.get_balance(owner)?;
            if balance < amount {
                return Err(LedgerError::ApprovalExceedsBalance { balance, amount });
            }

            storage.set_allowance(owner, spender, amount)?;
            events.push(LedgerEvent::Approve {
                owner: *owner,
                spender: *spender,
                amount,
            });
            Ok(())
        })
    }

    /// Destroys `amount` from the owner balance and the total supply.
    /// The whole remaining supply can never be burned.
    pub fn burn(&mut self, witness: &dyn Witness, amount: u64) -> Result<(), LedgerError> {
        self.execute("burn", |storage, _| {
            let owner = storage.get_owner()?;
            require_witness(witness, &owner)?;
            require_positive(amount)?;

            let balance = storage.get_balance(&owner)?;
            let supply = storage.get_total_supply()?;
            if amount >= supply {
                return Err(LedgerError::BurnExceedsSupply { supply, amount });
            }

            storage.set_balance(&owner, checked_sub(balance, amount)?)?;
            storage.set_total_supply(checked_sub(supply, amount)?)?;

            info!("Burned {} from owner {}", amount, owner);
            Ok(())
        })
    }

    pub fn transfer_ownership(
        &mut self,
        witness: &dyn Witness,
        new_owner: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("transferOwnership", |storage, _| {
            let owner = storage.get_owner()?;
            require_witness(witness, &owner)?;
            require_well_formed(new_owner)?;

            storage.set_owner(new_owner)?;
            info!("Ownership transferred from {} to {}", owner, new_owner);
            Ok(())
        })
    }
}

// The zero address is the unset sentinel and can never be witnessed
fn require_witness(witness: &dyn Witness, account: &Address) -> Result<(), LedgerError> {
    if account.is_zero() || !witness.check_witness(account) {
        return Err(LedgerError::Unauthorized(*account));
    }

    Ok(())
}

fn require_well_formed(account: &Address) -> Result<(), LedgerError> {
    if !account.is_well_formed() {
        return Err(LedgerError::InvalidAddress(account.to_hex()));
    }

    Ok(())
}

fn require_positive(amount: u64) -> Result<(), LedgerError> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    Ok(())
}

// Debit is written before `to` is read, so a self-transfer nets to zero
fn apply_transfer<P: LedgerProvider>(
    provider: &mut P,
    from: &Address,
    to: &Address,
    amount: u64,
) -> Result<(), LedgerError> {
    require_positive(amount)?;
    require_well_formed(to)?;

    let from_balance = checked_sub(provider.get_balance(from)?, amount)?;
    provider.set_balance(from, from_balance)?;

    let to_balance = checked_add(provider.get_balance(to)?, amount)?;
    provider.set_balance(to, to_balance)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        events::EventLog,
        storage::MemoryStore,
        witness::{NoWitness, SignerSet},
    };
    use spkz_common::config::{DEPLOYER, INITIAL_SUPPLY_UNITS};

    fn deployed() -> (Ledger<MemoryStore>, EventLog) {
        let log = EventLog::new();
        let mut ledger =
            Ledger::new(MemoryStore::default(), Genesis::mainnet()).with_event_sink(log.clone());
        ledger.deploy(&SignerSet::single(DEPLOYER)).unwrap();
        (ledger, log)
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let (mut ledger, log) = deployed();
        ledger
            .transfer(&SignerSet::single(DEPLOYER), &DEPLOYER, &DEPLOYER, 10)
            .unwrap();
        assert_eq!(ledger.balance_of(&DEPLOYER).unwrap(), INITIAL_SUPPLY_UNITS);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_failed_call_leaves_no_snapshot_and_no_event() {
        let (mut ledger, log) = deployed();
        let other = Address::new([5; 20]);
        let err = ledger.transfer(&NoWitness, &DEPLOYER, &other, 1).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(a) if a == DEPLOYER));
        assert!(!ledger.storage().has_snapshot());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let (mut ledger, _) = deployed();
        let other = Address::new([5; 20]);
        let signer = SignerSet::single(DEPLOYER);
        assert!(matches!(
            ledger.transfer(&signer, &DEPLOYER, &other, 0),
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(ledger.burn(&signer, 0), Err(LedgerError::InvalidAmount)));
    }

    #[test]
    fn test_owner_unset_before_deploy() {
        let mut ledger = Ledger::new(MemoryStore::default(), Genesis::mainnet());
        assert_eq!(ledger.owner().unwrap(), Address::zero());
        // no witness can prove the zero owner
        let err = ledger
            .transfer_ownership(&SignerSet::single(Address::zero()), &DEPLOYER)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(_)));
    }
}
