use log::{debug, warn};
use serde_json::{json, Value};

use super::{Invocation, SignedInvocation};
use crate::core::{
    error::LedgerError,
    storage::KeyValueStore,
    witness::{NoWitness, Witness},
    Ledger,
};

/// Routes invocations to the ledger and renders their results as JSON.
///
/// Queries return their value, successful mutations return `true`.
pub struct Dispatcher<S: KeyValueStore> {
    ledger: Ledger<S>,
}

impl<S: KeyValueStore> Dispatcher<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger<S> {
        &mut self.ledger
    }

    pub fn into_inner(self) -> Ledger<S> {
        self.ledger
    }

    pub fn invoke_raw(
        &mut self,
        operation: &str,
        args: &[Value],
        witness: &dyn Witness,
    ) -> Result<Value, LedgerError> {
        let invocation = Invocation::parse(operation, args).map_err(|e| {
            warn!("Rejected {} call: {}", operation, e);
            e
        })?;
        self.invoke(&invocation, witness)
    }

    pub fn invoke_signed(&mut self, signed: &SignedInvocation) -> Result<Value, LedgerError> {
        let witness = signed.verify().map_err(|e| {
            warn!("Rejected signed {} call: {}", signed.invocation().operation(), e);
            e
        })?;
        self.invoke(signed.invocation(), &witness)
    }

    /// Run a call without any signer, only queries are accepted.
    pub fn query(&mut self, invocation: &Invocation) -> Result<Value, LedgerError> {
        if invocation.is_mutating() {
            warn!("Rejected unsigned {} call", invocation.operation());
            return Err(LedgerError::InvalidArguments {
                operation: invocation.operation().to_string(),
                reason: "a signer is required".to_string(),
            });
        }
        self.invoke(invocation, &NoWitness)
    }

    pub fn invoke(
        &mut self,
        invocation: &Invocation,
        witness: &dyn Witness,
    ) -> Result<Value, LedgerError> {
        debug!("invoking {}", invocation.operation());
        let result = self.dispatch(invocation, witness);
        if let Err(e) = &result {
            warn!("Call {} failed: {}", invocation.operation(), e);
        }
        result
    }

    fn dispatch(
        &mut self,
        invocation: &Invocation,
        witness: &dyn Witness,
    ) -> Result<Value, LedgerError> {
        let ledger = &mut self.ledger;
        let value = match invocation {
            Invocation::Name => json!(ledger.name()),
            Invocation::Symbol => json!(ledger.symbol()),
            Invocation::Decimals => json!(ledger.decimals()),
            Invocation::TotalSupply => json!(ledger.total_supply()?),
            Invocation::Owner => json!(ledger.owner()?),
            Invocation::BalanceOf { account } => json!(ledger.balance_of(account)?),
            Invocation::Allowance { owner, spender } => json!(ledger.allowance(owner, spender)?),
            Invocation::Deploy => {
                ledger.deploy(witness)?;
                Value::Bool(true)
            }
            Invocation::Transfer { from, to, amount } => {
                ledger.transfer(witness, from, to, *amount)?;
                Value::Bool(true)
            }
            Invocation::TransferMulti { transfers } => {
                ledger.transfer_multi(witness, transfers)?;
                Value::Bool(true)
            }
            Invocation::TransferFrom {
                spender,
                from,
                to,
                amount,
            } => {
                ledger.transfer_from(witness, spender, from, to, *amount)?;
                Value::Bool(true)
            }
            Invocation::Approve {
                owner,
                spender,
                amount,
            } => {
                ledger.approve(witness, owner, spender, *amount)?;
                Value::Bool(true)
            }
            Invocation::Burn { amount } => {
                ledger.burn(witness, *amount)?;
                Value::Bool(true)
            }
            Invocation::TransferOwnership { new_owner } => {
                ledger.transfer_ownership(witness, new_owner)?;
                Value::Bool(true)
            }
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        genesis::Genesis,
        storage::MemoryStore,
        witness::SignerSet,
    };
    use spkz_common::config::{DEPLOYER, INITIAL_SUPPLY_UNITS};

    fn dispatcher() -> Dispatcher<MemoryStore> {
        Dispatcher::new(Ledger::new(MemoryStore::default(), Genesis::mainnet()))
    }

    #[test]
    fn test_metadata() {
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher.invoke_raw("name", &[], &NoWitness).unwrap(),
            json!("Spokkz Token")
        );
        assert_eq!(
            dispatcher.invoke_raw("symbol", &[], &NoWitness).unwrap(),
            json!("SPKZ")
        );
        assert_eq!(
            dispatcher.invoke_raw("decimals", &[], &NoWitness).unwrap(),
            json!(8)
        );
    }

    #[test]
    fn test_deploy_then_query() {
        let mut dispatcher = dispatcher();
        let deployer = SignerSet::single(DEPLOYER);
        assert_eq!(
            dispatcher.invoke_raw("deploy", &[], &deployer).unwrap(),
            json!(true)
        );
        assert_eq!(
            dispatcher
                .invoke_raw("balanceOf", &[json!(DEPLOYER.to_string())], &NoWitness)
                .unwrap(),
            json!(INITIAL_SUPPLY_UNITS)
        );
        assert_eq!(
            dispatcher.invoke_raw("owner", &[], &NoWitness).unwrap(),
            json!(DEPLOYER.to_string())
        );
        assert!(matches!(
            dispatcher.invoke_raw("deploy", &[], &deployer),
            Err(LedgerError::AlreadyDeployed)
        ));
    }

    #[test]
    fn test_query_rejects_mutations() {
        let mut dispatcher = dispatcher();
        let err = dispatcher.query(&Invocation::Deploy).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidArguments { ref operation, .. } if operation == "deploy"
        ));
        assert!(dispatcher.ledger().storage().store().is_empty());

        assert_eq!(
            dispatcher.query(&Invocation::TotalSupply).unwrap(),
            json!(0)
        );
    }
}
