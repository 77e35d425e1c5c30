mod error;

pub use error::GenesisError;

use log::info;
use spkz_common::{
    config::{DEPLOYER, INITIAL_SUPPLY_UNITS},
    crypto::Address,
    event::LedgerEvent,
};

use crate::{
    config::Network,
    core::{error::LedgerError, storage::LedgerProvider},
};

/// One-time deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genesis {
    deployer: Address,
    initial_supply: u64,
}

impl Genesis {
    pub fn mainnet() -> Self {
        Self {
            deployer: DEPLOYER,
            initial_supply: INITIAL_SUPPLY_UNITS,
        }
    }

    /// Mainnet always deploys from the hard-coded deployer.
    /// Devnet accepts an override so a locally generated key can deploy.
    pub fn for_network(network: Network, deployer: Option<Address>) -> Result<Self, GenesisError> {
        let deployer = match (network, deployer) {
            (_, None) => DEPLOYER,
            (Network::Mainnet, Some(_)) => {
                return Err(GenesisError::DeployerOverrideNotAllowed(network))
            }
            (Network::Devnet, Some(deployer)) => {
                if !deployer.is_well_formed() {
                    return Err(GenesisError::InvalidDeployer(deployer));
                }
                deployer
            }
        };

        Ok(Self {
            deployer,
            initial_supply: INITIAL_SUPPLY_UNITS,
        })
    }

    pub fn deployer(&self) -> &Address {
        &self.deployer
    }

    pub fn initial_supply(&self) -> u64 {
        self.initial_supply
    }

    // Writes the genesis state, callers check the deployer witness and the
    // deployed flag beforehand
    pub(crate) fn apply<P: LedgerProvider>(
        &self,
        provider: &mut P,
    ) -> Result<LedgerEvent, LedgerError> {
        info!(
            "Deploying token: owner {}, supply {}",
            self.deployer, self.initial_supply
        );

        provider.set_deployed()?;
        provider.set_owner(&self.deployer)?;
        provider.set_total_supply(self.initial_supply)?;
        provider.set_balance(&self.deployer, self.initial_supply)?;

        Ok(LedgerEvent::Transfer {
            from: None,
            to: self.deployer,
            amount: self.initial_supply,
        })
    }
}
