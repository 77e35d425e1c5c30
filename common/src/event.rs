use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::crypto::Address;

/// Notification describing a committed state change.
///
/// Burn and ownership changes do not produce events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer {
        // None for the genesis mint
        from: Option<Address>,
        to: Address,
        amount: u64,
    },
    Approve {
        owner: Address,
        spender: Address,
        amount: u64,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
        }
    }

    /// Positional payload: tag followed by three fields, `""` for a genesis sender.
    pub fn to_notification(&self) -> Value {
        match self {
            Self::Transfer { from, to, amount } => {
                let from = from.map(|a| a.to_string()).unwrap_or_default();
                json!([self.name(), from, to.to_string(), amount])
            }
            Self::Approve {
                owner,
                spender,
                amount,
            } => json!([self.name(), owner.to_string(), spender.to_string(), amount]),
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notification())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEPLOYER;

    #[test]
    fn test_genesis_notification_has_empty_sender() {
        let event = LedgerEvent::Transfer {
            from: None,
            to: DEPLOYER,
            amount: 42,
        };
        assert_eq!(
            event.to_notification(),
            json!(["transfer", "", "Ac725LuR7wo481zvNmc9jerqCzoCArQjtw", 42])
        );
    }

    #[test]
    fn test_approve_notification() {
        let spender = Address::new([1u8; 20]);
        let event = LedgerEvent::Approve {
            owner: DEPLOYER,
            spender,
            amount: 500,
        };
        let payload = event.to_notification();
        assert_eq!(payload[0], "approve");
        assert_eq!(payload[2], json!(spender.to_string()));
        assert_eq!(payload[3], 500);
    }
}
