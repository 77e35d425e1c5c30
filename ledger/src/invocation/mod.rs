//! Operation dispatch.
//!
//! Maps an operation name and its positional JSON arguments to a typed
//! [`Invocation`], rejecting malformed input before any ledger logic runs.

mod dispatcher;
mod signed;

pub use dispatcher::Dispatcher;
pub use signed::SignedInvocation;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spkz_common::crypto::Address;

use crate::core::{error::LedgerError, TransferRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "args", rename_all = "camelCase")]
pub enum Invocation {
    Deploy,
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    Owner,
    BalanceOf {
        account: Address,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },
    TransferMulti {
        transfers: Vec<TransferRequest>,
    },
    TransferFrom {
        spender: Address,
        from: Address,
        to: Address,
        amount: u64,
    },
    Approve {
        owner: Address,
        spender: Address,
        amount: u64,
    },
    Allowance {
        owner: Address,
        spender: Address,
    },
    Burn {
        amount: u64,
    },
    TransferOwnership {
        new_owner: Address,
    },
}

impl Invocation {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Name => "name",
            Self::Symbol => "symbol",
            Self::Decimals => "decimals",
            Self::TotalSupply => "totalSupply",
            Self::Owner => "owner",
            Self::BalanceOf { .. } => "balanceOf",
            Self::Transfer { .. } => "transfer",
            Self::TransferMulti { .. } => "transferMulti",
            Self::TransferFrom { .. } => "transferFrom",
            Self::Approve { .. } => "approve",
            Self::Allowance { .. } => "allowance",
            Self::Burn { .. } => "burn",
            Self::TransferOwnership { .. } => "transferOwnership",
        }
    }

    /// Whether the call writes to the ledger. Unsigned callers may only run the others.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Deploy
                | Self::Transfer { .. }
                | Self::TransferMulti { .. }
                | Self::TransferFrom { .. }
                | Self::Approve { .. }
                | Self::Burn { .. }
                | Self::TransferOwnership { .. }
        )
    }

    /// Parse a raw `(operation, args)` call.
    ///
    /// For `transferMulti` every argument is one `[from, to, amount]` entry.
    pub fn parse(operation: &str, args: &[Value]) -> Result<Self, LedgerError> {
        let invocation = match operation {
            "deploy" => {
                expect_arity(operation, args, 0)?;
                Self::Deploy
            }
            "name" => {
                expect_arity(operation, args, 0)?;
                Self::Name
            }
            "symbol" => {
                expect_arity(operation, args, 0)?;
                Self::Symbol
            }
            "decimals" => {
                expect_arity(operation, args, 0)?;
                Self::Decimals
            }
            "totalSupply" => {
                expect_arity(operation, args, 0)?;
                Self::TotalSupply
            }
            "owner" => {
                expect_arity(operation, args, 0)?;
                Self::Owner
            }
            "balanceOf" => {
                expect_arity(operation, args, 1)?;
                Self::BalanceOf {
                    account: parse_address(&args[0])?,
                }
            }
            "transfer" => {
                expect_arity(operation, args, 3)?;
                Self::Transfer {
                    from: parse_address(&args[0])?,
                    to: parse_address(&args[1])?,
                    amount: parse_amount(operation, &args[2])?,
                }
            }
            "transferMulti" => {
                let transfers = args
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| parse_transfer_request(index, entry))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::TransferMulti { transfers }
            }
            "transferFrom" => {
                expect_arity(operation, args, 4)?;
                Self::TransferFrom {
                    spender: parse_address(&args[0])?,
                    from: parse_address(&args[1])?,
                    to: parse_address(&args[2])?,
                    amount: parse_amount(operation, &args[3])?,
                }
            }
            "approve" => {
                expect_arity(operation, args, 3)?;
                Self::Approve {
                    owner: parse_address(&args[0])?,
                    spender: parse_address(&args[1])?,
                    amount: parse_amount(operation, &args[2])?,
                }
            }
            "allowance" => {
                expect_arity(operation, args, 2)?;
                Self::Allowance {
                    owner: parse_address(&args[0])?,
                    spender: parse_address(&args[1])?,
                }
            }
            "burn" => {
                expect_arity(operation, args, 1)?;
                Self::Burn {
                    amount: parse_amount(operation, &args[0])?,
                }
            }
            "transferOwnership" => {
                expect_arity(operation, args, 1)?;
                Self::TransferOwnership {
                    new_owner: parse_address(&args[0])?,
                }
            }
            _ => return Err(LedgerError::UnknownOperation(operation.to_owned())),
        };

        Ok(invocation)
    }
}

fn expect_arity(operation: &str, args: &[Value], expected: usize) -> Result<(), LedgerError> {
    if args.len() != expected {
        return Err(LedgerError::InvalidArguments {
            operation: operation.to_owned(),
            reason: format!("expected {} arguments, got {}", expected, args.len()),
        });
    }

    Ok(())
}

fn parse_address(value: &Value) -> Result<Address, LedgerError> {
    match value {
        Value::String(s) => Ok(s.parse::<Address>()?),
        other => Err(LedgerError::InvalidAddress(other.to_string())),
    }
}

// Accepts a JSON unsigned integer or a decimal string
fn parse_amount(operation: &str, value: &Value) -> Result<u64, LedgerError> {
    let amount = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };

    amount.ok_or_else(|| LedgerError::InvalidArguments {
        operation: operation.to_owned(),
        reason: format!("invalid amount {}", value),
    })
}

fn parse_transfer_request(index: usize, entry: &Value) -> Result<TransferRequest, LedgerError> {
    let malformed = |reason: String| LedgerError::MalformedBatchEntry { index, reason };

    let fields = match entry {
        Value::Array(fields) if fields.len() == 3 => fields,
        Value::Array(fields) => {
            return Err(malformed(format!(
                "expected 3 fields, got {}",
                fields.len()
            )))
        }
        other => return Err(malformed(format!("expected an array, got {}", other))),
    };

    let from = parse_address(&fields[0]).map_err(|e| malformed(e.to_string()))?;
    let to = parse_address(&fields[1]).map_err(|e| malformed(e.to_string()))?;
    let amount =
        parse_amount("transferMulti", &fields[2]).map_err(|e| malformed(e.to_string()))?;

    Ok(TransferRequest { from, to, amount })
}
