use crate::crypto::Address;

pub const VERSION: &str = env!("BUILD_VERSION");

// ===== Token Metadata =====

pub const TOKEN_NAME: &str = "Spokkz Token";
pub const TOKEN_SYMBOL: &str = "SPKZ";
pub const TOKEN_DECIMALS: u8 = 8;

// 10^TOKEN_DECIMALS base units per whole token
pub const COIN_VALUE: u64 = 100_000_000;

// Whole tokens minted once at deployment
pub const INITIAL_SUPPLY: u64 = 1_000_000_000;

// Initial supply expressed in base units
pub const INITIAL_SUPPLY_UNITS: u64 = INITIAL_SUPPLY * COIN_VALUE;

// ===== Deployment =====

// Base58check version byte of account addresses
pub const ADDRESS_VERSION: u8 = 0x17;

/// Hard-coded deployer of the mainnet token.
/// Text form: `Ac725LuR7wo481zvNmc9jerqCzoCArQjtw`
pub const DEPLOYER: Address = Address::new([
    0xdf, 0x01, 0x74, 0x60, 0xc0, 0xf1, 0xb6, 0xfc, 0x16, 0xe6, 0x8f, 0x10, 0x9b, 0x15, 0xc5, 0x46,
    0xc5, 0x57, 0xc5, 0xe0,
]);

// ===== Storage Key Prefixes (8-byte) =====
// All prefixes share the same length so that prefix ∥ address keys never collide.

/// Account balance prefix
pub const BALANCE_PREFIX: &[u8] = b"_____own";

/// Allowance prefix, followed by owner then spender
pub const ALLOWANCE_PREFIX: &[u8] = b"___allow";

// ===== Fixed Storage Keys =====

pub const OWNER_KEY: &[u8] = b"___OWNER";
pub const SUPPLY_KEY: &[u8] = b"__SUPPLY";
pub const DEPLOYED_KEY: &[u8] = b"DEPLOYED";

const _: () = assert!(BALANCE_PREFIX.len() == ALLOWANCE_PREFIX.len());
const _: () = assert!(INITIAL_SUPPLY_UNITS / COIN_VALUE == INITIAL_SUPPLY);
