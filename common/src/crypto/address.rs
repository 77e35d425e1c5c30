use crate::{
    config::ADDRESS_VERSION,
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use sha3::Sha3_256;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use super::{CryptoError, PublicKey};

pub const ADDRESS_SIZE: usize = 20;

// version byte + script hash + checksum
const BASE58_PAYLOAD_SIZE: usize = 1 + ADDRESS_SIZE + 4;

/// Script-hash style account identifier.
///
/// The all-zero value is reserved as the "absent" sentinel: it is what an
/// unset owner reads as, and it is never a well-formed account.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    pub const fn zero() -> Self {
        Address::new([0; ADDRESS_SIZE])
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; ADDRESS_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidAddressLength {
                len: bytes.len(),
                expected: ADDRESS_SIZE,
            })?;
        Ok(Address(bytes))
    }

    /// Account controlled by an ed25519 key: last 20 bytes of SHA3-256(key).
    pub fn from_public_key(key: &PublicKey) -> Self {
        let digest = Sha3_256::digest(key.as_bytes());
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&digest[digest.len() - ADDRESS_SIZE..]);
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_SIZE]
    }

    // Structural gate applied before an address is used as a key fragment
    pub fn is_well_formed(&self) -> bool {
        !self.is_zero()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(value: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(value).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(BASE58_PAYLOAD_SIZE);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&self.0);
        let checksum = checksum(&payload);
        payload.extend_from_slice(&checksum);
        bs58::encode(payload).into_string()
    }

    pub fn from_base58(value: &str) -> Result<Self, CryptoError> {
        let payload = bs58::decode(value)
            .into_vec()
            .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
        if payload.len() != BASE58_PAYLOAD_SIZE {
            return Err(CryptoError::InvalidAddressLength {
                len: payload.len().saturating_sub(5),
                expected: ADDRESS_SIZE,
            });
        }

        let (data, check) = payload.split_at(1 + ADDRESS_SIZE);
        if checksum(data) != check {
            return Err(CryptoError::InvalidChecksum);
        }

        if data[0] != ADDRESS_VERSION {
            return Err(CryptoError::InvalidAddressVersion(data[0]));
        }

        Self::from_slice(&data[1..])
    }
}

// First four bytes of a double SHA-256
fn checksum(data: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

impl FromStr for Address {
    type Err = CryptoError;

    // Accepts both the 40-char hex script hash and the base58check form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == ADDRESS_SIZE * 2 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::from_hex(s)
        } else {
            Self::from_base58(s)
        }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serializer for Address {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Address(reader.read_bytes::<ADDRESS_SIZE>()?))
    }

    fn size(&self) -> usize {
        ADDRESS_SIZE
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'a> Deserialize<'a> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        Address::from_str(&value).map_err(SerdeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEPLOYER;

    const DEPLOYER_BASE58: &str = "Ac725LuR7wo481zvNmc9jerqCzoCArQjtw";

    #[test]
    fn test_deployer_base58() {
        let address = Address::from_base58(DEPLOYER_BASE58).unwrap();
        assert_eq!(address, DEPLOYER);
        assert_eq!(address.to_hex(), "df017460c0f1b6fc16e68f109b15c546c557c5e0");
        assert_eq!(DEPLOYER.to_base58(), DEPLOYER_BASE58);
    }

    #[test]
    fn test_parse_hex_and_base58() {
        let from_hex: Address = "df017460c0f1b6fc16e68f109b15c546c557c5e0".parse().unwrap();
        let from_b58: Address = DEPLOYER_BASE58.parse().unwrap();
        assert_eq!(from_hex, from_b58);
    }

    #[test]
    fn test_bad_checksum() {
        // last character altered
        let mut tampered = DEPLOYER_BASE58.to_string();
        tampered.pop();
        tampered.push('u');
        assert!(Address::from_base58(&tampered).is_err());
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            Address::from_hex("df0174"),
            Err(CryptoError::InvalidAddressLength {
                len: 3,
                expected: ADDRESS_SIZE
            })
        );
        assert!("not an address".parse::<Address>().is_err());
        assert!("".parse::<Address>().is_err());
    }

    #[test]
    fn test_wrong_version() {
        let mut payload = vec![0x35];
        payload.extend_from_slice(DEPLOYER.as_bytes());
        let check = checksum(&payload);
        payload.extend_from_slice(&check);
        let encoded = bs58::encode(payload).into_string();
        assert_eq!(
            Address::from_base58(&encoded),
            Err(CryptoError::InvalidAddressVersion(0x35))
        );
    }

    #[test]
    fn test_zero_is_not_well_formed() {
        assert!(!Address::zero().is_well_formed());
        assert!(DEPLOYER.is_well_formed());
        // parses structurally, rejected by the well-formed gate
        let zero: Address = Address::zero().to_hex().parse().unwrap();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_serde_json_string() {
        let json = serde_json::to_string(&DEPLOYER).unwrap();
        assert_eq!(json, format!("\"{}\"", DEPLOYER_BASE58));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DEPLOYER);
    }

    #[test]
    fn test_serializer_raw_bytes() {
        let bytes = DEPLOYER.to_bytes().to_vec();
        assert_eq!(Serializer::to_bytes(&DEPLOYER), bytes);
        assert_eq!(Address::from_bytes(&bytes), Ok(DEPLOYER));
    }
}
