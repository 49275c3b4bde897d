// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Account addresses.

use core::fmt;
use core::str::FromStr;
use serde::{Serialize, Serializer, Deserialize, Deserializer};
use crate::error::LedgerError;

pub const ACCOUNT_LEN: usize = 20;

/// A 20-byte account address, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Account(pub [u8; ACCOUNT_LEN]);

impl Account {
    pub const ZERO: Account = Account([0u8; ACCOUNT_LEN]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_LEN] {
        &self.0
    }

    /// Builds a test/dev account whose last byte is `n`.
    pub fn from_low_u8(n: u8) -> Self {
        let mut bytes = [0u8; ACCOUNT_LEN];
        bytes[ACCOUNT_LEN - 1] = n;
        Account(bytes)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self)
    }
}

impl FromStr for Account {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let mut bytes = [0u8; ACCOUNT_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| LedgerError::MalformedInput(format!("invalid account {:?}: {}", s, e)))?;
        Ok(Account(bytes))
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; ACCOUNT_LEN]>::deserialize(deserializer).map(Account)
        }
    }
}
