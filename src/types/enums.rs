// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Product transfer stages.

use core::fmt;
use serde::{Serialize, Deserialize};
use crate::error::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransferType {
    Manufacture = 0,
    Transport = 1,
    Realization = 2,
}

impl TransferType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(TransferType::Manufacture),
            1 => Some(TransferType::Transport),
            2 => Some(TransferType::Realization),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Manufacture => "Manufacture",
            TransferType::Transport => "Transport",
            TransferType::Realization => "Realization",
        }
    }
}

impl TryFrom<u8> for TransferType {
    type Error = LedgerError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        TransferType::from_u8(v)
            .ok_or_else(|| LedgerError::MalformedInput(format!("unknown transfer type {}", v)))
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_set() {
        assert_eq!(TransferType::from_u8(0), Some(TransferType::Manufacture));
        assert_eq!(TransferType::from_u8(2), Some(TransferType::Realization));
        assert_eq!(TransferType::from_u8(3), None);

        let err = TransferType::try_from(7u8).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedInput(_)));
    }
}
