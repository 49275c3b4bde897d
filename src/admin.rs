// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Administrator capability.
//!
//! Exactly one account holds the capability at any time. It gates point
//! creation and point ownership reassignment; it does NOT grant the right to
//! record product transfers at a point.

use serde::{Serialize, Deserialize};
use crate::error::{Result, LedgerError, E_ZERO_ADMINISTRATOR};
use crate::types::Account;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCapability {
    holder: Account,
}

impl AdminCapability {
    pub fn new(holder: Account) -> Self {
        Self { holder }
    }

    pub fn current(&self) -> Account {
        self.holder
    }

    pub fn is_administrator(&self, caller: Account) -> bool {
        self.holder == caller
    }

    pub fn ensure_administrator(&self, caller: Account) -> Result<()> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            Err(LedgerError::not_administrator())
        }
    }

    /// Checks a hand-over without performing it.
    pub fn authorize_transfer(&self, caller: Account, new_holder: Account) -> Result<()> {
        self.ensure_administrator(caller)?;
        if new_holder.is_zero() {
            return Err(LedgerError::MalformedInput(E_ZERO_ADMINISTRATOR.into()));
        }
        Ok(())
    }

    /// Hands the capability over. Returns the previous holder.
    pub fn transfer(&mut self, caller: Account, new_holder: Account) -> Result<Account> {
        self.authorize_transfer(caller, new_holder)?;
        Ok(self.replace(new_holder))
    }

    pub(crate) fn replace(&mut self, new_holder: Account) -> Account {
        core::mem::replace(&mut self.holder, new_holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::E_NOT_ADMINISTRATOR;

    #[test]
    fn test_only_holder_passes() {
        let admin = Account::from_low_u8(1);
        let cap = AdminCapability::new(admin);

        assert!(cap.ensure_administrator(admin).is_ok());
        assert_eq!(
            cap.ensure_administrator(Account::from_low_u8(2)),
            Err(LedgerError::AccessDenied { code: E_NOT_ADMINISTRATOR })
        );
    }

    #[test]
    fn test_transfer() {
        let admin = Account::from_low_u8(1);
        let next = Account::from_low_u8(2);
        let mut cap = AdminCapability::new(admin);

        assert!(cap.transfer(next, admin).is_err(), "non-holder cannot transfer");
        assert!(matches!(cap.transfer(admin, Account::ZERO), Err(LedgerError::MalformedInput(_))));
        assert_eq!(cap.current(), admin);

        assert_eq!(cap.transfer(admin, next).unwrap(), admin);
        assert_eq!(cap.current(), next);
        assert!(!cap.is_administrator(admin));
    }
}
