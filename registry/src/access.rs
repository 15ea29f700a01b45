//! Role-based authorization policy.
//!
//! Privileged calls consult the policy before touching the ledger. The
//! policy is plain data so it can be tested and snapshotted on its own.

use moniker_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Grants roles, reassigns the trusted caller, ends bootstrap, sets the vault.
    Admin,
    /// Reclaims names.
    Moderator,
    /// Sets the fee and withdraws collected funds.
    Treasurer,
    /// Pauses and unpauses.
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::Treasurer => "treasurer",
            Role::Operator => "operator",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{caller} lacks the {role} role")]
    MissingRole { caller: AccountId, role: Role },

    #[error("cannot revoke the last admin")]
    LastAdmin,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    grants: BTreeMap<Role, BTreeSet<AccountId>>,
}

impl AccessPolicy {
    /// A policy with a single admin and no other grants.
    pub fn with_admin(admin: AccountId) -> Self {
        let mut policy = Self::default();
        policy.grants.entry(Role::Admin).or_default().insert(admin);
        policy
    }

    pub fn has_role(&self, role: Role, who: &AccountId) -> bool {
        self.grants.get(&role).is_some_and(|set| set.contains(who))
    }

    pub fn require(&self, role: Role, who: &AccountId) -> Result<(), AccessError> {
        if self.has_role(role, who) {
            Ok(())
        } else {
            Err(AccessError::MissingRole { caller: *who, role })
        }
    }

    /// Admin grants `role` to `account`. Returns whether anything changed.
    pub fn grant(
        &mut self,
        caller: &AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool, AccessError> {
        self.require(Role::Admin, caller)?;
        Ok(self.grants.entry(role).or_default().insert(account))
    }

    /// Admin revokes `role` from `account`. The last admin cannot be removed.
    pub fn revoke(
        &mut self,
        caller: &AccountId,
        role: Role,
        account: &AccountId,
    ) -> Result<bool, AccessError> {
        self.require(Role::Admin, caller)?;
        let Some(set) = self.grants.get_mut(&role) else {
            return Ok(false);
        };
        if role == Role::Admin && set.len() == 1 && set.contains(account) {
            return Err(AccessError::LastAdmin);
        }
        Ok(set.remove(account))
    }

    pub fn members(&self, role: Role) -> impl Iterator<Item = &AccountId> {
        self.grants.get(&role).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    #[test]
    fn admin_grants_and_revokes() {
        let mut policy = AccessPolicy::with_admin(account(1));
        assert!(policy.grant(&account(1), Role::Moderator, account(2)).unwrap());
        assert!(policy.has_role(Role::Moderator, &account(2)));
        assert!(!policy.grant(&account(1), Role::Moderator, account(2)).unwrap());
        assert!(policy.revoke(&account(1), Role::Moderator, &account(2)).unwrap());
        assert!(!policy.has_role(Role::Moderator, &account(2)));
    }

    #[test]
    fn non_admin_cannot_grant() {
        let mut policy = AccessPolicy::with_admin(account(1));
        assert_eq!(
            policy.grant(&account(2), Role::Treasurer, account(2)),
            Err(AccessError::MissingRole {
                caller: account(2),
                role: Role::Admin
            })
        );
    }

    #[test]
    fn last_admin_is_kept() {
        let mut policy = AccessPolicy::with_admin(account(1));
        assert_eq!(
            policy.revoke(&account(1), Role::Admin, &account(1)),
            Err(AccessError::LastAdmin)
        );
        policy.grant(&account(1), Role::Admin, account(2)).unwrap();
        assert!(policy.revoke(&account(2), Role::Admin, &account(1)).unwrap());
        assert_eq!(policy.members(Role::Admin).collect::<Vec<_>>(), vec![&account(2)]);
    }

    #[test]
    fn roles_are_independent() {
        let mut policy = AccessPolicy::with_admin(account(1));
        policy.grant(&account(1), Role::Operator, account(3)).unwrap();
        assert!(policy.require(Role::Operator, &account(3)).is_ok());
        assert!(policy.require(Role::Treasurer, &account(3)).is_err());
        assert!(policy.require(Role::Moderator, &account(1)).is_err());
    }
}
