//! # Access Control and Availability
//!
//! Role checks, self-revoking capabilities and the pause switch used by every
//! mutating entry point of the custody core.
//!
//! ## Model
//!
//! - Each role is a distinct permission checked at the entry point that needs
//!   it ([`AccessControl::ensure`]).
//! - A one-shot privilege is a [`OneShotCapability`] value: taking it out of
//!   [`OneShotGrants`] removes it, and [`OneShotCapability::exercise`]
//!   consumes it by value, so it cannot be used twice.
//! - [`PauseSwitch`] halts mutating operations. Who may flip it is decided by
//!   the owning module (pauser pauses, admin unpauses).

use crate::entities::Address;
use crate::errors::{AccessError, PauseError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Permission tokens checked at entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Grants and revokes every other role; unpauses.
    Admin,
    /// May mint outside the notarized path (reserved for asset contracts).
    Minter,
    /// May submit fee-charging mints on behalf of users.
    Claimer,
    /// Adjusts commissions, fee caps and dust parameters.
    Operator,
    /// May pause (but not unpause).
    Pauser,
    /// Reports deposits to the Bascule.
    DepositReporter,
    /// Validates withdrawals against the Bascule.
    WithdrawalValidator,
    /// May raise the Bascule validation threshold once.
    ValidationGuardian,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Minter => "minter",
            Role::Claimer => "claimer",
            Role::Operator => "operator",
            Role::Pauser => "pauser",
            Role::DepositReporter => "deposit-reporter",
            Role::WithdrawalValidator => "withdrawal-validator",
            Role::ValidationGuardian => "validation-guardian",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ROLE GRANTS
// =============================================================================

/// Role → accounts mapping.
#[derive(Clone, Debug, Default)]
pub struct AccessControl {
    grants: HashMap<Role, HashSet<Address>>,
}

impl AccessControl {
    /// Create with a single admin.
    pub fn with_admin(admin: Address) -> Self {
        let mut access = Self::default();
        access.grant(Role::Admin, admin);
        access
    }

    /// Grant a role. Returns `false` if the account already held it.
    pub fn grant(&mut self, role: Role, account: Address) -> bool {
        self.grants.entry(role).or_default().insert(account)
    }

    /// Revoke a role. Returns `false` if the account did not hold it.
    pub fn revoke(&mut self, role: Role, account: Address) -> bool {
        self.grants
            .get_mut(&role)
            .map(|holders| holders.remove(&account))
            .unwrap_or(false)
    }

    /// Whether `account` holds `role`.
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|holders| holders.contains(account))
    }

    /// Fail with [`AccessError::MissingRole`] unless `account` holds `role`.
    pub fn ensure(&self, role: Role, account: &Address) -> Result<(), AccessError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(AccessError::MissingRole {
                role,
                account: *account,
            })
        }
    }

    /// Admin-gated grant.
    pub fn grant_as(
        &mut self,
        caller: &Address,
        role: Role,
        account: Address,
    ) -> Result<bool, AccessError> {
        self.ensure(Role::Admin, caller)?;
        Ok(self.grant(role, account))
    }

    /// Admin-gated revoke.
    pub fn revoke_as(
        &mut self,
        caller: &Address,
        role: Role,
        account: Address,
    ) -> Result<bool, AccessError> {
        self.ensure(Role::Admin, caller)?;
        Ok(self.revoke(role, account))
    }

    /// Accounts holding `role`.
    pub fn holders(&self, role: Role) -> Vec<Address> {
        let mut holders: Vec<Address> = self
            .grants
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        holders.sort();
        holders
    }
}

// =============================================================================
// ONE-SHOT CAPABILITIES
// =============================================================================

/// A privilege that can be exercised exactly once.
///
/// Not `Clone`/`Copy`: the only way to use it is [`Self::exercise`], which
/// takes it by value.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a taken capability that is not exercised is lost"]
pub struct OneShotCapability {
    role: Role,
    holder: Address,
}

impl OneShotCapability {
    /// The role this capability carries.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The account it was issued to.
    pub fn holder(&self) -> &Address {
        &self.holder
    }

    /// Consume the capability.
    pub fn exercise(self) -> Address {
        self.holder
    }
}

/// Issued, not-yet-exercised one-shot capabilities.
#[derive(Debug, Default)]
pub struct OneShotGrants {
    issued: HashMap<(Role, Address), OneShotCapability>,
}

impl OneShotGrants {
    /// Issue a capability. Re-issuing to a holder that still has one is a no-op.
    pub fn issue(&mut self, role: Role, holder: Address) -> bool {
        if self.issued.contains_key(&(role, holder)) {
            return false;
        }
        self.issued
            .insert((role, holder), OneShotCapability { role, holder });
        true
    }

    /// Remove and return the capability held by `holder`.
    pub fn take(&mut self, role: Role, holder: &Address) -> Result<OneShotCapability, AccessError> {
        self.issued
            .remove(&(role, *holder))
            .ok_or(AccessError::CapabilityUnavailable {
                role,
                account: *holder,
            })
    }

    /// Drop a capability without exercising it.
    pub fn revoke(&mut self, role: Role, holder: &Address) -> bool {
        self.issued.remove(&(role, *holder)).is_some()
    }

    /// Whether `holder` currently holds an unused capability for `role`.
    pub fn holds(&self, role: Role, holder: &Address) -> bool {
        self.issued.contains_key(&(role, *holder))
    }
}

// =============================================================================
// PAUSE SWITCH
// =============================================================================

/// Halts every mutating entry point of its owning module while engaged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseSwitch {
    /// Whether the switch is engaged.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fail with `EnforcedPause` while paused.
    pub fn ensure_not_paused(&self) -> Result<(), PauseError> {
        if self.paused {
            Err(PauseError::EnforcedPause)
        } else {
            Ok(())
        }
    }

    /// Fail with `ExpectedPause` unless paused.
    pub fn ensure_paused(&self) -> Result<(), PauseError> {
        if self.paused {
            Ok(())
        } else {
            Err(PauseError::ExpectedPause)
        }
    }

    /// Engage. Pausing twice fails `EnforcedPause`.
    pub fn pause(&mut self) -> Result<(), PauseError> {
        self.ensure_not_paused()?;
        self.paused = true;
        Ok(())
    }

    /// Release. Unpausing while running fails `ExpectedPause`.
    pub fn unpause(&mut self) -> Result<(), PauseError> {
        self.ensure_paused()?;
        self.paused = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Address = [1u8; 20];
    const ALICE: Address = [2u8; 20];

    #[test]
    fn test_admin_grants_roles() {
        let mut access = AccessControl::with_admin(ADMIN);
        assert!(access.grant_as(&ADMIN, Role::Pauser, ALICE).unwrap());
        assert!(access.has_role(Role::Pauser, &ALICE));
        assert!(access.ensure(Role::Pauser, &ALICE).is_ok());
    }

    #[test]
    fn test_non_admin_cannot_grant() {
        let mut access = AccessControl::with_admin(ADMIN);
        let err = access.grant_as(&ALICE, Role::Pauser, ALICE).unwrap_err();
        assert_eq!(
            err,
            AccessError::MissingRole {
                role: Role::Admin,
                account: ALICE
            }
        );
    }

    #[test]
    fn test_revoke_removes_role() {
        let mut access = AccessControl::with_admin(ADMIN);
        access.grant(Role::Claimer, ALICE);
        assert!(access.revoke_as(&ADMIN, Role::Claimer, ALICE).unwrap());
        assert!(!access.has_role(Role::Claimer, &ALICE));
        assert!(!access.revoke(Role::Claimer, ALICE));
    }

    #[test]
    fn test_roles_are_distinct() {
        let mut access = AccessControl::default();
        access.grant(Role::Pauser, ALICE);
        assert!(access.ensure(Role::Admin, &ALICE).is_err());
    }

    #[test]
    fn test_one_shot_capability_is_consumed() {
        let mut grants = OneShotGrants::default();
        assert!(grants.issue(Role::ValidationGuardian, ALICE));

        let capability = grants.take(Role::ValidationGuardian, &ALICE).unwrap();
        assert_eq!(capability.role(), Role::ValidationGuardian);
        assert_eq!(capability.exercise(), ALICE);

        let err = grants.take(Role::ValidationGuardian, &ALICE).unwrap_err();
        assert!(matches!(err, AccessError::CapabilityUnavailable { .. }));
    }

    #[test]
    fn test_one_shot_revoke() {
        let mut grants = OneShotGrants::default();
        grants.issue(Role::ValidationGuardian, ALICE);
        assert!(grants.revoke(Role::ValidationGuardian, &ALICE));
        assert!(!grants.revoke(Role::ValidationGuardian, &ALICE));
        assert!(grants.take(Role::ValidationGuardian, &ALICE).is_err());
    }

    #[test]
    fn test_pause_switch_transitions() {
        let mut switch = PauseSwitch::default();
        assert!(switch.ensure_not_paused().is_ok());
        assert_eq!(switch.unpause(), Err(PauseError::ExpectedPause));

        switch.pause().unwrap();
        assert_eq!(switch.ensure_not_paused(), Err(PauseError::EnforcedPause));
        assert_eq!(switch.pause(), Err(PauseError::EnforcedPause));

        switch.unpause().unwrap();
        assert!(!switch.is_paused());
    }
}
