//! Consistency audit for the friendship graph.
//!
//! Friendships are stored as two mirrored rows and permissions and pins
//! depend on them. Stores keep these in step transactionally, but data
//! imported or edited outside the core can still drift. The checker finds
//! such drift and can put it right.

use std::{collections::BTreeSet, sync::Arc};

use log::{info, warn};
use serde::Serialize;

use crate::{
    error::Result,
    models::{FriendPermission, PinnedFriend, UserId},
    store::SocialStore,
};

/// Findings of an audit, or the fixes applied by a repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// `(user, friend)` rows whose `(friend, user)` mirror is missing
    pub missing_mirrors: Vec<(UserId, UserId)>,

    /// Permission rows with no friendship in the same direction
    pub orphaned_permissions: Vec<FriendPermission>,

    /// Pin rows with no friendship in the same direction
    pub orphaned_pins: Vec<PinnedFriend>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.missing_mirrors.is_empty()
            && self.orphaned_permissions.is_empty()
            && self.orphaned_pins.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.missing_mirrors.len() + self.orphaned_permissions.len() + self.orphaned_pins.len()
    }
}

pub struct IntegrityChecker<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> IntegrityChecker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reports drift without changing anything.
    pub fn audit(&self) -> Result<IntegrityReport> {
        let rows: BTreeSet<(UserId, UserId)> = self
            .store
            .all_friendships()?
            .into_iter()
            .map(|f| (f.user_id, f.friend_id))
            .collect();

        let missing_mirrors: Vec<_> = rows
            .iter()
            .copied()
            .filter(|&(user, friend)| !rows.contains(&(friend, user)))
            .collect();

        let orphaned_permissions: Vec<_> = self
            .store
            .all_permissions()?
            .into_iter()
            .filter(|p| !rows.contains(&(p.user_id, p.friend_id)))
            .collect();

        let orphaned_pins: Vec<_> = self
            .store
            .all_pins()?
            .into_iter()
            .filter(|p| !rows.contains(&(p.user_id, p.friend_id)))
            .collect();

        let report = IntegrityReport {
            missing_mirrors,
            orphaned_permissions,
            orphaned_pins,
        };
        if !report.is_clean() {
            warn!("Integrity audit found {} issue(s)", report.issue_count());
        }
        Ok(report)
    }

    /// Restores missing mirror rows, then removes permissions and pins that
    /// still lack a friendship. Returns what was fixed.
    ///
    /// Mirrors go first so a grant attached to a half-present friendship is
    /// kept rather than deleted.
    pub fn repair(&self) -> Result<IntegrityReport> {
        let found = self.audit()?;
        let mut fixed = IntegrityReport::default();

        for &(user, friend) in &found.missing_mirrors {
            if self.store.insert_friendship_pair(user, friend)? > 0 {
                fixed.missing_mirrors.push((user, friend));
            }
        }

        for permission in found.orphaned_permissions {
            if self
                .store
                .friendship_exists(permission.user_id, permission.friend_id)?
            {
                continue;
            }
            if self
                .store
                .delete_permission(permission.user_id, permission.friend_id)?
            {
                fixed.orphaned_permissions.push(permission);
            }
        }

        for pin in found.orphaned_pins {
            if self.store.friendship_exists(pin.user_id, pin.friend_id)? {
                continue;
            }
            if self.store.delete_pin(pin.user_id, pin.friend_id)? {
                fixed.orphaned_pins.push(pin);
            }
        }

        info!("Integrity repair fixed {} issue(s)", fixed.issue_count());
        Ok(fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        permissions::PermissionRegistry,
        pins::PinRegistry,
        test_support::{befriend, store_with_users},
    };

    #[test]
    fn test_consistent_graph_is_clean() {
        let (store, ids) = store_with_users(&["a", "b"]);
        befriend(&store, ids[0], ids[1]);
        PinRegistry::new(Arc::clone(&store)).pin(ids[0], ids[1]).unwrap();

        let report = IntegrityChecker::new(store).audit().unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_repair_restores_mirror_and_keeps_grants() {
        let (store, ids) = store_with_users(&["a", "b"]);
        let (a, b) = (ids[0], ids[1]);
        befriend(&store, a, b);
        PermissionRegistry::new(Arc::clone(&store))
            .set_create_permission(a, b, true)
            .unwrap();
        PinRegistry::new(Arc::clone(&store)).pin(a, b).unwrap();

        store.drop_friendship_row(a, b);
        let checker = IntegrityChecker::new(Arc::clone(&store));

        let found = checker.audit().unwrap();
        assert_eq!(found.missing_mirrors, vec![(b, a)]);
        assert_eq!(found.orphaned_permissions.len(), 1);
        assert_eq!(found.orphaned_pins.len(), 1);

        let fixed = checker.repair().unwrap();
        assert_eq!(fixed.missing_mirrors, vec![(b, a)]);
        assert!(fixed.orphaned_permissions.is_empty());
        assert!(fixed.orphaned_pins.is_empty());

        assert!(store.friendship_exists(a, b).unwrap());
        assert!(
            PermissionRegistry::new(Arc::clone(&store))
                .can_create_tasks(a, b)
                .unwrap()
        );
        assert!(checker.audit().unwrap().is_clean());
    }

    #[test]
    fn test_repair_deletes_orphans_of_vanished_friendship() {
        let (store, ids) = store_with_users(&["a", "b"]);
        let (a, b) = (ids[0], ids[1]);
        befriend(&store, a, b);
        PermissionRegistry::new(Arc::clone(&store))
            .set_create_permission(a, b, true)
            .unwrap();
        PinRegistry::new(Arc::clone(&store)).pin(b, a).unwrap();

        store.drop_friendship_row(a, b);
        store.drop_friendship_row(b, a);

        let fixed = IntegrityChecker::new(Arc::clone(&store)).repair().unwrap();
        assert!(fixed.missing_mirrors.is_empty());
        assert_eq!(fixed.orphaned_permissions.len(), 1);
        assert_eq!(fixed.orphaned_pins.len(), 1);
        assert!(store.all_permissions().unwrap().is_empty());
        assert!(store.all_pins().unwrap().is_empty());
    }
}
