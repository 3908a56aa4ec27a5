//! Per-friend task-creation grants.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    error::{Result, SocialError},
    models::{FriendPermission, UserId},
    store::SocialStore,
};

/// Registry of `(owner, friend) -> can_create_tasks` grants.
pub struct PermissionRegistry<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> PermissionRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Grants or revokes `friend`'s right to create tasks for `owner`.
    ///
    /// Setting the same value twice is a no-op in effect. Fails with
    /// `Forbidden` when the two users are not friends at write time.
    pub fn set_create_permission(
        &self,
        owner: UserId,
        friend: UserId,
        allowed: bool,
    ) -> Result<FriendPermission> {
        if owner == friend {
            return Err(SocialError::invalid_argument("friend_id")
                .with_reason("owners always create their own tasks"));
        }

        let permission = self
            .store
            .upsert_permission(owner, friend, allowed)?
            .ok_or_else(|| {
                SocialError::forbidden(format!(
                    "user {friend} is not a friend of {owner}; permissions need a friendship"
                ))
            })?;
        info!(
            "User {} {} task creation for {}",
            owner,
            if allowed { "granted" } else { "revoked" },
            friend
        );
        Ok(permission)
    }

    /// Whether `friend` may currently create tasks owned by `owner`.
    ///
    /// Absence of a grant is denial: no row, no friendship, or a row with
    /// `can_create_tasks = false` all yield `false`. Only store failures are
    /// errors.
    pub fn can_create_tasks(&self, owner: UserId, friend: UserId) -> Result<bool> {
        if !self.store.friendship_exists(owner, friend)? {
            debug!("No friendship {owner} -> {friend}; task creation denied");
            return Ok(false);
        }
        Ok(self
            .store
            .get_permission(owner, friend)?
            .is_some_and(|p| p.can_create_tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        test_support::{befriend, store_with_users},
    };

    #[test]
    fn test_permission_requires_friendship() {
        let (store, ids) = store_with_users(&["owner", "stranger"]);
        let registry = PermissionRegistry::new(store);

        let err = registry
            .set_create_permission(ids[0], ids[1], true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(!registry.can_create_tasks(ids[0], ids[1]).unwrap());
    }

    #[test]
    fn test_grant_and_revoke() {
        let (store, ids) = store_with_users(&["owner", "friend"]);
        let (owner, friend) = (ids[0], ids[1]);
        befriend(&store, owner, friend);
        let registry = PermissionRegistry::new(Arc::clone(&store));

        assert!(!registry.can_create_tasks(owner, friend).unwrap());

        registry
            .set_create_permission(owner, friend, true)
            .expect("grant");
        registry
            .set_create_permission(owner, friend, true)
            .expect("grant again");
        assert!(registry.can_create_tasks(owner, friend).unwrap());
        assert!(
            !registry.can_create_tasks(friend, owner).unwrap(),
            "grants are directional"
        );
        assert_eq!(store.all_permissions().unwrap().len(), 1);

        registry
            .set_create_permission(owner, friend, false)
            .expect("revoke");
        assert!(!registry.can_create_tasks(owner, friend).unwrap());
    }

    #[test]
    fn test_orphaned_grant_is_denied() {
        let (store, ids) = store_with_users(&["owner", "friend"]);
        let (owner, friend) = (ids[0], ids[1]);
        befriend(&store, owner, friend);
        let registry = PermissionRegistry::new(Arc::clone(&store));
        registry
            .set_create_permission(owner, friend, true)
            .expect("grant");

        store.drop_friendship_row(owner, friend);
        assert!(!registry.can_create_tasks(owner, friend).unwrap());
    }

    #[test]
    fn test_self_permission_is_rejected() {
        let (store, ids) = store_with_users(&["owner"]);
        let registry = PermissionRegistry::new(store);
        let err = registry
            .set_create_permission(ids[0], ids[0], true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
