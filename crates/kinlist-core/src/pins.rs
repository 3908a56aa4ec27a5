//! Pinned friends, which scope the dashboard.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    error::{Result, SocialError},
    models::{PinnedFriend, UserId},
    store::SocialStore,
};

/// Per-user set of pinned friends.
pub struct PinRegistry<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> PinRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pins `friend` for `user`. Pinning an already pinned friend returns the
    /// existing pin. Fails with `Forbidden` when they are not friends.
    pub fn pin(&self, user: UserId, friend: UserId) -> Result<PinnedFriend> {
        let pin = self.store.insert_pin(user, friend)?.ok_or_else(|| {
            SocialError::forbidden(format!("user {friend} is not a friend of {user}"))
        })?;
        info!("User {user} pinned {friend}");
        Ok(pin)
    }

    /// Removes a pin; unpinning something that is not pinned is fine.
    pub fn unpin(&self, user: UserId, friend: UserId) -> Result<()> {
        if self.store.delete_pin(user, friend)? {
            info!("User {user} unpinned {friend}");
        }
        Ok(())
    }

    /// Pinned friends in pin order.
    ///
    /// Pins whose friendship is gone are skipped here rather than deleted, so
    /// unpin and unfriend stay independent operations.
    pub fn list_pinned(&self, user: UserId) -> Result<Vec<UserId>> {
        let mut pinned = Vec::new();
        for pin in self.store.list_pins(user)? {
            if self.store.friendship_exists(user, pin.friend_id)? {
                pinned.push(pin.friend_id);
            } else {
                debug!("Skipping dangling pin {} -> {}", user, pin.friend_id);
            }
        }
        Ok(pinned)
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
    fn test_pin_requires_friendship() {
        let (store, ids) = store_with_users(&["alice", "bob"]);
        let pins = PinRegistry::new(store);

        let err = pins.pin(ids[0], ids[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(pins.list_pinned(ids[0]).unwrap().is_empty());
    }

    #[test]
    fn test_pins_keep_order_and_are_idempotent() {
        let (store, ids) = store_with_users(&["me", "zed", "amy", "kim"]);
        let me = ids[0];
        for &friend in &ids[1..] {
            befriend(&store, me, friend);
        }
        let pins = PinRegistry::new(Arc::clone(&store));

        pins.pin(me, ids[3]).expect("pin kim");
        pins.pin(me, ids[1]).expect("pin zed");
        let first = pins.pin(me, ids[2]).expect("pin amy");
        let again = pins.pin(me, ids[2]).expect("pin amy again");
        assert_eq!(first, again);

        assert_eq!(pins.list_pinned(me).unwrap(), vec![ids[3], ids[1], ids[2]]);

        pins.unpin(me, ids[1]).expect("unpin");
        pins.unpin(me, ids[1]).expect("unpin twice");
        assert_eq!(pins.list_pinned(me).unwrap(), vec![ids[3], ids[2]]);
    }

    #[test]
    fn test_dangling_pins_are_filtered_on_read() {
        let (store, ids) = store_with_users(&["me", "friend"]);
        let (me, friend) = (ids[0], ids[1]);
        befriend(&store, me, friend);
        let pins = PinRegistry::new(Arc::clone(&store));
        pins.pin(me, friend).expect("pin");

        store.drop_friendship_row(me, friend);

        assert!(pins.list_pinned(me).unwrap().is_empty());
        assert_eq!(store.all_pins().unwrap().len(), 1, "row is kept");
    }
}
