//! Identity, friendship, permission and pin operations.

use std::sync::Arc;

use log::warn;

use super::Hub;
use crate::{
    error::Result,
    identity::Directory,
    ledger::FriendshipLedger,
    models::{
        Decision, FriendPermission, FriendRequest, PinnedFriend, RequestId, UnfriendOutcome, User,
        UserId,
    },
    permissions::PermissionRegistry,
    pins::PinRegistry,
};

impl Hub {
    pub async fn register_user(&self, email: &str, username: Option<&str>) -> Result<User> {
        let email = email.to_string();
        let username = username.map(String::from);
        self.run(move |store| Directory::new(store).register_user(&email, username.as_deref()))
            .await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User> {
        self.run(move |store| Directory::new(store).get_user(id)).await
    }

    pub async fn find_user(&self, username: &str) -> Result<User> {
        let username = username.to_string();
        self.run(move |store| Directory::new(store).find_by_username(&username))
            .await
    }

    pub async fn send_friend_request(
        &self,
        requester: UserId,
        recipient: UserId,
    ) -> Result<FriendRequest> {
        self.run(move |store| FriendshipLedger::new(store).send_request(requester, recipient))
            .await
    }

    pub async fn respond_to_friend_request(
        &self,
        request_id: RequestId,
        responder: UserId,
        decision: Decision,
    ) -> Result<FriendRequest> {
        self.run(move |store| {
            FriendshipLedger::new(store).respond_to_request(request_id, responder, decision)
        })
        .await
    }

    /// Friends of `user` with their user records, in id order.
    pub async fn list_friends(&self, user: UserId) -> Result<Vec<User>> {
        self.run(move |store| {
            let ids = FriendshipLedger::new(Arc::clone(&store)).list_friends(user)?;
            let mut friends = Vec::with_capacity(ids.len());
            for id in ids {
                match store.get_user(id)? {
                    Some(friend) => friends.push(friend),
                    None => warn!("Friend {id} of {user} has no user record"),
                }
            }
            Ok(friends)
        })
        .await
    }

    pub async fn are_friends(&self, user: UserId, friend: UserId) -> Result<bool> {
        self.run(move |store| FriendshipLedger::new(store).are_friends(user, friend))
            .await
    }

    pub async fn list_pending_incoming(&self, user: UserId) -> Result<Vec<FriendRequest>> {
        self.run(move |store| FriendshipLedger::new(store).list_pending_incoming(user))
            .await
    }

    pub async fn list_pending_outgoing(&self, user: UserId) -> Result<Vec<FriendRequest>> {
        self.run(move |store| FriendshipLedger::new(store).list_pending_outgoing(user))
            .await
    }

    pub async fn unfriend(&self, user: UserId, friend: UserId) -> Result<UnfriendOutcome> {
        self.run(move |store| FriendshipLedger::new(store).unfriend(user, friend))
            .await
    }

    pub async fn set_create_permission(
        &self,
        owner: UserId,
        friend: UserId,
        allowed: bool,
    ) -> Result<FriendPermission> {
        self.run(move |store| {
            PermissionRegistry::new(store).set_create_permission(owner, friend, allowed)
        })
        .await
    }

    pub async fn can_create_tasks(&self, owner: UserId, friend: UserId) -> Result<bool> {
        self.run(move |store| PermissionRegistry::new(store).can_create_tasks(owner, friend))
            .await
    }

    pub async fn pin_friend(&self, user: UserId, friend: UserId) -> Result<PinnedFriend> {
        self.run(move |store| PinRegistry::new(store).pin(user, friend))
            .await
    }

    pub async fn unpin_friend(&self, user: UserId, friend: UserId) -> Result<()> {
        self.run(move |store| PinRegistry::new(store).unpin(user, friend))
            .await
    }

    pub async fn list_pinned(&self, user: UserId) -> Result<Vec<UserId>> {
        self.run(move |store| PinRegistry::new(store).list_pinned(user))
            .await
    }
}
