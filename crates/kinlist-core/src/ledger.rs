//! The friendship ledger: friend requests and symmetric friendships.
//!
//! A request is created `pending` by the requester and resolved exactly once
//! by the recipient:
//!
//! ```text
//!            accept            (writes (A,B) and (B,A) atomically)
//! pending ───────────▶ accepted
//!    │
//!    │       decline
//!    └───────────────▶ declined
//! ```
//!
//! Terminal requests are history and never change. Only an existing
//! friendship or an existing pending request (in either direction) blocks a
//! new request; older terminal requests do not.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    error::{Result, SocialError},
    models::{Decision, FriendRequest, RequestId, RequestStatus, UnfriendOutcome, UserId},
    store::{RequestDirection, RequestInsert, Resolution, SocialStore},
};

/// Friend request workflow and friendship facts over a [`SocialStore`].
pub struct FriendshipLedger<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> FriendshipLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Sends a friend request from `requester` to `recipient`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` when the two ids are equal
    /// - `NotFound` when either user is unknown
    /// - `AlreadyFriends` when the pair is already befriended
    /// - `RequestAlreadyPending` when a pending request exists in either
    ///   direction; the earlier request stands
    pub fn send_request(&self, requester: UserId, recipient: UserId) -> Result<FriendRequest> {
        if requester == recipient {
            return Err(SocialError::invalid_argument("recipient_id")
                .with_reason("cannot send a friend request to yourself"));
        }
        for user in [requester, recipient] {
            if self.store.get_user(user)?.is_none() {
                return Err(SocialError::not_found("user", user));
            }
        }

        match self.store.insert_friend_request(requester, recipient)? {
            RequestInsert::Created(request) => {
                info!(
                    "Friend request {} sent from {} to {}",
                    request.id, requester, recipient
                );
                Ok(request)
            }
            RequestInsert::AlreadyFriends => Err(SocialError::AlreadyFriends {
                user_id: requester,
                friend_id: recipient,
            }),
            RequestInsert::Pending(existing) => Err(SocialError::RequestAlreadyPending {
                request_id: existing.id,
            }),
        }
    }

    /// Accepts or declines a request on behalf of `responder`.
    ///
    /// Accepting an already accepted request succeeds without writing, so a
    /// retried call is harmless. It does not bring back a friendship that was
    /// removed by [`unfriend`](Self::unfriend) in the meantime.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the request does not exist
    /// - `Forbidden` when `responder` is not the recipient
    /// - `InvalidState` when the request is no longer pending
    pub fn respond_to_request(
        &self,
        request_id: RequestId,
        responder: UserId,
        decision: Decision,
    ) -> Result<FriendRequest> {
        let request = self
            .store
            .get_friend_request(request_id)?
            .ok_or_else(|| SocialError::not_found("friend request", request_id))?;

        if responder != request.recipient_id {
            return Err(SocialError::forbidden(format!(
                "only the recipient may respond to friend request {request_id}"
            )));
        }

        match self
            .store
            .resolve_friend_request(request_id, decision.target_status())?
        {
            None => Err(SocialError::not_found("friend request", request_id)),
            Some(Resolution::Applied(resolved)) => {
                info!(
                    "Friend request {} {} by {}",
                    request_id, resolved.status, responder
                );
                Ok(resolved)
            }
            Some(Resolution::Unchanged(current))
                if current.status == RequestStatus::Accepted && decision == Decision::Accept =>
            {
                debug!("Friend request {request_id} was already accepted");
                Ok(current)
            }
            Some(Resolution::Unchanged(current)) => Err(SocialError::invalid_state(format!(
                "friend request {request_id} is already {}",
                current.status
            ))),
        }
    }

    pub fn list_friends(&self, user: UserId) -> Result<Vec<UserId>> {
        self.store.list_friend_ids(user)
    }

    pub fn are_friends(&self, user: UserId, friend: UserId) -> Result<bool> {
        self.store.friendship_exists(user, friend)
    }

    /// Pending requests addressed to `user`, oldest first.
    pub fn list_pending_incoming(&self, user: UserId) -> Result<Vec<FriendRequest>> {
        self.store
            .list_friend_requests(user, RequestDirection::Incoming, RequestStatus::Pending)
    }

    /// Pending requests sent by `user`, oldest first.
    pub fn list_pending_outgoing(&self, user: UserId) -> Result<Vec<FriendRequest>> {
        self.store
            .list_friend_requests(user, RequestDirection::Outgoing, RequestStatus::Pending)
    }

    /// Ends the friendship between `user` and `friend`.
    ///
    /// Both friendship rows, every permission and every pin between the two
    /// users (both directions) go in one atomic unit. Calling it for a pair
    /// that is not befriended is a no-op that still clears leftovers.
    pub fn unfriend(&self, user: UserId, friend: UserId) -> Result<UnfriendOutcome> {
        if user == friend {
            return Err(
                SocialError::invalid_argument("friend_id").with_reason("cannot unfriend yourself")
            );
        }

        let outcome = self.store.remove_friendship(user, friend)?;
        if outcome.is_noop() {
            debug!("Unfriend {user} -> {friend} found nothing to remove");
        } else {
            info!(
                "Unfriended {} and {} ({} permissions, {} pins removed)",
                user, friend, outcome.permissions_removed, outcome.pins_removed
            );
        }
        Ok(outcome)
    }
}
