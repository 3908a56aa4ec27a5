//! The pinned-friends dashboard.

use std::sync::Arc;

use log::{debug, warn};

use crate::{
    error::Result,
    models::{FriendTasks, TaskFilter, UserId},
    store::SocialStore,
};

/// Builds a user's dashboard from their pins and their friends' public
/// tasks.
pub struct DashboardAggregator<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> DashboardAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// One entry per pinned friend, in pin order.
    ///
    /// A pin whose friendship has disappeared is dropped from the result.
    /// Friends with no public tasks keep an entry with an empty task list.
    /// Only store failures make the call fail.
    pub fn load_dashboard_friend_tasks(&self, user: UserId) -> Result<Vec<FriendTasks>> {
        let pins = self.store.list_pins(user)?;
        let filter = TaskFilter::public();
        let mut dashboard = Vec::with_capacity(pins.len());

        for pin in pins {
            let friend_id = pin.friend_id;
            if !self.store.friendship_exists(user, friend_id)? {
                warn!("Dropping pinned user {friend_id} from dashboard of {user}: not a friend");
                continue;
            }

            let friend_username = match self.store.get_user(friend_id)? {
                Some(friend) => friend.username,
                None => {
                    warn!("Pinned friend {friend_id} of {user} has no user record");
                    None
                }
            };
            let tasks = self.store.list_tasks(friend_id, &filter)?;
            dashboard.push(FriendTasks {
                friend_id,
                friend_username,
                tasks,
            });
        }

        debug!("Dashboard of {} has {} entries", user, dashboard.len());
        Ok(dashboard)
    }
}
