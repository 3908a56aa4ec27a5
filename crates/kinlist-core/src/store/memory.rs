//! In-memory [`SocialStore`].
//!
//! All state sits behind one mutex, so every trait method is atomic with
//! respect to every other. Rows are kept in ordered maps keyed by the same
//! composite pairs the SQLite schema indexes, which keeps existence checks
//! logarithmic.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Mutex, MutexGuard},
};

use jiff::Timestamp;

use super::{RequestDirection, RequestInsert, Resolution, SocialStore};
use crate::{
    error::{Result, SocialError},
    models::{
        FriendPermission, FriendRequest, Friendship, NewTask, NewUser, PinnedFriend, RequestId,
        RequestStatus, Task, TaskFilter, TaskId, UnfriendOutcome, User, UserId,
    },
};

type Pair = (UserId, UserId);

/// Request ids grouped by one participant and status.
type RequestIndex = HashMap<(UserId, RequestStatus), BTreeSet<RequestId>>;

/// Unordered key for a pair of users.
fn pair_key(a: UserId, b: UserId) -> Pair {
    if a <= b { (a, b) } else { (b, a) }
}

/// Every directed key whose first element is `user`.
fn rows_for(user: UserId) -> std::ops::RangeInclusive<Pair> {
    (user, UserId(u64::MIN))..=(user, UserId(u64::MAX))
}

#[derive(Default)]
struct MemoryState {
    next_user: u64,
    next_request: u64,
    next_task: u64,
    next_pin: u64,

    users: BTreeMap<UserId, User>,
    users_by_email: HashMap<String, UserId>,
    users_by_username: HashMap<String, UserId>,

    requests: BTreeMap<RequestId, FriendRequest>,
    pending_by_pair: HashMap<Pair, RequestId>,
    requests_by_recipient: RequestIndex,
    requests_by_requester: RequestIndex,

    friendships: BTreeMap<Pair, Friendship>,
    permissions: BTreeMap<Pair, FriendPermission>,
    /// Pin rows with their insertion sequence
    pins: BTreeMap<Pair, (u64, PinnedFriend)>,

    tasks: BTreeMap<TaskId, Task>,
    tasks_by_owner: HashMap<UserId, BTreeSet<TaskId>>,
}

impl MemoryState {
    fn index_request(&mut self, request: &FriendRequest) {
        self.requests_by_recipient
            .entry((request.recipient_id, request.status))
            .or_default()
            .insert(request.id);
        self.requests_by_requester
            .entry((request.requester_id, request.status))
            .or_default()
            .insert(request.id);
    }

    fn unindex_request(&mut self, request: &FriendRequest) {
        for (index, user) in [
            (&mut self.requests_by_recipient, request.recipient_id),
            (&mut self.requests_by_requester, request.requester_id),
        ] {
            if let Some(ids) = index.get_mut(&(user, request.status)) {
                ids.remove(&request.id);
                if ids.is_empty() {
                    index.remove(&(user, request.status));
                }
            }
        }
    }

    fn insert_friendship_row(&mut self, user: UserId, friend: UserId, now: Timestamp) -> bool {
        if self.friendships.contains_key(&(user, friend)) {
            return false;
        }
        self.friendships.insert(
            (user, friend),
            Friendship {
                user_id: user,
                friend_id: friend,
                created_at: now,
            },
        );
        true
    }
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| SocialError::store("In-memory store lock poisoned").bare())
    }

    /// Removes a single directed friendship row, bypassing the cascade.
    /// Produces the corrupt states the integrity checker and the dashboard
    /// must tolerate.
    #[cfg(test)]
    pub(crate) fn drop_friendship_row(&self, user: UserId, friend: UserId) {
        if let Ok(mut state) = self.state() {
            state.friendships.remove(&(user, friend));
        }
    }
}

impl SocialStore for MemoryStore {
    fn insert_user(&self, user: &NewUser) -> Result<User> {
        let mut state = self.state()?;

        if state.users_by_email.contains_key(user.email()) {
            return Err(SocialError::AlreadyExists {
                field: "email",
                value: user.email().to_string(),
            });
        }
        if let Some(name) = user.username()
            && state.users_by_username.contains_key(name)
        {
            return Err(SocialError::AlreadyExists {
                field: "username",
                value: name.to_string(),
            });
        }

        state.next_user += 1;
        let record = User {
            id: UserId(state.next_user),
            email: user.email().to_string(),
            username: user.username().map(String::from),
            created_at: Timestamp::now(),
        };
        state.users_by_email.insert(record.email.clone(), record.id);
        if let Some(name) = &record.username {
            state.users_by_username.insert(name.clone(), record.id);
        }
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state()?;
        Ok(state
            .users_by_username
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    fn insert_friend_request(&self, requester: UserId, recipient: UserId) -> Result<RequestInsert> {
        let mut state = self.state()?;

        if state.friendships.contains_key(&(requester, recipient))
            || state.friendships.contains_key(&(recipient, requester))
        {
            return Ok(RequestInsert::AlreadyFriends);
        }

        let key = pair_key(requester, recipient);
        if let Some(existing) = state
            .pending_by_pair
            .get(&key)
            .and_then(|id| state.requests.get(id))
        {
            return Ok(RequestInsert::Pending(existing.clone()));
        }

        state.next_request += 1;
        let request = FriendRequest {
            id: RequestId(state.next_request),
            requester_id: requester,
            recipient_id: recipient,
            status: RequestStatus::Pending,
            created_at: Timestamp::now(),
            responded_at: None,
        };
        state.pending_by_pair.insert(key, request.id);
        state.index_request(&request);
        state.requests.insert(request.id, request.clone());
        Ok(RequestInsert::Created(request))
    }

    fn get_friend_request(&self, id: RequestId) -> Result<Option<FriendRequest>> {
        Ok(self.state()?.requests.get(&id).cloned())
    }

    fn list_friend_requests(
        &self,
        user: UserId,
        direction: RequestDirection,
        status: RequestStatus,
    ) -> Result<Vec<FriendRequest>> {
        let state = self.state()?;
        let index = match direction {
            RequestDirection::Incoming => &state.requests_by_recipient,
            RequestDirection::Outgoing => &state.requests_by_requester,
        };
        Ok(index
            .get(&(user, status))
            .into_iter()
            .flatten()
            .filter_map(|id| state.requests.get(id))
            .cloned()
            .collect())
    }

    fn resolve_friend_request(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<Resolution>> {
        let mut state = self.state()?;

        let Some(current) = state.requests.get(&id).cloned() else {
            return Ok(None);
        };
        if current.status.is_terminal() {
            return Ok(Some(Resolution::Unchanged(current)));
        }

        state.unindex_request(&current);
        let now = Timestamp::now();
        let resolved = FriendRequest {
            status,
            responded_at: Some(now),
            ..current
        };
        state
            .pending_by_pair
            .remove(&pair_key(resolved.requester_id, resolved.recipient_id));
        state.index_request(&resolved);
        if status == RequestStatus::Accepted {
            state.insert_friendship_row(resolved.requester_id, resolved.recipient_id, now);
            state.insert_friendship_row(resolved.recipient_id, resolved.requester_id, now);
        }
        state.requests.insert(id, resolved.clone());
        Ok(Some(Resolution::Applied(resolved)))
    }

    fn friendship_exists(&self, user: UserId, friend: UserId) -> Result<bool> {
        Ok(self.state()?.friendships.contains_key(&(user, friend)))
    }

    fn list_friend_ids(&self, user: UserId) -> Result<Vec<UserId>> {
        let state = self.state()?;
        Ok(state
            .friendships
            .range(rows_for(user))
            .map(|(&(_, friend), _)| friend)
            .collect())
    }

    fn remove_friendship(&self, a: UserId, b: UserId) -> Result<UnfriendOutcome> {
        let mut state = self.state()?;
        let mut outcome = UnfriendOutcome::default();

        for key in [(a, b), (b, a)] {
            outcome.friendships_removed += usize::from(state.friendships.remove(&key).is_some());
            outcome.permissions_removed += usize::from(state.permissions.remove(&key).is_some());
            outcome.pins_removed += usize::from(state.pins.remove(&key).is_some());
        }
        Ok(outcome)
    }

    fn insert_friendship_pair(&self, a: UserId, b: UserId) -> Result<usize> {
        let mut state = self.state()?;
        let now = Timestamp::now();
        let written = usize::from(state.insert_friendship_row(a, b, now))
            + usize::from(state.insert_friendship_row(b, a, now));
        Ok(written)
    }

    fn all_friendships(&self) -> Result<Vec<Friendship>> {
        Ok(self.state()?.friendships.values().cloned().collect())
    }

    fn upsert_permission(
        &self,
        owner: UserId,
        friend: UserId,
        allowed: bool,
    ) -> Result<Option<FriendPermission>> {
        let mut state = self.state()?;
        if !state.friendships.contains_key(&(owner, friend)) {
            return Ok(None);
        }

        let permission = FriendPermission {
            user_id: owner,
            friend_id: friend,
            can_create_tasks: allowed,
            updated_at: Timestamp::now(),
        };
        state.permissions.insert((owner, friend), permission.clone());
        Ok(Some(permission))
    }

    fn get_permission(&self, owner: UserId, friend: UserId) -> Result<Option<FriendPermission>> {
        Ok(self.state()?.permissions.get(&(owner, friend)).cloned())
    }

    fn delete_permission(&self, owner: UserId, friend: UserId) -> Result<bool> {
        Ok(self.state()?.permissions.remove(&(owner, friend)).is_some())
    }

    fn all_permissions(&self) -> Result<Vec<FriendPermission>> {
        Ok(self.state()?.permissions.values().cloned().collect())
    }

    fn insert_pin(&self, user: UserId, friend: UserId) -> Result<Option<PinnedFriend>> {
        let mut state = self.state()?;
        if !state.friendships.contains_key(&(user, friend)) {
            return Ok(None);
        }
        if let Some((_, existing)) = state.pins.get(&(user, friend)) {
            return Ok(Some(existing.clone()));
        }

        state.next_pin += 1;
        let pin = PinnedFriend {
            user_id: user,
            friend_id: friend,
            pinned_at: Timestamp::now(),
        };
        let seq = state.next_pin;
        state.pins.insert((user, friend), (seq, pin.clone()));
        Ok(Some(pin))
    }

    fn delete_pin(&self, user: UserId, friend: UserId) -> Result<bool> {
        Ok(self.state()?.pins.remove(&(user, friend)).is_some())
    }

    fn list_pins(&self, user: UserId) -> Result<Vec<PinnedFriend>> {
        let state = self.state()?;
        let mut pins: Vec<_> = state.pins.range(rows_for(user)).map(|(_, row)| row).collect();
        pins.sort_by_key(|(seq, _)| *seq);
        Ok(pins.into_iter().map(|(_, pin)| pin.clone()).collect())
    }

    fn all_pins(&self) -> Result<Vec<PinnedFriend>> {
        Ok(self
            .state()?
            .pins
            .values()
            .map(|(_, pin)| pin.clone())
            .collect())
    }

    fn insert_task(&self, owner: UserId, creator: UserId, task: &NewTask) -> Result<Task> {
        let mut state = self.state()?;

        state.next_task += 1;
        let now = Timestamp::now();
        let record = Task {
            id: TaskId(state.next_task),
            user_id: owner,
            task_name: task.task_name().to_string(),
            due_date: task.due_date(),
            is_done: false,
            is_private: task.is_private(),
            assigned_by: Some(creator),
            created_at: now,
            updated_at: now,
        };
        state.tasks_by_owner.entry(owner).or_default().insert(record.id);
        state.tasks.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.state()?.tasks.get(&id).cloned())
    }

    fn list_tasks(&self, owner: UserId, filter: &TaskFilter) -> Result<Vec<Task>> {
        let state = self.state()?;
        let mut tasks: Vec<Task> = state
            .tasks_by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(Task::listing_order);
        Ok(tasks)
    }

    fn save_task(&self, task: &Task) -> Result<Option<Task>> {
        let mut state = self.state()?;
        let Some(stored) = state.tasks.get_mut(&task.id) else {
            return Ok(None);
        };

        stored.task_name = task.task_name.clone();
        stored.due_date = task.due_date;
        stored.is_done = task.is_done;
        stored.is_private = task.is_private;
        stored.updated_at = Timestamp::now();
        Ok(Some(stored.clone()))
    }

    fn delete_task(&self, id: TaskId) -> Result<bool> {
        let mut state = self.state()?;
        let Some(task) = state.tasks.remove(&id) else {
            return Ok(false);
        };
        if let Some(ids) = state.tasks_by_owner.get_mut(&task.user_id) {
            ids.remove(&id);
        }
        Ok(true)
    }
}
