//! Task ownership, delegated creation and visibility.
//!
//! Every task has exactly one owner. A friend may create a task on the
//! owner's list only while the owner's grant for that friend is in place;
//! the grant is read again on every call through
//! [`authorize_task_creation`], which is the one policy check all entry
//! points share.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    error::{Result, SocialError},
    models::{NewTask, Task, TaskFilter, TaskId, TaskUpdate, UserId},
    permissions::PermissionRegistry,
    store::SocialStore,
};

/// Decides whether `creator` may create a task owned by `owner`.
///
/// Owners may always write to their own list as long as they exist. Anyone
/// else needs a current friendship and a `can_create_tasks` grant from the
/// owner.
pub fn authorize_task_creation<S: SocialStore + ?Sized>(
    store: &Arc<S>,
    owner: UserId,
    creator: UserId,
) -> Result<()> {
    if store.get_user(owner)?.is_none() {
        return Err(SocialError::not_found("user", owner));
    }
    if owner == creator {
        return Ok(());
    }

    let permissions = PermissionRegistry::new(Arc::clone(store));
    if permissions.can_create_tasks(owner, creator)? {
        Ok(())
    } else {
        Err(SocialError::forbidden(format!(
            "user {creator} may not create tasks for {owner}"
        )))
    }
}

/// Task operations over a [`SocialStore`].
pub struct TaskService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> TaskService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a task owned by `owner` on behalf of `creator`.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the owner does not exist
    /// - `Forbidden` when `creator` is not the owner and holds no grant
    pub fn create_task(&self, owner: UserId, creator: UserId, task: &NewTask) -> Result<Task> {
        authorize_task_creation(&self.store, owner, creator)?;

        let created = self.store.insert_task(owner, creator, task)?;
        if created.is_delegated() {
            info!(
                "User {} created task {} for {}",
                creator, created.id, owner
            );
        } else {
            info!("User {} created task {}", owner, created.id);
        }
        Ok(created)
    }

    /// The owner's own view of their tasks.
    pub fn list_tasks(&self, owner: UserId, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.store.list_tasks(owner, filter)
    }

    /// `owner`'s tasks as `viewer` may see them. Anyone but the owner only
    /// sees public tasks.
    pub fn list_visible_to(&self, owner: UserId, viewer: UserId) -> Result<Vec<Task>> {
        let filter = if owner == viewer {
            TaskFilter::default()
        } else {
            TaskFilter::public()
        };
        debug!("Listing tasks of {owner} for viewer {viewer}");
        self.store.list_tasks(owner, &filter)
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task> {
        self.store
            .get_task(id)?
            .ok_or_else(|| SocialError::not_found("task", id))
    }

    /// Applies `update` to a task. Only the owner may change a task,
    /// including tasks a friend created for them.
    pub fn update_task(&self, actor: UserId, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let mut task = self.owned_task(actor, id)?;
        if update.is_empty() {
            return Ok(task);
        }

        update.apply_to(&mut task)?;
        let saved = self
            .store
            .save_task(&task)?
            .ok_or_else(|| SocialError::not_found("task", id))?;
        info!("User {actor} updated task {id}");
        Ok(saved)
    }

    pub fn delete_task(&self, actor: UserId, id: TaskId) -> Result<()> {
        self.owned_task(actor, id)?;
        if !self.store.delete_task(id)? {
            return Err(SocialError::not_found("task", id));
        }
        info!("User {actor} deleted task {id}");
        Ok(())
    }

    fn owned_task(&self, actor: UserId, id: TaskId) -> Result<Task> {
        let task = self.get_task(id)?;
        if task.user_id != actor {
            return Err(SocialError::forbidden(format!(
                "task {id} belongs to user {}",
                task.user_id
            )));
        }
        Ok(task)
    }
}
