//! Task, dashboard and integrity operations.

use super::Hub;
use crate::{
    dashboard::DashboardAggregator,
    error::Result,
    integrity::{IntegrityChecker, IntegrityReport},
    models::{FriendTasks, NewTask, Task, TaskFilter, TaskId, TaskUpdate, UserId},
    tasks::TaskService,
};

impl Hub {
    /// Creates a task for `owner`. When `creator` differs from the owner the
    /// owner's grant is checked on this call.
    pub async fn create_task(&self, owner: UserId, creator: UserId, task: &NewTask) -> Result<Task> {
        let task = task.clone();
        self.run(move |store| TaskService::new(store).create_task(owner, creator, &task))
            .await
    }

    pub async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.run(move |store| TaskService::new(store).get_task(id))
            .await
    }

    pub async fn list_tasks(&self, owner: UserId, filter: TaskFilter) -> Result<Vec<Task>> {
        self.run(move |store| TaskService::new(store).list_tasks(owner, &filter))
            .await
    }

    pub async fn list_visible_to(&self, owner: UserId, viewer: UserId) -> Result<Vec<Task>> {
        self.run(move |store| TaskService::new(store).list_visible_to(owner, viewer))
            .await
    }

    pub async fn update_task(&self, actor: UserId, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let update = update.clone();
        self.run(move |store| TaskService::new(store).update_task(actor, id, &update))
            .await
    }

    pub async fn delete_task(&self, actor: UserId, id: TaskId) -> Result<()> {
        self.run(move |store| TaskService::new(store).delete_task(actor, id))
            .await
    }

    pub async fn load_dashboard(&self, user: UserId) -> Result<Vec<FriendTasks>> {
        self.run(move |store| DashboardAggregator::new(store).load_dashboard_friend_tasks(user))
            .await
    }

    pub async fn audit(&self) -> Result<IntegrityReport> {
        self.run(|store| IntegrityChecker::new(store).audit()).await
    }

    pub async fn repair(&self) -> Result<IntegrityReport> {
        self.run(|store| IntegrityChecker::new(store).repair()).await
    }
}
