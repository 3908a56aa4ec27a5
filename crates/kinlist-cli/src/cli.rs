//! Command handlers.
//!
//! Each handler resolves usernames to ids, calls the [`Hub`] and hands the
//! result to the renderer. Authorization is left to the core; the CLI never
//! decides on its own whether the acting user may do something.

use anyhow::{Context, Result, anyhow};
use kinlist_core::{
    Decision, Hub, NewTask, RequestId, TaskFilter, TaskId, TaskUpdate, User,
    display::{Dashboard, FriendRequests, Friends, OperationStatus, Tasks},
};
use log::debug;
use serde_json::json;

use crate::{
    args::{
        AddTaskArgs, FriendCommands, ListTasksArgs, PermCommands, PinCommands, TaskCommands,
        UserCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    hub: Hub,
    renderer: TerminalRenderer,
    acting_as: Option<String>,
}

impl Cli {
    pub fn new(hub: Hub, renderer: TerminalRenderer, acting_as: Option<String>) -> Self {
        Self {
            hub,
            renderer,
            acting_as,
        }
    }

    /// The user named by `--as`.
    async fn actor(&self) -> Result<User> {
        let username = self
            .acting_as
            .as_deref()
            .ok_or_else(|| anyhow!("This command needs --as <USERNAME>"))?;
        self.user(username).await
    }

    async fn user(&self, username: &str) -> Result<User> {
        self.hub
            .find_user(username)
            .await
            .with_context(|| format!("Unknown user '{username}'"))
    }

    fn status(&self, message: String) -> Result<()> {
        let status = OperationStatus::success(message);
        self.renderer.emit(
            &status.to_string(),
            &json!({ "success": true, "message": status.message }),
        )
    }

    pub async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        match command {
            UserCommands::Register { email, username } => {
                let user = self
                    .hub
                    .register_user(&email, username.as_deref())
                    .await
                    .context("Failed to register user")?;
                self.renderer
                    .emit(&format!("Registered user {}\n\n{user}", user.id), &user)
            }
            UserCommands::Show { username } => {
                let user = match username {
                    Some(name) => self.user(&name).await?,
                    None => self.actor().await?,
                };
                self.renderer.emit(&user.to_string(), &user)
            }
        }
    }

    pub async fn handle_friend_command(&self, command: FriendCommands) -> Result<()> {
        let me = self.actor().await?;
        match command {
            FriendCommands::Request { username } => {
                let other = self.user(&username).await?;
                let request = self
                    .hub
                    .send_friend_request(me.id, other.id)
                    .await
                    .context("Failed to send friend request")?;
                self.renderer.emit(
                    &format!(
                        "Sent friend request {} to {}\n",
                        request.id,
                        other.handle()
                    ),
                    &request,
                )
            }
            FriendCommands::Accept { request_id } => {
                self.respond(&me, RequestId(request_id), Decision::Accept)
                    .await
            }
            FriendCommands::Decline { request_id } => {
                self.respond(&me, RequestId(request_id), Decision::Decline)
                    .await
            }
            FriendCommands::List => {
                let friends = self.hub.list_friends(me.id).await?;
                let markdown = Friends(friends.clone()).to_string();
                self.renderer.emit(&markdown, &friends)
            }
            FriendCommands::Pending => {
                let incoming = self.hub.list_pending_incoming(me.id).await?;
                let outgoing = self.hub.list_pending_outgoing(me.id).await?;
                let markdown = format!(
                    "{}\n{}",
                    FriendRequests {
                        heading: "Incoming",
                        requests: incoming.clone(),
                    },
                    FriendRequests {
                        heading: "Outgoing",
                        requests: outgoing.clone(),
                    }
                );
                self.renderer.emit(
                    &markdown,
                    &json!({ "incoming": incoming, "outgoing": outgoing }),
                )
            }
            FriendCommands::Remove { username } => {
                let other = self.user(&username).await?;
                let outcome = self
                    .hub
                    .unfriend(me.id, other.id)
                    .await
                    .context("Failed to remove friend")?;
                self.renderer.emit(&outcome.to_string(), &outcome)
            }
        }
    }

    async fn respond(&self, me: &User, request_id: RequestId, decision: Decision) -> Result<()> {
        let request = self
            .hub
            .respond_to_friend_request(request_id, me.id, decision)
            .await
            .with_context(|| format!("Failed to {decision} friend request {request_id}"))?;
        self.renderer.emit(&request.to_string(), &request)
    }

    pub async fn handle_perm_command(&self, command: PermCommands) -> Result<()> {
        let me = self.actor().await?;
        match command {
            PermCommands::Grant { username } => self.set_permission(&me, &username, true).await,
            PermCommands::Revoke { username } => self.set_permission(&me, &username, false).await,
            PermCommands::Check { owner } => {
                let owner = self.user(&owner).await?;
                let allowed = self.hub.can_create_tasks(owner.id, me.id).await?;
                let verb = if allowed { "may" } else { "may not" };
                self.renderer.emit(
                    &format!("You {verb} create tasks for {}\n", owner.handle()),
                    &json!({ "owner_id": owner.id, "can_create_tasks": allowed }),
                )
            }
        }
    }

    async fn set_permission(&self, me: &User, username: &str, allowed: bool) -> Result<()> {
        let friend = self.user(username).await?;
        let permission = self
            .hub
            .set_create_permission(me.id, friend.id, allowed)
            .await
            .context("Failed to update permission")?;
        self.renderer.emit(&permission.to_string(), &permission)
    }

    pub async fn handle_pin_command(&self, command: PinCommands) -> Result<()> {
        let me = self.actor().await?;
        match command {
            PinCommands::Add { username } => {
                let friend = self.user(&username).await?;
                let pin = self
                    .hub
                    .pin_friend(me.id, friend.id)
                    .await
                    .context("Failed to pin friend")?;
                self.renderer.emit(&pin.to_string(), &pin)
            }
            PinCommands::Remove { username } => {
                let friend = self.user(&username).await?;
                self.hub.unpin_friend(me.id, friend.id).await?;
                self.status(format!("Unpinned {}", friend.handle()))
            }
            PinCommands::List => {
                let mut pinned = Vec::new();
                for id in self.hub.list_pinned(me.id).await? {
                    pinned.push(self.hub.get_user(id).await?);
                }
                let markdown = Friends(pinned.clone()).to_string();
                self.renderer.emit(&markdown, &pinned)
            }
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        let me = self.actor().await?;
        match command {
            TaskCommands::Add(args) => self.add_task(&me, &args).await,
            TaskCommands::List(args) => self.list_tasks(&me, &args).await,
            TaskCommands::Done { id } => {
                let update = TaskUpdate {
                    is_done: Some(true),
                    ..TaskUpdate::default()
                };
                let task = self
                    .hub
                    .update_task(me.id, TaskId(id), &update)
                    .await
                    .context("Failed to complete task")?;
                self.renderer.emit(&task.to_string(), &task)
            }
            TaskCommands::Update(args) => {
                let id = TaskId(args.id);
                let update = TaskUpdate::from(args);
                let task = self
                    .hub
                    .update_task(me.id, id, &update)
                    .await
                    .context("Failed to update task")?;
                self.renderer.emit(&task.to_string(), &task)
            }
            TaskCommands::Delete { id } => {
                self.hub
                    .delete_task(me.id, TaskId(id))
                    .await
                    .context("Failed to delete task")?;
                self.status(format!("Deleted task {id}"))
            }
        }
    }

    async fn add_task(&self, me: &User, args: &AddTaskArgs) -> Result<()> {
        let owner = match &args.owner {
            Some(name) => self.user(name).await?,
            None => me.clone(),
        };
        let new_task = NewTask::try_from(args)?;
        let task = self
            .hub
            .create_task(owner.id, me.id, &new_task)
            .await
            .context("Failed to create task")?;

        let heading = if owner.id == me.id {
            format!("Created task {}", task.id)
        } else {
            format!("Created task {} for {}", task.id, owner.handle())
        };
        self.renderer.emit(&format!("{heading}\n\n{task}"), &task)
    }

    async fn list_tasks(&self, me: &User, args: &ListTasksArgs) -> Result<()> {
        let filter = TaskFilter::from(args);
        let tasks = match &args.of {
            Some(name) => {
                let owner = self.user(name).await?;
                let visible = self.hub.list_visible_to(owner.id, me.id).await?;
                visible.into_iter().filter(|t| filter.matches(t)).collect()
            }
            None => self.hub.list_tasks(me.id, filter).await?,
        };
        debug!("Listing {} task(s)", tasks.len());
        let markdown = Tasks(tasks.clone()).to_string();
        self.renderer.emit(&markdown, &tasks)
    }

    pub async fn show_dashboard(&self) -> Result<()> {
        let me = self.actor().await?;
        let dashboard = self.hub.load_dashboard(me.id).await?;
        let markdown = Dashboard(dashboard.clone()).to_string();
        self.renderer.emit(&markdown, &dashboard)
    }

    pub async fn audit(&self, repair: bool) -> Result<()> {
        let report = if repair {
            self.hub.repair().await?
        } else {
            self.hub.audit().await?
        };
        self.renderer.emit(&report.to_string(), &report)
    }
}
