//! Command-line arguments.
//!
//! Argument structs carry the clap attributes; core types stay free of them.
//! Where an argument set maps onto a core type one to one, a `From` (or
//! `TryFrom`, when the core type validates) conversion does the mapping.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use jiff::civil::Date;
use kinlist_core::{NewTask, TaskFilter, TaskUpdate, Visibility};

/// kinlist: a shared to-do list for you and your friends
///
/// Friends can see each other's public tasks, pin each other to a
/// dashboard and, with permission, add tasks to each other's lists.
#[derive(Parser)]
#[command(version, about, name = "kl")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/kinlist/kinlist.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// Username to act as
    #[arg(long = "as", value_name = "USERNAME", global = true)]
    pub acting_as: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register and look up users
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Send, answer and list friend requests; list and remove friends
    #[command(alias = "f")]
    Friend {
        #[command(subcommand)]
        command: FriendCommands,
    },
    /// Control which friends may add tasks to your list
    #[command(alias = "p")]
    Perm {
        #[command(subcommand)]
        command: PermCommands,
    },
    /// Pin friends to your dashboard
    Pin {
        #[command(subcommand)]
        command: PinCommands,
    },
    /// Create, list and change tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show your pinned friends' public tasks
    #[command(alias = "d")]
    Dashboard,
    /// Check the friendship graph for inconsistencies
    Audit {
        /// Fix what the audit finds
        #[arg(long)]
        repair: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    #[command(alias = "r")]
    Register {
        email: String,
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Show a user; defaults to the acting user
    #[command(alias = "s")]
    Show { username: Option<String> },
}

#[derive(Subcommand)]
pub enum FriendCommands {
    /// Send a friend request
    #[command(alias = "add")]
    Request { username: String },
    /// Accept a friend request addressed to you
    Accept { request_id: u64 },
    /// Decline a friend request addressed to you
    Decline { request_id: u64 },
    /// List your friends
    #[command(aliases = ["l", "ls"])]
    List,
    /// List pending requests, incoming and outgoing
    Pending,
    /// Remove a friend along with pins and permissions between you
    #[command(alias = "rm")]
    Remove { username: String },
}

#[derive(Subcommand)]
pub enum PermCommands {
    /// Allow a friend to create tasks on your list
    Grant { username: String },
    /// Stop a friend from creating tasks on your list
    Revoke { username: String },
    /// Check whether you may create tasks on another user's list
    Check { owner: String },
}

#[derive(Subcommand)]
pub enum PinCommands {
    /// Pin a friend
    Add { username: String },
    /// Unpin a friend
    #[command(alias = "rm")]
    Remove { username: String },
    /// List pinned friends in pin order
    #[command(aliases = ["l", "ls"])]
    List,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task, on your own list or a friend's
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List tasks; other users' private tasks are never shown
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Mark a task as done
    Done { id: u64 },
    /// Change a task you own
    #[command(alias = "u")]
    Update(UpdateTaskArgs),
    /// Delete a task you own
    #[command(aliases = ["d", "rm"])]
    Delete { id: u64 },
}

#[derive(ClapArgs)]
pub struct AddTaskArgs {
    pub name: String,

    /// Put the task on this friend's list instead of your own
    #[arg(long = "for", value_name = "USERNAME")]
    pub owner: Option<String>,

    /// Due date as YYYY-MM-DD
    #[arg(long)]
    pub due: Option<Date>,

    /// Hide the task from everyone but the owner
    #[arg(long)]
    pub private: bool,
}

impl TryFrom<&AddTaskArgs> for NewTask {
    type Error = kinlist_core::SocialError;

    fn try_from(val: &AddTaskArgs) -> Result<Self, Self::Error> {
        let mut task = NewTask::new(&val.name)?.private(val.private);
        if let Some(due) = val.due {
            task = task.due(due);
        }
        Ok(task)
    }
}

#[derive(ClapArgs)]
pub struct ListTasksArgs {
    /// Whose tasks to list; defaults to your own
    #[arg(long, value_name = "USERNAME")]
    pub of: Option<String>,

    /// Only finished tasks
    #[arg(long, conflicts_with = "open")]
    pub done: bool,

    /// Only unfinished tasks
    #[arg(long)]
    pub open: bool,
}

impl From<&ListTasksArgs> for TaskFilter {
    fn from(val: &ListTasksArgs) -> Self {
        let done = match (val.done, val.open) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        TaskFilter {
            visibility: Visibility::All,
            done,
        }
    }
}

#[derive(ClapArgs)]
pub struct UpdateTaskArgs {
    pub id: u64,

    #[arg(short, long)]
    pub name: Option<String>,

    /// New due date as YYYY-MM-DD
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<Date>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    /// Mark as done (true) or not done (false)
    #[arg(long)]
    pub done: Option<bool>,

    /// Make private (true) or public (false)
    #[arg(long)]
    pub private: Option<bool>,
}

impl From<UpdateTaskArgs> for TaskUpdate {
    fn from(val: UpdateTaskArgs) -> Self {
        let due_date = if val.clear_due {
            Some(None)
        } else {
            val.due.map(Some)
        };
        TaskUpdate {
            task_name: val.name,
            due_date,
            is_done: val.done,
            is_private: val.private,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_update_args_clear_due() {
        let args = UpdateTaskArgs {
            id: 1,
            name: None,
            due: None,
            clear_due: true,
            done: Some(true),
            private: None,
        };
        let update = TaskUpdate::from(args);
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.is_done, Some(true));
    }

    #[test]
    fn test_list_args_filter() {
        let args = ListTasksArgs {
            of: None,
            done: false,
            open: true,
        };
        assert_eq!(TaskFilter::from(&args).done, Some(false));
    }
}
