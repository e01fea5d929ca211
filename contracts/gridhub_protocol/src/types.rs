//! # Types
//!
//! Shared data structures used across all modules of the GridHub protocol.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! Projects and tasks are internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] / [`TaskConfig`] — written once at creation; never mutated.
//! - [`ProjectState`] / [`TaskState`] — written on every lifecycle transition.
//!
//! Lifecycle transitions are the high-frequency writes here, so only the small
//! state entry is rewritten on each one. The public API exposes the
//! reconstructed [`Project`] and [`Task`] structs for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`TaskStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Created ──► Assigned ──► InProgress ──► Completed ──► Reviewed ──► Paid
//!                                              └── (zero reviews) ──►┘
//! ```
//!
//! Backward transitions and transitions out of the terminal state (`Paid`)
//! are rejected by the entry points.
//!
//! ### Ordinal roles
//!
//! [`Role`] is an ordered enumeration; "at least X" permission checks are
//! plain numeric comparisons (`role >= Role::Admin`), not per-role branches.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Permission level a member holds within a project.
///
/// Ordering is significant: each level includes all permissions of the
/// levels below it.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Role {
    /// Not a member.
    None = 0,
    /// Read-only access.
    Viewer = 1,
    /// Can be assigned tasks.
    Contributor = 2,
    /// Can create tasks, manage members, review.
    Admin = 3,
    /// Project creator; granted at creation, never revocable.
    Owner = 4,
}

/// Lifecycle status of a task. Strictly forward-moving.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum TaskStatus {
    /// Created, not yet assigned.
    Created = 0,
    /// Assigned to a contributor.
    Assigned = 1,
    /// Assignee has started work.
    InProgress = 2,
    /// Work done; awaiting reviews.
    Completed = 3,
    /// Required approvals collected.
    Reviewed = 4,
    /// Reward distributed. Terminal.
    Paid = 5,
}

/// Scheduling hint attached to a task. Not interpreted by the contract.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
    Urgent = 3,
}

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    /// Identity account that created the project; holds `Owner` forever.
    pub creator: Address,
    pub name: String,
    pub description: String,
    /// Ledger timestamp of creation.
    pub created_at: u64,
}

/// Mutable project state, updated on membership changes.
///
/// `member_count` only ever grows: membership is not revocable in this
/// design, and `active` is never flipped (deactivation is not exposed).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub active: bool,
    pub member_count: u32,
}

/// Full representation of a project, reconstructed from the split
/// `ProjectConfig` + `ProjectState` entries plus the owned task id list.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub id: u64,
    pub creator: Address,
    pub name: String,
    pub description: String,
    pub created_at: u64,
    pub active: bool,
    pub member_count: u32,
    /// Task ids owned by this project, in creation order.
    pub task_ids: Vec<u64>,
}

/// Immutable task configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskConfig {
    pub id: u64,
    /// Owning project.
    pub project_id: u64,
    pub title: String,
    pub description: String,
    /// Reward paid to the assignee on payout, in the configured reward asset.
    pub reward: i128,
    /// Ledger timestamp the task should be done by; 0 means no deadline.
    pub deadline: u64,
    pub priority: Priority,
    /// Task ids that must reach `Completed` or later before this task can
    /// start. Not validated at creation.
    pub dependencies: Vec<u64>,
    /// Approvals needed before the task becomes `Reviewed`. Zero means the
    /// task skips review entirely on completion.
    pub reviews_required: u32,
    pub created_at: u64,
}

/// Mutable task state, rewritten on every lifecycle transition.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskState {
    pub assignee: Option<Address>,
    pub status: TaskStatus,
    /// Approved reviews collected so far.
    pub approvals: u32,
    /// Subtasks created under this task (ids are 0..subtask_count).
    pub subtask_count: u32,
    /// Ledger timestamp of completion; 0 until completed.
    pub completed_at: u64,
    pub paid: bool,
}

/// Full representation of a task, reconstructed from the split
/// `TaskConfig` + `TaskState` entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Task {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub description: String,
    pub reward: i128,
    pub deadline: u64,
    pub priority: Priority,
    pub dependencies: Vec<u64>,
    pub reviews_required: u32,
    pub created_at: u64,
    pub assignee: Option<Address>,
    pub status: TaskStatus,
    pub approvals: u32,
    pub subtask_count: u32,
    pub completed_at: u64,
    pub paid: bool,
}

/// A unit of work under a task. Owned exclusively by its parent; never
/// independently assignable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subtask {
    /// Sequential id within the parent task.
    pub id: u32,
    pub task_id: u64,
    pub description: String,
    pub completed: bool,
    pub completed_by: Option<Address>,
    /// Ledger timestamp of completion; 0 until completed.
    pub completed_at: u64,
}

/// A single reviewer's verdict on a completed task.
///
/// Keyed by (task, reviewer); one review per reviewer per task. A second
/// submission is rejected, not overwritten.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Review {
    pub reviewer: Address,
    pub approved: bool,
    pub feedback: String,
    pub timestamp: u64,
}

/// Append-only record of a rated contribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    pub id: u64,
    pub project_id: u64,
    pub task_id: u64,
    pub contributor: Address,
    /// Raw rating in 0..=100 as submitted by the rating admin.
    pub rating: u32,
    /// Reputation units derived from the rating (`rating / 10`).
    pub awarded: i128,
    pub timestamp: u64,
    pub description: String,
}
