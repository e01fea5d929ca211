//! # Storage
//!
//! Typed helpers over Soroban's storage tiers used by GridHub:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                 | Type      | Description                          |
//! |---------------------|-----------|--------------------------------------|
//! | `Authority`         | `Address` | Operator allowed to award reputation |
//! | `RewardToken`       | `Address` | Asset used for task payouts          |
//! | `ProjectCount`      | `u64`     | Auto-increment project ID counter    |
//! | `TaskCount`         | `u64`     | Auto-increment task ID counter       |
//! | `ContributionCount` | `u64`     | Auto-increment contribution counter  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type            | Description                    |
//! |--------------------------|-----------------|--------------------------------|
//! | `ProjConfig(id)`         | `ProjectConfig` | Immutable project configuration|
//! | `ProjState(id)`          | `ProjectState`  | Mutable project state          |
//! | `ProjTasks(id)`          | `Vec<u64>`      | Task ids owned by the project  |
//! | `Member(id, addr)`       | `Role`          | Membership role                |
//! | `TaskConfig(id)`         | `TaskConfig`    | Immutable task configuration   |
//! | `TaskState(id)`          | `TaskState`     | Mutable task state             |
//! | `Subtask(task, sub)`     | `Subtask`       | Subtask under a task           |
//! | `Review(task, reviewer)` | `Review`        | One review per reviewer        |
//! | `Contribution(id)`       | `Contribution`  | Append-only contribution record|
//! | `Reputation(addr, dom)`  | `i128`          | Per-identity, per-domain balance|
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! ## Temporary storage
//!
//! `PayoutLock` is a call-scoped reentrancy flag set around reward payouts;
//! it never survives the transaction it was written in.

use soroban_sdk::{contracttype, Address, Env, Symbol, Vec};

use crate::types::{
    Contribution, Project, ProjectConfig, ProjectState, Review, Role, Subtask, Task, TaskConfig,
    TaskState,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys live as long as the contract and are extended
/// together. Persistent-tier keys hold per-entity data with independent
/// TTLs. `PayoutLock` is the single temporary-tier key.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Operator allowed to award reputation directly (Instance).
    Authority,
    /// Asset used for task reward payouts (Instance).
    RewardToken,
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Global auto-increment counter for task IDs (Instance).
    TaskCount,
    /// Global auto-increment counter for contribution IDs (Instance).
    ContributionCount,
    /// Reentrancy flag around reward payouts (Temporary).
    PayoutLock,
    /// Immutable project configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Task ids owned by a project, in creation order (Persistent).
    ProjTasks(u64),
    /// Membership role keyed by (project, identity) (Persistent).
    Member(u64, Address),
    /// Immutable task configuration keyed by ID (Persistent).
    TaskConfig(u64),
    /// Mutable task state keyed by ID (Persistent).
    TaskState(u64),
    /// Subtask keyed by (task, subtask) (Persistent).
    Subtask(u64, u32),
    /// Review keyed by (task, reviewer) (Persistent).
    Review(u64, Address),
    /// Append-only contribution record keyed by ID (Persistent).
    Contribution(u64),
    /// Reputation balance keyed by (identity, domain) (Persistent).
    Reputation(Address, Symbol),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Store the init-time configuration. Returns `AlreadyInitialized` if the
/// contract has been initialised before.
pub fn init_config(env: &Env, authority: &Address, reward_token: &Address) -> Result<(), Error> {
    if env.storage().instance().has(&DataKey::Authority) {
        return Err(Error::AlreadyInitialized);
    }
    env.storage().instance().set(&DataKey::Authority, authority);
    env.storage()
        .instance()
        .set(&DataKey::RewardToken, reward_token);
    bump_instance(env);
    Ok(())
}

/// Retrieve the reputation authority set at init.
pub fn get_authority(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Authority)
        .ok_or(Error::NotInitialized)
}

/// Retrieve the reward asset address set at init.
pub fn get_reward_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::RewardToken)
        .ok_or(Error::NotInitialized)
}

/// Atomically read, increment, and store an instance-tier counter.
/// Returns the ID to use for the *current* entity (pre-increment value).
fn get_and_increment(env: &Env, key: &DataKey) -> u64 {
    bump_instance(env);
    let current: u64 = env.storage().instance().get(key).unwrap_or(0);
    env.storage().instance().set(key, &(current + 1));
    current
}

pub fn get_and_increment_project_id(env: &Env) -> u64 {
    get_and_increment(env, &DataKey::ProjectCount)
}

pub fn get_and_increment_task_id(env: &Env) -> u64 {
    get_and_increment(env, &DataKey::TaskCount)
}

pub fn get_and_increment_contribution_id(env: &Env) -> u64 {
    get_and_increment(env, &DataKey::ContributionCount)
}

// ── Reentrancy Lock (Temporary) ──────────────────────────────────────

/// Acquire the payout lock. Fails if a payout is already in flight in the
/// current invocation, i.e. an external call re-entered the contract.
pub fn acquire_payout_lock(env: &Env) -> Result<(), Error> {
    if env.storage().temporary().has(&DataKey::PayoutLock) {
        return Err(Error::ReentrantCall);
    }
    env.storage().temporary().set(&DataKey::PayoutLock, &true);
    Ok(())
}

/// Release the payout lock after the external transfer has returned.
pub fn release_payout_lock(env: &Env) {
    env.storage().temporary().remove(&DataKey::PayoutLock);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ── Projects ─────────────────────────────────────────────────────────

/// Save the immutable config, initial mutable state, and empty task list
/// for a new project.
pub fn save_new_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    let config_key = DataKey::ProjConfig(config.id);
    let state_key = DataKey::ProjState(config.id);
    let tasks_key = DataKey::ProjTasks(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    env.storage()
        .persistent()
        .set(&tasks_key, &Vec::<u64>::new(env));
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
    bump_persistent(env, &tasks_key);
}

/// Return true if a project with `id` has been created.
pub fn project_exists(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::ProjConfig(id))
}

/// Load only the immutable project configuration.
pub fn load_project_config(env: &Env, id: u64) -> Result<ProjectConfig, Error> {
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

/// Load only the mutable project state.
pub fn load_project_state(env: &Env, id: u64) -> Result<ProjectState, Error> {
    let key = DataKey::ProjState(id);
    let state: ProjectState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Load the full `Project` by combining config, state, and the task list.
pub fn load_project(env: &Env, id: u64) -> Result<Project, Error> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    let task_ids = load_project_tasks(env, id)?;
    Ok(Project {
        id: config.id,
        creator: config.creator,
        name: config.name,
        description: config.description,
        created_at: config.created_at,
        active: state.active,
        member_count: state.member_count,
        task_ids,
    })
}

/// Load the ordered list of task ids owned by a project.
pub fn load_project_tasks(env: &Env, id: u64) -> Result<Vec<u64>, Error> {
    let key = DataKey::ProjTasks(id);
    let tasks: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(tasks)
}

/// Append a task id to a project's task list.
pub fn push_project_task(env: &Env, id: u64, task_id: u64) -> Result<(), Error> {
    let key = DataKey::ProjTasks(id);
    let mut tasks = load_project_tasks(env, id)?;
    tasks.push_back(task_id);
    env.storage().persistent().set(&key, &tasks);
    bump_persistent(env, &key);
    Ok(())
}

// ── Membership ───────────────────────────────────────────────────────

/// Return the role `member` holds on `project_id`, defaulting to `None`.
/// The project itself is not checked here; callers gate on existence first.
pub fn get_member_role(env: &Env, project_id: u64, member: &Address) -> Role {
    let key = DataKey::Member(project_id, member.clone());
    match env.storage().persistent().get(&key) {
        Some(role) => {
            bump_persistent(env, &key);
            role
        }
        None => Role::None,
    }
}

/// Store the role `member` holds on `project_id`.
pub fn set_member_role(env: &Env, project_id: u64, member: &Address, role: Role) {
    let key = DataKey::Member(project_id, member.clone());
    env.storage().persistent().set(&key, &role);
    bump_persistent(env, &key);
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Save the immutable config and initial mutable state for a new task.
pub fn save_new_task(env: &Env, config: &TaskConfig, state: &TaskState) {
    let config_key = DataKey::TaskConfig(config.id);
    let state_key = DataKey::TaskState(config.id);
    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load only the immutable task configuration.
pub fn load_task_config(env: &Env, id: u64) -> Result<TaskConfig, Error> {
    let key = DataKey::TaskConfig(id);
    let config: TaskConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::TaskNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

/// Load only the mutable task state.
pub fn load_task_state(env: &Env, id: u64) -> Result<TaskState, Error> {
    let key = DataKey::TaskState(id);
    let state: TaskState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::TaskNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

/// Load the mutable task state without treating a miss as an error.
/// Used by the dependency scan, where a missing task reads as "not done".
pub fn try_load_task_state(env: &Env, id: u64) -> Option<TaskState> {
    let key = DataKey::TaskState(id);
    let state: Option<TaskState> = env.storage().persistent().get(&key);
    if state.is_some() {
        bump_persistent(env, &key);
    }
    state
}

/// Save only the mutable task state.
pub fn save_task_state(env: &Env, id: u64, state: &TaskState) {
    let key = DataKey::TaskState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Load the full `Task` by combining config and state.
pub fn load_task(env: &Env, id: u64) -> Result<Task, Error> {
    let config = load_task_config(env, id)?;
    let state = load_task_state(env, id)?;
    Ok(Task {
        id: config.id,
        project_id: config.project_id,
        title: config.title,
        description: config.description,
        reward: config.reward,
        deadline: config.deadline,
        priority: config.priority,
        dependencies: config.dependencies,
        reviews_required: config.reviews_required,
        created_at: config.created_at,
        assignee: state.assignee,
        status: state.status,
        approvals: state.approvals,
        subtask_count: state.subtask_count,
        completed_at: state.completed_at,
        paid: state.paid,
    })
}

// ── Subtasks ─────────────────────────────────────────────────────────

pub fn save_subtask(env: &Env, subtask: &Subtask) {
    let key = DataKey::Subtask(subtask.task_id, subtask.id);
    env.storage().persistent().set(&key, subtask);
    bump_persistent(env, &key);
}

pub fn load_subtask(env: &Env, task_id: u64, subtask_id: u32) -> Result<Subtask, Error> {
    let key = DataKey::Subtask(task_id, subtask_id);
    let subtask: Subtask = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::SubtaskNotFound)?;
    bump_persistent(env, &key);
    Ok(subtask)
}

// ── Reviews ──────────────────────────────────────────────────────────

pub fn has_review(env: &Env, task_id: u64, reviewer: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Review(task_id, reviewer.clone()))
}

pub fn save_review(env: &Env, task_id: u64, review: &Review) {
    let key = DataKey::Review(task_id, review.reviewer.clone());
    env.storage().persistent().set(&key, review);
    bump_persistent(env, &key);
}

pub fn load_review(env: &Env, task_id: u64, reviewer: &Address) -> Result<Review, Error> {
    let key = DataKey::Review(task_id, reviewer.clone());
    let review: Review = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ReviewNotFound)?;
    bump_persistent(env, &key);
    Ok(review)
}

// ── Reputation ───────────────────────────────────────────────────────

pub fn save_contribution(env: &Env, contribution: &Contribution) {
    let key = DataKey::Contribution(contribution.id);
    env.storage().persistent().set(&key, contribution);
    bump_persistent(env, &key);
}

pub fn load_contribution(env: &Env, id: u64) -> Result<Contribution, Error> {
    let key = DataKey::Contribution(id);
    let contribution: Contribution = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ContributionNotFound)?;
    bump_persistent(env, &key);
    Ok(contribution)
}

/// Return the reputation balance for `(identity, domain)`, defaulting to 0.
pub fn get_reputation(env: &Env, identity: &Address, domain: &Symbol) -> i128 {
    let key = DataKey::Reputation(identity.clone(), domain.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

/// Add `amount` to the reputation balance for `(identity, domain)`.
pub fn add_reputation(env: &Env, identity: &Address, domain: &Symbol, amount: i128) {
    let key = DataKey::Reputation(identity.clone(), domain.clone());
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    env.storage().persistent().set(&key, &(current + amount));
    bump_persistent(env, &key);
}
