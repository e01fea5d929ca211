//! # GridHub Protocol Contract
//!
//! This is the root crate of the **GridHub** coordination protocol. It
//! exposes the single Soroban contract [`GridHub`] whose entry points cover
//! the full project/task lifecycle:
//!
//! | Phase       | Entry Point(s)                                              |
//! |-------------|-------------------------------------------------------------|
//! | Bootstrap   | [`GridHub::init`], [`GridHub::deposit_rewards`]             |
//! | Projects    | `create_project`, `add_member`, `set_project_metadata`      |
//! | Tasks       | `create_task`, `assign_task`, `start_task`, `complete_task` |
//! | Review      | `review_task`, `add_subtask`, `complete_subtask`            |
//! | Reputation  | `award_reputation`, `rate_contribution`                     |
//! | Queries     | `get_project`, `get_task`, `get_member_role`, ...           |
//!
//! ## Architecture
//!
//! Identity verification is fully delegated to [`identity`]. Storage access
//! is fully delegated to [`storage`]. Event emission is fully delegated to
//! [`events`]. This file contains **only** the public entry points and the
//! guard sequencing around each state transition.
//!
//! Every acting address must be an identity account (see [`identity`]), and
//! every mutation is gated by a per-project ordinal role check before any
//! write happens. Failures abort the whole invocation; the ledger never
//! observes a partial write. The only exceptions are the best-effort
//! notification and metadata surfaces, whose failures are swallowed.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, token, Address, Bytes, Env, String, Symbol, Vec,
    symbol_short,
};

pub mod events;
pub mod identity;
mod storage;
mod types;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_tasks;

use types::{ProjectConfig, ProjectState, TaskConfig, TaskState};
pub use types::{Contribution, Priority, Project, Review, Role, Subtask, Task, TaskStatus};

/// Reputation domain credited by [`GridHub::rate_contribution`].
const DEFAULT_DOMAIN: Symbol = symbol_short!("general");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAnIdentity = 3,
    NotAuthorized = 4,
    NotAssignee = 5,
    InvalidRole = 6,
    ProjectNotFound = 7,
    TaskNotFound = 8,
    SubtaskNotFound = 9,
    ReviewNotFound = 10,
    ContributionNotFound = 11,
    InvalidStatus = 12,
    DependenciesNotMet = 13,
    SubtasksIncomplete = 14,
    AlreadyReviewed = 15,
    SubtaskAlreadyDone = 16,
    InvalidAmount = 17,
    InvalidDeadline = 18,
    RatingOutOfRange = 19,
    ReentrantCall = 20,
}

#[contract]
pub struct GridHub;

#[contractimpl]
impl GridHub {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls fail with `Error::AlreadyInitialized`.
    ///
    /// - `authority` is the operator allowed to award reputation directly.
    /// - `reward_token` is the asset used for task payouts; passing the
    ///   native asset's contract address selects native-value payouts.
    pub fn init(env: Env, authority: Address, reward_token: Address) -> Result<(), Error> {
        authority.require_auth();
        storage::init_config(&env, &authority, &reward_token)
    }

    /// Top up the contract's payout escrow.
    ///
    /// Anyone may fund the escrow; rewards are paid out of the contract's
    /// own balance of the configured reward asset.
    pub fn deposit_rewards(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let reward_token = storage::get_reward_token(&env)?;
        let client = token::Client::new(&env, &reward_token);
        client.transfer(&from, &env.current_contract_address(), &amount);
        events::emit_rewards_deposited(&env, from, amount);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Project registry
    // ─────────────────────────────────────────────────────────

    /// Create a new project. Returns the new project id.
    ///
    /// `creator` must pass the identity gate and is granted `Owner` on the
    /// new project. Ownership is never revocable.
    pub fn create_project(
        env: Env,
        creator: Address,
        name: String,
        description: String,
    ) -> Result<u64, Error> {
        creator.require_auth();
        identity::require_identity(&env, &creator)?;

        let id = storage::get_and_increment_project_id(&env);
        let config = ProjectConfig {
            id,
            creator: creator.clone(),
            name,
            description,
            created_at: env.ledger().timestamp(),
        };
        let state = ProjectState {
            active: true,
            member_count: 1,
        };
        storage::save_new_project(&env, &config, &state);
        storage::set_member_role(&env, id, &creator, Role::Owner);

        events::emit_project_created(&env, id, creator);
        Ok(id)
    }

    /// Add `member` to a project with `role`, or update an existing
    /// member's role.
    ///
    /// - `caller` must hold `Admin` or higher on the project.
    /// - `member` must pass the identity gate.
    /// - `Role::None` is rejected; membership cannot be revoked.
    ///
    /// A brand-new member increments the member count by exactly one; a
    /// role update leaves the count untouched. The member receives a
    /// best-effort `PROJECT_INVITE` notification.
    pub fn add_member(
        env: Env,
        caller: Address,
        project_id: u64,
        member: Address,
        role: Role,
    ) -> Result<(), Error> {
        caller.require_auth();
        Self::require_role(&env, project_id, &caller, Role::Admin)?;
        identity::require_identity(&env, &member)?;
        if role == Role::None {
            return Err(Error::InvalidRole);
        }

        let previous = storage::get_member_role(&env, project_id, &member);
        if previous == Role::None {
            let mut state = storage::load_project_state(&env, project_id)?;
            state.member_count += 1;
            storage::save_project_state(&env, project_id, &state);
        }
        storage::set_member_role(&env, project_id, &member, role);

        identity::notify(
            &env,
            &member,
            identity::NOTIFY_PROJECT_INVITE,
            identity::id_context(&env, project_id),
        );
        events::emit_member_added(&env, project_id, member, role);
        Ok(())
    }

    /// Return the role `member` holds on `project_id`.
    ///
    /// Unknown members read as `Role::None`; an unknown project fails with
    /// `ProjectNotFound`.
    pub fn get_member_role(env: Env, project_id: u64, member: Address) -> Result<Role, Error> {
        if !storage::project_exists(&env, project_id) {
            return Err(Error::ProjectNotFound);
        }
        Ok(storage::get_member_role(&env, project_id, &member))
    }

    /// Retrieve a project by its id.
    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        storage::load_project(&env, project_id)
    }

    /// Return the ids of all tasks owned by a project, in creation order.
    pub fn get_project_tasks(env: Env, project_id: u64) -> Result<Vec<u64>, Error> {
        storage::load_project_tasks(&env, project_id)
    }

    /// Attach a key/value metadata entry to a project.
    ///
    /// The value is written into the project creator's own extensible data
    /// store under a `gridhub:project:<id>:` namespaced key. The write is
    /// best-effort and silently no-ops if the account rejects it.
    pub fn set_project_metadata(
        env: Env,
        caller: Address,
        project_id: u64,
        key: Bytes,
        value: Bytes,
    ) -> Result<(), Error> {
        caller.require_auth();
        Self::require_role(&env, project_id, &caller, Role::Admin)?;
        let config = storage::load_project_config(&env, project_id)?;
        identity::set_project_metadata(&env, &config.creator, project_id, &key, &value);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Task lifecycle
    // ─────────────────────────────────────────────────────────

    /// Create a task under a project. Returns the new task id.
    ///
    /// - `caller` must hold `Admin` or higher on the project.
    /// - `reward` must be non-negative; a non-zero `deadline` must be in
    ///   the future (`deadline == 0` means no deadline).
    /// - `dependencies` are task ids that must be completed before this
    ///   task can start. They are not validated at creation; a dependency
    ///   that never completes leaves this task permanently unstartable.
    /// - `reviews_required == 0` makes the task skip review on completion.
    pub fn create_task(
        env: Env,
        caller: Address,
        project_id: u64,
        title: String,
        description: String,
        reward: i128,
        deadline: u64,
        priority: Priority,
        dependencies: Vec<u64>,
        reviews_required: u32,
    ) -> Result<u64, Error> {
        caller.require_auth();
        Self::require_role(&env, project_id, &caller, Role::Admin)?;
        if reward < 0 {
            return Err(Error::InvalidAmount);
        }
        if deadline != 0 && deadline <= env.ledger().timestamp() {
            return Err(Error::InvalidDeadline);
        }

        let id = storage::get_and_increment_task_id(&env);
        let config = TaskConfig {
            id,
            project_id,
            title,
            description,
            reward,
            deadline,
            priority,
            dependencies,
            reviews_required,
            created_at: env.ledger().timestamp(),
        };
        let state = TaskState {
            assignee: None,
            status: TaskStatus::Created,
            approvals: 0,
            subtask_count: 0,
            completed_at: 0,
            paid: false,
        };
        storage::save_new_task(&env, &config, &state);
        storage::push_project_task(&env, project_id, id)?;

        events::emit_task_created(&env, id, project_id, caller);
        Ok(id)
    }

    /// Assign a `Created` task to a contributor.
    ///
    /// - `caller` must hold `Admin` or higher on the owning project.
    /// - `assignee` must pass the identity gate and hold `Contributor` or
    ///   higher on the project.
    ///
    /// The assignee receives a best-effort `TASK_ASSIGNED` notification.
    pub fn assign_task(
        env: Env,
        caller: Address,
        task_id: u64,
        assignee: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_task_config(&env, task_id)?;
        let mut state = storage::load_task_state(&env, task_id)?;
        Self::require_role(&env, config.project_id, &caller, Role::Admin)?;
        if state.status != TaskStatus::Created {
            return Err(Error::InvalidStatus);
        }
        identity::require_identity(&env, &assignee)?;
        Self::require_role(&env, config.project_id, &assignee, Role::Contributor)?;

        state.assignee = Some(assignee.clone());
        state.status = TaskStatus::Assigned;
        storage::save_task_state(&env, task_id, &state);

        identity::notify(
            &env,
            &assignee,
            identity::NOTIFY_TASK_ASSIGNED,
            identity::id_context(&env, task_id),
        );
        events::emit_task_assigned(&env, task_id, assignee);
        Ok(())
    }

    /// Start an `Assigned` task.
    ///
    /// - `caller` must be the assignee.
    /// - Every dependency must be in `Completed`, `Reviewed`, or `Paid`.
    pub fn start_task(env: Env, caller: Address, task_id: u64) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_task_config(&env, task_id)?;
        let mut state = storage::load_task_state(&env, task_id)?;
        Self::require_assignee(&state, &caller)?;
        if state.status != TaskStatus::Assigned {
            return Err(Error::InvalidStatus);
        }
        Self::require_dependencies_met(&env, &config)?;

        state.status = TaskStatus::InProgress;
        storage::save_task_state(&env, task_id, &state);

        events::emit_task_started(&env, task_id, caller);
        Ok(())
    }

    /// Complete an `InProgress` task.
    ///
    /// - `caller` must be the assignee.
    /// - Dependencies are re-checked and every subtask must be completed.
    ///
    /// When the task requires zero reviews it transitions straight to
    /// `Reviewed` and the reward is distributed in the same call.
    pub fn complete_task(env: Env, caller: Address, task_id: u64) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_task_config(&env, task_id)?;
        let mut state = storage::load_task_state(&env, task_id)?;
        Self::require_assignee(&state, &caller)?;
        if state.status != TaskStatus::InProgress {
            return Err(Error::InvalidStatus);
        }
        Self::require_dependencies_met(&env, &config)?;
        for subtask_id in 0..state.subtask_count {
            let subtask = storage::load_subtask(&env, task_id, subtask_id)?;
            if !subtask.completed {
                return Err(Error::SubtasksIncomplete);
            }
        }

        state.status = TaskStatus::Completed;
        state.completed_at = env.ledger().timestamp();
        storage::save_task_state(&env, task_id, &state);
        events::emit_task_completed(&env, task_id, caller);

        if config.reviews_required == 0 {
            state.status = TaskStatus::Reviewed;
            storage::save_task_state(&env, task_id, &state);
            events::emit_task_reviewed(&env, task_id, state.approvals);
            Self::distribute_reward(&env, &config, &mut state)?;
        }
        Ok(())
    }

    /// Review a `Completed` task.
    ///
    /// - `caller` must hold `Admin` or higher on the owning project.
    /// - One review per reviewer per task; a second submission fails with
    ///   `AlreadyReviewed` and does not touch the approval count.
    ///
    /// When the approved-review count reaches the required threshold the
    /// task transitions to `Reviewed` and the reward is distributed,
    /// exactly once per task.
    pub fn review_task(
        env: Env,
        caller: Address,
        task_id: u64,
        approved: bool,
        feedback: String,
    ) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_task_config(&env, task_id)?;
        let mut state = storage::load_task_state(&env, task_id)?;
        Self::require_role(&env, config.project_id, &caller, Role::Admin)?;
        if state.status != TaskStatus::Completed {
            return Err(Error::InvalidStatus);
        }
        if storage::has_review(&env, task_id, &caller) {
            return Err(Error::AlreadyReviewed);
        }

        let review = Review {
            reviewer: caller,
            approved,
            feedback,
            timestamp: env.ledger().timestamp(),
        };
        storage::save_review(&env, task_id, &review);

        if approved {
            state.approvals += 1;
            storage::save_task_state(&env, task_id, &state);
            if state.approvals >= config.reviews_required {
                state.status = TaskStatus::Reviewed;
                storage::save_task_state(&env, task_id, &state);
                events::emit_task_reviewed(&env, task_id, state.approvals);
                Self::distribute_reward(&env, &config, &mut state)?;
            }
        }
        Ok(())
    }

    /// Add a subtask under a task. Returns the new subtask id.
    ///
    /// - `caller` must hold `Admin` or higher on the owning project.
    /// - Subtasks can only be added while the task is not yet completed.
    pub fn add_subtask(
        env: Env,
        caller: Address,
        task_id: u64,
        description: String,
    ) -> Result<u32, Error> {
        caller.require_auth();
        let config = storage::load_task_config(&env, task_id)?;
        let mut state = storage::load_task_state(&env, task_id)?;
        Self::require_role(&env, config.project_id, &caller, Role::Admin)?;
        if state.status >= TaskStatus::Completed {
            return Err(Error::InvalidStatus);
        }

        let id = state.subtask_count;
        state.subtask_count += 1;
        storage::save_task_state(&env, task_id, &state);
        storage::save_subtask(
            &env,
            &Subtask {
                id,
                task_id,
                description,
                completed: false,
                completed_by: None,
                completed_at: 0,
            },
        );

        events::emit_subtask_added(&env, task_id, id);
        Ok(id)
    }

    /// Mark a subtask as completed.
    ///
    /// - `caller` must be the task's assignee or hold `Admin` or higher.
    /// - A subtask can be completed once; there is no ordering constraint
    ///   between subtasks.
    pub fn complete_subtask(
        env: Env,
        caller: Address,
        task_id: u64,
        subtask_id: u32,
    ) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_task_config(&env, task_id)?;
        let state = storage::load_task_state(&env, task_id)?;
        let is_assignee = state.assignee.as_ref() == Some(&caller);
        if !is_assignee {
            Self::require_role(&env, config.project_id, &caller, Role::Admin)?;
        }

        let mut subtask = storage::load_subtask(&env, task_id, subtask_id)?;
        if subtask.completed {
            return Err(Error::SubtaskAlreadyDone);
        }
        subtask.completed = true;
        subtask.completed_by = Some(caller.clone());
        subtask.completed_at = env.ledger().timestamp();
        storage::save_subtask(&env, &subtask);

        events::emit_subtask_completed(&env, task_id, subtask_id, caller);
        Ok(())
    }

    /// Retrieve a task by its id.
    pub fn get_task(env: Env, task_id: u64) -> Result<Task, Error> {
        storage::load_task(&env, task_id)
    }

    /// Retrieve a subtask by its (task, subtask) key.
    pub fn get_subtask(env: Env, task_id: u64, subtask_id: u32) -> Result<Subtask, Error> {
        storage::load_subtask(&env, task_id, subtask_id)
    }

    /// Retrieve a reviewer's verdict on a task.
    pub fn get_review(env: Env, task_id: u64, reviewer: Address) -> Result<Review, Error> {
        storage::load_review(&env, task_id, &reviewer)
    }

    // ─────────────────────────────────────────────────────────
    // Reputation ledger
    // ─────────────────────────────────────────────────────────

    /// Credit `amount` reputation units to `(identity, domain)`.
    ///
    /// Restricted to the authority configured at init.
    pub fn award_reputation(
        env: Env,
        caller: Address,
        identity: Address,
        domain: Symbol,
        amount: i128,
        project_id: u64,
        reason: String,
    ) -> Result<(), Error> {
        caller.require_auth();
        if caller != storage::get_authority(&env)? {
            return Err(Error::NotAuthorized);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if !storage::project_exists(&env, project_id) {
            return Err(Error::ProjectNotFound);
        }

        storage::add_reputation(&env, &identity, &domain, amount);
        events::emit_reputation_awarded(&env, identity, domain, amount, project_id, reason);
        Ok(())
    }

    /// Rate a contributor's work on a completed task. Returns the new
    /// contribution id.
    ///
    /// - `caller` must hold `Admin` or higher on the project.
    /// - `rating` is 0..=100; the derived award is `rating / 10` units
    ///   credited to the contributor's `general` domain.
    ///
    /// The record is append-only; the task is checked to exist and be
    /// completed at call time, but is not re-verified against later
    /// mutation.
    pub fn rate_contribution(
        env: Env,
        caller: Address,
        project_id: u64,
        task_id: u64,
        contributor: Address,
        rating: u32,
        description: String,
    ) -> Result<u64, Error> {
        caller.require_auth();
        Self::require_role(&env, project_id, &caller, Role::Admin)?;
        if rating > 100 {
            return Err(Error::RatingOutOfRange);
        }
        let task_config = storage::load_task_config(&env, task_id)?;
        if task_config.project_id != project_id {
            return Err(Error::TaskNotFound);
        }
        let task_state = storage::load_task_state(&env, task_id)?;
        if task_state.status < TaskStatus::Completed {
            return Err(Error::InvalidStatus);
        }

        let awarded = (rating / 10) as i128;
        let id = storage::get_and_increment_contribution_id(&env);
        let contribution = Contribution {
            id,
            project_id,
            task_id,
            contributor: contributor.clone(),
            rating,
            awarded,
            timestamp: env.ledger().timestamp(),
            description: description.clone(),
        };
        storage::save_contribution(&env, &contribution);
        events::emit_contribution_recorded(&env, id, project_id, task_id, contributor.clone(), rating);

        if awarded > 0 {
            storage::add_reputation(&env, &contributor, &DEFAULT_DOMAIN, awarded);
            events::emit_reputation_awarded(
                &env,
                contributor,
                DEFAULT_DOMAIN,
                awarded,
                project_id,
                description,
            );
        }
        Ok(id)
    }

    /// Return the reputation balance of `(identity, domain)`, 0 if none.
    pub fn get_reputation(env: Env, identity: Address, domain: Symbol) -> i128 {
        storage::get_reputation(&env, &identity, &domain)
    }

    /// Retrieve a contribution record by its id.
    pub fn get_contribution(env: Env, id: u64) -> Result<Contribution, Error> {
        storage::load_contribution(&env, id)
    }

    // ─────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────

    /// Gate `who` against the project's membership: the project must exist
    /// and `who` must hold at least `min`.
    fn require_role(env: &Env, project_id: u64, who: &Address, min: Role) -> Result<(), Error> {
        if !storage::project_exists(env, project_id) {
            return Err(Error::ProjectNotFound);
        }
        if storage::get_member_role(env, project_id, who) >= min {
            Ok(())
        } else {
            Err(Error::NotAuthorized)
        }
    }

    /// Reject unless `who` is the task's current assignee.
    fn require_assignee(state: &TaskState, who: &Address) -> Result<(), Error> {
        if state.assignee.as_ref() == Some(who) {
            Ok(())
        } else {
            Err(Error::NotAssignee)
        }
    }

    /// Linear scan over the task's dependencies. A dependency counts as met
    /// only in `Completed`, `Reviewed`, or `Paid`; a dependency id that was
    /// never created reads as unmet, matching the unvalidated-at-creation
    /// semantics.
    fn require_dependencies_met(env: &Env, config: &TaskConfig) -> Result<(), Error> {
        for dep_id in config.dependencies.iter() {
            let met = match storage::try_load_task_state(env, dep_id) {
                Some(dep) => dep.status >= TaskStatus::Completed,
                None => false,
            };
            if !met {
                return Err(Error::DependenciesNotMet);
            }
        }
        Ok(())
    }

    /// Transfer the task's reward to the assignee and mark the task `Paid`.
    ///
    /// The external transfer is bracketed by the payout lock: a call that
    /// re-enters the contract while the transfer is in flight fails with
    /// `ReentrantCall` instead of observing half-finished state.
    fn distribute_reward(env: &Env, config: &TaskConfig, state: &mut TaskState) -> Result<(), Error> {
        let assignee = state.assignee.clone().ok_or(Error::NotAssignee)?;

        storage::acquire_payout_lock(env)?;
        if config.reward > 0 {
            let reward_token = storage::get_reward_token(env)?;
            let client = token::Client::new(env, &reward_token);
            client.transfer(&env.current_contract_address(), &assignee, &config.reward);
        }
        storage::release_payout_lock(env);

        state.paid = true;
        state.status = TaskStatus::Paid;
        storage::save_task_state(env, config.id, state);

        events::emit_task_rewarded(env, config.id, assignee, config.reward);
        Ok(())
    }
}
