//! # Events
//!
//! Canonical events emitted by the GridHub contract. Every state transition
//! publishes a `(topic_symbol, id)` topic pair with a typed payload struct;
//! the event stream is the protocol's only durable log for off-chain
//! observers.
//!
//! | Topic       | Payload                 | Emitted by                    |
//! |-------------|-------------------------|-------------------------------|
//! | `proj_new`  | [`ProjectCreated`]      | `create_project`              |
//! | `member`    | [`MemberAdded`]         | `add_member`                  |
//! | `funded`    | [`RewardsDeposited`]    | `deposit_rewards`             |
//! | `task_new`  | [`TaskCreated`]         | `create_task`                 |
//! | `assigned`  | [`TaskAssigned`]        | `assign_task`                 |
//! | `started`   | [`TaskStarted`]         | `start_task`                  |
//! | `completed` | [`TaskCompleted`]       | `complete_task`               |
//! | `reviewed`  | [`TaskReviewed`]        | `review_task`/`complete_task` |
//! | `rewarded`  | [`TaskRewarded`]        | reward distribution           |
//! | `sub_new`   | [`SubtaskAdded`]        | `add_subtask`                 |
//! | `subtask`   | [`SubtaskCompleted`]    | `complete_subtask`            |
//! | `contrib`   | [`ContributionRecorded`]| `rate_contribution`           |
//! | `rep_award` | [`ReputationAwarded`]   | reputation credits            |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

use crate::types::Role;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub creator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemberAdded {
    pub project_id: u64,
    pub member: Address,
    pub role: Role,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDeposited {
    pub from: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskCreated {
    pub task_id: u64,
    pub project_id: u64,
    pub creator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskAssigned {
    pub task_id: u64,
    pub assignee: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskStarted {
    pub task_id: u64,
    pub assignee: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskCompleted {
    pub task_id: u64,
    pub assignee: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskReviewed {
    pub task_id: u64,
    pub approvals: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskRewarded {
    pub task_id: u64,
    pub assignee: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubtaskAdded {
    pub task_id: u64,
    pub subtask_id: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubtaskCompleted {
    pub task_id: u64,
    pub subtask_id: u32,
    pub completed_by: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionRecorded {
    pub contribution_id: u64,
    pub project_id: u64,
    pub task_id: u64,
    pub contributor: Address,
    pub rating: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReputationAwarded {
    pub identity: Address,
    pub domain: Symbol,
    pub amount: i128,
    pub project_id: u64,
    pub reason: String,
}

pub fn emit_project_created(env: &Env, project_id: u64, creator: Address) {
    env.events().publish(
        (symbol_short!("proj_new"), project_id),
        ProjectCreated {
            project_id,
            creator,
        },
    );
}

pub fn emit_member_added(env: &Env, project_id: u64, member: Address, role: Role) {
    env.events().publish(
        (symbol_short!("member"), project_id),
        MemberAdded {
            project_id,
            member,
            role,
        },
    );
}

pub fn emit_rewards_deposited(env: &Env, from: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("funded"),),
        RewardsDeposited { from, amount },
    );
}

pub fn emit_task_created(env: &Env, task_id: u64, project_id: u64, creator: Address) {
    env.events().publish(
        (symbol_short!("task_new"), task_id),
        TaskCreated {
            task_id,
            project_id,
            creator,
        },
    );
}

pub fn emit_task_assigned(env: &Env, task_id: u64, assignee: Address) {
    env.events().publish(
        (symbol_short!("assigned"), task_id),
        TaskAssigned { task_id, assignee },
    );
}

pub fn emit_task_started(env: &Env, task_id: u64, assignee: Address) {
    env.events().publish(
        (symbol_short!("started"), task_id),
        TaskStarted { task_id, assignee },
    );
}

pub fn emit_task_completed(env: &Env, task_id: u64, assignee: Address) {
    env.events().publish(
        (symbol_short!("completed"), task_id),
        TaskCompleted { task_id, assignee },
    );
}

pub fn emit_task_reviewed(env: &Env, task_id: u64, approvals: u32) {
    env.events().publish(
        (symbol_short!("reviewed"), task_id),
        TaskReviewed { task_id, approvals },
    );
}

pub fn emit_task_rewarded(env: &Env, task_id: u64, assignee: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("rewarded"), task_id),
        TaskRewarded {
            task_id,
            assignee,
            amount,
        },
    );
}

pub fn emit_subtask_added(env: &Env, task_id: u64, subtask_id: u32) {
    env.events().publish(
        (symbol_short!("sub_new"), task_id),
        SubtaskAdded {
            task_id,
            subtask_id,
        },
    );
}

pub fn emit_subtask_completed(env: &Env, task_id: u64, subtask_id: u32, completed_by: Address) {
    env.events().publish(
        (symbol_short!("subtask"), task_id),
        SubtaskCompleted {
            task_id,
            subtask_id,
            completed_by,
        },
    );
}

pub fn emit_contribution_recorded(
    env: &Env,
    contribution_id: u64,
    project_id: u64,
    task_id: u64,
    contributor: Address,
    rating: u32,
) {
    env.events().publish(
        (symbol_short!("contrib"), contribution_id),
        ContributionRecorded {
            contribution_id,
            project_id,
            task_id,
            contributor,
            rating,
        },
    );
}

pub fn emit_reputation_awarded(
    env: &Env,
    identity: Address,
    domain: Symbol,
    amount: i128,
    project_id: u64,
    reason: String,
) {
    env.events().publish(
        (symbol_short!("rep_award"), project_id),
        ReputationAwarded {
            identity,
            domain,
            amount,
            project_id,
            reason,
        },
    );
}
