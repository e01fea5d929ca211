extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, vec, Address, Bytes, Env, String, Symbol, Vec,
};

use crate::invariants;
use crate::testutils::{
    register_identity, register_plain_account, register_reentering_token, IdentityAccountClient,
    ReenteringTokenClient,
};
use crate::{Error, GridHub, GridHubClient, Priority, Role, TaskStatus};

fn setup() -> (Env, GridHubClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(GridHub, ());
    let client = GridHubClient::new(&env, &contract_id);
    let authority = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let reward_token = sac.address();
    client.init(&authority, &reward_token);

    // Pre-fund the payout escrow so reward transfers can succeed.
    let funder = Address::generate(&env);
    token::StellarAssetClient::new(&env, &reward_token).mint(&funder, &1_000_000i128);
    client.deposit_rewards(&funder, &1_000_000i128);

    (env, client, reward_token)
}

fn txt(env: &Env, s: &str) -> String {
    String::from_str(env, s)
}

/// Create a project with an admin (the creator) and one contributor.
fn setup_project(env: &Env, client: &GridHubClient) -> (Address, Address, u64) {
    let creator = register_identity(env);
    let contributor = register_identity(env);
    let project_id = client.create_project(&creator, &txt(env, "Grid"), &txt(env, "demo"));
    client.add_member(&creator, &project_id, &contributor, &Role::Contributor);
    (creator, contributor, project_id)
}

fn no_deps(env: &Env) -> Vec<u64> {
    vec![env]
}

fn create_simple_task(
    env: &Env,
    client: &GridHubClient,
    creator: &Address,
    project_id: u64,
    reviews_required: u32,
) -> u64 {
    client.create_task(
        creator,
        &project_id,
        &txt(env, "task"),
        &txt(env, "do the thing"),
        &100i128,
        &0u64,
        &Priority::Medium,
        &no_deps(env),
        &reviews_required,
    )
}

#[test]
fn test_zero_review_task_pays_out_on_completion() {
    let (env, client, reward_token) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);

    let task_id = create_simple_task(&env, &client, &creator, project_id, 0);
    client.assign_task(&creator, &task_id, &contributor);
    client.start_task(&contributor, &task_id);
    client.complete_task(&contributor, &task_id);

    let task = client.get_task(&task_id);
    assert_eq!(task.status, TaskStatus::Paid);
    assert!(task.paid);
    invariants::assert_paid_consistency(&task);

    // The reward landed with the assignee, with no manual review step.
    let balances = token::Client::new(&env, &reward_token);
    assert_eq!(balances.balance(&contributor), 100);
}

#[test]
fn test_status_advances_forward_through_lifecycle() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);

    let mut last = client.get_task(&task_id).status;
    assert_eq!(last, TaskStatus::Created);

    client.assign_task(&creator, &task_id, &contributor);
    let status = client.get_task(&task_id).status;
    invariants::assert_valid_status_transition(&last, &status);
    last = status;

    client.start_task(&contributor, &task_id);
    let status = client.get_task(&task_id).status;
    invariants::assert_valid_status_transition(&last, &status);
    last = status;

    client.complete_task(&contributor, &task_id);
    let status = client.get_task(&task_id).status;
    invariants::assert_valid_status_transition(&last, &status);
    assert_eq!(status, TaskStatus::Completed);
}

#[test]
fn test_create_task_requires_admin() {
    let (env, client, _) = setup();
    let (_, contributor, project_id) = setup_project(&env, &client);

    let result = client.try_create_task(
        &contributor,
        &project_id,
        &txt(&env, "task"),
        &txt(&env, ""),
        &0i128,
        &0u64,
        &Priority::Low,
        &no_deps(&env),
        &1u32,
    );
    assert_eq!(result, Err(Ok(Error::NotAuthorized)));
}

#[test]
fn test_create_task_rejects_negative_reward() {
    let (env, client, _) = setup();
    let (creator, _, project_id) = setup_project(&env, &client);

    let result = client.try_create_task(
        &creator,
        &project_id,
        &txt(&env, "task"),
        &txt(&env, ""),
        &-1i128,
        &0u64,
        &Priority::Low,
        &no_deps(&env),
        &1u32,
    );
    assert_eq!(result, Err(Ok(Error::InvalidAmount)));
}

#[test]
fn test_create_task_unknown_project() {
    let (env, client, _) = setup();
    let creator = register_identity(&env);

    let result = client.try_create_task(
        &creator,
        &42u64,
        &txt(&env, "task"),
        &txt(&env, ""),
        &0i128,
        &0u64,
        &Priority::Low,
        &no_deps(&env),
        &1u32,
    );
    assert_eq!(result, Err(Ok(Error::ProjectNotFound)));
}

#[test]
fn test_create_task_rejects_past_deadline() {
    let (env, client, _) = setup();
    let (creator, _, project_id) = setup_project(&env, &client);

    env.ledger().with_mut(|l| l.timestamp = 100_000);

    let result = client.try_create_task(
        &creator,
        &project_id,
        &txt(&env, "task"),
        &txt(&env, ""),
        &0i128,
        &50_000u64,
        &Priority::Low,
        &no_deps(&env),
        &1u32,
    );
    assert_eq!(result, Err(Ok(Error::InvalidDeadline)));

    // A deadline of zero means "no deadline" and is accepted.
    create_simple_task(&env, &client, &creator, project_id, 1);
}

#[test]
fn test_task_ids_sequential_and_tracked_by_project() {
    let (env, client, _) = setup();
    let (creator, _, project_id) = setup_project(&env, &client);

    let t0 = create_simple_task(&env, &client, &creator, project_id, 1);
    let t1 = create_simple_task(&env, &client, &creator, project_id, 1);
    let t2 = create_simple_task(&env, &client, &creator, project_id, 1);
    invariants::assert_sequential_ids(&[t0, t1, t2]);

    let tasks = client.get_project_tasks(&project_id);
    assert_eq!(tasks, vec![&env, t0, t1, t2]);
}

#[test]
fn test_assign_requires_created_status() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);

    client.assign_task(&creator, &task_id, &contributor);
    assert_eq!(
        client.try_assign_task(&creator, &task_id, &contributor),
        Err(Ok(Error::InvalidStatus))
    );
}

#[test]
fn test_assign_requires_contributor_role() {
    let (env, client, _) = setup();
    let (creator, _, project_id) = setup_project(&env, &client);
    let outsider = register_identity(&env);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);

    assert_eq!(
        client.try_assign_task(&creator, &task_id, &outsider),
        Err(Ok(Error::NotAuthorized))
    );
}

#[test]
fn test_assign_rejects_non_identity_assignee() {
    let (env, client, _) = setup();
    let (creator, _, project_id) = setup_project(&env, &client);
    let not_an_identity = register_plain_account(&env);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);

    assert_eq!(
        client.try_assign_task(&creator, &task_id, &not_an_identity),
        Err(Ok(Error::NotAnIdentity))
    );
}

#[test]
fn test_assignee_receives_notification() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);

    client.assign_task(&creator, &task_id, &contributor);

    let account = IdentityAccountClient::new(&env, &contributor);
    let inbox = account.notifications();
    // First entry is the PROJECT_INVITE from membership.
    assert_eq!(inbox.len(), 2);
    let (kind, context) = inbox.get(1).unwrap();
    assert_eq!(kind, Symbol::new(&env, "TASK_ASSIGNED"));
    assert_eq!(context, Bytes::from_slice(&env, &task_id.to_be_bytes()));
}

#[test]
fn test_start_requires_assignee() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);
    client.assign_task(&creator, &task_id, &contributor);

    assert_eq!(
        client.try_start_task(&creator, &task_id),
        Err(Ok(Error::NotAssignee))
    );
}

#[test]
fn test_start_blocked_by_unfinished_dependency() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);

    // t1 stays in Created; t2 depends on it.
    let t1 = create_simple_task(&env, &client, &creator, project_id, 1);
    let t2 = client.create_task(
        &creator,
        &project_id,
        &txt(&env, "dependent"),
        &txt(&env, ""),
        &0i128,
        &0u64,
        &Priority::High,
        &vec![&env, t1],
        &0u32,
    );

    client.assign_task(&creator, &t2, &contributor);
    assert_eq!(
        client.try_start_task(&contributor, &t2),
        Err(Ok(Error::DependenciesNotMet))
    );
}

#[test]
fn test_start_after_dependency_completes() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);

    let t1 = create_simple_task(&env, &client, &creator, project_id, 0);
    let t2 = client.create_task(
        &creator,
        &project_id,
        &txt(&env, "dependent"),
        &txt(&env, ""),
        &0i128,
        &0u64,
        &Priority::High,
        &vec![&env, t1],
        &0u32,
    );
    client.assign_task(&creator, &t2, &contributor);

    // Drive t1 through its zero-review lifecycle, then t2 may start.
    client.assign_task(&creator, &t1, &contributor);
    client.start_task(&contributor, &t1);
    client.complete_task(&contributor, &t1);

    client.start_task(&contributor, &t2);
    assert_eq!(client.get_task(&t2).status, TaskStatus::InProgress);
}

#[test]
fn test_dependency_on_nonexistent_task_never_satisfied() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);

    // Dependency ids are not validated at creation; an id that was never
    // created leaves the task permanently unstartable.
    let task_id = client.create_task(
        &creator,
        &project_id,
        &txt(&env, "stuck"),
        &txt(&env, ""),
        &0i128,
        &0u64,
        &Priority::Urgent,
        &vec![&env, 9_999u64],
        &0u32,
    );
    client.assign_task(&creator, &task_id, &contributor);

    assert_eq!(
        client.try_start_task(&contributor, &task_id),
        Err(Ok(Error::DependenciesNotMet))
    );
}

#[test]
fn test_complete_requires_in_progress() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);
    client.assign_task(&creator, &task_id, &contributor);

    assert_eq!(
        client.try_complete_task(&contributor, &task_id),
        Err(Ok(Error::InvalidStatus))
    );
}

#[test]
fn test_complete_blocked_by_incomplete_subtask() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 0);
    client.assign_task(&creator, &task_id, &contributor);

    let sub_a = client.add_subtask(&creator, &task_id, &txt(&env, "part a"));
    let sub_b = client.add_subtask(&creator, &task_id, &txt(&env, "part b"));
    client.start_task(&contributor, &task_id);

    assert_eq!(
        client.try_complete_task(&contributor, &task_id),
        Err(Ok(Error::SubtasksIncomplete))
    );

    client.complete_subtask(&contributor, &task_id, &sub_a);
    assert_eq!(
        client.try_complete_task(&contributor, &task_id),
        Err(Ok(Error::SubtasksIncomplete))
    );

    client.complete_subtask(&contributor, &task_id, &sub_b);
    client.complete_task(&contributor, &task_id);
    assert_eq!(client.get_task(&task_id).status, TaskStatus::Paid);
}

#[test]
fn test_subtask_completion_records_completer() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);
    client.assign_task(&creator, &task_id, &contributor);

    let sub_id = client.add_subtask(&creator, &task_id, &txt(&env, "spec"));

    // An admin may complete a subtask too, not just the assignee.
    client.complete_subtask(&creator, &task_id, &sub_id);
    let subtask = client.get_subtask(&task_id, &sub_id);
    assert!(subtask.completed);
    assert_eq!(subtask.completed_by, Some(creator.clone()));

    assert_eq!(
        client.try_complete_subtask(&contributor, &task_id, &sub_id),
        Err(Ok(Error::SubtaskAlreadyDone))
    );
}

#[test]
fn test_subtask_completion_rejects_outsiders() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let viewer = register_identity(&env);
    client.add_member(&creator, &project_id, &viewer, &Role::Viewer);

    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);
    client.assign_task(&creator, &task_id, &contributor);
    let sub_id = client.add_subtask(&creator, &task_id, &txt(&env, "spec"));

    assert_eq!(
        client.try_complete_subtask(&viewer, &task_id, &sub_id),
        Err(Ok(Error::NotAuthorized))
    );
}

#[test]
fn test_subtask_not_found() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);
    client.assign_task(&creator, &task_id, &contributor);

    assert_eq!(
        client.try_complete_subtask(&contributor, &task_id, &7u32),
        Err(Ok(Error::SubtaskNotFound))
    );
}

#[test]
fn test_add_subtask_rejected_after_completion() {
    let (env, client, _) = setup();
    let (creator, contributor, project_id) = setup_project(&env, &client);
    let task_id = create_simple_task(&env, &client, &creator, project_id, 1);
    client.assign_task(&creator, &task_id, &contributor);
    client.start_task(&contributor, &task_id);
    client.complete_task(&contributor, &task_id);

    assert_eq!(
        client.try_add_subtask(&creator, &task_id, &txt(&env, "late")),
        Err(Ok(Error::InvalidStatus))
    );
}

#[test]
fn test_payout_lock_blocks_reentrant_completion() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(GridHub, ());
    let client = GridHubClient::new(&env, &contract_id);
    let authority = Address::generate(&env);

    // Reward asset whose transfer re-enters the contract mid-payout.
    let token_id = register_reentering_token(&env);
    client.init(&authority, &token_id);

    let (creator, contributor, project_id) = setup_project(&env, &client);
    let outer = create_simple_task(&env, &client, &creator, project_id, 0);
    let nested = create_simple_task(&env, &client, &creator, project_id, 0);
    client.assign_task(&creator, &outer, &contributor);
    client.assign_task(&creator, &nested, &contributor);
    client.start_task(&contributor, &outer);
    client.start_task(&contributor, &nested);

    let token = ReenteringTokenClient::new(&env, &token_id);
    token.set_target(&client.address, &contributor, &nested);

    client.complete_task(&contributor, &outer);

    // The nested completion hit the payout lock and rolled back; the outer
    // payout ran to the end.
    assert_eq!(token.nested_blocked(), Some(true));
    assert_eq!(client.get_task(&outer).status, TaskStatus::Paid);
    assert_eq!(client.get_task(&nested).status, TaskStatus::InProgress);
}

#[test]
fn test_get_task_not_found() {
    let (_env, client, _) = setup();
    assert_eq!(client.try_get_task(&404u64), Err(Ok(Error::TaskNotFound)));
}
