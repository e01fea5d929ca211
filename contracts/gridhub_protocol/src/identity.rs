//! # Identity Gate
//!
//! Every acting address in GridHub must be an *identity account*: a contract
//! exposing the capability interface of the platform's account standard. The
//! gate is a pure capability probe, a cross-contract call asking "do you
//! support capability `0x6bb56a14`?", with no state of its own.
//!
//! The same account interface carries two best-effort surfaces used by the
//! protocol: an inbound `notify` hook and an extensible `set_data` key/value
//! store. Calls to both are fire-and-forget: their failure is absorbed and
//! never surfaces as an overall operation failure.

use soroban_sdk::{
    vec, Address, Bytes, ConversionError, Env, IntoVal, InvokeError, Symbol, Val,
};

use crate::Error;

/// Capability id an identity account must answer `true` for.
pub const CAPABILITY_ID: u32 = 0x6bb5_6a14;

/// Notification kind sent when an identity is added to a project.
pub const NOTIFY_PROJECT_INVITE: &str = "PROJECT_INVITE";

/// Notification kind sent when a task is assigned to an identity.
pub const NOTIFY_TASK_ASSIGNED: &str = "TASK_ASSIGNED";

/// Namespace prefix for project metadata written into an account's data store.
const METADATA_PREFIX: &[u8] = b"gridhub:project:";

/// Encode an entity id as a notification context payload.
pub fn id_context(env: &Env, id: u64) -> Bytes {
    Bytes::from_slice(env, &id.to_be_bytes())
}

/// Probe `candidate` for the identity-account capability.
///
/// Any failure mode (not a contract, missing entry point, wrong return
/// type, a `false` answer) reads as "not an identity". A well-formed probe
/// target never causes the calling operation to abort.
pub fn is_identity_account(env: &Env, candidate: &Address) -> bool {
    let args = vec![env, CAPABILITY_ID.into_val(env)];
    let res: Result<Result<bool, ConversionError>, Result<soroban_sdk::Error, InvokeError>> =
        env.try_invoke_contract(candidate, &Symbol::new(env, "supports_capability"), args);
    matches!(res, Ok(Ok(true)))
}

/// Reject `candidate` with `NotAnIdentity` unless it passes the probe.
pub fn require_identity(env: &Env, candidate: &Address) -> Result<(), Error> {
    if is_identity_account(env, candidate) {
        Ok(())
    } else {
        Err(Error::NotAnIdentity)
    }
}

/// Best-effort notification to an identity account.
///
/// Invokes the account's `notify(kind, context)` hook and discards the
/// outcome; delivery is fire-and-forget.
pub fn notify(env: &Env, account: &Address, kind: &str, context: Bytes) {
    let args = vec![
        env,
        Symbol::new(env, kind).into_val(env),
        context.into_val(env),
    ];
    let _: Result<Result<Val, ConversionError>, Result<soroban_sdk::Error, InvokeError>> =
        env.try_invoke_contract(account, &Symbol::new(env, "notify"), args);
}

/// Best-effort write into an identity account's extensible data store,
/// under the `gridhub:project:<id>:` namespace. Silently no-ops on failure.
pub fn set_project_metadata(
    env: &Env,
    account: &Address,
    project_id: u64,
    key: &Bytes,
    value: &Bytes,
) {
    let mut namespaced = Bytes::from_slice(env, METADATA_PREFIX);
    namespaced.append(&Bytes::from_slice(env, &project_id.to_be_bytes()));
    namespaced.append(&Bytes::from_slice(env, b":"));
    namespaced.append(key);

    let args = vec![env, namespaced.into_val(env), value.into_val(env)];
    let _: Result<Result<Val, ConversionError>, Result<soroban_sdk::Error, InvokeError>> =
        env.try_invoke_contract(account, &Symbol::new(env, "set_data"), args);
}
