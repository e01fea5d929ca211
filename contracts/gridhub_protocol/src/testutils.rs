//! Test utilities: mock collaborator contracts.
//!
//! GridHub's identity gate probes candidate addresses over a cross-contract
//! call, so tests need real contracts on the other end. Each mock lives in
//! its own nested module: `#[contractimpl]` generates module-level export
//! items named after the entry points, so two contracts answering the same
//! `supports_capability` probe cannot share a module.

use soroban_sdk::{Address, Env};

mod identity_account {
    use soroban_sdk::{contract, contractimpl, contracttype, Bytes, Env, Symbol, Vec};

    use crate::identity::CAPABILITY_ID;

    #[contracttype]
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum AccountKey {
        Notifications,
        Data(Bytes),
    }

    /// Minimal identity account implementing the capability interface the
    /// protocol probes for, plus the `notify` and `set_data` surfaces.
    #[contract]
    pub struct IdentityAccount;

    #[contractimpl]
    impl IdentityAccount {
        pub fn supports_capability(_env: Env, capability: u32) -> bool {
            capability == CAPABILITY_ID
        }

        /// Record an inbound notification so tests can assert delivery.
        pub fn notify(env: Env, kind: Symbol, context: Bytes) {
            let mut log: Vec<(Symbol, Bytes)> = env
                .storage()
                .instance()
                .get(&AccountKey::Notifications)
                .unwrap_or_else(|| Vec::new(&env));
            log.push_back((kind, context));
            env.storage()
                .instance()
                .set(&AccountKey::Notifications, &log);
        }

        /// All notifications received, in arrival order.
        pub fn notifications(env: Env) -> Vec<(Symbol, Bytes)> {
            env.storage()
                .instance()
                .get(&AccountKey::Notifications)
                .unwrap_or_else(|| Vec::new(&env))
        }

        pub fn set_data(env: Env, key: Bytes, value: Bytes) {
            env.storage().instance().set(&AccountKey::Data(key), &value);
        }

        pub fn get_data(env: Env, key: Bytes) -> Option<Bytes> {
            env.storage().instance().get(&AccountKey::Data(key))
        }
    }
}

mod plain_account {
    use soroban_sdk::{contract, contractimpl, Env};

    /// A contract that denies the capability probe. Exercises the negative
    /// path of the identity gate without aborting the probe itself.
    #[contract]
    pub struct PlainAccount;

    #[contractimpl]
    impl PlainAccount {
        pub fn supports_capability(_env: Env, _capability: u32) -> bool {
            false
        }
    }
}

mod silent_identity {
    use soroban_sdk::{contract, contractimpl, Env};

    use crate::identity::CAPABILITY_ID;

    /// An identity account with no notification or data surfaces. Exercises
    /// the best-effort semantics: calls to its missing entry points must be
    /// swallowed, never propagated to the calling operation.
    #[contract]
    pub struct SilentIdentity;

    #[contractimpl]
    impl SilentIdentity {
        pub fn supports_capability(_env: Env, capability: u32) -> bool {
            capability == CAPABILITY_ID
        }
    }
}

mod reentering_token {
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

    #[contracttype]
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct ReentryTarget {
        pub hub: Address,
        pub caller: Address,
        pub task_id: u64,
    }

    #[contracttype]
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum TokenKey {
        Target,
        NestedBlocked,
    }

    /// Reward-asset stand-in whose `transfer` re-enters the hub with a
    /// nested `complete_task`, recording whether the payout lock blocked it.
    #[contract]
    pub struct ReenteringToken;

    #[contractimpl]
    impl ReenteringToken {
        /// Arm the token: the next `transfer` re-enters `hub` by calling
        /// `complete_task(caller, task_id)`.
        pub fn set_target(env: Env, hub: Address, caller: Address, task_id: u64) {
            env.storage().instance().set(
                &TokenKey::Target,
                &ReentryTarget {
                    hub,
                    caller,
                    task_id,
                },
            );
        }

        pub fn transfer(env: Env, _from: Address, _to: Address, _amount: i128) {
            let target: Option<ReentryTarget> = env.storage().instance().get(&TokenKey::Target);
            if let Some(target) = target {
                let hub = crate::GridHubClient::new(&env, &target.hub);
                let blocked = matches!(
                    hub.try_complete_task(&target.caller, &target.task_id),
                    Err(Ok(crate::Error::ReentrantCall))
                );
                env.storage()
                    .instance()
                    .set(&TokenKey::NestedBlocked, &blocked);
            }
        }

        /// Whether the armed nested call was rejected by the payout lock.
        pub fn nested_blocked(env: Env) -> Option<bool> {
            env.storage().instance().get(&TokenKey::NestedBlocked)
        }
    }
}

pub use identity_account::{AccountKey, IdentityAccount, IdentityAccountClient};
pub use plain_account::PlainAccount;
pub use reentering_token::{ReenteringToken, ReenteringTokenClient};
pub use silent_identity::SilentIdentity;

/// Register a fresh identity account and return its address.
pub fn register_identity(env: &Env) -> Address {
    env.register(IdentityAccount, ())
}

/// Register a contract that fails the identity probe.
pub fn register_plain_account(env: &Env) -> Address {
    env.register(PlainAccount, ())
}

/// Register an identity account with no `notify`/`set_data` surfaces.
pub fn register_silent_identity(env: &Env) -> Address {
    env.register(SilentIdentity, ())
}

/// Register a reward-asset stand-in whose `transfer` re-enters the hub.
pub fn register_reentering_token(env: &Env) -> Address {
    env.register(ReenteringToken, ())
}
