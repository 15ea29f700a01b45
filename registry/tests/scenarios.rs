//! End-to-end flows against the public API with nullable clock and payments.

use moniker_crypto::commit_hash;
use moniker_nullables::{NullClock, NullPayments};
use moniker_recovery::RecoveryError;
use moniker_registry::{
    LifecycleState, ReclaimAction, Registry, RegistryConfig, RegistryError, RegistryEvent,
    RegistrySnapshot, Role,
};
use moniker_types::{AccountId, Amount, Timestamp, WAD};

const ADMIN: AccountId = AccountId::new([0xad; 20]);
const VAULT: AccountId = AccountId::new([0xfa; 20]);
const TRUSTED: AccountId = AccountId::new([0x7c; 20]);
const MODERATOR: AccountId = AccountId::new([0x30; 20]);
const ALICE: AccountId = AccountId::new([0xa1; 20]);
const BOB: AccountId = AccountId::new([0xb0; 20]);
const GUARDIAN: AccountId = AccountId::new([0x99; 20]);
const DEST: AccountId = AccountId::new([0xde; 20]);

const SECRET: [u8; 32] = [0x42; 32];
const T0: u64 = 1_700_000_000;
const YEAR: u64 = 365 * 86_400;
const GRACE: u64 = 30 * 86_400;
const ESCROW: u64 = 3 * 86_400;
const STEP: u64 = 8 * 3_600;
const FEE: Amount = Amount::new(WAD / 100);

fn open_registry() -> (Registry<NullPayments>, NullClock) {
    moniker_utils::init_logging(moniker_utils::LogFormat::Human, "debug");
    let mut config = RegistryConfig::new(ADMIN, VAULT);
    config.trusted_caller = Some(TRUSTED);
    config.trusted_only = false;
    let registry = Registry::new(config, NullPayments::new()).unwrap();
    (registry, NullClock::new(T0))
}

/// Commit, wait out the reveal delay, register. Leaves the clock at the
/// registration time.
fn claim(
    registry: &mut Registry<NullPayments>,
    clock: &NullClock,
    name: &str,
    owner: AccountId,
    recovery: Option<AccountId>,
) {
    let hash = commit_hash(name, &owner, &SECRET, recovery.as_ref());
    registry.make_commit(&clock.call(owner), hash).unwrap();
    clock.advance(registry.config().reveal_delay_secs);
    registry
        .register(&clock.call(owner), name, owner, &SECRET, recovery, FEE)
        .unwrap();
}

#[test]
fn scenario_a_auction_prices() {
    let (mut registry, clock) = open_registry();
    claim(&mut registry, &clock, "alice", ALICE, None);
    let opens = clock.now().as_secs() + YEAR + GRACE;

    let price = |at: u64| {
        registry
            .auction_price("alice", Timestamp::new(at))
            .unwrap()
            .to_string()
    };
    assert_eq!(price(opens), "1000.01");
    assert_eq!(price(opens + STEP - 1), "1000.01");
    assert_eq!(price(opens + STEP), "900.01");
    assert_eq!(price(opens + 2 * STEP), "810.01");
    assert_eq!(price(opens + 382 * STEP), "0.01");
    assert_eq!(price(opens + 10_000 * STEP), "0.01");
}

#[test]
fn scenario_b_commit_is_single_use() {
    let (mut registry, clock) = open_registry();
    let hash = commit_hash("alice", &ALICE, &SECRET, None);
    registry.make_commit(&clock.call(ALICE), hash).unwrap();
    clock.advance(60);

    let ctx = clock.call(ALICE);
    registry
        .register(&ctx, "alice", ALICE, &SECRET, None, FEE)
        .unwrap();
    assert_eq!(
        registry.register(&ctx, "alice", ALICE, &SECRET, None, FEE),
        Err(RegistryError::InvalidCommit)
    );
}

#[test]
fn scenario_c_cancel_wins_recovery_race() {
    let (mut registry, clock) = open_registry();
    claim(&mut registry, &clock, "alice", ALICE, None);
    registry
        .change_recovery_address(&clock.call(ALICE), "alice", Some(GUARDIAN))
        .unwrap();

    clock.advance(100);
    let t1 = clock.now().as_secs();
    registry
        .request_recovery(&clock.call(GUARDIAN), "alice", DEST)
        .unwrap();

    clock.advance(ESCROW / 2);
    registry.cancel_recovery(&clock.call(ALICE), "alice").unwrap();

    clock.set(t1 + ESCROW + 1);
    assert_eq!(
        registry.complete_recovery(&clock.call(GUARDIAN), "alice"),
        Err(RegistryError::Recovery(RecoveryError::NoPendingRecovery))
    );
    assert_eq!(registry.owner_of("alice").unwrap(), Some(ALICE));
}

#[test]
fn scenario_d_bootstrap_gating() {
    let mut config = RegistryConfig::new(ADMIN, VAULT);
    config.trusted_caller = Some(TRUSTED);
    let mut registry = Registry::new(config, NullPayments::new()).unwrap();
    let clock = NullClock::new(T0);

    assert_eq!(
        registry.register(&clock.call(ALICE), "alice", ALICE, &SECRET, None, FEE),
        Err(RegistryError::BootstrapActive)
    );
    let receipt = registry
        .trusted_register(&clock.call(TRUSTED), "alice", ALICE, Some(GUARDIAN))
        .unwrap();
    assert_eq!(receipt.price, Amount::ZERO);
    assert_eq!(registry.owner_of("alice").unwrap(), Some(ALICE));
    assert!(registry.payments().sent().is_empty());
}

#[test]
fn bid_clears_pending_recovery() {
    let (mut registry, clock) = open_registry();
    claim(&mut registry, &clock, "alice", ALICE, Some(GUARDIAN));
    let expiry = registry.expiry_of("alice").unwrap().as_secs();

    clock.set(expiry + GRACE - ESCROW);
    registry
        .request_recovery(&clock.call(GUARDIAN), "alice", DEST)
        .unwrap();

    clock.set(expiry + GRACE + 382 * STEP);
    registry
        .bid(&clock.call(BOB), "alice", BOB, Some(GUARDIAN), FEE)
        .unwrap();
    assert_eq!(
        registry.complete_recovery(&clock.call(GUARDIAN), "alice"),
        Err(RegistryError::Recovery(RecoveryError::NoPendingRecovery))
    );
    assert_eq!(registry.owner_of("alice").unwrap(), Some(BOB));
}

#[test]
fn full_lifecycle_of_a_name() {
    let (mut registry, clock) = open_registry();
    claim(&mut registry, &clock, "alice", ALICE, None);
    let registered = clock.now();
    let expiry = registry.expiry_of("alice").unwrap();
    assert_eq!(expiry, Timestamp::new(registered.as_secs() + YEAR));

    let state = |registry: &Registry<NullPayments>, secs: u64| {
        registry.state_of("alice", Timestamp::new(secs)).unwrap()
    };
    assert_eq!(state(&registry, expiry.as_secs() - 1), LifecycleState::Registered);
    assert_eq!(state(&registry, expiry.as_secs()), LifecycleState::Renewable);
    assert_eq!(state(&registry, expiry.as_secs() + GRACE), LifecycleState::Biddable);

    // Renew late in the grace period: the term is counted from the old expiry.
    clock.set(expiry.as_secs() + GRACE - 1);
    let receipt = registry
        .renew(&clock.call(BOB), "alice", Amount::new(WAD))
        .unwrap();
    assert_eq!(receipt.expiry, Timestamp::new(expiry.as_secs() + YEAR));
    assert_eq!(registry.payments().sent_to(&BOB), vec![Amount::new(WAD - WAD / 100)]);
    assert_eq!(registry.owner_of("alice").unwrap(), Some(ALICE));
}

#[test]
fn forwarded_register_refunds_the_forwarder() {
    let (mut registry, clock) = open_registry();
    let relayer = AccountId::new([0xee; 20]);
    let hash = commit_hash("alice", &ALICE, &SECRET, None);
    registry
        .make_commit(&clock.relayed(relayer, ALICE), hash)
        .unwrap();
    clock.advance(60);

    registry
        .register(
            &clock.relayed(relayer, ALICE),
            "alice",
            ALICE,
            &SECRET,
            None,
            Amount::new(WAD),
        )
        .unwrap();
    assert_eq!(registry.payments().sent_to(&relayer), vec![Amount::new(WAD - WAD / 100)]);
    assert!(registry.payments().sent_to(&ALICE).is_empty());

    // The relayer cannot move the name on its own authority.
    assert!(matches!(
        registry.transfer(&clock.call(relayer), "alice", relayer),
        Err(RegistryError::Unauthorized { .. })
    ));
    registry
        .transfer(&clock.relayed(relayer, ALICE), "alice", BOB)
        .unwrap();
    assert_eq!(registry.owner_of("alice").unwrap(), Some(BOB));
}

#[test]
fn moderator_reclaims_abandoned_names() {
    let (mut registry, clock) = open_registry();
    registry
        .grant_role(&clock.call(ADMIN), Role::Moderator, MODERATOR)
        .unwrap();
    claim(&mut registry, &clock, "alice", ALICE, Some(GUARDIAN));
    claim(&mut registry, &clock, "bob", BOB, None);

    clock.advance(YEAR + GRACE + 10);
    let actions = [
        ReclaimAction::new("alice", DEST).unwrap(),
        ReclaimAction::new("bob", DEST).unwrap(),
    ];
    registry
        .reclaim_many(&clock.call(MODERATOR), &actions)
        .unwrap();

    for name in ["alice", "bob"] {
        let record = registry.record(name).unwrap().unwrap();
        assert_eq!(record.owner, DEST);
        assert_eq!(record.expiry, Timestamp::new(clock.now().as_secs() + GRACE));
        assert_eq!(record.recovery.recovery_address, None);
    }
}

#[test]
fn events_describe_every_transition() {
    let (mut registry, clock) = open_registry();
    claim(&mut registry, &clock, "alice", ALICE, None);
    registry
        .change_recovery_address(&clock.call(ALICE), "alice", Some(GUARDIAN))
        .unwrap();
    registry
        .request_recovery(&clock.call(GUARDIAN), "alice", DEST)
        .unwrap();
    registry.cancel_recovery(&clock.call(GUARDIAN), "alice").unwrap();

    let events = registry.drain_events();
    let kinds: Vec<&str> = events
        .iter()
        .map(|event| match event {
            RegistryEvent::Transfer { .. } => "transfer",
            RegistryEvent::ChangeRecoveryAddress { .. } => "change_recovery_address",
            RegistryEvent::RequestRecovery { .. } => "request_recovery",
            RegistryEvent::CancelRecovery { .. } => "cancel_recovery",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        ["transfer", "change_recovery_address", "request_recovery", "cancel_recovery"]
    );
    for event in &events {
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["id"], "alice");
    }
    assert!(registry.events().is_empty());
}

#[test]
fn snapshot_survives_a_file_roundtrip() {
    let (mut registry, clock) = open_registry();
    claim(&mut registry, &clock, "alice", ALICE, Some(GUARDIAN));
    registry
        .request_recovery(&clock.call(GUARDIAN), "alice", DEST)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.snapshot");
    std::fs::write(&path, registry.snapshot().encode().unwrap()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let mut restored =
        Registry::from_snapshot(RegistrySnapshot::decode(&bytes).unwrap(), NullPayments::new())
            .unwrap();
    assert_eq!(restored.snapshot(), registry.snapshot());

    clock.advance(ESCROW);
    assert_eq!(
        restored.complete_recovery(&clock.call(GUARDIAN), "alice"),
        Ok(DEST)
    );
}
