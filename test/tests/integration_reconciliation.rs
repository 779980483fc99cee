//! Observer-side reconciliation of received pool entries.

use tidepool_client::{PoolClient, PoolClientConfig, PoolClientError};
use tidepool_shared::{
    Capability, InstanceId, KindDescriptor, Placement, PoolEntrySnapshot, PoolError, PoolKind,
    PoolKinds, ReconcileEvent, Reconciler, SerdeErr, SlotMask, SnapshotInstance,
};
use tidepool_test::{kinds, FactoryCall, TestFactory, TestSnapshotter};

fn snapshot(kind: PoolKind, ids: &[u64], mask: u64) -> PoolEntrySnapshot {
    let instances = ids
        .iter()
        .map(|id| SnapshotInstance {
            id: InstanceId::new(*id),
            placement: Placement::from_translation([*id as f32, 0.0, 0.0]),
        })
        .collect();
    PoolEntrySnapshot::new(kind, SlotMask::from_u64(mask), instances).unwrap()
}

fn client() -> PoolClient<u32> {
    let (kinds, _) = kinds();
    PoolClient::new(PoolClientConfig::default(), kinds)
}

/// (transition, slot, instance) for every activate/deactivate/skip, in order
fn transitions(events: &[ReconcileEvent]) -> Vec<(&'static str, u8, u64)> {
    events
        .iter()
        .filter_map(|event| match event {
            ReconcileEvent::Activated { slot, instance, .. } => {
                Some(("activated", slot.value(), instance.to_u64()))
            }
            ReconcileEvent::Deactivated { slot, instance, .. } => {
                Some(("deactivated", slot.value(), instance.to_u64()))
            }
            ReconcileEvent::Skipped { slot, instance, .. } => {
                Some(("skipped", slot.value(), instance.to_u64()))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn introduction_adopts_membership_without_transitions() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let payload = snapshot(test_kinds.projectile, &[10, 11, 12, 13], 0b0101).to_bytes();
    let events = client
        .receive(3, &payload, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(
        events,
        vec![ReconcileEvent::Introduced {
            entry_id: 3,
            known_count: 4
        }]
    );
    assert!(factory.calls().is_empty());
    assert_eq!(client.observer_mask(3), Some(SlotMask::from_u64(0b0101)));
    assert_eq!(client.known_count(3), Some(4));
    assert_eq!(client.entry(3).unwrap().kind(), test_kinds.projectile);
}

#[test]
fn mask_change_fires_one_transition_per_flipped_slot() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let introduce = snapshot(test_kinds.projectile, &[10, 11, 12, 13], 0b0101).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();

    let change = snapshot(test_kinds.projectile, &[10, 11, 12, 13], 0b0011).to_bytes();
    let events = client
        .receive(0, &change, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(
        transitions(&events),
        vec![("activated", 1, 11), ("deactivated", 2, 12)]
    );

    let activated = InstanceId::new(11);
    assert_eq!(
        factory.calls_for(activated),
        vec![
            FactoryCall::SetPlacement(activated, Placement::from_translation([11.0, 0.0, 0.0])),
            FactoryCall::SetTick(activated, true),
            FactoryCall::SetActive(activated, true),
            FactoryCall::SetCollision(activated, true),
            FactoryCall::SetDormant(activated, false),
        ]
    );

    let deactivated = InstanceId::new(12);
    assert_eq!(
        factory.calls_for(deactivated),
        vec![
            FactoryCall::SetCollision(deactivated, false),
            FactoryCall::SetActive(deactivated, false),
            FactoryCall::SetTick(deactivated, false),
            FactoryCall::ClearTimers(deactivated),
            FactoryCall::SetDormant(deactivated, true),
        ]
    );

    assert!(factory.calls_for(InstanceId::new(10)).is_empty());
    assert!(factory.calls_for(InstanceId::new(13)).is_empty());
    assert_eq!(client.observer_mask(0), Some(SlotMask::from_u64(0b0011)));
}

#[test]
fn activations_fire_in_slot_order() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let introduce = snapshot(test_kinds.decal, &[1, 2, 3, 4], 0b0000).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();

    let change = snapshot(test_kinds.decal, &[1, 2, 3, 4], 0b0101).to_bytes();
    let events = client
        .receive(0, &change, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(
        transitions(&events),
        vec![("activated", 0, 1), ("activated", 2, 3)]
    );
    let activated: Vec<u64> = factory
        .calls()
        .iter()
        .filter_map(|call| match call {
            FactoryCall::SetActive(instance, true) => Some(instance.to_u64()),
            _ => None,
        })
        .collect();
    assert_eq!(activated, vec![1, 3]);
    assert_eq!(client.observer_mask(0), Some(SlotMask::from_u64(0b0101)));
}

#[test]
fn repeated_snapshot_is_a_no_op() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let first = snapshot(test_kinds.decal, &[1, 2], 0b01).to_bytes();
    let second = snapshot(test_kinds.decal, &[1, 2], 0b10).to_bytes();
    client.receive(0, &first, &mut factory, &mut snapshotter).unwrap();
    client.receive(0, &second, &mut factory, &mut snapshotter).unwrap();
    factory.clear_calls();

    let events = client
        .receive(0, &second, &mut factory, &mut snapshotter)
        .unwrap();

    assert!(events.is_empty());
    assert!(factory.calls().is_empty());
}

#[test]
fn growth_is_adopted_without_transitions() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let introduce = snapshot(test_kinds.projectile, &[1, 2], 0b11).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();

    // slot 3 is born leased on the authority
    let grown = snapshot(test_kinds.projectile, &[1, 2, 3, 4], 0b1011).to_bytes();
    let events = client
        .receive(0, &grown, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(
        events,
        vec![ReconcileEvent::Grown {
            entry_id: 0,
            from: 2,
            to: 4
        }]
    );
    assert!(factory.calls().is_empty());
    assert_eq!(client.known_count(0), Some(4));

    let released = snapshot(test_kinds.projectile, &[1, 2, 3, 4], 0b0011).to_bytes();
    let events = client
        .receive(0, &released, &mut factory, &mut snapshotter)
        .unwrap();
    assert_eq!(transitions(&events), vec![("deactivated", 3, 4)]);
}

#[test]
fn stale_handle_is_skipped_and_mask_still_committed() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let introduce = snapshot(test_kinds.projectile, &[1, 2, 3], 0b001).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();

    factory.invalidate(InstanceId::new(2));
    let change = snapshot(test_kinds.projectile, &[1, 2, 3], 0b111).to_bytes();
    let events = client
        .receive(0, &change, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(
        transitions(&events),
        vec![("skipped", 1, 2), ("activated", 2, 3)]
    );
    assert!(factory.calls_for(InstanceId::new(2)).is_empty());
    assert_eq!(client.observer_mask(0), Some(SlotMask::from_u64(0b111)));
}

#[test]
fn change_for_unintroduced_entry_is_an_error() {
    let (kinds, test_kinds) = kinds();
    let mut reconciler: Reconciler<u32> = Reconciler::new(true);
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let result = reconciler.on_entry_changed(
        9,
        &snapshot(test_kinds.decal, &[1], 0b1),
        &mut factory,
        &mut snapshotter,
    );
    assert_eq!(result, Err(PoolError::UnknownEntryOnReconcile { entry: 9 }));

    reconciler
        .on_entry_received(9, &snapshot(test_kinds.decal, &[1], 0b1), &kinds, &mut factory, &mut snapshotter)
        .unwrap();
    assert!(reconciler.is_tracked(9));
}

#[test]
fn unregistered_kind_is_not_tracked() {
    let (_, test_kinds) = kinds();
    let mut short_table = PoolKinds::new();
    short_table
        .add_kind(KindDescriptor::new("Projectile", true))
        .unwrap();
    let mut client: PoolClient<u32> = PoolClient::new(PoolClientConfig::default(), short_table);
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let payload = snapshot(test_kinds.pickup, &[1], 0b1).to_bytes();
    let result = client.receive(0, &payload, &mut factory, &mut snapshotter);

    assert!(matches!(
        result,
        Err(PoolClientError::Pool(PoolError::UnknownKind { kind: 2 }))
    ));
    assert!(client.entry(0).is_none());
}

#[test]
fn contradicting_snapshot_reintroduces_entry() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let introduce = snapshot(test_kinds.projectile, &[1, 2], 0b01).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();

    let replaced = snapshot(test_kinds.projectile, &[7, 8], 0b10).to_bytes();
    let events = client
        .receive(0, &replaced, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(
        events,
        vec![ReconcileEvent::Introduced {
            entry_id: 0,
            known_count: 2
        }]
    );
    assert!(factory.calls().is_empty());
    let entry = client.entry(0).unwrap();
    let ids: Vec<u64> = entry
        .instances()
        .iter()
        .map(|(_, pooled)| pooled.id().to_u64())
        .collect();
    assert_eq!(ids, vec![7, 8]);

    let shrunk = snapshot(test_kinds.projectile, &[7], 0b1).to_bytes();
    let events = client
        .receive(0, &shrunk, &mut factory, &mut snapshotter)
        .unwrap();
    assert!(matches!(
        events.as_slice(),
        [ReconcileEvent::Introduced { known_count: 1, .. }]
    ));

    let other_kind = snapshot(test_kinds.decal, &[7], 0b0).to_bytes();
    client
        .receive(0, &other_kind, &mut factory, &mut snapshotter)
        .unwrap();
    assert_eq!(client.entry(0).unwrap().kind(), test_kinds.decal);
}

#[test]
fn contradicting_snapshot_is_an_error_when_reintroduction_disabled() {
    let (kinds, test_kinds) = kinds();
    let mut client: PoolClient<u32> = PoolClient::new(
        PoolClientConfig {
            reintroduce_on_violation: false,
        },
        kinds,
    );
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let introduce = snapshot(test_kinds.projectile, &[1, 2], 0b01).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();

    let shrunk = snapshot(test_kinds.projectile, &[1], 0b1).to_bytes();
    let result = client.receive(0, &shrunk, &mut factory, &mut snapshotter);

    match result {
        Err(PoolClientError::Pool(PoolError::ProtocolViolation { entry, reason })) => {
            assert_eq!(entry, 0);
            assert_eq!(reason, "instance list shrank from 2 to 1");
        }
        other => panic!("expected a protocol violation, got {:?}", other),
    }
    assert_eq!(client.known_count(0), Some(2));
    assert_eq!(client.observer_mask(0), Some(SlotMask::from_u64(0b01)));
}

#[test]
fn truncated_payload_is_rejected() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let payload = snapshot(test_kinds.projectile, &[1, 2], 0b01).to_bytes();
    let result = client.receive(
        4,
        &payload[..payload.len() / 2],
        &mut factory,
        &mut snapshotter,
    );

    assert!(matches!(
        result,
        Err(PoolClientError::Serde {
            entry: 4,
            source: SerdeErr::ReadPastEnd { .. }
        })
    ));
    assert_eq!(client.tracked_entries(), 0);
}

#[test]
fn payload_with_trailing_bytes_is_rejected() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let mut payload = snapshot(test_kinds.projectile, &[1], 0b1).to_bytes();
    payload.extend_from_slice(&[0xFF; 32]);
    let result = client.receive(2, &payload, &mut factory, &mut snapshotter);

    assert!(matches!(
        result,
        Err(PoolClientError::Serde {
            entry: 2,
            source: SerdeErr::TrailingData { .. }
        })
    ));
    assert_eq!(client.tracked_entries(), 0);
    assert!(factory.calls().is_empty());
}

#[test]
fn observer_restores_defaults_of_auto_collecting_instances() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::new(50);
    let pickup = InstanceId::new(21);
    factory.set_instance_capability(pickup, Capability::Hooks { auto_collect: true });

    let introduce = snapshot(test_kinds.pickup, &[20, 21], 0b11).to_bytes();
    client
        .receive(0, &introduce, &mut factory, &mut snapshotter)
        .unwrap();
    assert_eq!(snapshotter.captured(), &[pickup]);

    snapshotter.set_health(pickup, 1);
    let release = snapshot(test_kinds.pickup, &[20, 21], 0b01).to_bytes();
    client
        .receive(0, &release, &mut factory, &mut snapshotter)
        .unwrap();

    assert_eq!(snapshotter.health(pickup), 50);
    assert_eq!(factory.calls_for(pickup).first(), Some(&FactoryCall::EndLifecycle(pickup)));

    factory.clear_calls();
    let lease = snapshot(test_kinds.pickup, &[20, 21], 0b11).to_bytes();
    client
        .receive(0, &lease, &mut factory, &mut snapshotter)
        .unwrap();
    assert_eq!(factory.calls_for(pickup).last(), Some(&FactoryCall::BeginLifecycle(pickup)));
}

#[test]
fn reset_forgets_tracked_entries() {
    let (_, test_kinds) = kinds();
    let mut client = client();
    let mut factory = TestFactory::new();
    let mut snapshotter = TestSnapshotter::default();

    let payload = snapshot(test_kinds.decal, &[1], 0b1).to_bytes();
    client
        .receive(0, &payload, &mut factory, &mut snapshotter)
        .unwrap();
    client.reset();
    assert!(client.entry(0).is_none());

    let events = client
        .receive(0, &payload, &mut factory, &mut snapshotter)
        .unwrap();
    assert!(matches!(events.as_slice(), [ReconcileEvent::Introduced { .. }]));
}
