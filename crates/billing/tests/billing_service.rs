//! Billing service behavior against the in-memory store and a scripted
//! gateway.

mod common;

use std::sync::Arc;

use common::{GatewayCall, MockGateway, ada_billing, mastercard, visa};
use samplestore_billing::db::{MemoryStore, NewPaymentProfile, ProfileStore};
use samplestore_billing::gateway::{RemoteBilling, RemoteCard, RemotePaymentProfile};
use samplestore_billing::services::{BillingService, RemoteCall};
use samplestore_billing::{BillingError, models::CustomerProfile};
use samplestore_core::{CardNumber, UserId};

fn service(store: &MemoryStore, gateway: &Arc<MockGateway>) -> BillingService {
    BillingService::new(Arc::new(store.clone()), gateway.clone())
}

async fn seeded_profile(store: &MemoryStore) -> CustomerProfile {
    store
        .insert_profile(UserId::new(1), "100")
        .await
        .expect("insert profile")
}

#[tokio::test]
async fn declined_profile_creation_writes_nothing() {
    let store = MemoryStore::new();
    let gateway = Arc::new(MockGateway::declining());
    let service = service(&store, &gateway);

    let err = service
        .create_profile(UserId::new(1), &visa(), &ada_billing())
        .await
        .expect_err("gateway declined");

    assert!(matches!(err, BillingError::Declined { .. }));
    assert_eq!(store.profile_count().await, 0);
    assert_eq!(store.payment_profile_count().await, 0);
}

#[tokio::test]
async fn profile_creation_persists_returned_sub_profiles_without_extra_calls() {
    let store = MemoryStore::new();
    let gateway = Arc::new(MockGateway::approving().with_payment_profile_ids(&["200", "201"]));
    let service = service(&store, &gateway);

    let profile = service
        .create_profile(UserId::new(1), &visa(), &ada_billing())
        .await
        .expect("profile created");

    assert_eq!(profile.profile_id, "100");
    assert_eq!(store.profile_count().await, 1);
    assert_eq!(store.payment_profile_count().await, 2);

    let rows = store
        .list_payment_profiles(profile.id)
        .await
        .expect("list rows");
    let remote_ids: Vec<_> = rows.iter().map(|r| r.payment_profile_id.as_str()).collect();
    assert_eq!(remote_ids, vec!["200", "201"]);

    // The sub-profiles were minted by add_profile; no further gateway
    // calls may happen for them.
    let calls = gateway.calls();
    assert_eq!(
        calls,
        vec![GatewayCall::AddProfile { user_id: 1 }],
        "expected a single add_profile call, got {calls:?}"
    );
}

#[tokio::test]
async fn stored_rows_hold_masked_card_data_only() {
    let store = MemoryStore::new();
    let gateway = Arc::new(MockGateway::approving().with_payment_profile_ids(&["200"]));
    let service = service(&store, &gateway);

    let profile = service
        .create_profile(UserId::new(1), &visa(), &ada_billing())
        .await
        .expect("profile created");

    let rows = store
        .list_payment_profiles(profile.id)
        .await
        .expect("list rows");
    let row = rows.first().expect("one row");

    assert_eq!(row.card_number.as_ref().map(AsRef::as_ref), Some("XXXX1111"));

    // Nothing sensitive survives into the stored representation.
    let dump = format!("{row:?}");
    assert!(!dump.contains("4111111111111111"));
    assert!(!dump.contains("2027-11"));
}

#[tokio::test]
async fn explicit_sub_profile_creation_calls_gateway() {
    let store = MemoryStore::new();
    let gateway = Arc::new(MockGateway::approving());
    let service = service(&store, &gateway);
    let profile = seeded_profile(&store).await;

    let row = service
        .create_payment_profile(&profile, &mastercard(), &ada_billing(), RemoteCall::Perform)
        .await
        .expect("sub-profile created");

    assert_eq!(row.payment_profile_id, "500");
    assert_eq!(row.card_number.as_ref().map(AsRef::as_ref), Some("XXXX0015"));
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::CreatePaymentProfile {
            profile_id: "100".to_string()
        }]
    );
}

#[tokio::test]
async fn declined_sub_profile_creation_writes_nothing() {
    let store = MemoryStore::new();
    let gateway = Arc::new(MockGateway::declining());
    let service = service(&store, &gateway);
    let profile = seeded_profile(&store).await;

    let err = service
        .create_payment_profile(&profile, &visa(), &ada_billing(), RemoteCall::Perform)
        .await
        .expect_err("gateway declined");

    assert!(matches!(err, BillingError::Declined { .. }));
    assert_eq!(store.payment_profile_count().await, 0);
}

#[tokio::test]
async fn sync_finds_or_creates_rows_and_merges_present_fields() {
    let store = MemoryStore::new();
    let profile = seeded_profile(&store).await;

    // Existing local row for sub-profile "200".
    store
        .insert_payment_profile(NewPaymentProfile {
            customer_profile_id: profile.id,
            payment_profile_id: "200".to_string(),
            billing: ada_billing(),
            card_number: Some(CardNumber::parse("4111111111111111").unwrap().mask()),
        })
        .await
        .expect("seed row");

    let remote = vec![
        // Known sub-profile: only address fields present remotely.
        RemotePaymentProfile {
            payment_profile_id: "200".to_string(),
            billing: RemoteBilling {
                address: Some("221B Baker St".to_string()),
                zip: Some("NW1 6XE".to_string()),
                ..RemoteBilling::default()
            },
            credit_card: None,
        },
        // Unknown sub-profile: must be created locally.
        RemotePaymentProfile {
            payment_profile_id: "201".to_string(),
            billing: RemoteBilling {
                first_name: Some("Grace".to_string()),
                ..RemoteBilling::default()
            },
            credit_card: Some(RemoteCard {
                card_number: CardNumber::parse("5424000000000015").unwrap().mask(),
            }),
        },
    ];
    let gateway = Arc::new(MockGateway::approving().with_remote_profiles(remote));
    let service = service(&store, &gateway);

    let synced = service.sync_profile(&profile).await.expect("sync");
    assert_eq!(synced.len(), 2);
    assert_eq!(store.payment_profile_count().await, 2);

    let known = store
        .find_payment_profile(profile.id, "200")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(known.address, "221B Baker St");
    assert_eq!(known.zip, "NW1 6XE");
    // Fields absent from the payload keep their prior values.
    assert_eq!(known.first_name, "Ada");
    assert_eq!(known.city, "London");
    assert_eq!(known.card_number.as_ref().map(AsRef::as_ref), Some("XXXX1111"));

    let created = store
        .find_payment_profile(profile.id, "201")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(created.first_name, "Grace");
    assert_eq!(created.card_number.as_ref().map(AsRef::as_ref), Some("XXXX0015"));

    // A second sync must not duplicate rows.
    service.sync_profile(&profile).await.expect("second sync");
    assert_eq!(store.payment_profile_count().await, 2);
}

#[tokio::test]
async fn declined_update_leaves_local_fields_unchanged() {
    let store = MemoryStore::new();
    let profile = seeded_profile(&store).await;
    let mut row = store
        .insert_payment_profile(NewPaymentProfile {
            customer_profile_id: profile.id,
            payment_profile_id: "200".to_string(),
            billing: ada_billing(),
            card_number: Some(CardNumber::parse("4111111111111111").unwrap().mask()),
        })
        .await
        .expect("seed row");

    let gateway = Arc::new(MockGateway::declining());
    let service = service(&store, &gateway);

    let err = service
        .update_payment_profile(
            &profile,
            &mut row,
            &mastercard(),
            &samplestore_billing::gateway::BillingDetails {
                first_name: "Grace".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect_err("gateway declined");

    assert!(matches!(err, BillingError::Declined { .. }));

    let stored = store
        .find_payment_profile(profile.id, "200")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(stored.first_name, "Ada");
    assert_eq!(stored.card_number.as_ref().map(AsRef::as_ref), Some("XXXX1111"));
}

#[tokio::test]
async fn successful_update_mirrors_masked_payment_data() {
    let store = MemoryStore::new();
    let profile = seeded_profile(&store).await;
    let mut row = store
        .insert_payment_profile(NewPaymentProfile {
            customer_profile_id: profile.id,
            payment_profile_id: "200".to_string(),
            billing: ada_billing(),
            card_number: Some(CardNumber::parse("4111111111111111").unwrap().mask()),
        })
        .await
        .expect("seed row");

    let gateway = Arc::new(MockGateway::approving());
    let service = service(&store, &gateway);

    let new_billing = samplestore_billing::gateway::BillingDetails {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        ..Default::default()
    };
    service
        .update_payment_profile(&profile, &mut row, &mastercard(), &new_billing)
        .await
        .expect("update");

    let stored = store
        .find_payment_profile(profile.id, "200")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(stored.first_name, "Grace");
    assert_eq!(stored.card_number.as_ref().map(AsRef::as_ref), Some("XXXX0015"));
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::UpdatePaymentProfile {
            profile_id: "100".to_string(),
            payment_profile_id: "200".to_string()
        }]
    );
}

#[tokio::test]
async fn declined_delete_keeps_local_row() {
    let store = MemoryStore::new();
    let profile = seeded_profile(&store).await;
    let row = store
        .insert_payment_profile(NewPaymentProfile {
            customer_profile_id: profile.id,
            payment_profile_id: "200".to_string(),
            billing: ada_billing(),
            card_number: None,
        })
        .await
        .expect("seed row");

    let gateway = Arc::new(MockGateway::declining());
    let service = service(&store, &gateway);

    let err = service
        .delete_payment_profile(&profile, &row)
        .await
        .expect_err("gateway declined");

    assert!(matches!(err, BillingError::Declined { .. }));
    assert_eq!(store.payment_profile_count().await, 1);
}

#[tokio::test]
async fn successful_delete_removes_local_row() {
    let store = MemoryStore::new();
    let profile = seeded_profile(&store).await;
    let row = store
        .insert_payment_profile(NewPaymentProfile {
            customer_profile_id: profile.id,
            payment_profile_id: "200".to_string(),
            billing: ada_billing(),
            card_number: None,
        })
        .await
        .expect("seed row");

    let gateway = Arc::new(MockGateway::approving());
    let service = service(&store, &gateway);

    service
        .delete_payment_profile(&profile, &row)
        .await
        .expect("delete");

    assert_eq!(store.payment_profile_count().await, 0);
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::DeletePaymentProfile {
            profile_id: "100".to_string(),
            payment_profile_id: "200".to_string()
        }]
    );
}
