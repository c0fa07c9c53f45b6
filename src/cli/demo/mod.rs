//! Demo command - exercises the setup key lifecycle against in-memory stores

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::account::{Account, AccountId, Group, User, UserId, UserRole};
use crate::domain::setup_key::SetupKeyType;
use crate::infrastructure::account::InMemoryAccountStore;
use crate::infrastructure::activity::{ActivityRecorder, InMemoryEventStore};
use crate::infrastructure::setup_key::{SetupKeyParams, SetupKeyService};

const DEMO_ACCOUNT: &str = "demo-account";
const DEMO_ADMIN: &str = "demo-admin";

/// Run the demo command
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let account_id = AccountId::new(DEMO_ACCOUNT);
    let admin = UserId::new(DEMO_ADMIN);

    let store = Arc::new(InMemoryAccountStore::with_data(
        vec![Account::new(account_id.clone())
            .with_group(Group::new("servers", "Servers"))
            .with_group(Group::new("laptops", "Laptops"))],
        vec![User::new(admin.clone(), account_id.clone(), UserRole::Admin)],
    ));
    let events = Arc::new(InMemoryEventStore::new());
    let recorder = ActivityRecorder::spawn(events.clone());

    let service = SetupKeyService::new(store, recorder.clone())
        .with_generator(config.setup_keys.generator());

    info!(account_id = %account_id, "Starting setup key demo");

    let created = service
        .create_setup_key(
            &account_id,
            config
                .setup_keys
                .default_params()?
                .with_auto_groups(vec!["servers".to_string()]),
            &admin,
        )
        .await?;
    let one_off = service
        .create_setup_key(
            &account_id,
            SetupKeyParams::new("single machine", SetupKeyType::OneOff),
            &admin,
        )
        .await?;

    let updated = service
        .save_setup_key(
            &account_id,
            Some(
                created
                    .clone()
                    .with_name("Fleet key")
                    .with_auto_groups(vec!["laptops".to_string()])
                    .with_revoked(true),
            ),
            &admin,
        )
        .await?;

    let listed = service.list_setup_keys(&account_id, &admin).await?;

    service
        .delete_setup_key(&account_id, &admin, one_off.id())
        .await?;

    recorder.flush().await;

    let activity: Vec<_> = events
        .events()
        .await
        .into_iter()
        .map(|e| {
            json!({
                "code": e.activity.code(),
                "message": e.activity.message(),
                "target_id": e.target_id,
                "meta": e.meta,
            })
        })
        .collect();

    let output = json!({
        "created": created,
        "updated": updated,
        "listed": listed,
        "deleted": one_off.id(),
        "activity": activity,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
