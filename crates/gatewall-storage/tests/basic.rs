use gatewall_storage::prelude::*;
use gatewall_types::prelude::*;

fn license(key: &str, limit: Option<u64>, count: u64, valid_until: Timestamp) -> License {
    License {
        key: key.into(),
        user_id: Id(format!("user_{key}")),
        admin_id: Id("admin_1".into()),
        tier: LicenseTier::Basic,
        hwids: vec![],
        valid_until,
        request_limit: limit,
        request_count: count,
        last_used_ip: None,
        last_used_hwid: None,
        created_at: Timestamp(0),
    }
}

fn upsert(address: &str, reason: &str, expires_at: Option<Timestamp>) -> BlockUpsert {
    BlockUpsert {
        address: address.into(),
        reason: Some(reason.into()),
        blocked_by: ActorId::System,
        license_key: None,
        expires_at,
    }
}

#[tokio::test]
async fn reblocking_updates_in_place() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();

    let first = vault.upsert_block(upsert("10.0.0.1", "abuse", None), now).await.unwrap();
    vault.deactivate("10.0.0.1").await.unwrap();
    let second = vault
        .upsert_block(upsert("10.0.0.1", "abuse again", Some(now.plus_secs(60))), now)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.active);
    assert_eq!(second.reason.as_deref(), Some("abuse again"));

    let page = vault.list_blocked(1, 10).await.unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn deactivate_reports_touched_and_tolerates_absent() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    vault.upsert_block(upsert("10.0.0.2", "x", None), now).await.unwrap();

    assert_eq!(vault.deactivate("10.0.0.2").await.unwrap(), 1);
    assert_eq!(vault.deactivate("10.0.0.2").await.unwrap(), 0);
    assert_eq!(vault.deactivate("198.51.100.9").await.unwrap(), 0);
}

#[tokio::test]
async fn active_addresses_skip_expired_records() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    vault.upsert_block(upsert("10.0.0.3", "permanent", None), now).await.unwrap();
    vault
        .upsert_block(upsert("10.0.0.4", "short", Some(now.minus_secs(1))), now)
        .await
        .unwrap();

    let addrs = vault.active_addresses(now).await.unwrap();
    assert_eq!(addrs, vec!["10.0.0.3".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn consume_request_never_overshoots_the_ceiling() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    vault
        .create(&license("lic_race", Some(5), 4, now.plus_secs(3600)))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let vault = vault.clone();
        handles.push(tokio::spawn(async move {
            vault.consume_request("lic_race", now, Some("10.1.1.1"), None).await.unwrap()
        }));
    }

    let mut consumed = 0;
    let mut exceeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            ConsumeOutcome::Consumed(_) => consumed += 1,
            ConsumeOutcome::LimitExceeded => exceeded += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(consumed, 1);
    assert_eq!(exceeded, 7);
    assert_eq!(vault.license_snapshot("lic_race").unwrap().request_count, 5);
}

#[tokio::test]
async fn consume_request_rejects_expired_without_increment() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    vault
        .create(&license("lic_old", None, 3, now.minus_secs(10)))
        .await
        .unwrap();

    let outcome = vault.consume_request("lic_old", now, None, None).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Expired);
    assert_eq!(vault.license_snapshot("lic_old").unwrap().request_count, 3);
}

#[tokio::test]
async fn consume_request_tracks_last_used() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    vault
        .create(&license("lic_use", Some(10), 0, now.plus_secs(3600)))
        .await
        .unwrap();

    vault
        .consume_request("lic_use", now, Some("203.0.113.7"), Some("HW-1"))
        .await
        .unwrap();

    let stored = vault.license_snapshot("lic_use").unwrap();
    assert_eq!(stored.last_used_ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(stored.last_used_hwid.as_deref(), Some("HW-1"));
}

#[tokio::test]
async fn attempt_counting_is_scoped_by_address_and_window() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    for (address, age_secs) in [("10.2.0.1", 10), ("10.2.0.1", 30), ("10.2.0.2", 5), ("10.2.0.1", 90_000)] {
        vault
            .append(FailedAttempt {
                id: Id::new_random(),
                address: address.into(),
                endpoint: Some("/api/data".into()),
                kind: AttemptKind::RateLimit,
                at: now.minus_secs(age_secs),
            })
            .await
            .unwrap();
    }

    let day_ago = now.minus_secs(86_400);
    assert_eq!(vault.count_since("10.2.0.1", day_ago).await.unwrap(), 2);
    assert_eq!(vault.count_since("10.2.0.2", day_ago).await.unwrap(), 1);
    assert_eq!(vault.count_since("10.2.0.3", day_ago).await.unwrap(), 0);
}

#[tokio::test]
async fn listing_joins_owner_and_paginates_newest_first() {
    let vault = MemoryVault::new();
    let now = Timestamp::now();
    vault
        .create(&license("lic_a", None, 0, now.plus_secs(3600)))
        .await
        .unwrap();

    for i in 0..3u32 {
        let mut up = upsert(&format!("172.16.0.{i}"), "test", None);
        if i == 0 {
            up.license_key = Some("lic_a".into());
        }
        vault.upsert_block(up, Timestamp(now.0 + i as i64)).await.unwrap();
    }

    let first = vault.list_blocked(1, 2).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].record.address, "172.16.0.2");
    assert_eq!(first.next.as_deref(), Some("2"));

    let second = vault.list_blocked(2, 2).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].record.address, "172.16.0.0");
    assert_eq!(
        second.items[0].owner_user_id,
        Some(Id("user_lic_a".into()))
    );
    assert!(second.next.is_none());
}
