use gatewall_types::prelude::*;

#[test]
fn tier_normalizes_unknown_values_to_free() {
    assert_eq!(LicenseTier::normalize("PREMIUM"), LicenseTier::Premium);
    assert_eq!(LicenseTier::normalize("basic"), LicenseTier::Basic);
    assert_eq!(LicenseTier::normalize("GOLD"), LicenseTier::Free);
    assert_eq!(LicenseTier::normalize(""), LicenseTier::Free);
}

#[test]
fn tier_ordering_tracks_service_level() {
    assert!(LicenseTier::Premium > LicenseTier::Basic);
    assert!(LicenseTier::Basic > LicenseTier::Free);
}

#[test]
fn actor_id_round_trips_as_plain_string() {
    let system = serde_json::to_string(&ActorId::System).unwrap();
    assert_eq!(system, "\"system\"");

    let user: ActorId = serde_json::from_str("\"u_42\"").unwrap();
    assert_eq!(user, ActorId::User(Id("u_42".into())));

    let back: ActorId = serde_json::from_str(&system).unwrap();
    assert_eq!(back, ActorId::System);
}

#[test]
fn timestamp_arithmetic() {
    let t = Timestamp(1_000_000);
    assert_eq!(t.plus_secs(60).0, 1_060_000);
    assert_eq!(t.minus_secs(1).0, 999_000);
    assert!(t.plus_secs(1).is_after(t));
    assert!(!t.is_after(t));
}
