use super::*;
use agora_core::{NewEvent, Payload};
use yare::parameterized;

#[parameterized(
    even = { 1200.0, 1200.0, 1216.0, 1184.0 },
    favourite_wins = { 1400.0, 1000.0, 1402.909, 997.091 },
    underdog_wins = { 1000.0, 1400.0, 1029.091, 1370.909 },
)]
fn elo_moves_points_from_loser_to_winner(winner: f64, loser: f64, new_winner: f64, new_loser: f64) {
    let (w, l) = elo_update(winner, loser, K_FACTOR);
    assert!((w - new_winner).abs() < 0.01, "winner {w}");
    assert!((l - new_loser).abs() < 0.01, "loser {l}");
    assert!((w + l - winner - loser).abs() < 1e-9);
}

fn setup() -> (EventBus, Pinpanclub) {
    let bus = EventBus::default();
    let club = Pinpanclub::new(&bus);
    bus.install(&club).unwrap();
    (bus, club)
}

#[tokio::test]
async fn first_match_ranks_both_players() {
    let (_bus, club) = setup();
    let report = club
        .record_match("ana", "ben")
        .await
        .unwrap()
        .into_report()
        .unwrap();

    let standings = club.standings();
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].player_id, "ana");
    assert_eq!(standings[0].wins, 1);
    assert_eq!(standings[1].player_id, "ben");
    assert_eq!(standings[1].losses, 1);

    let nested: Vec<_> = report.events.iter().filter(|e| e.depth == 1).collect();
    assert_eq!(nested.len(), 2);
    assert!(nested.iter().all(|e| e.event_type == RANKING_UPDATED));
    assert!(nested.iter().all(|e| e.source_module == "pinpanclub"));
    assert_eq!(
        nested[0].caused_by.as_deref(),
        report.root().map(|r| r.event_id.as_str())
    );
}

#[tokio::test]
async fn upset_swaps_ranks() {
    let (bus, club) = setup();
    club.record_match("ana", "ben").await.unwrap();

    let updates = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&updates);
    bus.subscribe(
        RANKING_UPDATED,
        handler_fn("tap", move |event| {
            let updates = Arc::clone(&captured);
            async move {
                let update: RankingUpdated = event.payload_as()?;
                updates.lock().unwrap().push(update);
                Ok(())
            }
        }),
    )
    .unwrap();

    club.record_match("ben", "ana").await.unwrap();

    let updates = updates.lock().unwrap();
    let moves: Vec<_> = updates
        .iter()
        .map(|u| (u.player_id.as_str(), u.old_rank, u.new_rank))
        .collect();
    assert_eq!(moves, vec![("ben", Some(2), 1), ("ana", Some(1), 2)]);
}

#[tokio::test]
async fn stable_ranks_publish_nothing() {
    let (_bus, club) = setup();
    club.record_match("ana", "ben").await.unwrap();

    let report = club
        .record_match("ana", "ben")
        .await
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(report.events.len(), 1);
}

#[tokio::test]
async fn self_match_is_rejected() {
    let (bus, club) = setup();
    let err = club.record_match("ana", "ana").await.unwrap_err();
    assert!(matches!(err, ModuleError::Invalid(_)));
    assert_eq!(bus.stats().published, 0);
}

#[tokio::test]
async fn foreign_self_match_event_fails_handler() {
    let (bus, club) = setup();
    let mut payload = Payload::new();
    payload.insert("match_id".to_string(), "m-x".into());
    payload.insert("winner_id".to_string(), "ana".into());
    payload.insert("loser_id".to_string(), "ana".into());

    let report = bus
        .publish(NewEvent::new(MATCH_FINISHED).unwrap().with_payload(payload))
        .await
        .into_report()
        .unwrap();

    assert_eq!(report.failures().len(), 1);
    assert!(club.standings().is_empty());
}
