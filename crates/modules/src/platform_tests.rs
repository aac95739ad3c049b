use super::*;
use crate::NotificationKind;

#[test]
fn installs_modules_in_fixed_order() {
    let bus = EventBus::default();
    let platform = Platform::install(&bus).unwrap();

    let names: Vec<_> = platform.modules().iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        vec!["auth", "community", "notifications", "pinpanclub", "audit"]
    );
    // auth: 2, notifications: 3, pinpanclub: 1, audit: 1
    assert_eq!(bus.subscription_count(), 7);
}

#[tokio::test]
async fn registration_reaches_every_interested_module() {
    let bus = EventBus::default();
    let platform = Platform::install(&bus).unwrap();

    let report = platform
        .auth
        .register_user("u-1", "ana@example.com")
        .await
        .unwrap()
        .into_report()
        .unwrap();

    assert_eq!(
        report.root().unwrap().handler_names(),
        vec!["auth.store_user", "notifications.welcome", "audit.record"]
    );
    assert!(platform.auth.user("u-1").is_some());
    assert_eq!(
        platform.notifications.for_user("u-1")[0].kind,
        NotificationKind::Welcome
    );
    assert_eq!(platform.audit.len(), 1);
}

#[tokio::test]
async fn match_cascade_is_audited_breadth_first() {
    let bus = EventBus::default();
    let platform = Platform::install(&bus).unwrap();

    let report = platform
        .pinpanclub
        .record_match("ana", "ben")
        .await
        .unwrap()
        .into_report()
        .unwrap();

    let types: Vec<_> = platform
        .audit
        .trail()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            "pinpanclub.match.finished",
            "pinpanclub.ranking.updated",
            "pinpanclub.ranking.updated",
        ]
    );
    assert!(report.is_clean());
    assert_eq!(platform.notifications.for_user("ana").len(), 1);
    assert_eq!(platform.notifications.for_user("ben").len(), 1);
}

#[tokio::test]
async fn featured_post_notifies_author() {
    let bus = EventBus::default();
    let platform = Platform::install(&bus).unwrap();

    platform
        .community
        .create_post("u-7", "Spring league", true)
        .await
        .unwrap();
    platform
        .community
        .create_post("u-7", "Lost racket", false)
        .await
        .unwrap();

    let inbox = platform.notifications.for_user("u-7");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::FeaturedPost);
}
