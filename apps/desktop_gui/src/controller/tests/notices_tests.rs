use super::*;

#[test]
fn notices_expire_after_ttl() {
    let start = Instant::now();
    let mut notices = Notices::default();
    notices.push_at(NoticeSeverity::Error, "Failed to save template", start);

    let remaining = notices.prune(start + Duration::from_secs(1));
    assert_eq!(remaining, Some(Duration::from_secs(2)));
    assert_eq!(notices.iter().count(), 1);

    assert_eq!(notices.prune(start + NOTICE_TTL), None);
    assert!(notices.is_empty());
}

#[test]
fn duplicate_notice_refreshes_instead_of_stacking() {
    let start = Instant::now();
    let mut notices = Notices::default();
    notices.push_at(NoticeSeverity::Error, "offline", start);
    notices.push_at(NoticeSeverity::Error, "offline", start + Duration::from_secs(2));

    assert_eq!(notices.iter().count(), 1);
    notices.prune(start + Duration::from_secs(4));
    assert_eq!(notices.iter().count(), 1, "refreshed notice is still live");
}

#[test]
fn oldest_notice_is_evicted_when_full() {
    let start = Instant::now();
    let mut notices = Notices::default();
    for n in 0..=MAX_NOTICES {
        notices.push_at(NoticeSeverity::Info, format!("notice {n}"), start);
    }
    let messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages.len(), MAX_NOTICES);
    assert_eq!(messages[0], "notice 1");
}
