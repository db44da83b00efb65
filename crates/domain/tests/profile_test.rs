use ironwall_domain::{DefaultAction, LayeredProfile, ProfileSettings};
use std::sync::Arc;

#[tokio::test]
async fn test_revision_starts_at_one() {
    let profile = LayeredProfile::new(ProfileSettings::default());
    assert_eq!(profile.revision_cnt(), 1);
    assert!(!profile.needs_update());
}

#[tokio::test]
async fn test_update_bumps_and_returns_revision() {
    let profile = LayeredProfile::new(ProfileSettings::default());

    let new = profile.update().await;
    assert_eq!(new, 2);
    assert_eq!(profile.revision_cnt(), 2);
}

#[tokio::test]
async fn test_mark_for_update_stages_settings() {
    let profile = LayeredProfile::new(ProfileSettings::default());

    profile.mark_for_update(ProfileSettings {
        block_inbound: true,
        default_action: DefaultAction::Block,
        ..ProfileSettings::default()
    });
    assert!(profile.needs_update());

    // Staged settings are not visible until update is applied.
    {
        let settings = profile.lock_for_usage().await;
        assert!(!settings.block_inbound);
    }

    let rev = profile.update().await;
    assert_eq!(rev, 2);
    assert!(!profile.needs_update());

    let settings = profile.lock_for_usage().await;
    assert!(settings.block_inbound);
    assert_eq!(settings.default_action, DefaultAction::Block);
}

#[tokio::test]
async fn test_concurrent_updates_stay_monotonic() {
    let profile = Arc::new(LayeredProfile::new(ProfileSettings::default()));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let profile = Arc::clone(&profile);
        handles.push(tokio::spawn(async move { profile.update().await }));
    }

    let mut revisions = Vec::new();
    for handle in handles {
        revisions.push(handle.await.unwrap());
    }
    revisions.sort_unstable();
    revisions.dedup();

    // 16 updates, 16 distinct revision values, final counter at 17.
    assert_eq!(revisions.len(), 16);
    assert_eq!(profile.revision_cnt(), 17);
}

#[tokio::test]
async fn test_readers_overlap() {
    let profile = LayeredProfile::new(ProfileSettings::default());
    let a = profile.lock_for_usage().await;
    let b = profile.lock_for_usage().await;
    assert_eq!(a.default_action, b.default_action);
}
