//! Weighted recommendations, auto mode and the rank report

mod common;

use async_trait::async_trait;
use common::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sona_core::{Catalog, SonaError, Track};
use sona_playback::{
    CommandOutcome, PlaybackConfig, PlaybackError, RankStore, RecommendationSampler,
    SamplerConfig, SessionState, UserInputError,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn store(entries: &[(&str, u64)]) -> RankStore {
    RankStore::from_map(
        entries
            .iter()
            .map(|(id, count)| ((*id).to_string(), *count))
            .collect(),
    )
}

fn catalog_with(tracks: &[Track]) -> FakeCatalog {
    let catalog = FakeCatalog::default();
    for t in tracks {
        catalog.add(t.clone());
    }
    catalog
}

// ===== Sampler =====

#[tokio::test]
async fn test_sampling_is_weighted_by_play_count() {
    let catalog = catalog_with(&[track("a", 200), track("b", 200)]);
    let ranks = store(&[("a", 3), ("b", 1)]);
    let sampler = RecommendationSampler::default();
    let mut rng = StdRng::seed_from_u64(42);

    let mut first_a = 0;
    let trials = 2000;
    for _ in 0..trials {
        let tracks = sampler
            .sample(5, &ranks, &HashSet::new(), &catalog, &mut rng)
            .await;
        // Only two ids exist, so at most two come back
        assert_eq!(tracks.len(), 2);
        if tracks[0].id == "a" {
            first_a += 1;
        }
    }

    // a leads about three times in four
    let share = f64::from(first_a) / f64::from(trials);
    assert!((0.68..0.82).contains(&share), "a led {:.3} of draws", share);
}

#[tokio::test]
async fn test_sampling_skips_queued_and_recent_ids() {
    let catalog = catalog_with(&[track("a", 200), track("b", 200), track("c", 200)]);
    let ranks = store(&[("a", 50), ("b", 50), ("c", 1)]);
    let excluded: HashSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
    let sampler = RecommendationSampler::default();

    for seed in 0..25 {
        let tracks = sampler
            .sample(3, &ranks, &excluded, &catalog, &mut StdRng::seed_from_u64(seed))
            .await;
        let drawn: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(drawn, vec!["c"]);
    }
}

#[tokio::test]
async fn test_sampling_filters_durations_and_refills() {
    let catalog = catalog_with(&[
        track("short", 59),
        track("long", 481),
        track("edge_low", 60),
        track("edge_high", 480),
    ]);
    let ranks = store(&[("short", 5), ("long", 5), ("edge_low", 1), ("edge_high", 1)]);
    let sampler = RecommendationSampler::default();

    for seed in 0..25 {
        let tracks = sampler
            .sample(2, &ranks, &HashSet::new(), &catalog, &mut StdRng::seed_from_u64(seed))
            .await;
        let mut drawn: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        drawn.sort_unstable();
        assert_eq!(drawn, vec!["edge_high", "edge_low"], "seed {}", seed);
    }
}

#[tokio::test]
async fn test_unresolved_ids_are_dropped() {
    let catalog = catalog_with(&[track("known", 200)]);
    let ranks = store(&[("known", 1), ("gone", 10)]);
    let sampler = RecommendationSampler::default();

    let tracks = sampler
        .sample(2, &ranks, &HashSet::new(), &catalog, &mut StdRng::seed_from_u64(9))
        .await;
    let drawn: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(drawn, vec!["known"]);
}

/// Counts rounds and fails every lookup
struct BrokenCatalog {
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl Catalog for BrokenCatalog {
    async fn resolve_titles(&self, ids: &[String]) -> sona_core::Result<HashMap<String, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(ids.to_vec());
        Err(SonaError::lookup("quota exceeded"))
    }

    async fn resolve_durations(&self, _ids: &[String]) -> sona_core::Result<HashMap<String, u32>> {
        Err(SonaError::lookup("quota exceeded"))
    }

    async fn search(&self, _keyword: &str) -> sona_core::Result<Vec<Track>> {
        Err(SonaError::lookup("quota exceeded"))
    }

    async fn resolve_playlist(&self, _list_id: &str) -> sona_core::Result<Vec<Track>> {
        Err(SonaError::lookup("quota exceeded"))
    }
}

#[tokio::test]
async fn test_rounds_are_bounded_and_never_redraw() {
    let catalog = BrokenCatalog {
        calls: AtomicUsize::new(0),
        batches: Mutex::new(Vec::new()),
    };
    let entries: Vec<(String, u64)> = (0..100).map(|i| (format!("id{}", i), 1)).collect();
    let ranks = RankStore::from_map(entries.into_iter().collect());
    let sampler = RecommendationSampler::new(SamplerConfig::default());

    let tracks = sampler
        .sample(3, &ranks, &HashSet::new(), &catalog, &mut StdRng::seed_from_u64(5))
        .await;

    assert!(tracks.is_empty());
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 6);

    let batches = catalog.batches.lock().unwrap();
    let all: Vec<&String> = batches.iter().flatten().collect();
    let distinct: HashSet<&String> = all.iter().copied().collect();
    assert_eq!(all.len(), 18);
    assert_eq!(distinct.len(), 18, "No id is drawn twice in one call");
}

#[tokio::test]
async fn test_stops_early_when_pool_is_exhausted() {
    let catalog = BrokenCatalog {
        calls: AtomicUsize::new(0),
        batches: Mutex::new(Vec::new()),
    };
    let ranks = store(&[("a", 1), ("b", 1)]);
    let sampler = RecommendationSampler::default();

    sampler
        .sample(5, &ranks, &HashSet::new(), &catalog, &mut StdRng::seed_from_u64(1))
        .await;
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
}

// ===== Sample command =====

#[tokio::test(start_paused = true)]
async fn test_sample_command_enqueues_and_starts() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 3), ("b", 1)]);
    h.catalog.add(track("a", 200));
    h.catalog.add(track("b", 200));
    let (session, _task) = h.start(PlaybackConfig::default());

    let outcome = session
        .sample_and_enqueue(listener("u"), None)
        .await
        .unwrap();
    match outcome {
        CommandOutcome::Enqueued(tracks) => assert_eq!(tracks.len(), 2),
        other => panic!("unexpected outcome {:?}", other),
    }

    let snap = session.snapshot().await.unwrap();
    assert_eq!(snap.state, SessionState::Playing);
    assert_eq!(snap.queue.len(), 1);
    assert!(h.messenger.any_text_contains("Added 2 recommended tracks"));
}

#[tokio::test(start_paused = true)]
async fn test_sample_command_excludes_queue_and_history() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 5), ("b", 5), ("c", 5)]);
    for id in ["a", "b", "c"] {
        h.catalog.add(track(id, 200));
    }
    let (session, _task) = h.start(PlaybackConfig::default());

    // a finishes (history), b plays, c is queued
    session.play(listener("u"), "track:a").await.unwrap();
    session.play(listener("u"), "track:b").await.unwrap();
    h.transport.finish_current();
    session.play(listener("u"), "track:c").await.unwrap();

    let outcome = session
        .sample_and_enqueue(listener("u"), Some(3))
        .await
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Enqueued(Vec::new()));
    assert!(h.messenger.any_text_contains("Added 0 recommended tracks"));
}

#[tokio::test(start_paused = true)]
async fn test_sample_command_rejections() {
    let h = Harness::new();
    let (session, _task) = h.start(PlaybackConfig::default());

    let err = session.sample_and_enqueue(listener("u"), None).await;
    assert!(matches!(
        err,
        Err(PlaybackError::UserInput(UserInputError::EmptyRankData))
    ));

    let err = session.sample_and_enqueue(outsider("u"), None).await;
    assert!(matches!(
        err,
        Err(PlaybackError::UserInput(UserInputError::NotInVoiceChannel))
    ));

    let err = session.sample_and_enqueue(listener("u"), Some(0)).await;
    assert!(matches!(
        err,
        Err(PlaybackError::UserInput(UserInputError::InvalidCount))
    ));
}

// ===== Auto mode =====

#[tokio::test(start_paused = true)]
async fn test_auto_mode_starts_immediately_when_idle() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 3)]);
    h.catalog.add(track("a", 200));
    let (session, _task) = h.start(PlaybackConfig::default());

    let outcome = session.toggle_auto_recommend(listener("u")).await.unwrap();
    assert_eq!(outcome, CommandOutcome::AutoRecommend(true));

    let snap = session.snapshot().await.unwrap();
    assert!(snap.auto_recommend);
    assert_eq!(snap.current.unwrap().track.id, "a");
}

#[tokio::test(start_paused = true)]
async fn test_auto_mode_arms_timer_when_nothing_to_sample() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 3)]);
    h.catalog.add(track("a", 200));
    let (session, _task) = h.start(PlaybackConfig::default());
    session.toggle_auto_recommend(listener("u")).await.unwrap();

    // a is now in history, nothing else to draw
    h.transport.finish_current();
    let snap = session.snapshot().await.unwrap();

    assert!(snap.auto_recommend);
    assert!(snap.current.is_none());
    assert!(snap.idle_timer_armed);
    assert_eq!(snap.state, SessionState::IdlePendingDisconnect);
    assert_eq!(snap.play_counts.get("a"), Some(&4));
}

#[tokio::test(start_paused = true)]
async fn test_auto_mode_continues_after_queue_drains() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("r", 2)]);
    h.catalog.add(track("r", 200));
    h.catalog.add(track("q", 200));
    let (session, _task) = h.start(PlaybackConfig::default());

    session.play(listener("u"), "track:q").await.unwrap();
    session.toggle_auto_recommend(listener("u")).await.unwrap();
    let snap = session.snapshot().await.unwrap();
    assert_eq!(snap.current.unwrap().track.id, "q", "Toggling does not interrupt");

    h.transport.finish_current();
    let snap = session.snapshot().await.unwrap();
    assert_eq!(snap.current.unwrap().track.id, "r");
}

#[tokio::test(start_paused = true)]
async fn test_auto_mode_without_voice_only_flips_the_flag() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 3)]);
    h.catalog.add(track("a", 200));
    let (session, _task) = h.start(PlaybackConfig::default());

    session.toggle_auto_recommend(outsider("u")).await.unwrap();
    let snap = session.snapshot().await.unwrap();

    assert!(snap.auto_recommend);
    assert!(snap.current.is_none());
    assert_eq!(h.transport.connect_count(), 0);

    let outcome = session.toggle_auto_recommend(outsider("u")).await.unwrap();
    assert_eq!(outcome, CommandOutcome::AutoRecommend(false));
}

#[tokio::test(start_paused = true)]
async fn test_toggle_off_keeps_current_track() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 3)]);
    h.catalog.add(track("a", 200));
    let (session, _task) = h.start(PlaybackConfig::default());

    session.toggle_auto_recommend(listener("u")).await.unwrap();
    session.toggle_auto_recommend(listener("u")).await.unwrap();

    let snap = session.snapshot().await.unwrap();
    assert!(!snap.auto_recommend);
    assert_eq!(snap.current.unwrap().track.id, "a");
}

// ===== Rank report =====

#[tokio::test(start_paused = true)]
async fn test_rank_report_lists_resolved_titles() {
    let h = Harness::new();
    h.ranks.seed("guild", &[("a", 7), ("gone", 5), ("b", 2)]);
    h.catalog.add(track("a", 200));
    h.catalog.add(track("b", 200));
    let (session, _task) = h.start(PlaybackConfig::default());

    let outcome = session.rank_report(outsider("u")).await.unwrap();
    assert_eq!(outcome, CommandOutcome::Reported(2));

    let report = h.messenger.texts().last().cloned().unwrap();
    assert!(report.contains("1. Song A (7)"));
    assert!(report.contains("3. Song B (2)"));
    assert!(!report.contains("2. "));
    assert!(!report.contains("gone"));
}

#[tokio::test(start_paused = true)]
async fn test_rank_report_without_counts() {
    let h = Harness::new();
    let (session, _task) = h.start(PlaybackConfig::default());

    let err = session.rank_report(outsider("u")).await;
    assert!(matches!(
        err,
        Err(PlaybackError::UserInput(UserInputError::EmptyRankData))
    ));
    assert_eq!(h.catalog.title_requests.load(Ordering::SeqCst), 0);
}
