//! Integration tests for the player
//!
//! Drives `Player` end to end over the in-memory and SQLite track stores,
//! the session cache and the headless output.

use async_trait::async_trait;
use explayer_core::{ExError, RepeatMode, Track, TrackId, TrackStore};
use explayer_playback::{
    HeadlessOutput, ImportFile, PlaybackStatus, Player, PlayerConfig, PlayerEvent,
};
use explayer_storage::{
    create_pool, run_migrations, FileKeyValueStore, MemoryTrackStore, SessionCache,
    SqliteTrackStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ===== Helpers =====

fn player_over(store: Arc<dyn TrackStore>, cache: SessionCache) -> Player {
    Player::new(
        store,
        cache,
        Box::new(HeadlessOutput::new()),
        PlayerConfig::default(),
    )
}

fn memory_player() -> (Player, Arc<MemoryTrackStore>) {
    let store = Arc::new(MemoryTrackStore::new());
    (player_over(store.clone(), SessionCache::in_memory()), store)
}

fn track_with_duration(id: &str, duration: f64) -> Track {
    let mut track = Track::with_id(TrackId::new(id), format!("Song {id}"), "Unknown", vec![0u8; 16]);
    track.duration = duration;
    track
}

/// Player over tracks of known length, restored and ready
async fn player_with_tracks(durations: &[f64]) -> Player {
    let tracks = durations
        .iter()
        .enumerate()
        .map(|(i, d)| track_with_duration(&format!("{i}"), *d));
    let mut player = player_over(
        Arc::new(MemoryTrackStore::with_tracks(tracks)),
        SessionCache::in_memory(),
    );
    player.restore().await.unwrap();
    player
}

/// Track store that can be switched into failing mode
#[derive(Default)]
struct FlakyStore {
    inner: MemoryTrackStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> explayer_core::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ExError::storage("store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TrackStore for FlakyStore {
    async fn put(&self, track: &Track) -> explayer_core::Result<()> {
        self.check()?;
        self.inner.put(track).await
    }

    async fn get_all(&self) -> explayer_core::Result<Vec<Track>> {
        self.check()?;
        self.inner.get_all().await
    }

    async fn delete(&self, id: &TrackId) -> explayer_core::Result<()> {
        self.check()?;
        self.inner.delete(id).await
    }
}

// ===== Scenario =====

#[tokio::test]
async fn test_import_favorite_remove_scenario() {
    let (mut player, store) = memory_player();

    let a = player.import("A.mp3", vec![1u8; 8]).await.unwrap();
    let b = player.import("B.mp3", vec![2u8; 8]).await.unwrap();
    let titles: Vec<&str> = player
        .playlist()
        .tracks()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["A", "B"]);

    assert_eq!(player.toggle_favorite(&a), Some(true));
    assert_eq!(player.playlist().favorites().collect::<Vec<_>>(), vec![&a]);

    assert!(player.remove(&a).await.unwrap());
    assert_eq!(player.playlist().len(), 1);
    assert_eq!(player.playlist().tracks()[0].id, b);
    assert_eq!(player.playlist().favorite_count(), 0);
    assert!(!store.contains(&a).await);

    assert_eq!(player.playlist().current_index(), Some(0));
    player.play_next().await.unwrap();
    assert_eq!(player.playlist().current_index(), Some(0));
    assert!(player.transport().is_playing());
}

#[tokio::test]
async fn test_imported_ids_follow_import_order() {
    let (mut player, store) = memory_player();
    let mut ids = Vec::new();
    for name in ["one.mp3", "two.ogg", "three.flac"] {
        ids.push(player.import(name, vec![0u8; 4]).await.unwrap());
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let stored: Vec<TrackId> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(stored, ids);
}

#[tokio::test]
async fn test_import_batch_skips_non_audio() {
    let (mut player, _store) = memory_player();

    let summary = player
        .import_files(vec![
            ImportFile::new("song.mp3", "audio/mpeg", vec![1u8; 4]),
            ImportFile::new("cover.jpg", "image/jpeg", vec![2u8; 4]),
            ImportFile::new("voice.wav", "audio/wav", vec![3u8; 4]),
            ImportFile::new("readme", "", vec![4u8; 4]),
        ])
        .await;

    assert_eq!(summary.imported.len(), 2);
    assert_eq!(summary.skipped_non_audio, 2);
    assert!(summary.failed.is_empty());
    assert_eq!(player.playlist().tracks()[1].title, "voice");
}

// ===== Transport =====

#[tokio::test]
async fn test_toggle_play_pause_resume() {
    let mut player = player_with_tracks(&[100.0, 100.0]).await;

    player.toggle_play().await.unwrap();
    assert_eq!(player.status(), PlaybackStatus::Playing);
    player.tick(Duration::from_secs(10)).await.unwrap();

    player.toggle_play().await.unwrap();
    assert_eq!(player.status(), PlaybackStatus::Paused);

    player.toggle_play().await.unwrap();
    assert_eq!(player.status(), PlaybackStatus::Playing);
    assert_eq!(player.transport().position(), 10.0);
}

#[tokio::test]
async fn test_next_previous_wrap() {
    let mut player = player_with_tracks(&[100.0, 100.0, 100.0]).await;

    player.play_previous().await.unwrap();
    assert_eq!(player.playlist().current_index(), Some(2));
    player.play_next().await.unwrap();
    assert_eq!(player.playlist().current_index(), Some(0));
    player.play_next().await.unwrap();
    assert_eq!(player.playlist().current_index(), Some(1));
}

#[tokio::test]
async fn test_next_on_empty_playlist_is_noop() {
    let (mut player, _store) = memory_player();
    player.play_next().await.unwrap();
    player.play_previous().await.unwrap();
    player.handle_track_end().await.unwrap();
    assert_eq!(player.status(), PlaybackStatus::Stopped);
    assert_eq!(player.playlist().current_index(), None);
}

#[tokio::test]
async fn test_shuffle_next_stays_in_range() {
    let mut player = player_with_tracks(&[100.0, 100.0, 100.0, 100.0]).await;
    assert!(player.toggle_shuffle());

    for _ in 0..20 {
        player.play_next().await.unwrap();
        assert!(player.playlist().current_index().unwrap() < 4);
        player.play_previous().await.unwrap();
        assert!(player.playlist().current_index().unwrap() < 4);
    }
}

#[tokio::test]
async fn test_repeat_none_stops_at_last_track() {
    let mut player = player_with_tracks(&[10.0, 10.0]).await;
    player.play_track_at(1).await.unwrap();

    player.handle_track_end().await.unwrap();

    assert_eq!(player.status(), PlaybackStatus::Stopped);
    assert!(!player.snapshot().is_playing);
    assert_eq!(player.playlist().current_index(), Some(1));
}

#[tokio::test]
async fn test_repeat_none_advances_before_last_track() {
    let mut player = player_with_tracks(&[10.0, 10.0]).await;
    player.play_track_at(0).await.unwrap();

    player.handle_track_end().await.unwrap();

    assert!(player.transport().is_playing());
    assert_eq!(player.playlist().current_index(), Some(1));
}

#[tokio::test]
async fn test_repeat_all_wraps_to_first_track() {
    let mut player = player_with_tracks(&[10.0, 10.0, 10.0]).await;
    player.toggle_repeat();
    player.toggle_repeat();
    assert_eq!(player.transport().repeat_mode(), RepeatMode::All);

    player.play_track_at(2).await.unwrap();
    player.handle_track_end().await.unwrap();

    assert_eq!(player.playlist().current_index(), Some(0));
    assert!(player.transport().is_playing());
    assert_eq!(player.transport().position(), 0.0);
}

#[tokio::test]
async fn test_repeat_one_restarts_same_track() {
    let mut player = player_with_tracks(&[10.0, 10.0]).await;
    assert_eq!(player.toggle_repeat(), RepeatMode::One);

    player.play_track_at(1).await.unwrap();
    player.tick(Duration::from_secs(7)).await.unwrap();
    player.handle_track_end().await.unwrap();

    assert_eq!(player.playlist().current_index(), Some(1));
    assert_eq!(player.transport().position(), 0.0);
    assert!(player.transport().is_playing());
}

#[tokio::test]
async fn test_ticks_play_through_the_playlist() {
    let mut player = player_with_tracks(&[3.0, 3.0]).await;
    player.toggle_play().await.unwrap();

    player.tick(Duration::from_secs(4)).await.unwrap();
    assert_eq!(player.playlist().current_index(), Some(1));
    assert!(player.transport().is_playing());

    player.tick(Duration::from_secs(4)).await.unwrap();
    assert_eq!(player.status(), PlaybackStatus::Stopped);

    let ended = player
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlayerEvent::TrackEnded { .. }))
        .count();
    assert_eq!(ended, 2);
}

#[tokio::test]
async fn test_seek_uses_duration() {
    let mut player = player_with_tracks(&[200.0]).await;
    player.toggle_play().await.unwrap();

    assert!(player.seek_to(0.5).unwrap());
    assert_eq!(player.transport().position(), 100.0);
}

#[tokio::test]
async fn test_seek_with_unknown_duration_is_noop() {
    let mut player = player_with_tracks(&[0.0]).await;
    player.toggle_play().await.unwrap();
    player.on_position_tick(Duration::from_secs(12));

    assert!(!player.seek_to(0.5).unwrap());
    assert_eq!(player.transport().position(), 12.0);
}

#[tokio::test]
async fn test_volume_is_linear() {
    let mut player = player_with_tracks(&[10.0]).await;
    player.set_volume(25);
    assert!((player.transport().volume().gain() - 0.25).abs() < f32::EPSILON);

    player.toggle_mute();
    assert_eq!(player.transport().volume().gain(), 0.0);
    assert_eq!(player.transport().volume().level(), 25);
}

#[tokio::test]
async fn test_removing_loaded_track_stops_playback() {
    let mut player = player_with_tracks(&[10.0, 10.0, 10.0]).await;
    player.play_track_at(1).await.unwrap();

    let loaded = player.transport().loaded_track().cloned().unwrap();
    player.remove(&loaded).await.unwrap();

    assert_eq!(player.status(), PlaybackStatus::Stopped);
    assert!(player.transport().loaded_track().is_none());
    assert_eq!(player.playlist().current_index(), Some(1));
}

#[tokio::test]
async fn test_removing_earlier_track_keeps_current() {
    let mut player = player_with_tracks(&[10.0, 10.0, 10.0]).await;
    player.play_track_at(2).await.unwrap();

    player.remove(&TrackId::new("0")).await.unwrap();

    assert_eq!(player.playlist().current_index(), Some(1));
    assert_eq!(player.current_track().unwrap().id, TrackId::new("2"));
    assert!(player.transport().is_playing());
}

#[tokio::test]
async fn test_metadata_resolves_duration_everywhere() {
    let (mut player, store) = memory_player();
    let id = player.import("Late.mp3", vec![0u8; 8]).await.unwrap();
    player.toggle_play().await.unwrap();

    player
        .on_metadata_loaded(Duration::from_secs(180))
        .await
        .unwrap();

    assert_eq!(player.playlist().get_by_id(&id).unwrap().duration, 180.0);
    let stored = store.get_all().await.unwrap();
    assert_eq!(stored[0].duration, 180.0);
}

// ===== Failures =====

#[tokio::test]
async fn test_failed_store_put_does_not_add_track() {
    let store = Arc::new(FlakyStore::default());
    let mut player = player_over(store.clone(), SessionCache::in_memory());

    store.fail(true);
    let result = player.import("Lost.mp3", vec![0u8; 4]).await;

    assert!(result.unwrap_err().is_storage_failure());
    assert!(player.playlist().is_empty());

    let summary = player
        .import_files(vec![ImportFile::new("Lost.mp3", "audio/mpeg", vec![0u8; 4])])
        .await;
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].name, "Lost.mp3");
}

#[tokio::test]
async fn test_failed_store_delete_keeps_track() {
    let store = Arc::new(FlakyStore::default());
    let mut player = player_over(store.clone(), SessionCache::in_memory());
    let id = player.import("Kept.mp3", vec![0u8; 4]).await.unwrap();
    player.toggle_favorite(&id);

    store.fail(true);
    assert!(player.remove(&id).await.is_err());

    assert!(player.playlist().contains(&id));
    assert!(player.playlist().is_favorite(&id));
}

#[tokio::test]
async fn test_failed_restore_leaves_player_usable() {
    let store = Arc::new(FlakyStore::default());
    let mut player = player_over(store.clone(), SessionCache::in_memory());

    store.fail(true);
    assert!(player.restore().await.is_err());

    store.fail(false);
    player.import("Fresh.mp3", vec![0u8; 4]).await.unwrap();
    assert_eq!(player.playlist().len(), 1);
}

#[tokio::test]
async fn test_remove_unknown_track_is_noop() {
    let mut player = player_with_tracks(&[10.0]).await;
    assert!(!player.remove(&TrackId::new("nope")).await.unwrap());
    assert_eq!(player.playlist().len(), 1);
}

// ===== Session sync =====

#[tokio::test]
async fn test_session_round_trip_over_sqlite_and_file_cache() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", dir.path().join("explayer.db").display());
    let session_path = dir.path().join("session.json");

    let pool = create_pool(&db_url).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let mut player = player_over(
        Arc::new(SqliteTrackStore::new(pool.clone())),
        SessionCache::new(FileKeyValueStore::open(&session_path)),
    );
    player.restore().await.unwrap();

    let a = player.import("A.mp3", vec![1u8; 8]).await.unwrap();
    let _b = player.import("B.mp3", vec![2u8; 8]).await.unwrap();
    let c = player.import("C.mp3", vec![3u8; 8]).await.unwrap();
    player.toggle_favorite(&c);
    player.toggle_favorite(&a);
    player.toggle_shuffle();
    player.toggle_repeat();
    player.play_track(&c).await.unwrap();
    player.on_metadata_loaded(Duration::from_secs(240)).await.unwrap();
    player.on_position_tick(Duration::from_secs(60));
    player.toggle_play().await.unwrap();
    assert_eq!(player.snapshot().current_time, 60.0);

    let before_tracks: Vec<TrackId> = player.playlist().tracks().iter().map(|t| t.id.clone()).collect();
    let before_favorites: Vec<TrackId> = player.playlist().favorites().cloned().collect();
    let before_snapshot = player.snapshot();
    drop(player);

    let mut restored = player_over(
        Arc::new(SqliteTrackStore::new(pool)),
        SessionCache::new(FileKeyValueStore::open(&session_path)),
    );
    restored.restore().await.unwrap();

    let after_tracks: Vec<TrackId> = restored.playlist().tracks().iter().map(|t| t.id.clone()).collect();
    let after_favorites: Vec<TrackId> = restored.playlist().favorites().cloned().collect();
    assert_eq!(after_tracks, before_tracks);
    assert_eq!(after_favorites, before_favorites);
    assert_eq!(restored.snapshot(), before_snapshot);
    assert_eq!(restored.current_track().unwrap().duration, 240.0);
    assert_eq!(&restored.current_track().unwrap().data[..], &[3u8; 8][..]);
}

#[tokio::test]
async fn test_restore_resumes_playing_session() {
    let store = Arc::new(MemoryTrackStore::with_tracks([
        track_with_duration("0", 100.0),
        track_with_duration("1", 100.0),
    ]));
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let mut player = player_over(store.clone(), SessionCache::new(FileKeyValueStore::open(&session_path)));
    player.restore().await.unwrap();
    player.play_track_at(1).await.unwrap();
    player.seek_to(0.4).unwrap();
    drop(player);

    let mut restored = player_over(store, SessionCache::new(FileKeyValueStore::open(&session_path)));
    restored.restore().await.unwrap();

    assert_eq!(restored.status(), PlaybackStatus::Playing);
    assert_eq!(restored.playlist().current_index(), Some(1));
    assert_eq!(restored.transport().position(), 40.0);
}

#[tokio::test]
async fn test_restore_without_autoplay_keeps_position_for_later() {
    let store = Arc::new(MemoryTrackStore::with_tracks([track_with_duration("0", 100.0)]));
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let mut player = player_over(store.clone(), SessionCache::new(FileKeyValueStore::open(&session_path)));
    player.restore().await.unwrap();
    player.toggle_play().await.unwrap();
    player.seek_to(0.5).unwrap();
    drop(player);

    let config = PlayerConfig {
        restore_playback: false,
        ..PlayerConfig::default()
    };
    let mut restored = Player::new(
        store,
        SessionCache::new(FileKeyValueStore::open(&session_path)),
        Box::new(HeadlessOutput::new()),
        config,
    );
    restored.restore().await.unwrap();
    assert_eq!(restored.status(), PlaybackStatus::Stopped);

    restored.toggle_play().await.unwrap();
    assert_eq!(restored.transport().position(), 50.0);
}

#[tokio::test]
async fn test_restore_drops_stale_cache_entries() {
    let mut cache = SessionCache::in_memory();
    let ghost = TrackId::new("ghost");
    cache.save(
        &[track_with_duration("1", 10.0), track_with_duration("0", 10.0)],
        [&ghost, &TrackId::new("0")],
        &explayer_core::PlaybackSnapshot {
            current_time: 5.0,
            is_playing: false,
            current_track_index: Some(7),
            is_shuffled: true,
            repeat_mode: RepeatMode::All,
        },
    );

    let store = Arc::new(MemoryTrackStore::with_tracks([
        track_with_duration("0", 10.0),
        track_with_duration("1", 10.0),
        track_with_duration("2", 10.0),
    ]));
    let mut player = player_over(store, cache);
    player.restore().await.unwrap();

    let ids: Vec<&str> = player.playlist().tracks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "0", "2"]);
    assert_eq!(player.playlist().favorites().collect::<Vec<_>>(), vec![&TrackId::new("0")]);
    assert_eq!(player.playlist().current_index(), Some(2));
    assert!(player.transport().is_shuffled());
    assert_eq!(player.transport().repeat_mode(), RepeatMode::All);
}

#[tokio::test]
async fn test_restore_with_empty_store_and_cache() {
    let (mut player, _store) = memory_player();
    player.restore().await.unwrap();

    assert!(player.playlist().is_empty());
    assert_eq!(player.snapshot().current_track_index, None);
    assert_eq!(player.status(), PlaybackStatus::Stopped);
}

#[tokio::test]
async fn test_next_track_does_not_inherit_saved_position() {
    let mut player = player_with_tracks(&[100.0, 100.0]).await;
    player.play_track_at(0).await.unwrap();
    player.seek_to(0.9).unwrap();

    player.play_next().await.unwrap();
    assert_eq!(player.transport().position(), 0.0);

    // Back to the first track: the last save names the second one
    player.play_previous().await.unwrap();
    assert_eq!(player.transport().position(), 0.0);
}
