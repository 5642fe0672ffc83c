//! Shuffle integration tests
//!
//! Seeded queues so the shuffled orders are repeatable; assertions only
//! rely on properties that hold for every seed.

use cadence_playback::{
    PlayQueue, PlaybackContext, QueueConfig, QueueEvent, QueueTrack, RepeatMode, ShuffleStrategy,
};
use std::collections::HashSet;
use std::time::Duration;

fn create_track(id: &str, artist: &str) -> QueueTrack {
    QueueTrack::new(id, format!("Song {}", id), artist, Duration::from_secs(200))
}

fn library(count: usize) -> Vec<QueueTrack> {
    (1..=count)
        .map(|i| create_track(&format!("t{}", i), &format!("Artist {}", i)))
        .collect()
}

fn shuffled_queue(seed: u64) -> PlayQueue {
    PlayQueue::new(QueueConfig {
        shuffle: true,
        seed: Some(seed),
        ..Default::default()
    })
}

fn current_id(queue: &PlayQueue) -> String {
    queue.current_track().map(|t| t.id.clone()).unwrap_or_default()
}

fn history_ids(queue: &PlayQueue) -> Vec<String> {
    queue.history().iter().map(|t| t.id.clone()).collect()
}

fn upcoming_ids(queue: &PlayQueue) -> Vec<String> {
    queue.upcoming().iter().map(|e| e.track.id.clone()).collect()
}

#[test]
fn test_shuffled_pass_visits_every_track_then_exhausts() {
    for seed in 0..20 {
        let mut queue = PlayQueue::new(QueueConfig {
            seed: Some(seed),
            ..Default::default()
        });
        queue.replace(library(5), 0, PlaybackContext::Library).unwrap();
        queue.set_shuffle(true);
        queue.drain_events();

        let mut visited = HashSet::new();
        for _ in 0..4 {
            assert!(queue.advance().is_some());
            assert!(visited.insert(current_id(&queue)));
        }
        assert!(!visited.contains("t1"));
        assert_eq!(visited.len(), 4);

        assert_eq!(queue.advance(), None);
        assert!(queue.drain_events().contains(&QueueEvent::Exhausted));
    }
}

#[test]
fn test_replace_while_shuffled_starts_with_empty_history() {
    let mut queue = shuffled_queue(3);
    queue.replace(library(6), 4, PlaybackContext::Library).unwrap();

    assert_eq!(current_id(&queue), "t5");
    assert!(queue.history().is_empty());

    let mut upcoming = upcoming_ids(&queue);
    upcoming.sort();
    assert_eq!(upcoming, vec!["t1", "t2", "t3", "t4", "t6"]);
}

#[test]
fn test_shuffled_history_is_play_order() {
    let mut queue = shuffled_queue(11);
    queue.replace(library(8), 0, PlaybackContext::Library).unwrap();

    let mut played = vec![current_id(&queue)];
    for _ in 0..3 {
        queue.advance();
        played.push(current_id(&queue));
    }
    let current = played.pop().unwrap();

    assert_eq!(history_ids(&queue), played);
    assert_eq!(current_id(&queue), current);
}

#[test]
fn test_priority_beats_shuffle() {
    let mut queue = shuffled_queue(5);
    queue.replace(library(6), 0, PlaybackContext::Library).unwrap();
    queue.advance();

    queue.insert_priority(vec![create_track("p1", "X"), create_track("p2", "X")]);
    let upcoming = upcoming_ids(&queue);
    assert_eq!(&upcoming[..2], &["p1", "p2"]);
    assert_eq!(upcoming.len(), 6);

    queue.advance();
    assert_eq!(current_id(&queue), "p1");
    queue.advance();
    assert_eq!(current_id(&queue), "p2");

    // Played priority tracks become shuffled history
    let history = history_ids(&queue);
    assert_eq!(&history[history.len() - 1..], &["p1"]);
    assert_eq!(queue.priority_count(), 0);
}

#[test]
fn test_retreat_in_shuffle_follows_play_order() {
    let mut queue = shuffled_queue(9);
    queue.replace(library(6), 2, PlaybackContext::Library).unwrap();

    queue.advance();
    let second = current_id(&queue);
    queue.advance();

    queue.retreat();
    assert_eq!(current_id(&queue), second);
    queue.retreat();
    assert_eq!(current_id(&queue), "t3");
    assert_eq!(queue.retreat(), None);
}

#[test]
fn test_retreat_in_shuffle_keeps_queued_tracks_next() {
    let mut queue = shuffled_queue(21);
    queue.replace(library(5), 0, PlaybackContext::Library).unwrap();
    queue.advance();
    let was_playing = current_id(&queue);

    queue.insert_priority(vec![create_track("q", "X")]);
    queue.retreat();

    assert_eq!(current_id(&queue), "t1");
    let upcoming = upcoming_ids(&queue);
    assert_eq!(upcoming[0], "q");
    assert_eq!(upcoming[1], was_playing);
    assert_eq!(queue.priority_count(), 1);
}

#[test]
fn test_shuffle_off_uses_linear_order() {
    let mut queue = shuffled_queue(1);
    queue.replace(library(5), 2, PlaybackContext::Library).unwrap();

    queue.set_shuffle(false);

    assert_eq!(queue.current_index(), Some(2));
    assert_eq!(history_ids(&queue), vec!["t1", "t2"]);
    assert_eq!(upcoming_ids(&queue), vec!["t4", "t5"]);
}

#[test]
fn test_shuffle_toggle_excludes_queued_tracks() {
    let mut queue = PlayQueue::new(QueueConfig {
        seed: Some(4),
        ..Default::default()
    });
    queue.replace(library(5), 0, PlaybackContext::Library).unwrap();
    queue.insert_priority(vec![create_track("q", "X")]);

    queue.set_shuffle(true);

    let upcoming = queue.upcoming();
    assert_eq!(upcoming[0].track.id, "q");
    assert!(upcoming[0].priority);
    let rest: HashSet<&str> = upcoming[1..].iter().map(|e| e.track.id.as_str()).collect();
    assert_eq!(rest, HashSet::from(["t2", "t3", "t4", "t5"]));
}

#[test]
fn test_shuffle_events() {
    let mut queue = PlayQueue::default();
    queue.set_shuffle(true);
    queue.set_shuffle(true);
    queue.set_shuffle(false);

    assert_eq!(
        queue.drain_events(),
        vec![
            QueueEvent::ShuffleChanged { enabled: true },
            QueueEvent::ShuffleChanged { enabled: false },
        ]
    );
}

#[test]
fn test_remove_in_shuffle_keeps_current_and_order() {
    let mut queue = shuffled_queue(8);
    queue.replace(library(6), 0, PlaybackContext::Library).unwrap();
    queue.advance();
    queue.advance();

    let current = current_id(&queue);
    let history = history_ids(&queue);
    let upcoming = upcoming_ids(&queue);

    // Remove the first upcoming track by its absolute index
    let target = queue.upcoming()[0].index;
    queue.remove_at(target).unwrap();

    assert_eq!(current_id(&queue), current);
    assert_eq!(history_ids(&queue), history);
    assert_eq!(upcoming_ids(&queue), upcoming[1..].to_vec());

    // And a history track
    let first_played = queue
        .tracks()
        .iter()
        .position(|t| t.id == history[0])
        .unwrap();
    queue.remove_at(first_played).unwrap();
    assert_eq!(current_id(&queue), current);
    assert_eq!(history_ids(&queue), history[1..].to_vec());
}

#[test]
fn test_reorder_in_shuffle_moves_play_slot() {
    let mut queue = shuffled_queue(13);
    queue.replace(library(6), 0, PlaybackContext::Library).unwrap();

    let before = queue.upcoming();
    let from = before[3].index;
    let to = before[0].index;
    let moved = before[3].track.id.clone();
    let mut expected: Vec<String> = before.iter().map(|e| e.track.id.clone()).collect();
    drop(before);
    let id = expected.remove(3);
    expected.insert(0, id);

    queue.reorder(from, to).unwrap();

    assert_eq!(upcoming_ids(&queue)[0], moved);
    assert_eq!(upcoming_ids(&queue), expected);
}

#[test]
fn test_clear_upcoming_in_shuffle_keeps_history() {
    let mut queue = shuffled_queue(17);
    queue.replace(library(7), 0, PlaybackContext::Library).unwrap();
    queue.advance();
    queue.advance();
    queue.insert_priority(vec![create_track("q", "X")]);

    let history = history_ids(&queue);
    let current = current_id(&queue);

    queue.clear_upcoming();

    assert_eq!(queue.len(), 3);
    assert_eq!(history_ids(&queue), history);
    assert_eq!(current_id(&queue), current);
    assert!(queue.upcoming().is_empty());
    assert_eq!(queue.advance(), None);
}

#[test]
fn test_repeat_all_in_shuffle_regenerates() {
    let mut queue = shuffled_queue(2);
    queue.replace(library(4), 0, PlaybackContext::Library).unwrap();
    queue.set_repeat(RepeatMode::All);

    for _ in 0..3 {
        queue.advance();
    }
    let last = current_id(&queue);
    queue.drain_events();

    assert!(queue.advance().is_some());
    assert_ne!(current_id(&queue), last);
    assert!(queue.history().is_empty());
    assert_eq!(queue.upcoming().len(), 3);
    assert!(queue.drain_events().contains(&QueueEvent::Wrapped));
}

#[test]
fn test_extend_in_shuffle_appends_after_current_order() {
    let mut queue = shuffled_queue(6);
    queue.replace(library(3), 0, PlaybackContext::Library).unwrap();
    let before = upcoming_ids(&queue);

    queue.extend(vec![create_track("x", "X"), create_track("y", "Y")]);

    let after = upcoming_ids(&queue);
    assert_eq!(&after[..before.len()], &before[..]);
    let tail: HashSet<&str> = after[before.len()..].iter().map(String::as_str).collect();
    assert_eq!(tail, HashSet::from(["x", "y"]));
}

#[test]
fn test_smart_shuffle_spreads_artists() {
    let tracks: Vec<QueueTrack> = (0..12)
        .map(|i| create_track(&format!("t{}", i), &format!("Artist {}", i % 3)))
        .collect();

    let mut queue = PlayQueue::new(QueueConfig {
        shuffle: true,
        strategy: ShuffleStrategy::Smart,
        seed: Some(99),
        ..Default::default()
    });
    queue.replace(tracks, 0, PlaybackContext::Library).unwrap();

    // 11 remaining tracks over 3 artists: round-robin never repeats an
    // artist back to back until one group runs dry
    let artists: Vec<String> = queue
        .upcoming()
        .iter()
        .map(|e| e.track.artist.clone())
        .collect();
    let repeats = artists.windows(2).filter(|w| w[0] == w[1]).count();
    assert!(repeats <= 1, "too many back-to-back artists: {:?}", artists);
}

#[test]
fn test_same_seed_same_order() {
    let mut first = shuffled_queue(1234);
    let mut second = shuffled_queue(1234);
    first.replace(library(10), 0, PlaybackContext::Library).unwrap();
    second.replace(library(10), 0, PlaybackContext::Library).unwrap();

    assert_eq!(upcoming_ids(&first), upcoming_ids(&second));
}
