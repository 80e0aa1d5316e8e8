pub mod provider;
pub mod rest;

pub use provider::MatchFeed;
pub use rest::{parse_match_record, RestMatchFeed};

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::analytics::audit_events;
use crate::models::Match;

/// One immutable, independently valid copy of a match record.
#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub match_id: String,
    pub record: Arc<Match>,
    pub fetched_at: DateTime<Utc>,
}

/// What moved between two consecutive snapshots of the same match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchChange {
    pub score_changed: bool,
    pub status_changed: bool,
    /// Net change in the number of logged events
    pub event_delta: i64,
    /// Any difference in the event log, including in-place corrections
    pub events_changed: bool,
}

/// Compare two snapshots; `None` when nothing observable changed.
pub fn detect_match_change(prev: &Match, curr: &Match) -> Option<MatchChange> {
    let change = MatchChange {
        score_changed: prev.home_score != curr.home_score || prev.away_score != curr.away_score,
        status_changed: prev.status != curr.status,
        event_delta: curr.events.len() as i64 - prev.events.len() as i64,
        events_changed: prev.events != curr.events,
    };
    if change.score_changed || change.status_changed || change.events_changed {
        Some(change)
    } else {
        None
    }
}

fn fmt_score(score: Option<u32>) -> String {
    score.map(|s| s.to_string()).unwrap_or_else(|| "-".into())
}

/// Spawns a background task that fetches every tracked match concurrently
/// once per `poll_interval` and sends each record through the returned
/// channel as a fresh snapshot.
///
/// Every match is fetched at least once; a match that is no longer live is
/// dropped from the polling set after its snapshot has been sent. The task
/// ends when nothing is left to poll or the receiver goes away. Failed
/// fetches are simply tried again on the next tick.
pub fn start_match_monitor(
    feed: Arc<dyn MatchFeed>,
    match_ids: Vec<String>,
    poll_interval: Duration,
    fetch_timeout: Duration,
) -> mpsc::Receiver<MatchSnapshot> {
    let (tx, rx) = mpsc::channel(256);

    tokio::spawn(async move {
        let mut active: Vec<String> = Vec::new();
        for id in match_ids {
            if !active.contains(&id) {
                active.push(id);
            }
        }
        info!(
            "Match monitor started (feed={}, matches={:?}, interval={:?})",
            feed.name(),
            active,
            poll_interval
        );

        let mut prev_snapshot: HashMap<String, Arc<Match>> = HashMap::new();
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        while !active.is_empty() {
            interval.tick().await;

            let fetch_futures: Vec<_> = active
                .iter()
                .map(|id| {
                    let feed = Arc::clone(&feed);
                    let id = id.clone();
                    async move {
                        let res = tokio::time::timeout(fetch_timeout, feed.fetch_match(&id)).await;
                        let out = match res {
                            Ok(result) => result,
                            Err(_) => Err(anyhow::anyhow!("timed out after {:?}", fetch_timeout)),
                        };
                        (id, out)
                    }
                })
                .collect();

            let results = futures_util::future::join_all(fetch_futures).await;

            let mut frozen: Vec<String> = Vec::new();
            for (id, result) in results {
                let record = match result {
                    Ok(record) => Arc::new(record),
                    Err(e) => {
                        warn!("Fetching match {} from '{}' failed: {:#}", id, feed.name(), e);
                        continue;
                    }
                };

                match prev_snapshot.get(&id) {
                    Some(prev) => {
                        if let Some(change) = detect_match_change(prev, &record) {
                            info!(
                                "Match update: {} {} {}-{} {} ({:+} events, status {})",
                                id,
                                record.home_team_name,
                                fmt_score(record.home_score),
                                fmt_score(record.away_score),
                                record.away_team_name,
                                change.event_delta,
                                record.status
                            );
                        }
                    }
                    None => info!(
                        "First snapshot of match {}: {} vs {} ({} events, status {})",
                        id,
                        record.home_team_name,
                        record.away_team_name,
                        record.events.len(),
                        record.status
                    ),
                }

                let audit = audit_events(&record.events, &record.home_team_name, &record.away_team_name);
                if !audit.is_clean() {
                    warn!(
                        "Match {} has ignored events: {} unmatched team, {} unrecognised type",
                        id, audit.unmatched_team, audit.unrecognized_type
                    );
                }

                if !record.status.is_live() {
                    info!("Match {} is {}; no further polling", id, record.status);
                    frozen.push(id.clone());
                }

                prev_snapshot.insert(id.clone(), Arc::clone(&record));
                let snapshot = MatchSnapshot {
                    match_id: id,
                    record,
                    fetched_at: Utc::now(),
                };
                if tx.send(snapshot).await.is_err() {
                    info!("Snapshot receiver dropped; match monitor stopping");
                    return;
                }
            }

            active.retain(|id| !frozen.contains(id));
        }

        info!("No live matches left to poll; match monitor stopped");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::sample_match;
    use crate::models::{EventType, MatchEvent, MatchStatus};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    /// Feed that replays scripted responses per match id; the last one repeats.
    struct ScriptedFeed {
        scripts: Mutex<HashMap<String, VecDeque<Option<Match>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFeed {
        fn new(scripts: Vec<(&str, Vec<Option<Match>>)>) -> Self {
            ScriptedFeed {
                scripts: Mutex::new(
                    scripts
                        .into_iter()
                        .map(|(id, s)| (id.to_string(), s.into_iter().collect()))
                        .collect(),
                ),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MatchFeed for ScriptedFeed {
        async fn fetch_match(&self, match_id: &str) -> Result<Match> {
            self.calls.lock().await.push(match_id.to_string());
            let mut scripts = self.scripts.lock().await;
            let script = scripts
                .get_mut(match_id)
                .ok_or_else(|| anyhow::anyhow!("unknown match {}", match_id))?;
            let next = if script.len() > 1 {
                script.pop_front().flatten()
            } else {
                script.front().cloned().flatten()
            };
            next.ok_or_else(|| anyhow::anyhow!("upstream unavailable"))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn with_status(status: MatchStatus, events: Vec<MatchEvent>) -> Match {
        Match {
            status,
            ..sample_match(events)
        }
    }

    #[test]
    fn test_detect_no_change() {
        let m = sample_match(vec![MatchEvent::new(1, "Lions", EventType::Try)]);
        assert!(detect_match_change(&m, &m.clone()).is_none());
    }

    #[test]
    fn test_detect_new_event_and_score() {
        let prev = sample_match(vec![]);
        let mut curr = sample_match(vec![MatchEvent::new(1, "Lions", EventType::Try)]);
        curr.home_score = Some(17);
        let change = detect_match_change(&prev, &curr).unwrap();
        assert!(change.score_changed);
        assert!(change.events_changed);
        assert_eq!(change.event_delta, 1);
        assert!(!change.status_changed);
    }

    #[test]
    fn test_detect_in_place_correction() {
        let prev = sample_match(vec![MatchEvent::new(1, "Lions", EventType::Try)]);
        let curr = sample_match(vec![MatchEvent::new(2, "Lions", EventType::Try)]);
        let change = detect_match_change(&prev, &curr).unwrap();
        assert_eq!(change.event_delta, 0);
        assert!(change.events_changed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_match_fetched_once() {
        let feed = Arc::new(ScriptedFeed::new(vec![(
            "m-1",
            vec![Some(with_status(MatchStatus::Completed, vec![]))],
        )]));
        let mut rx = start_match_monitor(
            feed.clone(),
            vec!["m-1".into(), "m-1".into()],
            Duration::from_secs(15),
            Duration::from_secs(2),
        );

        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.match_id, "m-1");
        assert!(rx.recv().await.is_none());
        assert_eq!(feed.calls.lock().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_match_polled_until_completed() {
        let live_one = with_status(MatchStatus::Live, vec![MatchEvent::new(3, "Lions", EventType::Try)]);
        let live_two = with_status(
            MatchStatus::Live,
            vec![
                MatchEvent::new(3, "Lions", EventType::Try),
                MatchEvent::new(9, "Sharks", EventType::Penalty),
            ],
        );
        let done = with_status(MatchStatus::Completed, live_two.events.clone());
        let feed = Arc::new(ScriptedFeed::new(vec![(
            "m-1",
            vec![Some(live_one), None, Some(live_two), Some(done)],
        )]));
        let mut rx = start_match_monitor(
            feed.clone(),
            vec!["m-1".into()],
            Duration::from_secs(15),
            Duration::from_secs(2),
        );

        let mut snapshots = Vec::new();
        while let Some(snap) = rx.recv().await {
            snapshots.push(snap);
        }

        // the failed fetch produced no snapshot
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].record.events.len(), 1);
        assert_eq!(snapshots[1].record.events.len(), 2);
        assert_eq!(snapshots[2].record.status, MatchStatus::Completed);
        assert_eq!(feed.calls.lock().await.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receiver_drop_stops_monitor() {
        let feed = Arc::new(ScriptedFeed::new(vec![(
            "m-1",
            vec![Some(with_status(MatchStatus::Live, vec![]))],
        )]));
        let mut rx = start_match_monitor(
            feed.clone(),
            vec!["m-1".into()],
            Duration::from_secs(15),
            Duration::from_secs(2),
        );
        rx.recv().await.unwrap();
        drop(rx);
        tokio::time::sleep(Duration::from_secs(60)).await;
        // at most one more fetch happens before the closed channel is noticed
        assert!(feed.calls.lock().await.len() <= 2);
    }
}
