//! Moves Jira issues along the release workflow.
//!
//! [`TransitionWalker::transition_to_released`] handles one issue;
//! [`TransitionWalker::transition_all`] fans out over a batch with bounded
//! concurrency and collects every outcome into a [`TransitionSummary`].

use std::collections::BTreeSet;
use std::sync::Arc;

use domain::{DomainError, IssueKey, IssueStatus, IssueTracker, TrackerError};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// How far one call moves an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkMode {
    /// Apply exactly one workflow edge per call.
    #[default]
    SingleHop,
    /// Keep applying edges until the issue is released.
    UntilReleased,
}

/// Successful result of walking one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The issue was already released; nothing was changed.
    AlreadyReleased,
    /// The issue moved from `from` to `to` through `hops` transitions.
    Advanced {
        from: IssueStatus,
        to: IssueStatus,
        hops: usize,
    },
}

/// Why an issue could not be walked. Never fatal for the batch.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Could not look up {issue}: {source}")]
    Lookup {
        issue: IssueKey,
        #[source]
        source: TrackerError,
    },

    #[error("{issue}: {source}")]
    UnknownStatus {
        issue: IssueKey,
        #[source]
        source: DomainError,
    },

    #[error("Could not transition {issue} from {from}: {source}")]
    Transition {
        issue: IssueKey,
        from: IssueStatus,
        #[source]
        source: TrackerError,
    },
}

/// Walks issues through the workflow table.
#[derive(Clone)]
pub struct TransitionWalker {
    tracker: Arc<dyn IssueTracker>,
    mode: WalkMode,
}

impl TransitionWalker {
    pub fn new(tracker: Arc<dyn IssueTracker>, mode: WalkMode) -> Self {
        Self { tracker, mode }
    }

    /// Moves `issue` toward `Released`.
    ///
    /// Unknown statuses fail before any transition call. A failed transition
    /// is logged and returned; the issue keeps its current status.
    pub async fn transition_to_released(
        &self,
        issue: &IssueKey,
    ) -> Result<TransitionOutcome, TransitionError> {
        let label = self
            .tracker
            .get_issue_status(issue)
            .await
            .map_err(|source| TransitionError::Lookup {
                issue: issue.clone(),
                source,
            })?;
        let start: IssueStatus =
            label
                .parse()
                .map_err(|source| TransitionError::UnknownStatus {
                    issue: issue.clone(),
                    source,
                })?;

        let mut status = start;
        let mut hops = 0;
        // Bounded by the number of statuses; the table has no cycles.
        while let Some(edge) = status.next() {
            if let Err(source) = self.tracker.do_transition(issue, edge.transition).await {
                let err = TransitionError::Transition {
                    issue: issue.clone(),
                    from: status,
                    source,
                };
                warn!("{err}");
                return Err(err);
            }
            status = edge.target;
            hops += 1;

            if self.mode == WalkMode::SingleHop || hops >= IssueStatus::ALL.len() {
                break;
            }
        }

        if hops == 0 {
            return Ok(TransitionOutcome::AlreadyReleased);
        }
        Ok(TransitionOutcome::Advanced {
            from: start,
            to: status,
            hops,
        })
    }

    /// Walks every issue concurrently, at most `max_concurrency` at a time,
    /// and reports every outcome. Results follow the input order.
    pub async fn transition_all(
        &self,
        issues: &[IssueKey],
        max_concurrency: usize,
    ) -> TransitionSummary {
        let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, issue) in issues.iter().cloned().enumerate() {
            let walker = self.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await.ok();
                let result = walker.transition_to_released(&issue).await;
                (index, issue, result)
            });
        }

        let mut finished = Vec::with_capacity(issues.len());
        let mut unjoined: BTreeSet<usize> = (0..issues.len()).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, issue, result)) => {
                    unjoined.remove(&index);
                    finished.push((index, issue, result.map_err(|e| e.to_string())));
                }
                Err(e) => warn!("transition task failed: {e}"),
            }
        }
        for index in unjoined {
            finished.push((index, issues[index].clone(), Err("transition task aborted".into())));
        }
        finished.sort_by_key(|(index, _, _)| *index);

        let mut summary = TransitionSummary::default();
        for (_, issue, result) in finished {
            summary.record(issue, result);
        }
        summary
    }
}

/// Aggregate of a batch of transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionSummary {
    pub advanced: Vec<(IssueKey, IssueStatus)>,
    pub already_released: Vec<IssueKey>,
    pub failed: Vec<(IssueKey, String)>,
}

impl TransitionSummary {
    fn record(&mut self, issue: IssueKey, result: Result<TransitionOutcome, String>) {
        match result {
            Ok(TransitionOutcome::Advanced { to, .. }) => {
                info!(%issue, status = %to, "Transitioned issue");
                self.advanced.push((issue, to));
            }
            Ok(TransitionOutcome::AlreadyReleased) => {
                info!(%issue, "Issue already released");
                self.already_released.push(issue);
            }
            Err(reason) => self.failed.push((issue, reason)),
        }
    }

    pub fn total(&self) -> usize {
        self.advanced.len() + self.already_released.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTracker;

    fn key(k: &str) -> IssueKey {
        IssueKey::new(k).unwrap()
    }

    #[tokio::test]
    async fn single_hop_applies_exactly_the_table_edge() {
        let cases = [
            ("Done", "211", IssueStatus::Released),
            ("New", "171", IssueStatus::Accepted),
            ("Accepted", "71", IssueStatus::InProgress),
            ("In Progress", "91", IssueStatus::Done),
            ("No action needed", "201", IssueStatus::New),
            ("In review", "91", IssueStatus::Done),
        ];

        for (label, transition, target) in cases {
            let tracker = Arc::new(FakeTracker::with_status("PROJ-1", label));
            let walker = TransitionWalker::new(tracker.clone(), WalkMode::SingleHop);

            let outcome = walker.transition_to_released(&key("PROJ-1")).await.unwrap();

            assert_eq!(tracker.transition_calls(), [("PROJ-1".to_string(), transition)]);
            assert_eq!(
                outcome,
                TransitionOutcome::Advanced {
                    from: label.parse().unwrap(),
                    to: target,
                    hops: 1,
                }
            );
            assert_eq!(tracker.status_of("PROJ-1"), target.label());
        }
    }

    #[tokio::test]
    async fn unknown_status_makes_no_transition_call() {
        let tracker = Arc::new(FakeTracker::with_status("PROJ-9", "Closed"));
        let walker = TransitionWalker::new(tracker.clone(), WalkMode::UntilReleased);

        let err = walker.transition_to_released(&key("PROJ-9")).await.unwrap_err();

        assert!(matches!(err, TransitionError::UnknownStatus { .. }));
        assert_eq!(err.to_string(), "PROJ-9: Unknown status Closed");
        assert!(tracker.transition_calls().is_empty());
    }

    #[tokio::test]
    async fn released_issue_is_left_alone() {
        let tracker = Arc::new(FakeTracker::with_status("PROJ-2", "Released"));
        let walker = TransitionWalker::new(tracker.clone(), WalkMode::SingleHop);

        let outcome = walker.transition_to_released(&key("PROJ-2")).await.unwrap();

        assert_eq!(outcome, TransitionOutcome::AlreadyReleased);
        assert!(tracker.transition_calls().is_empty());
    }

    #[tokio::test]
    async fn until_released_walks_the_whole_path() {
        let tracker = Arc::new(FakeTracker::with_status("PROJ-3", "No action needed"));
        let walker = TransitionWalker::new(tracker.clone(), WalkMode::UntilReleased);

        let outcome = walker.transition_to_released(&key("PROJ-3")).await.unwrap();

        let ids: Vec<_> = tracker.transition_calls().into_iter().map(|(_, id)| id).collect();
        assert_eq!(ids, ["201", "171", "71", "91", "211"]);
        assert_eq!(
            outcome,
            TransitionOutcome::Advanced {
                from: IssueStatus::NoActionNeeded,
                to: IssueStatus::Released,
                hops: 5,
            }
        );
    }

    #[tokio::test]
    async fn failed_transition_keeps_the_current_status() {
        let tracker = Arc::new(FakeTracker::with_status("PROJ-4", "Done"));
        tracker.fail_transitions_for("PROJ-4");
        let walker = TransitionWalker::new(tracker.clone(), WalkMode::SingleHop);

        let err = walker.transition_to_released(&key("PROJ-4")).await.unwrap_err();

        assert!(matches!(
            err,
            TransitionError::Transition { from: IssueStatus::Done, .. }
        ));
        assert_eq!(tracker.status_of("PROJ-4"), "Done");
    }

    #[tokio::test]
    async fn batch_collects_every_outcome_in_input_order() {
        let tracker = Arc::new(FakeTracker::default());
        tracker.set_status("PROJ-1", "Done");
        tracker.set_status("PROJ-2", "Released");
        tracker.set_status("PROJ-3", "Closed");
        tracker.set_status("PROJ-4", "New");
        tracker.fail_transitions_for("PROJ-4");
        let walker = TransitionWalker::new(tracker.clone(), WalkMode::SingleHop);

        let issues = ["PROJ-1", "PROJ-2", "PROJ-3", "PROJ-4", "PROJ-5"].map(key);
        let summary = walker.transition_all(&issues, 2).await;

        assert_eq!(summary.total(), 5);
        assert_eq!(summary.advanced, [(key("PROJ-1"), IssueStatus::Released)]);
        assert_eq!(summary.already_released, [key("PROJ-2")]);
        let failed: Vec<_> = summary.failed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(failed, ["PROJ-3", "PROJ-4", "PROJ-5"]);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let tracker = Arc::new(FakeTracker::default());
        let issues: Vec<_> = (1..=12)
            .map(|n| {
                let k = format!("PROJ-{n}");
                tracker.set_status(&k, "In review");
                key(&k)
            })
            .collect();
        let walker = TransitionWalker::new(tracker.clone(), WalkMode::SingleHop);

        let summary = walker.transition_all(&issues, 3).await;

        assert_eq!(summary.advanced.len(), 12);
        assert!(tracker.peak_in_flight() <= 3, "peak {}", tracker.peak_in_flight());
    }
}
