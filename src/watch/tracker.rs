//! Pod status transition tracking.
//!
//! Consumes raw `kubectl get pods` output, diffs each pod's composite status
//! (phase + readiness) against the previous poll, and pushes a notification
//! for every transition of an already-known pod.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::kubectl::table;

/// Entries kept per status bucket for the notification body.
const HISTORY_LIMIT: usize = 5;

/// Delivery target for transition notifications.
///
/// Implementations are fire-and-forget: delivery errors must be handled
/// internally and never reach the tracker.
pub trait NotificationSink {
    fn notify(&self, title: &str, subtitle: &str, message: &str);
}

/// Watches pod listings for status transitions.
///
/// One tracker lives for one watch session and is fed sequentially, once per
/// poll tick. The first sighting of a pod is silent; a transition fires one
/// notification whose body lists the pods that most recently entered the
/// same status.
pub struct PodStatusTracker {
    namespace: String,
    pods: HashMap<String, String>,
    history: HashMap<String, Vec<String>>,
    sink: Box<dyn NotificationSink + Send>,
}

impl PodStatusTracker {
    pub fn new(namespace: impl Into<String>, sink: Box<dyn NotificationSink + Send>) -> Self {
        Self {
            namespace: namespace.into(),
            pods: HashMap::new(),
            history: HashMap::new(),
            sink,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Latest composite status per pod, as of the last `update`.
    pub fn statuses(&self) -> &HashMap<String, String> {
        &self.pods
    }

    /// Feed one poll's raw listing.
    ///
    /// Pods absent from the listing are dropped from the current view, so an
    /// empty listing clears it entirely. Rows with missing columns are kept,
    /// their absent fields read as empty strings.
    pub fn update(&mut self, raw: &str) {
        let mut touched: HashSet<String> = HashSet::new();

        for row in table::parse(raw) {
            let name = row.first().cloned().unwrap_or_default();
            if name == "NAME" {
                continue;
            }
            let ready = row.get(1).cloned().unwrap_or_default();
            let status = row.get(2).cloned().unwrap_or_default();
            let composite = format!("{} {}", status, ready);

            let is_transition = self
                .pods
                .get(&name)
                .is_some_and(|prev| *prev != composite);
            if is_transition {
                debug!("pod {} transitioned to {}", name, composite);
                let bucket = self.history.entry(composite.clone()).or_default();
                // The body lists previous arrivals only, so notify before
                // this pod joins the bucket.
                self.sink.notify(
                    &format!("[{}] Pod status: {}", self.namespace, composite),
                    &name,
                    &bucket.join("\n"),
                );
                bucket.insert(0, name.clone());
                bucket.truncate(HISTORY_LIMIT);
            }

            touched.insert(name.clone());
            self.pods.insert(name, composite);
        }

        self.pods.retain(|name, _| touched.contains(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        sent: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, title: &str, subtitle: &str, message: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), subtitle.to_string(), message.to_string()));
        }
    }

    fn tracker(namespace: &str) -> (PodStatusTracker, RecordingSink) {
        let sink = RecordingSink::default();
        (
            PodStatusTracker::new(namespace, Box::new(sink.clone())),
            sink,
        )
    }

    #[test]
    fn test_first_sighting_is_silent() {
        let (mut tracker, sink) = tracker("default");
        tracker.update("NAME READY STATUS\npod-a 1/1 Running\npod-b 0/1 Pending");
        assert!(sink.sent().is_empty());
        assert_eq!(tracker.statuses()["pod-a"], "Running 1/1");
        assert_eq!(tracker.statuses()["pod-b"], "Pending 0/1");
    }

    #[test]
    fn test_transition_notifies_once() {
        let (mut tracker, sink) = tracker("staging");
        tracker.update("NAME READY STATUS\npod-a 1/1 Running");
        tracker.update("NAME READY STATUS\npod-a 0/1 CrashLoopBackOff");

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "[staging] Pod status: CrashLoopBackOff 0/1");
        assert_eq!(sent[0].1, "pod-a");
        assert_eq!(sent[0].2, "");
        assert_eq!(tracker.statuses()["pod-a"], "CrashLoopBackOff 0/1");
    }

    #[test]
    fn test_steady_state_is_quiet() {
        let (mut tracker, sink) = tracker("default");
        let listing = "NAME READY STATUS\npod-a 1/1 Running\npod-b 1/1 Running";
        tracker.update(listing);
        tracker.update(listing);
        tracker.update(listing);
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_disappearance_purges_and_resets() {
        let (mut tracker, sink) = tracker("default");
        tracker.update("NAME READY STATUS\npod-a 1/1 Running");
        tracker.update("NAME READY STATUS\n");
        assert!(tracker.statuses().is_empty());

        // A reappearance is a fresh first sighting, even with a new status.
        tracker.update("NAME READY STATUS\npod-a 0/1 Error");
        assert!(sink.sent().is_empty());
        assert_eq!(tracker.statuses()["pod-a"], "Error 0/1");
    }

    #[test]
    fn test_empty_input_purges_everything() {
        let (mut tracker, sink) = tracker("default");
        tracker.update("NAME READY STATUS\npod-a 1/1 Running\npod-b 1/1 Running");
        tracker.update("");
        assert!(tracker.statuses().is_empty());
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_history_excludes_current_transition() {
        let (mut tracker, sink) = tracker("default");
        tracker.update("NAME READY STATUS\npod-a 0/1 Pending\npod-b 0/1 Pending");
        tracker.update("NAME READY STATUS\npod-a 1/1 Running\npod-b 0/1 Pending");
        tracker.update("NAME READY STATUS\npod-a 1/1 Running\npod-b 1/1 Running");

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        // pod-a arrived first with nobody before it.
        assert_eq!(sent[0].1, "pod-a");
        assert_eq!(sent[0].2, "");
        // pod-b's notification lists pod-a, not pod-b itself.
        assert_eq!(sent[1].1, "pod-b");
        assert_eq!(sent[1].2, "pod-a");
    }

    #[test]
    fn test_history_is_bounded_and_most_recent_first() {
        let (mut tracker, sink) = tracker("default");
        let pending: String = std::iter::once("NAME READY STATUS".to_string())
            .chain((1..=7).map(|i| format!("pod-{} 0/1 Pending", i)))
            .collect::<Vec<_>>()
            .join("\n");
        let running: String = std::iter::once("NAME READY STATUS".to_string())
            .chain((1..=7).map(|i| format!("pod-{} 1/1 Running", i)))
            .collect::<Vec<_>>()
            .join("\n");
        tracker.update(&pending);
        tracker.update(&running);

        let sent = sink.sent();
        assert_eq!(sent.len(), 7);
        // pod-7's body carries the five most recent arrivals, newest first;
        // pod-1 has already been truncated away.
        assert_eq!(sent[6].1, "pod-7");
        assert_eq!(sent[6].2, "pod-6\npod-5\npod-4\npod-3\npod-2");
    }

    #[test]
    fn test_header_row_is_never_data() {
        let (mut tracker, sink) = tracker("default");
        tracker.update("NAME READY STATUS");
        assert!(tracker.statuses().is_empty());
        tracker.update("NAME READY STATUS");
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let (mut tracker, sink) = tracker("default");
        tracker.update("NAME READY STATUS\npod-x 0/1\npod-y");
        assert_eq!(tracker.statuses()["pod-x"], " 0/1");
        assert_eq!(tracker.statuses()["pod-y"], " ");

        // Growing a full row later is an ordinary transition.
        tracker.update("NAME READY STATUS\npod-x 0/1 Pending\npod-y");
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "pod-x");
    }

    #[test]
    fn test_watch_scenario() {
        let (mut tracker, sink) = tracker("default");

        tracker.update("NAME READY STATUS\npod-a 1/1 Running");
        assert!(sink.sent().is_empty());
        assert_eq!(tracker.statuses()["pod-a"], "Running 1/1");

        tracker.update("NAME READY STATUS\npod-a 0/1 CrashLoopBackOff");
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].0.contains("CrashLoopBackOff 0/1"));
        assert_eq!(sent[0].1, "pod-a");

        tracker.update("NAME READY STATUS\n");
        assert_eq!(sink.sent().len(), 1);
        assert!(tracker.statuses().is_empty());
    }
}
