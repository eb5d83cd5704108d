//! # Panel State
//!
//! The explicit interaction-state container behind the query panel. A
//! front-end mutates it through one entry point per user action and renders
//! as a pure function of the current state.
//!
//! The submit action is split at the async boundary: [`PanelState::begin_submit`]
//! marks the panel loading and hands back the request to send, and
//! [`PanelState::finish_submit`] applies the completion. Each submission
//! carries an id so that when two submissions race, a stale completion is
//! dropped whole instead of partially overwriting the newer one.

use std::ops::RangeInclusive;

use crate::types::{QueryOutcome, QueryRequest};

/// Retrieval count used before the user touches the control.
pub const DEFAULT_RESULT_COUNT: u32 = 5;

/// Range the UI control keeps keyboard edits within. The setter itself does
/// not clamp; out-of-range values are the remote service's concern.
pub const RESULT_COUNT_RANGE: RangeInclusive<u32> = 1..=20;

/// All local state of the query panel.
#[derive(Clone, Debug)]
pub struct PanelState {
    question: String,
    result_count: u32,
    loading: bool,
    last: Option<QueryOutcome>,
    next_submission: u64,
    latest_submission: Option<u64>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            question: String::new(),
            result_count: DEFAULT_RESULT_COUNT,
            loading: false,
            last: None,
            next_submission: 0,
            latest_submission: None,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn result_count(&self) -> u32 {
        self.result_count
    }

    /// `true` strictly between a submit and its matching completion.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The outcome of the last completed exchange, if any.
    pub fn last(&self) -> Option<&QueryOutcome> {
        self.last.as_ref()
    }

    /// Replace the question text unconditionally.
    pub fn set_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
    }

    /// Replace the retrieval count unconditionally. No clamping here; see
    /// [`RESULT_COUNT_RANGE`].
    pub fn set_result_count(&mut self, count: u32) {
        self.result_count = count;
    }

    /// Whether the submit control is enabled: not loading and the question is
    /// more than whitespace.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.question.trim().is_empty()
    }

    /// Start a submission: set the loading flag, clear the previous result,
    /// and return the id and request for the caller to send.
    ///
    /// Callers are expected to check [`PanelState::can_submit`] first; this
    /// method does not re-validate, so driving it directly can race two
    /// requests. The id guard in [`PanelState::finish_submit`] keeps that
    /// race contained.
    pub fn begin_submit(&mut self) -> (u64, QueryRequest) {
        self.next_submission += 1;
        let id = self.next_submission;
        self.latest_submission = Some(id);
        self.loading = true;
        self.last = None;

        let request = QueryRequest {
            question: self.question.clone(),
            k: self.result_count,
        };
        (id, request)
    }

    /// Apply a completed submission. Returns `true` when the completion was
    /// applied, `false` when it was stale and dropped.
    ///
    /// The loading reset runs on every applied completion regardless of the
    /// outcome shape, so the flag can never be left set by a failure.
    pub fn finish_submit(&mut self, id: u64, outcome: QueryOutcome) -> bool {
        if self.latest_submission != Some(id) {
            return false;
        }
        self.last = Some(outcome);
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_panel_has_documented_defaults() {
        let panel = PanelState::new();
        assert_eq!(panel.question(), "");
        assert_eq!(panel.result_count(), DEFAULT_RESULT_COUNT);
        assert!(!panel.is_loading());
        assert!(panel.last().is_none());
    }

    #[test]
    fn blank_questions_cannot_submit() {
        let mut panel = PanelState::new();
        assert!(!panel.can_submit());

        panel.set_question("   \n\t  ");
        assert!(!panel.can_submit());

        panel.set_question("why?");
        assert!(panel.can_submit());
    }

    #[test]
    fn loading_panel_cannot_submit() {
        let mut panel = PanelState::new();
        panel.set_question("why?");
        let _ = panel.begin_submit();
        assert!(panel.is_loading());
        assert!(!panel.can_submit());
    }

    #[test]
    fn begin_submit_snapshots_question_and_count() {
        let mut panel = PanelState::new();
        panel.set_question("why?");
        panel.set_result_count(12);

        let (_, request) = panel.begin_submit();

        assert_eq!(request.question, "why?");
        assert_eq!(request.k, 12);
    }

    #[test]
    fn result_count_setter_does_not_clamp() {
        let mut panel = PanelState::new();
        panel.set_result_count(0);
        assert_eq!(panel.result_count(), 0);
        panel.set_result_count(500);
        assert_eq!(panel.result_count(), 500);
    }

    #[test]
    fn begin_submit_clears_previous_result() {
        let mut panel = PanelState::new();
        panel.set_question("first");
        let (id, _) = panel.begin_submit();
        panel.finish_submit(id, QueryOutcome::failure("down"));
        assert!(panel.last().is_some());

        let _ = panel.begin_submit();
        assert!(panel.last().is_none());
        assert!(panel.is_loading());
    }

    #[test]
    fn loading_resets_on_success_and_failure() {
        let mut panel = PanelState::new();
        panel.set_question("why?");

        let (id, _) = panel.begin_submit();
        assert!(panel.is_loading());
        assert!(panel.finish_submit(
            id,
            QueryOutcome::Answer {
                text: "X".to_string(),
                sources: Vec::new()
            }
        ));
        assert!(!panel.is_loading());

        let (id, _) = panel.begin_submit();
        assert!(panel.finish_submit(id, QueryOutcome::failure("network down")));
        assert!(!panel.is_loading());
        assert_eq!(
            panel.last(),
            Some(&QueryOutcome::Error {
                message: "network down".to_string()
            })
        );
    }

    #[test]
    fn stale_completion_is_dropped_whole() {
        let mut panel = PanelState::new();
        panel.set_question("why?");

        // Two racing submissions, driven directly past the disabled guard.
        let (first, _) = panel.begin_submit();
        let (second, _) = panel.begin_submit();

        // The older completion arrives late and must not touch state.
        assert!(!panel.finish_submit(first, QueryOutcome::failure("stale")));
        assert!(panel.is_loading());
        assert!(panel.last().is_none());

        assert!(panel.finish_submit(
            second,
            QueryOutcome::Answer {
                text: "fresh".to_string(),
                sources: Vec::new()
            }
        ));
        assert!(!panel.is_loading());
        assert!(panel.last().is_some_and(QueryOutcome::is_answer));

        // Even later, the stale completion still has no effect.
        assert!(!panel.finish_submit(first, QueryOutcome::failure("stale again")));
        assert!(panel.last().is_some_and(QueryOutcome::is_answer));
    }
}
