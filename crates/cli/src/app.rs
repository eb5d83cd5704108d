//! # TUI Application State
//!
//! This module wraps the library's [`PanelState`] with everything the
//! terminal front-end needs on top: keyboard focus, the status line, and the
//! submission runtime. A submit spawns one tokio task that performs the POST
//! and reports back through a channel the event loop pumps every tick, so the
//! UI keeps drawing its loading indicator while the request is in flight.

use std::sync::Arc;

use ragq::{PanelState, QueryClient, QueryOutcome, RESULT_COUNT_RANGE};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::info;

const KEY_HINTS: &str = "Tab: switch focus | Enter: ask | Alt+Enter: newline | Esc: quit";

/// Which control currently receives keystrokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Question,
    Count,
}

/// A finished submission delivered back to the UI loop.
struct Completion {
    id: u64,
    outcome: QueryOutcome,
}

/// The core state for the TUI application.
pub struct App {
    /// `true` if the application is running, `false` to exit.
    pub running: bool,
    /// The interaction state the UI renders from.
    pub panel: PanelState,
    /// The control that owns the keyboard.
    pub focus: Focus,
    /// A message to display in the status bar.
    pub status: String,
    /// Tick counter driving the loading spinner.
    pub spinner_frame: usize,
    client: Arc<QueryClient>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    /// The task performing the outstanding request, if any.
    inflight: Option<JoinHandle<()>>,
    /// Whether the previous keystroke was a digit typed into the count field.
    count_typing: bool,
}

impl App {
    /// Creates a new instance of the application state.
    pub fn new(client: QueryClient) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            panel: PanelState::new(),
            focus: Focus::Question,
            status: KEY_HINTS.to_string(),
            spinner_frame: 0,
            client: Arc::new(client),
            completions_tx,
            completions_rx,
            inflight: None,
            count_typing: false,
        }
    }

    /// Stops the event loop and aborts any outstanding request so its
    /// completion cannot land after teardown.
    pub fn quit(&mut self) {
        self.running = false;
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }

    /// Dispatches a key press to the focused control or a global action.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                if self.focus == Focus::Question {
                    let mut question = self.panel.question().to_string();
                    question.push('\n');
                    self.panel.set_question(question);
                }
            }
            KeyCode::Enter => self.submit(),
            _ => match self.focus {
                Focus::Question => self.edit_question(key),
                Focus::Count => self.edit_count(key),
            },
        }
    }

    fn toggle_focus(&mut self) {
        self.count_typing = false;
        self.focus = match self.focus {
            Focus::Question => Focus::Count,
            Focus::Count => Focus::Question,
        };
    }

    fn edit_question(&mut self, key: KeyEvent) {
        let mut question = self.panel.question().to_string();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => question.push(c),
            KeyCode::Backspace => {
                question.pop();
            }
            _ => return,
        }
        self.panel.set_question(question);
    }

    /// The count control keeps keyboard edits inside the advertised range;
    /// the underlying setter stays unclamped for programmatic use.
    fn edit_count(&mut self, key: KeyEvent) {
        let count = self.panel.result_count();
        let updated = match key.code {
            KeyCode::Up => {
                self.count_typing = false;
                count.saturating_add(1)
            }
            KeyCode::Down => {
                self.count_typing = false;
                count.saturating_sub(1)
            }
            KeyCode::Char(digit @ '0'..='9') => {
                // Typing a run of digits replaces the value instead of
                // appending to whatever was displayed before.
                let base = if self.count_typing { count } else { 0 };
                self.count_typing = true;
                base.saturating_mul(10)
                    .saturating_add(digit as u32 - '0' as u32)
            }
            KeyCode::Backspace => {
                self.count_typing = false;
                count / 10
            }
            _ => return,
        };
        let clamped = updated.clamp(*RESULT_COUNT_RANGE.start(), *RESULT_COUNT_RANGE.end());
        self.panel.set_result_count(clamped);
    }

    /// Starts a submission when the panel allows one.
    pub fn submit(&mut self) {
        if self.panel.is_loading() {
            return;
        }
        if !self.panel.can_submit() {
            self.status = "Type a question first.".to_string();
            return;
        }

        self.count_typing = false;
        let (id, request) = self.panel.begin_submit();
        info!(
            "submitting question ({} chars, k={})",
            request.question.len(),
            request.k
        );
        self.status = format!("Querying {} ...", self.client.endpoint());

        let client = Arc::clone(&self.client);
        let tx = self.completions_tx.clone();
        self.inflight = Some(tokio::spawn(async move {
            let outcome = match client.ask(&request).await {
                Ok(outcome) => outcome,
                Err(err) => QueryOutcome::failure(err.to_string()),
            };
            let _ = tx.send(Completion { id, outcome });
        }));
    }

    /// Applies any finished submissions. Stale completions are dropped by the
    /// panel's id guard.
    pub fn pump_completions(&mut self) {
        while let Ok(Completion { id, outcome }) = self.completions_rx.try_recv() {
            if self.panel.finish_submit(id, outcome) {
                self.inflight = None;
                self.status = match self.panel.last() {
                    Some(QueryOutcome::Answer { sources, .. }) => {
                        format!("Answer received with {} source(s). {KEY_HINTS}", sources.len())
                    }
                    Some(QueryOutcome::Error { .. }) => "Query failed.".to_string(),
                    Some(QueryOutcome::Unrecognized) => {
                        "The service returned a response this client does not understand."
                            .to_string()
                    }
                    None => KEY_HINTS.to_string(),
                };
            }
        }
    }

    /// Advances the loading spinner while a request is outstanding.
    pub fn tick(&mut self) {
        if self.panel.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        // Bind and drop a listener so the endpoint refuses connections.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = QueryClient::new(format!("http://{addr}/query")).unwrap();
        App::new(client)
    }

    #[test]
    fn typing_edits_the_question() {
        let mut app = test_app();
        for c in "hi".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.panel.question(), "hi");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.panel.question(), "h");
    }

    #[test]
    fn alt_enter_inserts_a_newline_instead_of_submitting() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.panel.question(), "a\nb");
        assert!(!app.panel.is_loading());
    }

    #[test]
    fn count_control_clamps_keyboard_edits_to_range() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Count);

        for _ in 0..40 {
            app.handle_key(key(KeyCode::Up));
        }
        assert_eq!(app.panel.result_count(), 20);

        for _ in 0..40 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.panel.result_count(), 1);
    }

    #[test]
    fn typed_digits_replace_the_count() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Tab));

        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('7')));
        assert_eq!(app.panel.result_count(), 17);

        // A fresh run of digits starts over rather than appending.
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.panel.result_count(), 3);
    }

    #[test]
    fn submitting_a_blank_question_does_nothing_but_hint() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.panel.is_loading());
        assert_eq!(app.status, "Type a question first.");
    }

    #[test]
    fn esc_quits_even_while_a_question_is_typed() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('q')));
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn failed_request_completes_with_error_and_resets_loading() {
        let mut app = test_app();
        for c in "why?".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }

        app.handle_key(key(KeyCode::Enter));
        assert!(app.panel.is_loading());

        // Pump until the spawned task reports back.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while app.panel.is_loading() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.pump_completions();
        }

        assert!(!app.panel.is_loading(), "loading flag must reset on failure");
        match app.panel.last() {
            Some(QueryOutcome::Error { message }) => {
                assert!(message.contains("request failed"), "got: {message}")
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
        assert_eq!(app.status, "Query failed.");
    }
}
