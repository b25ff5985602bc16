//! Runtime wrapper that owns the state, the API handle and the dismiss timer.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use super::http::TodoApi;
use super::notify::{DismissTimer, NOTIFICATION_TTL};
use super::state::AppState;

/// A user action, applied to the state through its transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Load,
    SetDraft(String),
    Add,
    Toggle(Uuid),
    StartEdit(Uuid),
    SetEditText(String),
    SaveEdit,
    CancelEdit,
    Delete(Uuid),
}

pub struct Session {
    state: AppState,
    api: Box<dyn TodoApi>,
    ttl: Duration,
    timer: Option<DismissTimer>,
    dismiss_tx: UnboundedSender<u64>,
    dismiss_rx: UnboundedReceiver<u64>,
}

impl Session {
    pub fn new(api: impl TodoApi + 'static) -> Self {
        let (dismiss_tx, dismiss_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            api: Box::new(api),
            ttl: NOTIFICATION_TTL,
            timer: None,
            dismiss_tx,
            dismiss_rx,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn dispatch(&mut self, action: Action) {
        let previous = self.state.notification().map(|n| n.seq);
        let api = &*self.api;

        match action {
            Action::Load => self.state.load(api).await,
            Action::SetDraft(text) => self.state.set_draft(text),
            Action::Add => self.state.add(api).await,
            Action::Toggle(id) => self.state.toggle_complete(api, id).await,
            Action::StartEdit(id) => self.state.start_edit(id),
            Action::SetEditText(text) => self.state.set_edit_text(text),
            Action::SaveEdit => self.state.save_edit(api).await,
            Action::CancelEdit => self.state.cancel_edit(),
            Action::Delete(id) => self.state.delete(api, id).await,
        }

        if let Some(current) = self.state.notification() {
            if previous != Some(current.seq) {
                // Replacing the old timer aborts it.
                self.timer = Some(DismissTimer::schedule(
                    current.seq,
                    self.ttl,
                    self.dismiss_tx.clone(),
                ));
            }
        }
    }

    /// Wait for the next scheduled dismissal and apply it.
    ///
    /// Returns `true` if a notification was cleared. Never completes while no
    /// timer is pending.
    pub async fn next_dismissal(&mut self) -> bool {
        let Some(seq) = self.dismiss_rx.recv().await else {
            return false;
        };

        if self.timer.as_ref().is_some_and(|t| t.seq() == seq) {
            self.timer = None;
        }
        self.state.dismiss_notification(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::state::NotificationKind;
    use crate::client::testing::FakeApi;

    #[tokio::test(start_paused = true)]
    async fn notification_is_dismissed_after_ttl() {
        let mut session = Session::new(FakeApi::default());
        session.dispatch(Action::Add).await;
        assert_eq!(
            session.state().notification().map(|n| n.kind),
            Some(NotificationKind::Error)
        );

        let started = tokio::time::Instant::now();
        assert!(session.next_dismissal().await);
        assert!(started.elapsed() >= NOTIFICATION_TTL);
        assert!(session.state().notification().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_notification_restarts_the_timer() {
        let mut session = Session::new(FakeApi::default()).with_ttl(Duration::from_secs(3));

        session.dispatch(Action::Add).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        session.dispatch(Action::SetDraft("milk".to_string())).await;
        session.dispatch(Action::Add).await;
        let latest = session.state().notification().unwrap().seq;

        let started = tokio::time::Instant::now();
        assert!(session.next_dismissal().await);
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(session.state().notification().is_none());
        assert_eq!(session.state().todos()[0].text, "milk");
        assert!(latest > 1);
    }

    #[tokio::test]
    async fn actions_without_notifications_schedule_nothing() {
        let mut session = Session::new(FakeApi::with_todos(&["a"]));
        session.dispatch(Action::Load).await;
        session.dispatch(Action::SetDraft("b".to_string())).await;

        assert!(session.state().notification().is_none());
        assert!(session.timer.is_none());
        assert_eq!(session.state().draft(), "b");
    }
}
