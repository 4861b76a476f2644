//! Win popup lifecycle. Dismissal races a timeout against the user, and the close
//! itself races the CSS transition against a fallback timer; every transition is
//! guarded so whichever signal arrives second is a no-op.

use crate::leaderboard::RankData;

/// What the popup shows. Kept through `Closing` so the fade-out still has content.
#[derive(Clone, Debug, PartialEq)]
pub struct PopupContent {
    pub time: f64,
    pub dimension: u32,
    /// `None` when no score was submitted or the submission failed.
    pub rank: Option<RankData>,
    /// Ask for a name once the popup has closed.
    pub prompt_after: bool,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Popup {
    #[default]
    Closed,
    Open(PopupContent),
    Closing(PopupContent),
}

impl Popup {
    pub fn is_open(&self) -> bool {
        matches!(self, Popup::Open(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Popup::Closed)
    }

    /// True while the popup is on screen (open or fading out).
    pub fn is_active(&self) -> bool {
        !self.is_closed()
    }

    pub fn content(&self) -> Option<&PopupContent> {
        match self {
            Popup::Closed => None,
            Popup::Open(c) | Popup::Closing(c) => Some(c),
        }
    }

    pub fn open(&mut self, content: PopupContent) {
        *self = Popup::Open(content);
    }

    /// `Open -> Closing`. Returns whether the transition happened.
    pub fn request_close(&mut self) -> bool {
        match std::mem::take(self) {
            Popup::Open(c) => {
                *self = Popup::Closing(c);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// `Closing -> Closed`, yielding the content exactly once.
    pub fn complete_close(&mut self) -> Option<PopupContent> {
        match std::mem::take(self) {
            Popup::Closing(c) => Some(c),
            other => {
                *self = other;
                None
            }
        }
    }

    /// `Open | Closing -> Closed` in one step, yielding the content so the caller can
    /// still run the close sequence.
    pub fn close_now(&mut self) -> Option<PopupContent> {
        match std::mem::take(self) {
            Popup::Open(c) | Popup::Closing(c) => Some(c),
            Popup::Closed => None,
        }
    }

    /// Drops the popup from any state without running its close sequence.
    pub fn force_close(&mut self) {
        *self = Popup::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> PopupContent {
        PopupContent { time: 3.2, dimension: 5, rank: None, prompt_after: true }
    }

    #[test]
    fn open_closing_closed() {
        let mut p = Popup::default();
        p.open(content());
        assert!(p.is_open());
        assert!(p.request_close());
        assert!(p.is_active());
        assert_eq!(p.content(), Some(&content()));
        assert_eq!(p.complete_close(), Some(content()));
        assert!(p.is_closed());
    }

    #[test]
    fn second_close_request_is_ignored() {
        let mut p = Popup::default();
        p.open(content());
        assert!(p.request_close());
        assert!(!p.request_close());
        assert!(matches!(p, Popup::Closing(_)));
    }

    #[test]
    fn completion_without_request_is_ignored() {
        let mut p = Popup::default();
        assert_eq!(p.complete_close(), None);
        p.open(content());
        assert_eq!(p.complete_close(), None);
        assert!(p.is_open());
    }

    #[test]
    fn late_completion_after_close_is_ignored() {
        let mut p = Popup::default();
        p.open(content());
        p.request_close();
        assert!(p.complete_close().is_some());
        assert!(p.complete_close().is_none());
        assert!(!p.request_close());
        assert!(p.is_closed());
    }

    #[test]
    fn force_close_skips_sequence() {
        let mut p = Popup::default();
        p.open(content());
        p.request_close();
        p.force_close();
        assert_eq!(p.complete_close(), None);
    }

    #[test]
    fn close_now_yields_content_once() {
        let mut p = Popup::default();
        assert_eq!(p.close_now(), None);
        p.open(content());
        assert_eq!(p.close_now(), Some(content()));
        assert!(p.is_closed());
        p.open(content());
        p.request_close();
        assert_eq!(p.close_now(), Some(content()));
        assert_eq!(p.complete_close(), None);
    }
}
