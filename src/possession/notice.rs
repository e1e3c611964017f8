//! Player-visible notices
//!
//! Notices are separate from tracing logs: they go to the host's on-screen
//! message feed and are filtered by the `verbose` and `muteExceptions`
//! options.

use serde::{Deserialize, Serialize};

use crate::core::types::Rgb;

pub const NOTICE_PREFIX: &str = "PostMortemPossession: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeKind {
    /// Successful transfers and policy refusals
    Information,
    /// Batched configuration warnings
    StartupError,
    /// Runtime fault swallowed at the tick boundary
    Fault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub color: Rgb,
}

/// Host message feed
pub trait NoticeSink {
    fn display(&mut self, notice: Notice);
}

/// Collects notices in memory
impl NoticeSink for Vec<Notice> {
    fn display(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Decides which notices reach the sink and how they look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeGate {
    pub verbose: bool,
    pub mute_exceptions: bool,
    pub message_color: Rgb,
    pub error_color: Rgb,
}

impl NoticeGate {
    pub fn allows(&self, kind: NoticeKind) -> bool {
        match kind {
            NoticeKind::Information | NoticeKind::StartupError => self.verbose,
            NoticeKind::Fault => !self.mute_exceptions,
        }
    }

    pub fn color(&self, kind: NoticeKind) -> Rgb {
        match kind {
            NoticeKind::Information => self.message_color,
            NoticeKind::StartupError | NoticeKind::Fault => self.error_color,
        }
    }

    /// Format and forward a notice; returns whether it was shown
    pub fn emit<S: NoticeSink + ?Sized>(&self, sink: &mut S, kind: NoticeKind, text: &str) -> bool {
        if text.is_empty() || !self.allows(kind) {
            return false;
        }
        sink.display(Notice {
            kind,
            text: format!("{}{}", NOTICE_PREFIX, text),
            color: self.color(kind),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(verbose: bool, mute_exceptions: bool) -> NoticeGate {
        NoticeGate {
            verbose,
            mute_exceptions,
            message_color: Rgb::new(1, 1, 1),
            error_color: Rgb::new(2, 0, 0),
        }
    }

    #[test]
    fn test_verbose_gates_information_and_startup() {
        let mut sink: Vec<Notice> = Vec::new();
        assert!(!gate(false, false).emit(&mut sink, NoticeKind::Information, "hi"));
        assert!(!gate(false, false).emit(&mut sink, NoticeKind::StartupError, "bad"));
        assert!(gate(false, false).emit(&mut sink, NoticeKind::Fault, "boom"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].text, "PostMortemPossession: boom");
        assert_eq!(sink[0].color, Rgb::new(2, 0, 0));
    }

    #[test]
    fn test_mute_only_affects_faults() {
        let mut sink: Vec<Notice> = Vec::new();
        let g = gate(true, true);
        assert!(!g.emit(&mut sink, NoticeKind::Fault, "boom"));
        assert!(g.emit(&mut sink, NoticeKind::Information, "hello"));
        assert_eq!(sink[0].color, Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_empty_text_dropped() {
        let mut sink: Vec<Notice> = Vec::new();
        assert!(!gate(true, false).emit(&mut sink, NoticeKind::Fault, ""));
        assert!(sink.is_empty());
    }
}
