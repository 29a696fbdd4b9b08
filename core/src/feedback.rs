use core::fmt::Debug;
use serde::{Deserialize, Serialize};

use crate::*;

/// End-of-game cue the presentation layer turns into sound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Won,
    Lost,
}

impl Feedback {
    pub fn from_changes(changes: &ChangeSet) -> Option<Self> {
        match changes.status_change()? {
            Status::Won => Some(Self::Won),
            Status::Lost => Some(Self::Lost),
            Status::Idle | Status::InProgress => None,
        }
    }
}

/// Something that can play feedback, typically audio. Playback may fail at any time.
pub trait FeedbackSink {
    type Error: Debug;

    fn play(&mut self, feedback: Feedback) -> core::result::Result<(), Self::Error>;
}

/// Plays the feedback implied by `changes`, if any. Sink failures are logged and swallowed.
pub fn dispatch_feedback<S: FeedbackSink>(sink: &mut S, changes: &ChangeSet) -> Option<Feedback> {
    let feedback = Feedback::from_changes(changes)?;
    if let Err(err) = sink.play(feedback) {
        log::warn!("could not play {:?} feedback: {:?}", feedback, err);
    }
    Some(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Recorder(Vec<Feedback>);

    impl FeedbackSink for Recorder {
        type Error = ();

        fn play(&mut self, feedback: Feedback) -> core::result::Result<(), ()> {
            self.0.push(feedback);
            Ok(())
        }
    }

    struct Muted;

    impl FeedbackSink for Muted {
        type Error = &'static str;

        fn play(&mut self, _: Feedback) -> core::result::Result<(), Self::Error> {
            Err("audio unavailable")
        }
    }

    fn engine(size: Coord2, mines: &[Coord2]) -> BoardEngine {
        BoardEngine::with_board(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn only_game_end_produces_feedback() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        let mut sink = Recorder::default();

        let changes = engine.reveal((1, 1));
        assert_eq!(dispatch_feedback(&mut sink, &changes), None);

        let changes = engine.reveal((0, 0));
        assert_eq!(dispatch_feedback(&mut sink, &changes), Some(Feedback::Lost));
        assert_eq!(sink.0, [Feedback::Lost]);
    }

    #[test]
    fn win_plays_win_feedback() {
        let mut engine = engine((1, 2), &[(0, 0)]);
        let mut sink = Recorder::default();

        let changes = engine.reveal((0, 1));

        assert_eq!(dispatch_feedback(&mut sink, &changes), Some(Feedback::Won));
        assert_eq!(sink.0, [Feedback::Won]);
    }

    #[test]
    fn failing_sink_does_not_disturb_the_session() {
        let mut engine = engine((1, 2), &[(0, 0)]);

        let changes = engine.reveal((0, 0));

        assert_eq!(dispatch_feedback(&mut Muted, &changes), Some(Feedback::Lost));
        assert_eq!(engine.status(), Status::Lost);
    }
}
