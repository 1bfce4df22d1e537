//! Timed sequences of recognizer states.
//!
//! A combination is a list of stages. A stage is entered when all its entry
//! recognizers match at once, must be held for a minimum time, and is left
//! once its exit recognizers (if any) match. The gesture is recognized when
//! the last stage completes.

use tracing::debug;

use crate::error::{RecognizerError, Result};
use crate::recognizer::{
    CorrectionHint, GestureRecognizer, HistoryAnchor, RecognitionResult, RecognizerConfig,
};
use crate::tracking::{Hand, SkeletonKind, Target, User};

/// A recognizer together with its two-phase history state.
#[derive(Debug, Clone)]
struct Member {
    recognizer: Box<dyn GestureRecognizer>,
    anchor: HistoryAnchor,
}

#[derive(Debug, Clone)]
struct Stage {
    entry: Vec<Member>,
    exit: Vec<Member>,
    min_hold: f64,
    max_hold: f64,
    max_transition: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Progress {
    Idle,
    Holding { stage: usize, entered_at: f64 },
    Transition { next: usize, left_at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Matched,
    Unmatched,
    TrackingError,
}

/// Recognizes a gesture made of consecutive timed states.
#[derive(Debug, Clone)]
pub struct CombinationRecognizer {
    name: String,
    stages: Vec<Stage>,
    progress: Progress,
    config: RecognizerConfig,
    target: SkeletonKind,
}

impl CombinationRecognizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            progress: Progress::Idle,
            config: RecognizerConfig::default(),
            target: SkeletonKind::Both,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a stage. Times are in seconds; pass `f64::INFINITY` for no limit.
    ///
    /// `max_transition` bounds the gap between leaving this stage and
    /// entering the next one.
    pub fn add_state(
        &mut self,
        entry: Vec<Box<dyn GestureRecognizer>>,
        exit: Vec<Box<dyn GestureRecognizer>>,
        min_hold: f64,
        max_hold: f64,
        max_transition: f64,
    ) -> Result<()> {
        if min_hold > max_hold {
            return Err(RecognizerError::InvalidRange {
                what: "state hold time",
                min: min_hold as f32,
                max: max_hold as f32,
            });
        }
        let mut target = self.target;
        for recognizer in entry.iter().chain(&exit) {
            target = merge_kinds(target, recognizer.target_skeleton())?;
        }
        self.target = target;

        let members = |recognizers: Vec<Box<dyn GestureRecognizer>>| -> Vec<Member> {
            recognizers
                .into_iter()
                .map(|recognizer| Member {
                    recognizer,
                    anchor: HistoryAnchor::default(),
                })
                .collect()
        };
        self.stages.push(Stage {
            entry: members(entry),
            exit: members(exit),
            min_hold,
            max_hold,
            max_transition,
        });
        Ok(())
    }

    /// Number of registered stages.
    pub fn state_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage currently held, if any.
    pub fn current_state(&self) -> Option<usize> {
        match self.progress {
            Progress::Holding { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.progress != Progress::Idle
    }

    /// Drop all progress, including history anchors.
    pub fn reset(&mut self) {
        self.progress = Progress::Idle;
        for stage in &mut self.stages {
            stage
                .entry
                .iter_mut()
                .chain(stage.exit.iter_mut())
                .for_each(|m| m.anchor.reset());
        }
    }

    fn abort(&mut self, reason: &'static str) -> RecognitionResult {
        debug!(gesture = %self.name, reason, "combination reset");
        self.reset();
        RecognitionResult::NotRecognized
    }

    fn enter(&mut self, stage: usize, now: f64) -> RecognitionResult {
        debug!(gesture = %self.name, stage, "combination state entered");
        self.progress = Progress::Holding {
            stage,
            entered_at: now,
        };
        RecognitionResult::WaitingForLastStateToFinish
    }

    /// Advance with the current frame of `target`.
    ///
    /// Returns `Recognized` once when the last stage completes and
    /// `WaitingForLastStateToFinish` while a gesture is in progress.
    pub fn update(&mut self, target: Target<'_>, mut hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if self.stages.is_empty() || !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }
        let now = target.current(false).timestamp;

        match self.progress {
            Progress::Idle => match evaluate(&mut self.stages[0].entry, target, hint) {
                Verdict::Matched => self.enter(0, now),
                Verdict::TrackingError => RecognitionResult::TrackingError,
                Verdict::Unmatched => RecognitionResult::NotRecognized,
            },
            Progress::Holding { stage, entered_at } => {
                let held = now - entered_at;
                if held > self.stages[stage].max_hold {
                    return self.abort("state held too long");
                }
                let entry = evaluate(&mut self.stages[stage].entry, target, hint.as_deref_mut());
                if entry == Verdict::TrackingError {
                    return RecognitionResult::TrackingError;
                }
                let has_exit = !self.stages[stage].exit.is_empty();
                let exit = if has_exit {
                    // The hint stays with the first unmet condition.
                    let exit_hint = match entry {
                        Verdict::Matched => hint.as_deref_mut(),
                        _ => None,
                    };
                    evaluate(&mut self.stages[stage].exit, target, exit_hint)
                } else {
                    Verdict::Matched
                };
                if exit == Verdict::TrackingError {
                    return RecognitionResult::TrackingError;
                }

                let complete = held >= self.stages[stage].min_hold && exit == Verdict::Matched;
                if !complete {
                    return if entry == Verdict::Unmatched {
                        self.abort("state left too early")
                    } else {
                        RecognitionResult::WaitingForLastStateToFinish
                    };
                }
                if stage + 1 == self.stages.len() {
                    debug!(gesture = %self.name, "combination recognized");
                    self.reset();
                    return RecognitionResult::Recognized;
                }

                let next = stage + 1;
                match evaluate(&mut self.stages[next].entry, target, hint) {
                    Verdict::Matched => self.enter(next, now),
                    Verdict::TrackingError => RecognitionResult::TrackingError,
                    Verdict::Unmatched if !has_exit && entry == Verdict::Matched => {
                        RecognitionResult::WaitingForLastStateToFinish
                    }
                    Verdict::Unmatched => {
                        self.progress = Progress::Transition { next, left_at: now };
                        RecognitionResult::WaitingForLastStateToFinish
                    }
                }
            }
            Progress::Transition { next, left_at } => {
                if now - left_at > self.stages[next - 1].max_transition {
                    return self.abort("transition too slow");
                }
                match evaluate(&mut self.stages[next].entry, target, hint) {
                    Verdict::Matched => self.enter(next, now),
                    Verdict::TrackingError => RecognitionResult::TrackingError,
                    Verdict::Unmatched => RecognitionResult::WaitingForLastStateToFinish,
                }
            }
        }
    }
}

/// Evaluate every member; all must be recognized for a match.
///
/// A tracking error counts as a match for members that ignore tracking
/// errors. Every member is evaluated so history anchors keep advancing, but
/// only the first unmatched member fills the hint.
fn evaluate(members: &mut [Member], target: Target<'_>, mut hint: Option<&mut CorrectionHint>) -> Verdict {
    let mut verdict = Verdict::Matched;
    for member in members.iter_mut() {
        let result = member
            .anchor
            .recognize(&mut *member.recognizer, target, hint.as_deref_mut());
        match result {
            RecognitionResult::Recognized => {}
            RecognitionResult::TrackingError if member.recognizer.config().ignore_on_tracking_error => {}
            RecognitionResult::TrackingError => {
                if verdict == Verdict::Matched {
                    verdict = Verdict::TrackingError;
                }
            }
            RecognitionResult::NotRecognized | RecognitionResult::WaitingForLastStateToFinish => {
                verdict = Verdict::Unmatched;
                hint = None;
            }
        }
    }
    verdict
}

fn merge_kinds(a: SkeletonKind, b: SkeletonKind) -> Result<SkeletonKind> {
    match (a, b) {
        (a, b) if a == b => Ok(a),
        (SkeletonKind::Both, other) | (other, SkeletonKind::Both) => Ok(other),
        _ => Err(RecognizerError::MixedSkeletonKinds),
    }
}

impl GestureRecognizer for CombinationRecognizer {
    fn recognize_on_user(&mut self, user: &dyn User, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        self.update(Target::User(user), hint)
    }

    fn recognize_on_hand(&mut self, hand: &dyn Hand, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        self.update(Target::Hand(hand), hint)
    }

    fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    fn target_skeleton(&self) -> SkeletonKind {
        self.target
    }

    fn clone_box(&self) -> Box<dyn GestureRecognizer> {
        Box::new(self.clone())
    }
}
