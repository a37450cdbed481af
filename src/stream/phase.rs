//! Per-invocation state machine

use crate::context::Context;
use crate::error::{Error, Result};
use tracing::trace;

/// Phase of one stream invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Init,
    Fetching,
    Extracting,
    Done,
    Error,
}

impl StreamPhase {
    /// Whether `next` is a legal successor
    pub fn can_transition_to(self, next: StreamPhase) -> bool {
        use StreamPhase::{Done, Error, Extracting, Fetching, Init};
        matches!(
            (self, next),
            (Init, Fetching)
                | (Fetching, Extracting)
                | (Extracting, Fetching | Done)
                | (Fetching | Extracting, Error)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StreamPhase::Done | StreamPhase::Error)
    }
}

/// Current phase plus trace logging of every transition
#[derive(Debug)]
pub(crate) struct PhaseTracker<'a> {
    stream: &'a str,
    context: &'a Context,
    phase: StreamPhase,
}

impl<'a> PhaseTracker<'a> {
    pub(crate) fn new(stream: &'a str, context: &'a Context) -> Self {
        Self {
            stream,
            context,
            phase: StreamPhase::Init,
        }
    }

    pub(crate) fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub(crate) fn transition(&mut self, next: StreamPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(Error::Other(format!(
                "stream '{}' cannot move from {:?} to {next:?}",
                self.stream, self.phase
            )));
        }
        trace!(
            stream = self.stream,
            context = %self.context,
            from = ?self.phase,
            to = ?next,
            "stream phase"
        );
        self.phase = next;
        Ok(())
    }

    /// Enter `Error` when the current phase allows it
    pub(crate) fn fail(&mut self) {
        if self.phase.can_transition_to(StreamPhase::Error) {
            trace!(
                stream = self.stream,
                context = %self.context,
                from = ?self.phase,
                to = ?StreamPhase::Error,
                "stream phase"
            );
            self.phase = StreamPhase::Error;
        }
    }
}
