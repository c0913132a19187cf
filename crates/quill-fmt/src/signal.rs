//! Non-local control flow for the formatter.
//!
//! Printing can fail in exactly two ways: an alignment asks to be laid out
//! again (`Restart`), or formatting must stop with no output (`Abort`).
//! Both travel up the recursive walk as the `Err` side of [`FmtResult`].

use std::fmt;

/// Why an alignment asked for a re-layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    LineTooLong,
    /// A multi-column member alignment found a column too narrow.
    AlignTooSmall,
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartReason::LineTooLong => f.write_str("line too long"),
            RestartReason::AlignTooSmall => f.write_str("align too small"),
        }
    }
}

/// Request to restart the alignment `relative_depth` frames out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("alignment restart ({reason}, relative depth {relative_depth})")]
pub struct AlignmentRestart {
    pub reason: RestartReason,
    pub relative_depth: usize,
}

/// Formatting cannot continue; the caller gets no edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("formatting aborted: {message}")]
pub struct AbortFormatting {
    pub message: String,
}

impl AbortFormatting {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatSignal {
    #[error(transparent)]
    Restart(#[from] AlignmentRestart),
    #[error(transparent)]
    Abort(#[from] AbortFormatting),
}

impl FormatSignal {
    pub(crate) fn abort(message: impl Into<String>) -> Self {
        FormatSignal::Abort(AbortFormatting::new(message))
    }

    pub(crate) fn restart(reason: RestartReason, relative_depth: usize) -> Self {
        FormatSignal::Restart(AlignmentRestart {
            reason,
            relative_depth,
        })
    }
}

pub type FmtResult<T = ()> = Result<T, FormatSignal>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_deep(depth: usize) -> FmtResult<usize> {
        if depth == 0 {
            return Err(FormatSignal::restart(RestartReason::LineTooLong, 2));
        }
        let inner = fails_deep(depth - 1)?;
        Ok(inner + 1)
    }

    #[test]
    fn restart_crosses_frames_with_question_mark() {
        match fails_deep(5) {
            Err(FormatSignal::Restart(r)) => {
                assert_eq!(r.relative_depth, 2);
                assert_eq!(r.reason, RestartReason::LineTooLong);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn display_messages() {
        let abort = FormatSignal::abort("unexpected token");
        assert_eq!(abort.to_string(), "formatting aborted: unexpected token");
        let restart = FormatSignal::restart(RestartReason::AlignTooSmall, 0);
        assert_eq!(
            restart.to_string(),
            "alignment restart (align too small, relative depth 0)"
        );
    }
}
