//! Word-by-word reveal of an already complete reply.
//!
//! The backend answers in one piece; the client discloses it one
//! whitespace-delimited token at a time so the answer appears to stream in.
//! Every intermediate state is a slice of the original text, so the final
//! state is the reply verbatim, whitespace included.

use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Pause between reveal steps: `max(floor, base - tokens / divisor)`.
///
/// Longer replies step faster so total reveal time stays human scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RevealSchedule {
    /// Lower bound of a step, in milliseconds.
    pub floor_ms: u64,
    /// Step length for a one-token reply, in milliseconds.
    pub base_ms: u64,
    /// Tokens per millisecond of speed-up.
    pub divisor: u64,
}

impl Default for RevealSchedule {
    fn default() -> Self {
        Self {
            floor_ms: 20,
            base_ms: 50,
            divisor: 20,
        }
    }
}

impl RevealSchedule {
    /// A schedule that never waits. Handy for tests and piping output.
    pub const fn instant() -> Self {
        Self {
            floor_ms: 0,
            base_ms: 0,
            divisor: 1,
        }
    }

    /// Step delay for a reply of `token_count` tokens.
    pub fn step_delay(&self, token_count: usize) -> Duration {
        let divisor = self.divisor.max(1);
        let speed_up = u64::try_from(token_count).unwrap_or(u64::MAX) / divisor;
        Duration::from_millis(self.base_ms.saturating_sub(speed_up).max(self.floor_ms))
    }
}

/// Visible prefixes of `text`, one per token, shortest first.
///
/// The last prefix is always `text` itself (trailing whitespace included). A
/// reply with no tokens yields a single step showing it unchanged.
pub fn reveal_prefixes(text: &str) -> Vec<&str> {
    let mut ends = Vec::new();
    let mut in_token = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_token {
                ends.push(idx);
            }
            in_token = false;
        } else {
            in_token = true;
        }
    }

    // Trailing whitespace folds into the final step.
    if in_token || ends.is_empty() {
        ends.push(text.len());
    } else if let Some(last) = ends.last_mut() {
        *last = text.len();
    }
    ends.into_iter().map(|end| &text[..end]).collect()
}

/// How a reveal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEnd {
    /// Every prefix was applied.
    Completed,
    /// The sink stopped accepting updates (target gone).
    Abandoned,
    /// The owner was torn down mid-reveal.
    Cancelled,
}

/// Drive a reveal: hand each prefix to `apply`, pausing between steps.
///
/// `apply` returns `false` to stop early. Cancellation is checked before
/// every step and during every pause.
pub async fn run_reveal<F>(
    text: &str,
    schedule: RevealSchedule,
    cancel: &CancellationToken,
    mut apply: F,
) -> RevealEnd
where
    F: FnMut(&str) -> bool,
{
    let prefixes = reveal_prefixes(text);
    let delay = schedule.step_delay(prefixes.len());

    for prefix in prefixes {
        if cancel.is_cancelled() {
            return RevealEnd::Cancelled;
        }
        if !apply(prefix) {
            return RevealEnd::Abandoned;
        }
        if !delay.is_zero() {
            tokio::select! {
                () = cancel.cancelled() => return RevealEnd::Cancelled,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
    RevealEnd::Completed
}
