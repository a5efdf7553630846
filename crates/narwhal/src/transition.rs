//! Eased interpolation between two position assignments, one step per host frame.
//!
//! The animator never schedules anything itself: the host supplies a stream of frame
//! timestamps (for example from `requestAnimationFrame` or a winit redraw loop) and each item
//! advances the transition once. Awaiting the next frame is the only suspension point.

use crate::error::{Error, Result};
use crate::graph::{Position, PositionAssignment};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Cubic ease-in-out: `4t³` for the first half, `1 - (2 - 2t)³ / 2` for the second.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Blends every node of `to` from its `from` position (origin when absent) by `t`.
pub fn interpolate(
    from: &PositionAssignment,
    to: &PositionAssignment,
    t: f64,
) -> PositionAssignment {
    to.iter()
        .map(|(id, &dst)| {
            let src = from.get(id).copied().unwrap_or(Position::ORIGIN);
            (id.clone(), src.lerp(dst, t))
        })
        .collect()
}

/// Raw (un-eased) progress after `elapsed`. A zero duration completes immediately.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Monotonic counter shared by a session and the transitions it starts.
///
/// Starting a new transition (or switching layouts) advances the counter, which invalidates
/// every token handed out before.
#[derive(Debug, Clone, Default)]
pub struct TransitionGeneration {
    counter: Arc<AtomicU64>,
}

impl TransitionGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates outstanding tokens and returns one for the new generation.
    pub fn advance(&self) -> TransitionToken {
        let captured = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        TransitionToken {
            counter: Some(self.counter.clone()),
            captured,
        }
    }

    /// Invalidates outstanding tokens without starting anything.
    pub fn cancel_all(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }
}

/// Captured generation of one transition.
#[derive(Debug, Clone)]
pub struct TransitionToken {
    counter: Option<Arc<AtomicU64>>,
    captured: u64,
}

impl TransitionToken {
    /// A token no generation can invalidate.
    pub fn detached() -> Self {
        Self {
            counter: None,
            captured: 0,
        }
    }

    pub fn is_current(&self) -> bool {
        match &self.counter {
            Some(counter) => counter.load(Ordering::Acquire) == self.captured,
            None => true,
        }
    }
}

/// Animates from `from` to `to` over `duration`, one step per item of `frames`.
///
/// The first frame's timestamp marks the start. `on_progress` sees every interpolated
/// assignment together with the raw progress; the future resolves to the final assignment once
/// progress reaches 1.
pub async fn animate<S, F>(
    from: &PositionAssignment,
    to: &PositionAssignment,
    duration: Duration,
    frames: S,
    on_progress: F,
) -> Result<PositionAssignment>
where
    S: Stream<Item = Duration> + Unpin,
    F: FnMut(&PositionAssignment, f64),
{
    animate_with_token(
        from,
        to,
        duration,
        frames,
        on_progress,
        TransitionToken::detached(),
    )
    .await
}

/// Like [`animate`], but stops with [`Error::TransitionCancelled`] at the first frame after
/// `token` went stale, before touching the callback.
pub async fn animate_with_token<S, F>(
    from: &PositionAssignment,
    to: &PositionAssignment,
    duration: Duration,
    mut frames: S,
    mut on_progress: F,
    token: TransitionToken,
) -> Result<PositionAssignment>
where
    S: Stream<Item = Duration> + Unpin,
    F: FnMut(&PositionAssignment, f64),
{
    let mut start: Option<Duration> = None;
    let mut raw = 0.0;

    loop {
        let Some(now) = frames.next().await else {
            return Err(Error::FramesExhausted { progress: raw });
        };
        if !token.is_current() {
            tracing::debug!(progress = raw, "transition superseded");
            return Err(Error::TransitionCancelled { progress: raw });
        }

        let start = *start.get_or_insert(now);
        raw = progress(now.saturating_sub(start), duration);
        let current = interpolate(from, to, ease_in_out_cubic(raw));
        tracing::trace!(progress = raw, nodes = current.len(), "transition frame");
        on_progress(&current, raw);

        if raw >= 1.0 {
            return Ok(current);
        }
    }
}
