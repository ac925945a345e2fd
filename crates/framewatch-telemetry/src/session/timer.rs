// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The host frame clock and the one-shot auto-stop timer scheduled against it.

/// Host time as seen by the session: the running sum of frame delta times.
///
/// Only positive, finite deltas advance the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    now_secs: f64,
}

impl FrameClock {
    /// Creates a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by one frame.
    pub fn advance(&mut self, delta_secs: f64) {
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.now_secs += delta_secs;
        }
    }

    /// Seconds accumulated since the clock was created.
    pub fn now(&self) -> f64 {
        self.now_secs
    }
}

/// A one-shot deadline on the [`FrameClock`].
///
/// The timer never fires by itself: the session polls it at the start of
/// each host frame and drops it on stop, which is what cancels it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoStopTimer {
    deadline_secs: f64,
}

impl AutoStopTimer {
    /// Schedules a deadline `after_secs` after `now_secs`.
    pub fn schedule(now_secs: f64, after_secs: f64) -> Self {
        Self {
            deadline_secs: now_secs + after_secs.max(0.0),
        }
    }

    /// The clock time at which the timer is due.
    pub fn deadline(&self) -> f64 {
        self.deadline_secs
    }

    /// Returns `true` once the clock has reached the deadline.
    pub fn is_due(&self, now_secs: f64) -> bool {
        now_secs >= self.deadline_secs
    }

    /// Seconds left before the deadline, never negative.
    pub fn remaining(&self, now_secs: f64) -> f64 {
        (self.deadline_secs - now_secs).max(0.0)
    }
}
