// --- Game tick clock ---------------------------------------------------------
//
// Polled once per animation frame. Releases one logical tick per elapsed
// interval measured from the epoch, so the cadence is tied to wall time rather
// than frame count.

#[derive(Clone, Copy, Debug, PartialEq)]
enum ClockPhase {
    Stopped,
    /// Started; the epoch is taken from the next observed frame time.
    Armed,
    Running { epoch_ms: f64, fired: u64 },
}

#[derive(Clone, Debug)]
pub struct GameClock {
    interval_ms: f64,
    max_catch_up: u64,
    phase: ClockPhase,
}

impl GameClock {
    pub fn new(interval_ms: f64, max_catch_up: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            max_catch_up: u64::from(max_catch_up.max(1)),
            phase: ClockPhase::Stopped,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Restart from scratch; no elapsed time is carried over.
    pub fn start(&mut self) {
        self.phase = ClockPhase::Armed;
    }

    pub fn stop(&mut self) {
        self.phase = ClockPhase::Stopped;
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, ClockPhase::Stopped)
    }

    /// Consumes one due tick, if any. Call in a loop until it returns false.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.phase {
            ClockPhase::Stopped => false,
            ClockPhase::Armed => {
                self.phase = ClockPhase::Running { epoch_ms: now_ms, fired: 0 };
                false
            }
            ClockPhase::Running { epoch_ms, mut fired } => {
                let elapsed = now_ms - epoch_ms;
                if elapsed < 0.0 {
                    return false;
                }
                let due = (elapsed / self.interval_ms).floor() as u64;
                if due <= fired {
                    return false;
                }
                if due - fired > self.max_catch_up {
                    // stalled frame loop (hidden tab): skip the backlog
                    fired = due - self.max_catch_up;
                }
                fired += 1;
                self.phase = ClockPhase::Running { epoch_ms, fired };
                true
            }
        }
    }
}
