/// # throttle
///
/// Decides how long the frame loop must wait before the next emulated frame
/// may run. The host calls `wait_step()` in a loop until it says `Proceed`:
///
/// ```text
///  loop {
///      poll_input();                 // still responsive while throttled
///      match throttle.wait_step() {
///          Proceed => emulate_frame(),
///          MustContinueWaiting => continue,
///      }
///  }
/// ```
///
/// A single call never sleeps longer than the slice cap (50ms by default), so
/// at very slow speeds a frame's wait is chopped into several slices with the
/// host's event loop running in between.
///
/// Timing state:
///  * `last_tick`  when the last wait cycle completed; `None` until the first
///    wait after a refresh
///  * `deadline`   when the open wait cycle is satisfied; `Some` exactly while
///    a cycle is in progress ("in frame")
///
/// Every speed change refreshes the frame interval, which throws both away.
use crate::clock::Clock;
use crate::error::ThrottleError;
use crate::fps::{self, FpsSource};
use crate::notify::Notifier;
use crate::speed::{self, Direction, SpeedCommand};

/// result of one bounded wait
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WaitStatus {
    /// deadline reached; run the frame
    Proceed,
    /// slept one slice, deadline still ahead
    MustContinueWaiting,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThrottleConfig {
    /// longest single sleep inside `wait_step`, in ms
    pub slice_ms: u64,
    /// bounds for the per-frame interval, in ms
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    /// passed through to the notifier with every speed message
    pub message_duration_hint: i32,
}

pub const DEFAULT_SLICE_MS: u64 = 50;
pub const MIN_FRAME_INTERVAL_MS: u64 = 1;
pub const MAX_FRAME_INTERVAL_MS: u64 = 5000;

impl ThrottleConfig {
    /// pull nonsense settings back into something usable: slices and the
    /// minimum interval are at least 1ms, and the maximum is never below
    /// the minimum
    pub fn normalized(self) -> Self {
        let min_interval_ms = self.min_interval_ms.max(1);
        ThrottleConfig {
            slice_ms: self.slice_ms.max(1),
            min_interval_ms,
            max_interval_ms: self.max_interval_ms.max(min_interval_ms),
            ..self
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        ThrottleConfig {
            slice_ms: DEFAULT_SLICE_MS,
            min_interval_ms: MIN_FRAME_INTERVAL_MS,
            max_interval_ms: MAX_FRAME_INTERVAL_MS,
            message_duration_hint: 0,
        }
    }
}

pub struct ThrottleController<C: Clock, F: FpsSource, N: Notifier> {
    clock: C,
    fps: F,
    notifier: N,
    config: ThrottleConfig,
    speed_scale: f64,
    max_speed: bool,
    /// seconds
    target_frame_interval: f64,
    last_tick: Option<u64>,
    deadline: Option<u64>,
}

impl<C: Clock, F: FpsSource, N: Notifier> ThrottleController<C, F, N> {
    pub fn new(clock: C, fps: F, notifier: N) -> Self {
        ThrottleController::with_config(clock, fps, notifier, ThrottleConfig::default())
    }

    pub fn with_config(clock: C, fps: F, notifier: N, config: ThrottleConfig) -> Self {
        let normalized = config.normalized();
        if normalized != config {
            log::warn!("throttle config {:?} adjusted to {:?}", config, normalized);
        }
        let config = normalized;
        let mut t = ThrottleController {
            clock,
            fps,
            notifier,
            config,
            speed_scale: speed::NORMAL,
            max_speed: false,
            target_frame_interval: 1.0 / fps::NTSC_HZ,
            last_tick: None,
            deadline: None,
        };
        t.refresh();
        t
    }

    /// Derive the frame interval from an encoded frame rate and the current
    /// speed, then drop any wait cycle in progress.
    ///
    /// Degenerate rates don't fail: zero Hz (or anything giving under a
    /// millisecond) becomes the minimum interval, absurdly slow rates are
    /// capped at the maximum.
    pub fn recompute_target_interval(&mut self, source_fps_encoded: u32) {
        let hz = fps::decode_hz(source_fps_encoded);
        let mut interval = 1.0 / (hz * self.speed_scale);
        let min = self.config.min_interval_ms as f64 / 1000.0;
        let max = self.config.max_interval_ms as f64 / 1000.0;

        if !interval.is_finite() || (interval * 1000.0) < 1.0 {
            if hz <= 0.0 {
                log::warn!(
                    "degenerate frame rate 0x{:08x}; using {}ms frame interval",
                    source_fps_encoded,
                    self.config.min_interval_ms
                );
            }
            interval = min;
        }
        interval = interval.clamp(min, max);

        self.target_frame_interval = interval;
        self.last_tick = None;
        self.deadline = None;

        log::debug!(
            "frame interval {:.3}ms ({:.3}Hz at {:.1}%)",
            interval * 1000.0,
            hz,
            self.speed_scale * 100.0
        );
    }

    /// recompute from the owned frame rate source
    pub fn refresh(&mut self) {
        let encoded = self.fps.desired_fps_encoded();
        self.recompute_target_interval(encoded);
    }

    /// One bounded wait towards the current frame's deadline.
    pub fn wait_step(&mut self) -> WaitStatus {
        if self.speed_scale >= speed::FASTEST {
            return WaitStatus::Proceed;
        }

        let last_tick = match self.last_tick {
            Some(t) => t,
            None => {
                let t = self.clock.now_ms();
                self.last_tick = Some(t);
                t
            }
        };

        let deadline = match self.deadline {
            Some(d) => d,
            None => {
                let d = last_tick + (self.target_frame_interval * 1000.0) as u64;
                self.deadline = Some(d);
                d
            }
        };

        let now = self.clock.now_ms();
        let mut remaining = deadline.saturating_sub(now);
        if remaining > self.config.slice_ms {
            // keep the cycle open; the next call carries on to the same deadline
            remaining = self.config.slice_ms;
        } else {
            self.deadline = None;
        }

        log::trace!(
            "wait {}ms towards {} (frame complete: {})",
            remaining,
            deadline,
            self.deadline.is_none()
        );

        if remaining > 0 {
            self.clock.sleep_ms(remaining);
        }

        if self.deadline.is_none() {
            self.last_tick = Some(self.clock.now_ms());
            WaitStatus::Proceed
        } else {
            WaitStatus::MustContinueWaiting
        }
    }

    /// Wait out the whole frame, handing control back to `between` after
    /// every unfinished slice. Returns how many slices it took.
    pub fn wait_for_frame<P>(&mut self, mut between: P) -> u32
    where
        P: FnMut(&mut Self),
    {
        let mut slices = 1;
        while self.wait_step() == WaitStatus::MustContinueWaiting {
            between(&mut *self);
            slices += 1;
        }
        slices
    }

    /// Multiply or divide the speed by the step ratio.
    pub fn step_speed_multiplicatively(&mut self, direction: Direction) {
        self.max_speed = false;
        self.speed_scale = direction.apply(self.speed_scale);
        self.speed_changed();
    }

    /// Set the speed as a percentage of native; clamped into range.
    pub fn set_custom_speed(&mut self, percent: i32) -> Result<(), ThrottleError> {
        if percent < 1 {
            return Err(ThrottleError::InvalidArgument { percent });
        }
        self.max_speed = false;
        self.speed_scale = speed::clamp_scale(percent as f64 / 100.0);
        self.speed_changed();
        Ok(())
    }

    pub fn set_named_speed(&mut self, command: SpeedCommand) {
        self.max_speed = false;
        self.speed_scale = match command {
            SpeedCommand::Slowest => speed::SLOWEST,
            SpeedCommand::Slower => Direction::Decrease.apply(self.speed_scale),
            SpeedCommand::Normal => speed::NORMAL,
            SpeedCommand::Faster => Direction::Increase.apply(self.speed_scale),
            SpeedCommand::Fastest => {
                self.max_speed = true;
                speed::FASTEST
            }
        };
        self.speed_changed();
    }

    /// integer-coded variant; unknown codes are ignored
    pub fn set_named_speed_code(&mut self, code: i32) {
        match SpeedCommand::from_code(code) {
            Some(command) => self.set_named_speed(command),
            None => log::debug!("ignoring unknown speed command {}", code),
        }
    }

    fn speed_changed(&mut self) {
        self.refresh();
        let text = speed::format_speed(self.speed_scale);
        self.notifier
            .display_message(&text, self.config.message_duration_hint);
    }

    pub fn speed_scale(&self) -> f64 {
        self.speed_scale
    }

    /// true only when pinned by the `Fastest` command
    pub fn max_speed(&self) -> bool {
        self.max_speed
    }

    /// seconds per frame at the current speed
    pub fn target_frame_interval(&self) -> f64 {
        self.target_frame_interval
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.deadline
    }

    pub fn in_frame(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn fps_source(&self) -> &F {
        &self.fps
    }

    /// callers changing the rate should `refresh()` afterwards
    pub fn fps_source_mut(&mut self) -> &mut F {
        &mut self.fps
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
