/// # session
///
/// The host side of the throttle: a frame loop that keeps polling input
/// while it waits, so speed hotkeys work even when a single frame takes a
/// second or more.
///
///  loop
///   |-- poll input, apply speed commands (each one restarts the wait)
///   |-- throttle.wait_step()   // sleeps one slice at most
///   `-- on Proceed: run a frame, redraw now and again
use crate::clock::Clock;
use crate::display::{Display, Status};
use crate::fps::{self, FpsSource};
use crate::input::{HostCommand, Input};
use crate::notify::Notifier;
use crate::throttle::{ThrottleController, WaitStatus};
use std::io;

/// don't redraw more often than this, however fast frames are going
const REDRAW_MS: u64 = 33;

pub struct Session<C: Clock, F: FpsSource, N: Notifier, I: Input, D: Display> {
    throttle: ThrottleController<C, F, N>,
    input: I,
    display: D,
    frames: u64,
    running: bool,
    last_draw: Option<u64>,
}

impl<C: Clock, F: FpsSource, N: Notifier, I: Input, D: Display> Session<C, F, N, I, D> {
    pub fn new(throttle: ThrottleController<C, F, N>, input: I, display: D) -> Self {
        Session {
            throttle,
            input,
            display,
            frames: 0,
            running: false,
            last_draw: None,
        }
    }

    /// Run frames until told to quit, or until `max_frames` have run.
    /// Returns how many frames ran.
    pub fn run(&mut self, max_frames: Option<u64>) -> Result<u64, io::Error> {
        let start = self.frames;
        self.running = true;
        log::info!("frame loop started");

        while self.running {
            if max_frames.map_or(false, |max| self.frames - start >= max) {
                break;
            }

            let commands = self.input.poll_commands()?;
            if !commands.is_empty() {
                for cmd in commands {
                    self.apply(cmd);
                }
                self.draw()?;
            }
            if !self.running {
                break;
            }

            if self.throttle.wait_step() == WaitStatus::Proceed {
                self.frames += 1;
                self.maybe_draw()?;
            }
        }

        self.draw()?;
        self.running = false;
        log::info!("frame loop stopped after {} frames", self.frames - start);
        Ok(self.frames - start)
    }

    /// apply one command from the UI
    pub fn apply(&mut self, cmd: HostCommand) {
        log::debug!("command {:?}", cmd);
        match cmd {
            HostCommand::Speed(speed) => self.throttle.set_named_speed(speed),
            HostCommand::CustomSpeed(percent) => {
                if let Err(e) = self.throttle.set_custom_speed(percent) {
                    log::warn!("{}", e);
                }
            }
            HostCommand::Quit => self.running = false,
        }
    }

    pub fn status(&self) -> Status {
        Status {
            frames: self.frames,
            speed_scale: self.throttle.speed_scale(),
            frame_interval: self.throttle.target_frame_interval(),
            native_hz: fps::decode_hz(self.throttle.fps_source().desired_fps_encoded()),
            max_speed: self.throttle.max_speed(),
            message: self.throttle.notifier().current_message().map(str::to_string),
        }
    }

    fn maybe_draw(&mut self) -> Result<(), io::Error> {
        let now = self.throttle.clock_mut().now_ms();
        match self.last_draw {
            Some(t) if now < t + REDRAW_MS => Ok(()),
            _ => self.draw(),
        }
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        self.last_draw = Some(self.throttle.clock_mut().now_ms());
        let status = self.status();
        self.display.draw(&status)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn throttle(&self) -> &ThrottleController<C, F, N> {
        &self.throttle
    }

    pub fn throttle_mut(&mut self) -> &mut ThrottleController<C, F, N> {
        &mut self.throttle
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DummyClock;
    use crate::display::DummyDisplay;
    use crate::fps::FixedFps;
    use crate::input::DummyInput;
    use crate::notify::{Mute, StatusLine};
    use crate::speed::SpeedCommand;

    #[test]
    fn test_runs_requested_frames() -> Result<(), io::Error> {
        // 5Hz: four 50ms slices a frame
        let throttle = ThrottleController::new(DummyClock::new(0), FixedFps::new(5 << 24), Mute::new());
        let mut s = Session::new(throttle, DummyInput::new(&[]), DummyDisplay::new());
        assert_eq!(s.run(Some(3))?, 3);
        assert_eq!(s.frames(), 3);
        assert_eq!(s.throttle().clock().total_slept(), 600);
        assert_eq!(s.throttle().clock().sleeps().len(), 12);
        // one per frame plus the final redraw
        assert_eq!(s.display().draws(), 4);
        Ok(())
    }

    #[test]
    fn test_input_handled_between_slices() -> Result<(), io::Error> {
        let throttle = ThrottleController::new(DummyClock::new(0), FixedFps::new(5 << 24), StatusLine::new());
        let mut s = Session::new(
            throttle,
            DummyInput::new(&[&[], &[HostCommand::Speed(SpeedCommand::Fastest)]]),
            DummyDisplay::new(),
        );
        assert_eq!(s.run(Some(10))?, 10);
        // only the first slice was slept before going flat out
        assert_eq!(s.throttle().clock().sleeps(), &[50]);
        assert!(s.throttle().max_speed());
        let last = s.display().last().cloned().unwrap_or_default();
        assert_eq!(last.frames, 10);
        assert!(last.max_speed);
        assert_eq!(last.message.as_deref(), Some("Emulation speed 3200.0%"));
        Ok(())
    }

    #[test]
    fn test_quit_stops_loop() -> Result<(), io::Error> {
        let throttle = ThrottleController::new(DummyClock::new(0), FixedFps::new(5 << 24), Mute::new());
        let mut s = Session::new(
            throttle,
            DummyInput::new(&[&[], &[HostCommand::Quit]]),
            DummyDisplay::new(),
        );
        assert_eq!(s.run(None)?, 0);
        assert_eq!(s.throttle().clock().sleeps(), &[50]);
        Ok(())
    }

    #[test]
    fn test_bad_custom_speed_ignored() {
        let throttle = ThrottleController::new(DummyClock::new(0), FixedFps::ntsc(), StatusLine::new());
        let mut s = Session::new(throttle, DummyInput::new(&[]), DummyDisplay::new());
        s.apply(HostCommand::CustomSpeed(0));
        assert_eq!(s.throttle().speed_scale(), 1.0);
        assert_eq!(s.status().message, None);
        s.apply(HostCommand::CustomSpeed(200));
        assert_eq!(s.throttle().speed_scale(), 2.0);
        assert_eq!(s.status().message.as_deref(), Some("Emulation speed 200.0%"));
        assert!((s.status().native_hz - fps::NTSC_HZ).abs() < 1e-6);
    }
}
