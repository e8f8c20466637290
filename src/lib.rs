///
/// ## Design
///
/// * pace emulated frames against the wall clock at a user-chosen speed,
///   from 1/64x to 32x of the core's native frame rate
/// * never sleep longer than one slice (50ms) per call, so the host keeps
///   servicing input while throttled
/// * clock, sleep, frame rate and message sink are all traits, so tests can
///   run against a fake clock without waiting for real time
/// * at 32x throttling is switched off entirely
///
/// Model
///
/// Session
///  |-- input, display
///  |-- throttle(clock, fps source, notifier)
///  |    |-- speed scale + max speed flag
///  |    `-- frame interval, last tick, deadline
///  `-- main loop
///       |-- commands = input.poll();  // speed changes reset the deadline
///       |-- throttle.wait_step()      // one bounded sleep towards the deadline
///       `-- on Proceed: run a frame
pub mod clock;
pub mod display;
pub mod error;
pub mod fps;
pub mod input;
pub mod logging;
pub mod notify;
pub mod session;
pub mod speed;
pub mod throttle;

pub use error::ThrottleError;
pub use speed::{Direction, SpeedCommand};
pub use throttle::{ThrottleConfig, ThrottleController, WaitStatus};
