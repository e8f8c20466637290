/// # speed
///
/// Speed scale domain. 1.0 is the core's native frame rate; everything the
/// controller stores is kept inside `[SLOWEST, FASTEST]`.
///
///  * SLOWEST  1/64x  (around 1 fps on NTSC)
///  * NORMAL   1x     (around 60 fps on NTSC)
///  * FASTEST  32x    (around 1920 fps on NTSC); throttling is off here
use std::fmt;

pub const SLOWEST: f64 = 0.015625;
pub const NORMAL: f64 = 1.0;
pub const FASTEST: f64 = 32.0;

/// exp(ln(2) / 3): three steps double (or halve) the speed
pub const STEP_RATIO: f64 = 1.259921049894873;

/// clamp a speed scale into `[SLOWEST, FASTEST]`
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return NORMAL;
    }
    scale.clamp(SLOWEST, FASTEST)
}

/// text shown whenever the speed changes
pub fn format_speed(scale: f64) -> String {
    format!("Emulation speed {:.1}%", scale * 100.0)
}

/// direction for multiplicative stepping
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// apply one step to `scale`, clamped
    pub fn apply(self, scale: f64) -> f64 {
        match self {
            Direction::Increase => clamp_scale(scale * STEP_RATIO),
            Direction::Decrease => clamp_scale(scale / STEP_RATIO),
        }
    }
}

/// named speed commands, as issued from menus and hotkeys
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpeedCommand {
    Slowest,
    Slower,
    Normal,
    Faster,
    Fastest,
}

/// integer command codes used by hosts that pass commands around as ints
const SPEED_COMMAND_CODES: [(i32, SpeedCommand); 5] = [
    (0, SpeedCommand::Slowest),
    (1, SpeedCommand::Slower),
    (2, SpeedCommand::Normal),
    (3, SpeedCommand::Faster),
    (4, SpeedCommand::Fastest),
];

impl SpeedCommand {
    /// `None` for an unrecognized code
    pub fn from_code(code: i32) -> Option<SpeedCommand> {
        SPEED_COMMAND_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, cmd)| *cmd)
    }
}

impl fmt::Display for SpeedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpeedCommand::Slowest => "slowest",
            SpeedCommand::Slower => "slower",
            SpeedCommand::Normal => "normal",
            SpeedCommand::Faster => "faster",
            SpeedCommand::Fastest => "fastest",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_ratio_is_cube_root_of_two() {
        assert!((STEP_RATIO.powi(3) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale(0.0), SLOWEST);
        assert_eq!(clamp_scale(-3.0), SLOWEST);
        assert_eq!(clamp_scale(1000.0), FASTEST);
        assert_eq!(clamp_scale(f64::INFINITY), FASTEST);
        assert_eq!(clamp_scale(f64::NAN), NORMAL);
        assert_eq!(clamp_scale(1.5), 1.5);
    }

    #[test]
    fn test_direction_clamps() {
        assert_eq!(Direction::Increase.apply(FASTEST), FASTEST);
        assert_eq!(Direction::Decrease.apply(SLOWEST), SLOWEST);
        assert!((Direction::Increase.apply(1.0) - STEP_RATIO).abs() < 1e-12);
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(1.0), "Emulation speed 100.0%");
        assert_eq!(format_speed(SLOWEST), "Emulation speed 1.6%");
        assert_eq!(format_speed(STEP_RATIO), "Emulation speed 126.0%");
    }

    #[test]
    fn test_command_codes() {
        assert_eq!(SpeedCommand::from_code(0), Some(SpeedCommand::Slowest));
        assert_eq!(SpeedCommand::from_code(4), Some(SpeedCommand::Fastest));
        assert_eq!(SpeedCommand::from_code(5), None);
        assert_eq!(SpeedCommand::from_code(-1), None);
        for (code, cmd) in SPEED_COMMAND_CODES {
            assert_eq!(SpeedCommand::from_code(code), Some(cmd));
        }
    }
}
