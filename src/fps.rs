// NB. frame rates arrive as 8.24 fixed point: value >> 24 is whole Hz,
//     the low 24 bits are the fraction

/// one Hz in the fixed-point encoding
pub const FPS_ONE: f64 = 16777216.0;

/// NTSC NES frame rate
pub const NTSC_HZ: f64 = 60.099823;

/// PAL NES frame rate
pub const PAL_HZ: f64 = 50.006978;

/// decode a fixed-point frame rate into Hz
pub fn decode_hz(encoded: u32) -> f64 {
    encoded as f64 / FPS_ONE
}

/// encode Hz into fixed point; saturates outside what 32 bits can carry
pub fn encode_hz(hz: f64) -> u32 {
    let v = (hz * FPS_ONE).round();
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v as u32
    }
}

/// Where the throttle gets the emulation core's native frame rate from.
pub trait FpsSource {
    /// native frame rate, fixed-point Hz
    fn desired_fps_encoded(&self) -> u32;
}

/// a frame rate that only changes when the host says so (e.g. region switch)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedFps {
    encoded: u32,
}

impl FixedFps {
    pub fn new(encoded: u32) -> Self {
        FixedFps { encoded }
    }

    pub fn from_hz(hz: f64) -> Self {
        FixedFps::new(encode_hz(hz))
    }

    pub fn ntsc() -> Self {
        FixedFps::from_hz(NTSC_HZ)
    }

    pub fn pal() -> Self {
        FixedFps::from_hz(PAL_HZ)
    }

    /// change the rate; the throttle must be refreshed afterwards
    pub fn set_hz(&mut self, hz: f64) {
        self.encoded = encode_hz(hz);
    }

    pub fn hz(&self) -> f64 {
        decode_hz(self.encoded)
    }
}

impl Default for FixedFps {
    fn default() -> Self {
        FixedFps::ntsc()
    }
}

impl FpsSource for FixedFps {
    fn desired_fps_encoded(&self) -> u32 {
        self.encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_whole_hz() {
        assert_eq!(decode_hz(60 << 24), 60.0);
        assert_eq!(decode_hz(0), 0.0);
    }

    #[test]
    fn test_encode_saturates() {
        assert_eq!(encode_hz(-1.0), 0);
        assert_eq!(encode_hz(f64::NAN), 0);
        assert_eq!(encode_hz(1e12), u32::MAX);
        assert_eq!(encode_hz(60.0), 60 << 24);
    }

    #[test]
    fn test_ntsc_keeps_fraction() {
        let f = FixedFps::ntsc();
        assert_eq!(f.desired_fps_encoded() >> 24, 60);
        assert!((f.hz() - NTSC_HZ).abs() < 1e-6);
    }

    #[test]
    fn test_set_hz() {
        let mut f = FixedFps::default();
        f.set_hz(PAL_HZ);
        assert_eq!(f, FixedFps::pal());
        assert_eq!(f.desired_fps_encoded() >> 24, 50);
    }
}
