/// Errors surfaced by the throttle to its callers.
///
/// Numeric edge cases (degenerate FPS, out-of-range speeds) are clamped, not
/// reported, so this stays small.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThrottleError {
    #[error("invalid speed percentage {percent}: must be at least 1")]
    InvalidArgument { percent: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let e = ThrottleError::InvalidArgument { percent: 0 };
        assert_eq!(e.to_string(), "invalid speed percentage 0: must be at least 1");
    }
}
