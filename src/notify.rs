/// Fire-and-forget message sink (on-screen overlay, log, whatever the host
/// has). The throttle calls it synchronously on every speed change.
pub trait Notifier {
    fn display_message(&mut self, text: &str, duration_hint: i32);

    /// the message currently on show, for sinks that keep one around
    fn current_message(&self) -> Option<&str> {
        None
    }
}

/// send messages to the log
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        LogNotifier {}
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        LogNotifier::new()
    }
}

impl Notifier for LogNotifier {
    fn display_message(&mut self, text: &str, _duration_hint: i32) {
        log::info!("{}", text);
    }
}

/// keeps the most recent message so a display can overlay it
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<String>,
    duration_hint: i32,
}

impl StatusLine {
    pub fn new() -> Self {
        StatusLine::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn duration_hint(&self) -> i32 {
        self.duration_hint
    }
}

impl Notifier for StatusLine {
    fn display_message(&mut self, text: &str, duration_hint: i32) {
        log::debug!("status: {}", text);
        self.message = Some(text.to_string());
        self.duration_hint = duration_hint;
    }

    fn current_message(&self) -> Option<&str> {
        self.message()
    }
}

/// drop everything on the floor
pub struct Mute {}
impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}
impl Notifier for Mute {
    fn display_message(&mut self, _text: &str, _duration_hint: i32) {}
}

/// remembers every message; useful for testing
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Vec<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier::default()
    }

    pub fn messages(&self) -> &[String] {
        self.messages.as_slice()
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl Notifier for RecordingNotifier {
    fn display_message(&mut self, text: &str, _duration_hint: i32) {
        self.messages.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_keeps_latest() {
        let mut s = StatusLine::new();
        assert_eq!(s.message(), None);
        s.display_message("one", 0);
        s.display_message("two", 3);
        assert_eq!(s.message(), Some("two"));
        assert_eq!(s.current_message(), Some("two"));
        assert_eq!(s.duration_hint(), 3);
    }

    #[test]
    fn test_recording_notifier() {
        let mut r = RecordingNotifier::new();
        r.display_message("a", 0);
        r.display_message("b", 0);
        assert_eq!(r.messages(), &["a".to_string(), "b".to_string()]);
        assert_eq!(r.last(), Some("b"));
        assert_eq!(r.current_message(), None);
    }
}
