use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Paragraph};
use tui::Terminal;

/// Display is used by the host to show where the throttle is at. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    fn draw(&mut self, status: &Status) -> Result<(), io::Error>;
}

/// snapshot of the frame loop for drawing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub frames: u64,
    pub speed_scale: f64,
    /// seconds
    pub frame_interval: f64,
    /// the core's own frame rate
    pub native_hz: f64,
    pub max_speed: bool,
    pub message: Option<String>,
}

impl Status {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("frames    {}", self.frames),
            format!("speed     {:.1}%", self.speed_scale * 100.0),
        ];
        if self.speed_scale >= crate::speed::FASTEST {
            lines.push("interval  unthrottled".to_string());
        } else {
            lines.push(format!("interval  {:.2}ms", self.frame_interval * 1000.0));
        }
        lines.push(format!("native    {:.2}Hz", self.native_hz));
        if self.max_speed {
            lines.push("[max speed]".to_string());
        }
        lines.push(String::new());
        lines.push(self.message.clone().unwrap_or_default());
        lines
    }
}

const PANEL_WIDTH: u16 = 40;
const HELP: &str = "1-5 speed  -/= step  0 normal  q quit";

/// status panel in a terminal, rendered using TUI and crossterm
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TermDisplay {
    pub fn new() -> Result<TermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(TermDisplay { terminal })
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.show_cursor() {
            log::warn!("couldn't restore the cursor: {}", e);
        }
    }
}

impl Display for TermDisplay {
    fn draw(&mut self, status: &Status) -> Result<(), io::Error> {
        let mut text: Vec<Spans> = status
            .lines()
            .into_iter()
            .map(|l| Spans::from(Span::raw(l)))
            .collect();
        text.push(Spans::from(Span::styled(
            HELP,
            Style::default().add_modifier(Modifier::DIM),
        )));
        let height = 2 + text.len() as u16;

        self.terminal.draw(|f| {
            let area = f.size();
            let size = Rect::new(0, 0, PANEL_WIDTH.min(area.width), height.min(area.height));
            let panel = Paragraph::new(text).block(
                Block::default()
                    .title("throttle")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::White).bg(Color::Black)),
            );
            f.render_widget(panel, size);
        })?;
        Ok(())
    }
}

/// useful for testing and headless runs; remembers the last status
#[derive(Default)]
pub struct DummyDisplay {
    last: Option<Status>,
    draws: u64,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay::default()
    }

    pub fn last(&self) -> Option<&Status> {
        self.last.as_ref()
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, status: &Status) -> Result<(), io::Error> {
        self.last = Some(status.clone());
        self.draws += 1;
        Ok(())
    }
}
