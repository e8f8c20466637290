use crate::speed::SpeedCommand;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// what the host frame loop can be asked to do
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostCommand {
    Speed(SpeedCommand),
    CustomSpeed(i32),
    Quit,
}

/// hotkeys for the speed menu
const SPEED_KEYMAP: [(char, HostCommand); 9] = [
    ('1', HostCommand::Speed(SpeedCommand::Slowest)),
    ('2', HostCommand::Speed(SpeedCommand::Slower)),
    ('3', HostCommand::Speed(SpeedCommand::Normal)),
    ('4', HostCommand::Speed(SpeedCommand::Faster)),
    ('5', HostCommand::Speed(SpeedCommand::Fastest)),
    ('-', HostCommand::Speed(SpeedCommand::Slower)),
    ('=', HostCommand::Speed(SpeedCommand::Faster)),
    ('0', HostCommand::Speed(SpeedCommand::Normal)),
    ('q', HostCommand::Quit),
];

/// reads whatever the user has asked for since the last poll
pub trait Input {
    /// never blocks; an empty list means nothing happened
    fn poll_commands(&mut self) -> Result<Vec<HostCommand>, io::Error>;
}

/// keyboard input from the terminal, via crossterm in raw mode
pub struct KeyboardInput {
    keymap: HashMap<char, HostCommand>,
}

impl KeyboardInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(KeyboardInput {
            keymap: HashMap::from(SPEED_KEYMAP),
        })
    }

    fn map_key(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<HostCommand> {
        match code {
            KeyCode::Esc => Some(HostCommand::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(HostCommand::Quit)
            }
            KeyCode::Char(key) => match self.keymap.get(&key) {
                Some(cmd) => Some(*cmd),
                None => {
                    log::debug!("no command mapped to {:?}", key);
                    None
                }
            },
            _ => None,
        }
    }
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Input for KeyboardInput {
    fn poll_commands(&mut self) -> Result<Vec<HostCommand>, io::Error> {
        let mut commands = Vec::new();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if let Some(cmd) = self.map_key(evt.code, evt.modifiers) {
                    commands.push(cmd);
                }
            }
        }
        Ok(commands)
    }
}

/// dummy Input implementation for testing: hands out one scripted batch of
/// commands per poll
pub struct DummyInput {
    batches: Vec<Vec<HostCommand>>,
}

impl DummyInput {
    pub fn new(batches: &[&[HostCommand]]) -> Self {
        DummyInput {
            batches: batches.iter().rev().map(|b| b.to_vec()).collect(),
        }
    }
}

impl Input for DummyInput {
    fn poll_commands(&mut self) -> Result<Vec<HostCommand>, io::Error> {
        Ok(self.batches.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_input_batches_in_order() -> Result<(), io::Error> {
        let mut i = DummyInput::new(&[
            &[HostCommand::CustomSpeed(50)],
            &[],
            &[HostCommand::Quit],
        ]);
        assert_eq!(i.poll_commands()?, vec![HostCommand::CustomSpeed(50)]);
        assert!(i.poll_commands()?.is_empty());
        assert_eq!(i.poll_commands()?, vec![HostCommand::Quit]);
        assert!(i.poll_commands()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_keymap_has_every_named_speed() {
        let keymap: HashMap<char, HostCommand> = HashMap::from(SPEED_KEYMAP);
        for (key, cmd) in [
            ('1', SpeedCommand::Slowest),
            ('2', SpeedCommand::Slower),
            ('3', SpeedCommand::Normal),
            ('4', SpeedCommand::Faster),
            ('5', SpeedCommand::Fastest),
        ] {
            assert_eq!(keymap.get(&key), Some(&HostCommand::Speed(cmd)));
        }
    }

    #[test]
    #[ignore]
    // NB. needs a real terminal
    fn test_keyboard_maps_keys() -> Result<(), io::Error> {
        let k = KeyboardInput::new()?;
        assert_eq!(k.map_key(KeyCode::Esc, KeyModifiers::NONE), Some(HostCommand::Quit));
        assert_eq!(
            k.map_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(HostCommand::Quit)
        );
        assert_eq!(
            k.map_key(KeyCode::Char('='), KeyModifiers::NONE),
            Some(HostCommand::Speed(SpeedCommand::Faster))
        );
        assert_eq!(k.map_key(KeyCode::Char('z'), KeyModifiers::NONE), None);
        Ok(())
    }
}
