use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// left-hand block of a qwerty keyboard mapped onto the 4x4 hex keypad,
/// where '1' => 0x1 and 'v' => 0xf
const QWERTY_KEYMAP: [(char, u8); 16] = [
    ('x', 0x0),
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('z', 0xa),
    ('c', 0xb),
    ('4', 0xc),
    ('r', 0xd),
    ('f', 0xe),
    ('v', 0xf),
];

/// The sixteen key states the executor reads, mutated by the host as
/// press/release transitions arrive.
///
/// The latch also remembers the most recent unpressed-to-pressed edge, which
/// is what lets the wait-for-key instruction suspend without the executor
/// polling the host: the machine clears the edge when it starts waiting and
/// consumes the next one to wake up.
pub struct Keypad {
    keys: [bool; 16],
    edge: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; 16],
            edge: None,
        }
    }

    /// record a press or release; key indices are taken modulo 16
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        let k = (key & 0xf) as usize;
        if pressed && !self.keys[k] {
            self.edge = Some(k as u8);
        }
        self.keys[k] = pressed;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xf) as usize]
    }

    /// consume the latest key-down edge, if one arrived
    pub fn take_edge(&mut self) -> Option<u8> {
        self.edge.take()
    }

    /// forget any edge latched before a wait began
    pub fn clear_edge(&mut self) {
        self.edge = None;
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

/// what the host's input source can report per poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// a mapped keypad key went down
    Key(u8),
    /// the operator asked to leave
    Quit,
}

/// reads keypresses
pub trait Input {
    /// drain whatever events arrived since the last poll, without blocking
    fn poll_events(&mut self) -> Result<Vec<HostEvent>, io::Error>;
}

/// terminal implementation of Input, reading crossterm key events in raw mode
pub struct TermInput {
    keymap: HashMap<char, u8>,
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(QWERTY_KEYMAP),
        })
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>, io::Error> {
        let mut events = Vec::new();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key) {
                        Some(mapped) => events.push(HostEvent::Key(*mapped)),
                        None => log::debug!("no keypad mapping for {:?}", key),
                    },
                    KeyCode::Esc => events.push(HostEvent::Quit),
                    _ => log::debug!("ignoring key event {:?}", evt.code),
                },
                _ => {}
            }
        }
        Ok(events)
    }
}

/// scripted Input implementation for testing
pub struct ScriptedInput {
    queue: VecDeque<Vec<HostEvent>>,
}

impl ScriptedInput {
    pub fn new(polls: &[&[HostEvent]]) -> Self {
        ScriptedInput {
            queue: polls.iter().map(|p| p.to_vec()).collect(),
        }
    }
}

impl Input for ScriptedInput {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>, io::Error> {
        Ok(self.queue.pop_front().unwrap_or_default())
    }
}
