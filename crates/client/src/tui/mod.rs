mod screens;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use tallgrass::{Direction, FrameView};

pub use screens::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Step(Direction),
    Confirm,
    Number(usize),
    UseItem,
    Swap,
    Flee,
    Wave,
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Key presses waiting in the terminal, without blocking.
    pub fn poll_input(&mut self) -> io::Result<Vec<Input>> {
        let mut inputs = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && let Some(input) = map_key(key.code, key.modifiers)
            {
                inputs.push(input);
            }
        }
        Ok(inputs)
    }

    pub fn draw(&mut self, view: &FrameView, status: &Status) -> io::Result<()> {
        self.terminal.draw(|frame| screens::render(frame, view, status))?;
        Ok(())
    }

    pub fn restore_terminal(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Input> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Some(Input::Quit);
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Input::Step(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Input::Step(Direction::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Input::Step(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Input::Step(Direction::Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Input::Confirm),
        KeyCode::Char(c @ '1'..='4') => c.to_digit(10).map(|d| Input::Number(d as usize - 1)),
        KeyCode::Char('i') => Some(Input::UseItem),
        KeyCode::Char('s') => Some(Input::Swap),
        KeyCode::Char('f') => Some(Input::Flee),
        KeyCode::Char('w') => Some(Input::Wave),
        _ => None,
    }
}
