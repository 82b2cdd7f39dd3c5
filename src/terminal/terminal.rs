use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::Color;
use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{
    Attribute, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// Inline terminal surface: frames are redrawn in place below the cursor position the
/// terminal had when it was opened.
pub struct Terminal {
    stdout: Stdout,
    size: Size,
    drawn_lines: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: Size { width, height },
            drawn_lines: 0,
        })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide)?;
        Ok(())
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Show)?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            let event = read()?;
            match event {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    return Ok(TerminalEvent::Key(map_key_event(key)));
                }
                Event::Resize(width, height) => {
                    self.size = Size { width, height };
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    /// Replaces the previously drawn frame with `lines`.
    pub fn render_frame(&mut self, lines: &[SpanLine]) -> io::Result<()> {
        if self.drawn_lines > 0 {
            queue!(self.stdout, cursor::MoveToPreviousLine(self.drawn_lines))?;
        } else {
            queue!(self.stdout, cursor::MoveToColumn(0))?;
        }
        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;

        for line in lines {
            self.render_line(line)?;
            write!(self.stdout, "\r\n")?;
        }
        self.drawn_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        self.stdout.flush()
    }

    fn render_line(&mut self, line: &[Span]) -> io::Result<()> {
        for span in line {
            let style = span.style;
            if let Some(fg) = style.color {
                write!(self.stdout, "{}", SetForegroundColor(map_color(fg)))?;
            }
            if let Some(bg) = style.background {
                write!(self.stdout, "{}", SetBackgroundColor(map_color(bg)))?;
            }
            if style.bold {
                write!(self.stdout, "{}", SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                write!(self.stdout, "{}", SetAttribute(Attribute::Dim))?;
            }
            if style.underline {
                write!(self.stdout, "{}", SetAttribute(Attribute::Underlined))?;
            }

            write!(self.stdout, "{}", span.text)?;

            if !style.is_plain() {
                write!(self.stdout, "{}", SetAttribute(Attribute::Reset))?;
                write!(self.stdout, "{}", ResetColor)?;
            }
        }
        Ok(())
    }
}

fn map_color(color: Color) -> crossterm::style::Color {
    match color {
        Color::Reset => crossterm::style::Color::Reset,
        Color::Black => crossterm::style::Color::Black,
        Color::DarkGrey => crossterm::style::Color::DarkGrey,
        Color::Red => crossterm::style::Color::Red,
        Color::Green => crossterm::style::Color::Green,
        Color::Yellow => crossterm::style::Color::Yellow,
        Color::Blue => crossterm::style::Color::Blue,
        Color::Magenta => crossterm::style::Color::Magenta,
        Color::Cyan => crossterm::style::Color::Cyan,
        Color::White => crossterm::style::Color::White,
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(event.code),
        modifiers: map_key_modifiers(event.modifiers),
    }
}

fn map_key_code(code: crossterm::event::KeyCode) -> KeyCode {
    match code {
        crossterm::event::KeyCode::Char(ch) => KeyCode::Char(ch),
        crossterm::event::KeyCode::Backspace => KeyCode::Backspace,
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Left => KeyCode::Left,
        crossterm::event::KeyCode::Right => KeyCode::Right,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::Home => KeyCode::Home,
        crossterm::event::KeyCode::End => KeyCode::End,
        crossterm::event::KeyCode::Tab => KeyCode::Tab,
        crossterm::event::KeyCode::BackTab => KeyCode::BackTab,
        crossterm::event::KeyCode::Delete => KeyCode::Delete,
        _ => KeyCode::Other,
    }
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(crossterm::event::KeyModifiers::SHIFT) {
        mapped |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        mapped |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::ALT) {
        mapped |= KeyModifiers::ALT;
    }
    mapped
}
