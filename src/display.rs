use std::io::{self, stdout, Stdout, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::chrono::format_elapsed;
use crate::control::Command;
use crate::house::House;
use crate::presenter::Presenter;
use crate::robot::Robot;
use crate::snapshot::{create_snapshot, PresenterEvent};
use crate::types::BATTERY_MAX;

// Fixed layout of the terminal screen
const HEADER_Y: u16 = 0;
const CHRONO_Y: u16 = 2;
const BATTERY_Y: u16 = 3;
const MESSAGE_Y: u16 = 4;
const MAP_START_Y: u16 = 6;
const MAP_LEFT: u16 = 2;

/// Renders house and robot on the terminal with crossterm.
pub struct TerminalPresenter {
    message_window: Duration,
    legend_y: u16,
}

impl TerminalPresenter {
    pub fn new(message_window: Duration) -> Self {
        Self {
            message_window,
            legend_y: MAP_START_Y,
        }
    }

    fn draw(&mut self, house: &House, robot: &Robot) -> io::Result<()> {
        let mut stdout = stdout();

        stdout.execute(MoveTo(0, HEADER_Y))?;
        stdout.execute(SetForegroundColor(Color::Cyan))?;
        stdout.execute(Print("🤖 SWEEPBOT - Robot nettoyeur autonome"))?;
        stdout.execute(ResetColor)?;

        stdout.execute(MoveTo(0, BATTERY_Y))?;
        stdout.execute(Clear(ClearType::CurrentLine))?;
        stdout.execute(SetForegroundColor(battery_color(robot.battery)))?;
        stdout.execute(Print(format!(
            "🔋 {:>3}% {}",
            robot.battery,
            battery_bar(robot.battery)
        )))?;
        stdout.execute(ResetColor)?;

        for (r, row) in house.row_tiles().enumerate() {
            let y = MAP_START_Y + r as u16;
            stdout.execute(MoveTo(MAP_LEFT, y))?;
            stdout.execute(Clear(ClearType::UntilNewLine))?;
            for (c, tile) in row.iter().enumerate() {
                stdout.execute(MoveTo(MAP_LEFT + c as u16 * 2, y))?;
                if robot.position == (r, c) {
                    stdout.execute(Print("🤖"))?;
                } else {
                    stdout.execute(Print(tile.symbol()))?;
                }
            }
        }

        self.legend_y = MAP_START_Y + house.rows() as u16 + 1;
        stdout.execute(MoveTo(0, self.legend_y))?;
        stdout.execute(SetForegroundColor(Color::DarkGrey))?;
        stdout.execute(Print(format!(
            "Pièces sales: {} | Nettoyées par le robot: {}",
            house.dirty_count(),
            house.cleaned_by_robot_count()
        )))?;
        stdout.execute(MoveTo(0, self.legend_y + 1))?;
        stdout.execute(Print(
            "Légende: 🤖 Robot | 💩 Sale | 🧽 Nettoyée par le robot | 🧼 Propre",
        ))?;
        stdout.execute(MoveTo(0, self.legend_y + 2))?;
        stdout.execute(Print("[s] Démarrer/Reprendre  [p] Pause  [r] Réinitialiser  [q] Quitter"))?;
        stdout.execute(ResetColor)?;

        stdout.flush()
    }

    fn draw_line(y: u16, text: &str, color: Color) -> io::Result<()> {
        let mut stdout = stdout();
        stdout.execute(MoveTo(0, y))?;
        stdout.execute(Clear(ClearType::CurrentLine))?;
        stdout.execute(SetForegroundColor(color))?;
        stdout.execute(Print(text))?;
        stdout.execute(ResetColor)?;
        stdout.flush()
    }
}

impl Presenter for TerminalPresenter {
    fn state_changed(&mut self, house: &House, robot: &Robot) {
        if let Err(err) = self.draw(house, robot) {
            warn!(%err, "terminal render failed");
        }
    }

    async fn show_message(&mut self, text: &str) {
        if let Err(err) = Self::draw_line(MESSAGE_Y, text, Color::Yellow) {
            warn!(%err, "terminal message failed");
        }
        tokio::time::sleep(self.message_window).await;
    }

    fn clear_message(&mut self) {
        if let Err(err) = Self::draw_line(MESSAGE_Y, "", Color::Reset) {
            warn!(%err, "terminal clear failed");
        }
    }

    async fn delay(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn chrono_updated(&mut self, elapsed: Duration) {
        let text = format!("⏱️ Temps écoulé : {}", format_elapsed(elapsed));
        if let Err(err) = Self::draw_line(CHRONO_Y, &text, Color::White) {
            warn!(%err, "terminal chrono failed");
        }
    }
}

/// Ten segments, one per 10%.
pub fn battery_bar(battery: u32) -> String {
    (0..10)
        .map(|i| if battery > i * BATTERY_MAX / 10 { "🟩" } else { "🟥" })
        .collect()
}

fn battery_color(battery: u32) -> Color {
    match battery {
        0..=19 => Color::Red,
        20..=49 => Color::Yellow,
        _ => Color::Green,
    }
}

/// Raw mode and alternate screen for the lifetime of the guard.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Some(Command::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Reads keys on a dedicated thread and forwards them as commands.
pub fn spawn_key_reader(commands: UnboundedSender<Command>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let Some(command) = command_for_key(key) else {
                    continue;
                };
                if commands.send(command).is_err() || command == Command::Quit {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "keyboard read failed");
                let _ = commands.send(Command::Quit);
                break;
            }
        }
    })
}

/// Headless renderer: one JSON [`PresenterEvent`] per line.
pub struct JsonLinesPresenter<W: Write + Send> {
    out: W,
    message_window: Duration,
}

impl<W: Write + Send> JsonLinesPresenter<W> {
    pub fn new(out: W, message_window: Duration) -> Self {
        Self {
            out,
            message_window,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &PresenterEvent) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            warn!(%err, "could not write event line");
        }
    }
}

impl<W: Write + Send> Presenter for JsonLinesPresenter<W> {
    fn state_changed(&mut self, house: &House, robot: &Robot) {
        self.emit(&PresenterEvent::State(create_snapshot(house, robot)));
    }

    async fn show_message(&mut self, text: &str) {
        self.emit(&PresenterEvent::Message {
            text: text.to_string(),
        });
        tokio::time::sleep(self.message_window).await;
    }

    fn clear_message(&mut self) {
        self.emit(&PresenterEvent::ClearMessage);
    }

    async fn delay(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn chrono_updated(&mut self, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.emit(&PresenterEvent::Chrono { elapsed_ms });
    }
}
