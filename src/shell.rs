//! Terminal host: owns the wall clock, maps keys to actions and draws the
//! current session.

use crate::cabinet::Cabinet;
use crate::error::{ArcadeError, Result};
use crate::games::catch::LANES;
use crate::games::{face_finder, pairs};
use crate::games::stroop::INKS;
use crate::games::typing::compute_accuracy;
use crate::games::{Action, Ink, Item, LetterState, Rgb, RoundState};
use crate::session::{Phase, Progress, Session, SessionEvent};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

const TICK_MS: u64 = 33;
const RANKING_ROWS: usize = 10;

const LIT: Rgb = Rgb { r: 0, g: 150, b: 70 };
const DIM: Rgb = Rgb { r: 40, g: 40, b: 40 };
const WARN: Rgb = Rgb { r: 150, g: 20, b: 20 };
const SIMON_PADS: [Rgb; 4] = [
    Rgb { r: 200, g: 40, b: 40 },
    Rgb { r: 40, g: 170, b: 60 },
    Rgb { r: 40, g: 80, b: 200 },
    Rgb { r: 210, g: 180, b: 30 },
];

struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputStyle
{
    Tap,
    Board { cells: usize, columns: usize },
    Choice { options: usize },
    Text,
}

fn input_style(round: &RoundState) -> InputStyle
{
    match round {
        RoundState::Grid { size, .. } => InputStyle::Board {
            cells: size * size,
            columns: *size,
        },
        RoundState::OddColor { cells, .. } => InputStyle::Board {
            cells: *cells,
            columns: 6,
        },
        RoundState::Bomb { revealed, .. } => InputStyle::Board {
            cells: revealed.len(),
            columns: 6,
        },
        RoundState::Aim { cells, .. } => InputStyle::Board {
            cells: *cells,
            columns: crate::games::aim::SIDE,
        },
        RoundState::Faces { cells, .. } => InputStyle::Board {
            cells: *cells,
            columns: face_finder::COLUMNS,
        },
        RoundState::Pairs { faces, .. } => InputStyle::Board {
            cells: faces.len(),
            columns: pairs::COLUMNS,
        },
        RoundState::Simon { pads, .. } => InputStyle::Choice { options: *pads },
        RoundState::Stroop { .. } => InputStyle::Choice {
            options: INKS.len(),
        },
        RoundState::Arithmetic { .. }
        | RoundState::Letters { .. }
        | RoundState::Typing { .. }
        | RoundState::Unscramble { .. }
        | RoundState::Initial { .. }
        | RoundState::Wordle { .. } => InputStyle::Text,
        _ => InputStyle::Tap,
    }
}

#[derive(Default)]
struct Ui
{
    buffer: String,
    cursor: usize,
    status: String,
}

enum Command
{
    Quit,
    Act(Action),
}

/// Plays sessions on this cabinet until the player quits.
pub fn play(cabinet: &mut Cabinet) -> Result<()>
{
    let mut term = TerminalGuard::enter().map_err(terminal_error)?;
    loop {
        if !play_once(cabinet, term.stdout())? {
            cabinet.leave();
            return Ok(());
        }
        draw_summary(term.stdout(), cabinet)?;
        if !wait_for_replay()? {
            return Ok(());
        }
    }
}

/// Runs one session. `false` if the player quit before it completed.
fn play_once(cabinet: &mut Cabinet, stdout: &mut Stdout) -> Result<bool>
{
    let start = Instant::now();
    let mut ui = Ui::default();
    let mut last_draw: Option<Instant> = None;

    let events = cabinet.start(0);
    note_events(&mut ui, &events);

    loop {
        let now = elapsed_ms(start);
        let events = cabinet.advance(now);
        note_events(&mut ui, &events);

        let style = match cabinet.session() {
            Some(session) => input_style(session.round_state()),
            None => return Ok(false),
        };
        for command in read_commands(style, &mut ui)? {
            match command {
                Command::Quit => return Ok(false),
                Command::Act(action) => {
                    let events = cabinet.input(elapsed_ms(start), action);
                    note_events(&mut ui, &events);
                }
            }
        }

        let Some(session) = cabinet.session() else {
            return Ok(false);
        };
        if session.phase() == Phase::Complete {
            return Ok(true);
        }

        if last_draw.is_none_or(|at| at.elapsed() >= Duration::from_millis(TICK_MS)) {
            draw_ui(stdout, session, &ui)?;
            last_draw = Some(Instant::now());
        }

        thread::sleep(Duration::from_millis(1));
    }
}

fn note_events(ui: &mut Ui, events: &[SessionEvent])
{
    for event in events {
        match event {
            SessionEvent::Rejected { hint: Some(hint) } => ui.status = hint.to_string(),
            SessionEvent::Accepted { score_delta } if *score_delta > 0 => {
                ui.status = format!("+{score_delta}");
            }
            SessionEvent::Resolving { finishing: false } => ui.status = "Correct!".to_string(),
            SessionEvent::Resolving { finishing: true } => ui.status = "Round over".to_string(),
            SessionEvent::Started => ui.status.clear(),
            _ => {}
        }
    }
}

fn read_commands(style: InputStyle, ui: &mut Ui) -> Result<Vec<Command>>
{
    let mut commands = Vec::new();
    while event::poll(Duration::from_millis(0)).map_err(terminal_error)? {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read().map_err(terminal_error)?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Esc => commands.push(Command::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                commands.push(Command::Quit)
            }
            KeyCode::Tab => commands.push(Command::Act(Action::Stop)),
            _ => {
                if let Some(action) = map_key(style, code, ui) {
                    commands.push(Command::Act(action));
                }
            }
        }
    }
    Ok(commands)
}

fn map_key(style: InputStyle, code: KeyCode, ui: &mut Ui) -> Option<Action>
{
    match style {
        InputStyle::Tap => match code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Tap),
            _ => None,
        },
        InputStyle::Board { cells, columns } => {
            let last = cells.saturating_sub(1);
            match code {
                KeyCode::Left => ui.cursor = ui.cursor.saturating_sub(1),
                KeyCode::Right => ui.cursor = (ui.cursor + 1).min(last),
                KeyCode::Up => ui.cursor = ui.cursor.saturating_sub(columns),
                KeyCode::Down if ui.cursor + columns <= last => ui.cursor += columns,
                KeyCode::Char(' ') | KeyCode::Enter => {
                    return Some(Action::Select(ui.cursor.min(last)));
                }
                _ => {}
            }
            None
        }
        InputStyle::Choice { options } => match code {
            KeyCode::Char(ch) => {
                let digit = ch.to_digit(10)? as usize;
                (1..=options).contains(&digit).then(|| Action::Select(digit - 1))
            }
            _ => None,
        },
        InputStyle::Text => match code {
            KeyCode::Backspace => {
                ui.buffer.pop();
                None
            }
            KeyCode::Enter => Some(Action::Submit(std::mem::take(&mut ui.buffer))),
            KeyCode::Char(ch) if !ch.is_control() => {
                ui.buffer.push(ch);
                None
            }
            _ => None,
        },
    }
}

fn draw_ui(stdout: &mut Stdout, session: &Session, ui: &Ui) -> Result<()>
{
    let view = session.view();
    let mut lines = Vec::new();
    lines.push(format!(
        "Minigame Arcade - {} ({})",
        session.game_id(),
        session.difficulty().label()
    ));
    let progress = match view.progress {
        Progress::Timed { remaining_secs } => format!("Time left: {remaining_secs:>3}s"),
        Progress::Rounds { index, cap: Some(cap) } => format!("Round {index}/{cap}"),
        Progress::Rounds { index, cap: None } => format!("Round {index}"),
    };
    lines.push(format!("{progress}  Score: {}", view.score));
    lines.push(String::new());

    match view.phase {
        Phase::Idle | Phase::Countdown => {
            lines.push(format!("Get ready... {}", view.countdown_remaining));
        }
        _ => render_round(&mut lines, view.round, session, ui),
    }

    lines.push(String::new());
    if input_style(view.round) == InputStyle::Text {
        lines.push(format!("Input: {}", ui.buffer));
    }
    lines.push(format!("Status: {}", ui.status));
    lines.push(controls_line(view.round).to_string());

    flush_lines(stdout, &lines)
}

fn render_round(lines: &mut Vec<String>, round: &RoundState, session: &Session, ui: &Ui)
{
    match round {
        RoundState::Idle => {}
        RoundState::Reaction { go, .. } => {
            if *go {
                lines.push(paint(LIT, "      GO! TAP NOW      "));
            } else {
                lines.push(paint(WARN, "   wait for green...   "));
            }
        }
        RoundState::Tapper => lines.push(format!("Taps: {}", session.tally().score)),
        RoundState::Grid {
            size,
            pattern,
            picked,
            showing,
        } => {
            let cells: Vec<Rgb> = (0..size * size)
                .map(|cell| {
                    let lit = if *showing {
                        pattern.contains(&cell)
                    } else {
                        picked.contains(&cell)
                    };
                    if lit { LIT } else { DIM }
                })
                .collect();
            push_board(lines, &cells, *size, Some(ui.cursor));
            if *showing {
                lines.push("Memorise the squares".to_string());
            }
        }
        RoundState::Simon {
            pads,
            sequence,
            entered,
            lit,
            playing,
            ..
        } => {
            let row: String = (0..*pads)
                .map(|pad| {
                    let color = SIMON_PADS[pad % SIMON_PADS.len()];
                    let label = format!("  {}  ", pad + 1);
                    if *lit == Some(pad) { paint(color, &label) } else { paint(DIM, &label) }
                })
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(row);
            if *playing {
                lines.push("Watch the sequence".to_string());
            } else {
                lines.push(format!("Your turn: {}/{}", entered, sequence.len()));
            }
        }
        RoundState::OddColor {
            cells,
            base,
            odd,
            odd_index,
        } => {
            let colors: Vec<Rgb> = (0..*cells)
                .map(|cell| if cell == *odd_index { *odd } else { *base })
                .collect();
            push_board(lines, &colors, 6, Some(ui.cursor));
        }
        RoundState::Arithmetic { a, b, op } => {
            let sign = match op {
                crate::games::Operator::Add => '+',
                crate::games::Operator::Sub => '-',
            };
            lines.push(format!("{a} {sign} {b} = ?"));
        }
        RoundState::Letters { allowed } => {
            let letters: String = allowed.iter().map(|ch| ch.to_ascii_uppercase()).collect();
            lines.push(format!("Letters: {letters}"));
            lines.push(format!("Found: {}", session.tally().words.join(", ")));
        }
        RoundState::Bomb { revealed, .. } => {
            let cells: Vec<Rgb> = revealed
                .iter()
                .map(|open| if *open { LIT } else { DIM })
                .collect();
            push_board(lines, &cells, 6, Some(ui.cursor));
        }
        RoundState::Estimate { target_ms } => {
            lines.push(format!(
                "Tap when {:.1}s have passed since the round started",
                *target_ms as f32 / 1000.0
            ));
        }
        RoundState::Typing { text } => {
            lines.push(text.clone());
            lines.push(format!("Accuracy: {:>5.1}%", compute_accuracy(text, &ui.buffer)));
        }
        RoundState::Unscramble { scrambled, .. } => {
            lines.push(format!("Unscramble: {}", scrambled.to_ascii_uppercase()));
        }
        RoundState::Stroop { word, ink } => {
            lines.push(paint(ink_rgb(*ink), &format!("  {}  ", word.name())));
            let options: Vec<String> = INKS
                .iter()
                .enumerate()
                .map(|(idx, ink)| format!("{}={}", idx + 1, ink.name()))
                .collect();
            lines.push(options.join("  "));
        }
        RoundState::Catch { item, lane } => {
            let glyph = match item {
                Item::Apple => " o ",
                Item::Banana => " ) ",
                Item::Bee => " * ",
            };
            let row: String = (0..LANES)
                .map(|idx| if idx == *lane { glyph } else { " . " })
                .collect();
            lines.push(row);
            if *item == Item::Bee {
                lines.push("A bee! Let it pass (TAB)".to_string());
            }
        }
        RoundState::Aim { cells, target } => {
            let colors: Vec<Rgb> = (0..*cells)
                .map(|cell| if cell == *target { WARN } else { DIM })
                .collect();
            push_board(lines, &colors, crate::games::aim::SIDE, Some(ui.cursor));
        }
        RoundState::Wordle { attempts, .. } => {
            for attempt in attempts {
                let row: String = attempt
                    .guess
                    .chars()
                    .zip(attempt.states.iter())
                    .map(|(ch, state)| {
                        let color = match state {
                            LetterState::Correct => LIT,
                            LetterState::Present => Rgb { r: 180, g: 130, b: 0 },
                            LetterState::Absent => DIM,
                        };
                        paint(color, &format!(" {} ", ch.to_ascii_uppercase()))
                    })
                    .collect();
                lines.push(row);
            }
        }
        RoundState::Faces {
            target,
            decoy,
            cells,
            at,
        } => {
            lines.push(format!("Find the {target}"));
            let glyphs: Vec<&str> = (0..*cells)
                .map(|cell| if cell == *at { *target } else { *decoy })
                .collect();
            push_glyphs(lines, &glyphs, face_finder::COLUMNS, ui.cursor);
        }
        RoundState::Pairs {
            faces,
            matched,
            open,
        } => {
            let glyphs: Vec<&str> = faces
                .iter()
                .enumerate()
                .map(|(card, face)| {
                    if matched[card] || open.contains(&card) { *face } else { "##" }
                })
                .collect();
            push_glyphs(lines, &glyphs, pairs::COLUMNS, ui.cursor);
        }
        RoundState::Rhythm {
            free_from, flash, ..
        } => {
            if free_from.is_some() {
                lines.push("Keep the beat on your own".to_string());
                lines.push(format!("Taps: {}", session.tally().samples.len()));
            } else if *flash {
                lines.push(paint(LIT, "   BEAT   "));
            } else {
                lines.push(paint(DIM, "          "));
            }
        }
        RoundState::Initial { letter } => {
            lines.push(format!("Words starting with {}", letter.to_ascii_uppercase()));
            lines.push(format!("Found: {}", session.tally().words.join(", ")));
        }
    }
}

fn push_glyphs(lines: &mut Vec<String>, glyphs: &[&str], columns: usize, cursor: usize)
{
    for (row, chunk) in glyphs.chunks(columns.max(1)).enumerate() {
        let rendered: String = chunk
            .iter()
            .enumerate()
            .map(|(col, glyph)| {
                if row * columns + col == cursor {
                    format!("[{glyph}]")
                } else {
                    format!(" {glyph} ")
                }
            })
            .collect();
        lines.push(rendered);
    }
}

fn push_board(lines: &mut Vec<String>, cells: &[Rgb], columns: usize, cursor: Option<usize>)
{
    for (row, chunk) in cells.chunks(columns.max(1)).enumerate() {
        let rendered: String = chunk
            .iter()
            .enumerate()
            .map(|(col, color)| {
                let idx = row * columns + col;
                let label = if cursor == Some(idx) { "[ ]" } else { "   " };
                paint(*color, label)
            })
            .collect();
        lines.push(rendered);
    }
}

fn controls_line(round: &RoundState) -> &'static str
{
    match round {
        RoundState::Bomb { .. } => {
            "Controls: arrows to move, SPACE to pick, TAB to cash out, ESC to quit"
        }
        RoundState::Catch { .. } => "Controls: SPACE to catch, TAB to let it pass, ESC to quit",
        RoundState::Unscramble { .. } => {
            "Controls: type, ENTER to submit, TAB to bank and stop, ESC to quit"
        }
        _ => match input_style(round) {
            InputStyle::Tap => "Controls: SPACE to tap, ESC to quit",
            InputStyle::Board { .. } => "Controls: arrows to move, SPACE to pick, ESC to quit",
            InputStyle::Choice { .. } => "Controls: number keys to choose, ESC to quit",
            InputStyle::Text => "Controls: type, ENTER to submit, ESC to quit",
        },
    }
}

fn draw_summary(stdout: &mut Stdout, cabinet: &Cabinet) -> Result<()>
{
    let mut lines = Vec::new();
    lines.push(format!("Game over - {}", cabinet.game_id()));
    lines.push(String::new());
    if let Some(result) = cabinet.session().and_then(Session::result) {
        lines.push(format!("Result: {}", result.value));
        if let Some(label) = result.detail.as_ref().and_then(|detail| detail.label.as_ref()) {
            lines.push(format!("Detail: {label}"));
        }
    }
    match cabinet.last_position() {
        Some(position) => lines.push(format!("You placed #{position}")),
        None => lines.push("Not on the leaderboard this time".to_string()),
    }
    lines.push(String::new());
    lines.extend(ranking_lines(cabinet));
    lines.push(String::new());
    lines.push("Press SPACE to exit, R to play again.".to_string());
    flush_lines(stdout, &lines)
}

pub fn ranking_lines(cabinet: &Cabinet) -> Vec<String>
{
    let mut lines = vec!["Leaderboard:".to_string()];
    if cabinet.ranking().is_empty() {
        lines.push("  (no scores yet)".to_string());
    }
    let mine = cabinet.last_position();
    for (idx, entry) in cabinet.ranking().iter().take(RANKING_ROWS).enumerate() {
        let marker = if mine == Some(idx + 1) { "  <- you" } else { "" };
        let label = entry
            .detail
            .as_ref()
            .and_then(|detail| detail.label.as_deref())
            .map(|label| format!(" ({label})"))
            .unwrap_or_default();
        lines.push(format!("  {:>2}. {:>7}{label}{marker}", idx + 1, entry.value));
    }
    lines
}

fn wait_for_replay() -> Result<bool>
{
    while event::poll(Duration::from_millis(0)).map_err(terminal_error)? {
        let _ = event::read().map_err(terminal_error)?;
    }

    loop {
        if event::poll(Duration::from_millis(50)).map_err(terminal_error)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read().map_err(terminal_error)? {
                if kind == KeyEventKind::Release {
                    continue;
                }
                match code {
                    KeyCode::Char(' ') | KeyCode::Esc => return Ok(false),
                    KeyCode::Char('r') | KeyCode::Char('R') => return Ok(true),
                    _ => {}
                }
            }
        }
    }
}

fn flush_lines(stdout: &mut Stdout, lines: &[String]) -> Result<()>
{
    let output = format!("{}\r\n", lines.join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All)).map_err(terminal_error)?;
    stdout.write_all(output.as_bytes()).map_err(terminal_error)?;
    stdout.flush().map_err(terminal_error)?;
    Ok(())
}

fn paint(color: Rgb, text: &str) -> String
{
    format!("\x1b[48;2;{};{};{}m{}\x1b[0m", color.r, color.g, color.b, text)
}

fn ink_rgb(ink: Ink) -> Rgb
{
    match ink {
        Ink::Red => Rgb { r: 200, g: 30, b: 30 },
        Ink::Green => Rgb { r: 30, g: 160, b: 60 },
        Ink::Blue => Rgb { r: 40, g: 70, b: 210 },
        Ink::Yellow => Rgb { r: 200, g: 180, b: 20 },
        Ink::Purple => Rgb { r: 130, g: 50, b: 170 },
        Ink::Orange => Rgb { r: 230, g: 120, b: 20 },
    }
}

fn elapsed_ms(start: Instant) -> u64
{
    start.elapsed().as_millis() as u64
}

fn terminal_error(err: io::Error) -> ArcadeError
{
    ArcadeError::Terminal(err.to_string())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn rounds_pick_the_matching_controls()
    {
        let grid = RoundState::Grid {
            size: 4,
            pattern: vec![1],
            picked: Vec::new(),
            showing: false,
        };
        assert_eq!(input_style(&grid), InputStyle::Board { cells: 16, columns: 4 });
        assert_eq!(input_style(&RoundState::Tapper), InputStyle::Tap);
        assert_eq!(
            input_style(&RoundState::Stroop {
                word: Ink::Red,
                ink: Ink::Blue
            }),
            InputStyle::Choice { options: 6 }
        );
    }

    #[test]
    fn only_the_bomb_board_offers_a_cash_out()
    {
        let bomb = RoundState::Bomb {
            bomb: 3,
            revealed: vec![false; 24],
        };
        let aim = RoundState::Aim { cells: 25, target: 4 };
        let grid = RoundState::Grid {
            size: 3,
            pattern: vec![0],
            picked: Vec::new(),
            showing: false,
        };
        assert!(controls_line(&bomb).contains("cash out"));
        assert!(!controls_line(&aim).contains("cash out"));
        assert!(!controls_line(&grid).contains("TAB"));
        assert!(controls_line(&RoundState::Tapper).contains("SPACE to tap"));
        assert!(!controls_line(&RoundState::Tapper).contains("TAB"));
    }

    #[test]
    fn new_rounds_map_to_boards_and_text()
    {
        let faces = RoundState::Faces {
            target: "a",
            decoy: "b",
            cells: 24,
            at: 5,
        };
        assert_eq!(input_style(&faces), InputStyle::Board { cells: 24, columns: 6 });
        let cards = RoundState::Pairs {
            faces: vec!["x"; 16],
            matched: vec![false; 16],
            open: Vec::new(),
        };
        assert_eq!(input_style(&cards), InputStyle::Board { cells: 16, columns: 4 });
        assert_eq!(input_style(&RoundState::Initial { letter: 'q' }), InputStyle::Text);
        let beat = RoundState::Rhythm {
            free_from: None,
            flash: true,
            beats: 1,
        };
        assert_eq!(input_style(&beat), InputStyle::Tap);
    }

    #[test]
    fn board_cursor_stays_on_the_board()
    {
        let mut ui = Ui::default();
        let style = InputStyle::Board { cells: 9, columns: 3 };
        assert_eq!(map_key(style, KeyCode::Up, &mut ui), None);
        map_key(style, KeyCode::Down, &mut ui);
        map_key(style, KeyCode::Down, &mut ui);
        map_key(style, KeyCode::Down, &mut ui);
        map_key(style, KeyCode::Right, &mut ui);
        assert_eq!(map_key(style, KeyCode::Enter, &mut ui), Some(Action::Select(7)));
    }

    #[test]
    fn text_keys_build_a_submission()
    {
        let mut ui = Ui::default();
        for ch in "4x2".chars() {
            assert_eq!(map_key(InputStyle::Text, KeyCode::Char(ch), &mut ui), None);
        }
        map_key(InputStyle::Text, KeyCode::Backspace, &mut ui);
        assert_eq!(
            map_key(InputStyle::Text, KeyCode::Enter, &mut ui),
            Some(Action::Submit("4x".to_string()))
        );
        assert!(ui.buffer.is_empty());
    }

    #[test]
    fn digits_outside_the_options_do_nothing()
    {
        let mut ui = Ui::default();
        let style = InputStyle::Choice { options: 4 };
        assert_eq!(map_key(style, KeyCode::Char('2'), &mut ui), Some(Action::Select(1)));
        assert_eq!(map_key(style, KeyCode::Char('5'), &mut ui), None);
        assert_eq!(map_key(style, KeyCode::Char('0'), &mut ui), None);
    }
}
