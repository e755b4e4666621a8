//! Terminal output: the `log!` macro and per-stage progress bars.
//!
//! ```ignore
//! log!("build"; "rendering {} documents", count);
//!
//! let progress = ProgressBars::new(&[("load", 100), ("render", 100)]);
//! progress.inc_by_name("load");
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// One line with a colored `[module]` prefix, clipped to the terminal width.
pub fn log(module: &str, message: &str) {
    // "[module] " around the text
    let budget = terminal_width().saturating_sub(module.len() + 3);

    let mut out = stdout().lock();
    execute!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{} {}", prefix_for(module), clip(message, budget)).ok();
    out.flush().ok();
}

fn prefix_for(module: &str) -> ColoredString {
    let tag = format!("[{module}]");
    match module {
        "serve" => tag.bright_blue().bold(),
        "watch" => tag.bright_green().bold(),
        "error" => tag.bright_red().bold(),
        "warn" => tag.bright_magenta().bold(),
        _ => tag.bright_yellow().bold(),
    }
}

/// Terminal width, probed once. 120 columns when detection fails.
fn terminal_width() -> usize {
    static WIDTH: OnceLock<u16> = OnceLock::new();
    *WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

/// Clip to at most `max` bytes without splitting a UTF-8 character.
fn clip(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    &s[..end]
}

// ============================================================================
// Progress Bars
// ============================================================================

const BAR_CELLS: usize = 30;

/// A block of in-place progress bars, one terminal line per stage.
///
/// Bars are keyed by stage name and safe to increment from rayon workers;
/// a mutex serializes the cursor movement.
pub struct ProgressBars {
    bars: Vec<Bar>,
    redraw: Mutex<()>,
}

struct Bar {
    name: &'static str,
    prefix: ColoredString,
    total: usize,
    done: AtomicUsize,
    row: usize,
}

impl ProgressBars {
    /// Reserve one terminal line per `(stage name, item count)` pair.
    pub fn new(stages: &[(&'static str, usize)]) -> Self {
        let mut out = stdout().lock();
        for _ in stages {
            writeln!(out).ok();
        }
        out.flush().ok();

        let bars = stages
            .iter()
            .enumerate()
            .map(|(row, &(name, total))| Bar {
                name,
                prefix: prefix_for(name),
                total,
                done: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            redraw: Mutex::new(()),
        }
    }

    /// Count one finished item on the named stage's bar.
    pub fn inc_by_name(&self, name: &str) {
        if let Some(bar) = self.bars.iter().find(|b| b.name == name) {
            let done = bar.done.fetch_add(1, Ordering::Relaxed) + 1;
            self.redraw(bar, done);
        }
    }

    fn redraw(&self, bar: &Bar, done: usize) {
        let _guard = self.redraw.lock().ok();

        let filled = match bar.total {
            0 => 0,
            total => (done * BAR_CELLS) / total,
        };
        let cells: String = std::iter::repeat_n('█', filled)
            .chain(std::iter::repeat_n('░', BAR_CELLS.saturating_sub(filled)))
            .collect();

        let up = (self.bars.len() - bar.row) as u16;
        let mut out = stdout().lock();
        execute!(out, cursor::MoveUp(up), Clear(ClearType::CurrentLine)).ok();
        write!(out, "{} [{cells}] {done}/{}", bar.prefix, bar.total).ok();
        execute!(out, cursor::MoveDown(up)).ok();
        write!(out, "\r").ok();
        out.flush().ok();
    }

    /// Erase the reserved lines.
    pub fn finish(&self) {
        let _guard = self.redraw.lock().ok();

        let rows = self.bars.len() as u16;
        let mut out = stdout().lock();
        execute!(out, cursor::MoveUp(rows)).ok();
        for _ in &self.bars {
            execute!(out, Clear(ClearType::CurrentLine), cursor::MoveDown(1)).ok();
        }
        execute!(out, cursor::MoveUp(rows)).ok();
        out.flush().ok();
    }
}
