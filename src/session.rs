use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// Owns the terminal while the table is on screen: raw mode, the alternate
/// screen and mouse capture are acquired on entry and released on drop, even
/// when the event loop returns early with an error.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        let mut stdout = io::stdout();
        let entered = stdout
            .execute(EnterAlternateScreen)
            .and_then(|stdout| stdout.execute(EnableMouseCapture))
            .map(|_| ());
        if let Err(error) = entered {
            restore(&mut stdout);
            return Err(error).context("Failed to enter the alternate screen");
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                restore(&mut io::stdout());
                Err(error).context("Failed to initialize the terminal")
            }
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore(self.terminal.backend_mut());
        if let Err(error) = self.terminal.show_cursor() {
            log::warn!("Failed to show cursor: {}", error);
        }
    }
}

fn restore(out: &mut impl io::Write) {
    if let Err(error) = disable_raw_mode() {
        log::warn!("Failed to disable raw mode: {}", error);
    }
    let left = out
        .execute(DisableMouseCapture)
        .and_then(|out| out.execute(LeaveAlternateScreen))
        .map(|_| ());
    if let Err(error) = left {
        log::warn!("Failed to leave the alternate screen: {}", error);
    }
}
