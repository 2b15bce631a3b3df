use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::config_path;

pub fn run() {
    let Some(path) = config_path() else {
        eprintln!("Could not determine config directory");
        return;
    };

    if let Err(e) = ensure_exists(&path) {
        eprintln!("{:#}", e);
        return;
    }

    println!("Opening {}", path.display());

    if let Ok(editor) = std::env::var("VISUAL").or_else(|_| std::env::var("EDITOR")) {
        match Command::new(&editor).arg(&path).status() {
            Ok(s) if s.success() => return,
            Ok(_) => eprintln!("Editor exited with error"),
            Err(e) => eprintln!("Failed to run {}: {}", editor, e),
        }
    }

    open_with_fallback(&path);
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    std::fs::write(path, "")
        .with_context(|| format!("Failed to create config file {}", path.display()))
}

#[cfg(target_os = "macos")]
fn open_with_fallback(path: &Path) {
    let _ = Command::new("open").arg("-t").arg(path).status();
}

#[cfg(target_os = "windows")]
fn open_with_fallback(path: &Path) {
    let _ = Command::new("notepad").arg(path).status();
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_with_fallback(path: &Path) {
    // Terminal editors first; the table itself runs in a terminal.
    for editor in ["nano", "vim", "vi"] {
        if Command::new(editor).arg(path).status().is_ok() {
            return;
        }
    }
    if Command::new("xdg-open").arg(path).status().is_err() {
        eprintln!("No editor found. Set $EDITOR or edit {} by hand", path.display());
    }
}
