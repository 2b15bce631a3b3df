use crate::config::{API_KEY_ENV, config_path};

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            return;
        }
    };

    if !path.exists() {
        println!("# Config file: {} (not created yet)", path.display());
        println!("# Using default configuration");
        println!();
        print_defaults();
        return;
    }

    println!("# Config file: {}", path.display());
    println!();

    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            if contents.trim().is_empty() {
                println!("# (empty file - using defaults)");
                println!();
                print_defaults();
            } else {
                for line in contents.lines() {
                    println!("{}", mask_secret(line));
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to read config file: {}", e);
        }
    }
}

fn print_defaults() {
    println!("# Default values:");
    println!("api_base_url = {}", tably_api::DEFAULT_API_BASE_URL);
    println!("palette_max_items = 8");
    println!("toast_duration_ms = 3000");
    println!("# api_key is read from {} when not set here", API_KEY_ENV);
}

/// Hides everything but the last four characters of an `api_key` line.
fn mask_secret(line: &str) -> String {
    let Some((key, value)) = line.split_once('=') else {
        return line.to_string();
    };
    if key.trim().trim_start_matches('#').trim().to_ascii_lowercase() != "api_key" {
        return line.to_string();
    }

    let value = value.trim();
    if value.is_empty() {
        return line.to_string();
    }
    let chars = value.chars().collect::<Vec<_>>();
    let visible = chars.len().saturating_sub(4);
    let tail = chars[visible..].iter().collect::<String>();
    format!("{}= {}{}", key, "*".repeat(visible.min(12)), tail)
}
