use crate::commands::list_actions::ACTIONS;
use crate::config::{config_path, settings};

const VALID_KEYS: &[&str] = &[
    "api_base_url",
    "api_url",
    "api_key",
    "workspace_id",
    "workspace",
    "project_id",
    "project",
    "palette_max_items",
    "toast_duration_ms",
    "keybind",
];

#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    };

    println!("Config file: {}", path.display());

    if !path.exists() {
        println!("Status: File does not exist (using defaults)");
        println!("Result: Valid");
        return;
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            println!("Status: Failed to read file");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = validate(&contents);
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("Status: Valid");
        return;
    }

    print_section("Errors:", &report.errors);
    print_section("Warnings:", &report.warnings);

    println!();
    if report.errors.is_empty() {
        println!("Result: Valid (with warnings)");
    } else {
        println!("Result: Invalid");
        std::process::exit(1);
    }
}

fn print_section(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!();
    println!("{}", title);
    for line in lines {
        println!("  {}", line);
    }
}

fn validate(contents: &str) -> Report {
    let mut report = Report::default();
    let lines = contents.lines().collect::<Vec<_>>();

    for (line_num, key, value) in settings(contents) {
        if !lines[line_num - 1].contains('=') {
            report.errors.push(format!(
                "Line {}: Invalid syntax. Expected 'key = value'",
                line_num
            ));
            continue;
        }

        if !VALID_KEYS.contains(&key.as_str()) {
            report
                .warnings
                .push(format!("Line {}: Unknown key '{}'", line_num, key));
            continue;
        }

        match key.as_str() {
            "api_base_url" | "api_url" => {
                if !value.is_empty()
                    && !value.starts_with("http://")
                    && !value.starts_with("https://")
                {
                    report.errors.push(format!(
                        "Line {}: {} must start with http:// or https://",
                        line_num, key
                    ));
                }
            }
            "palette_max_items" => check_range(&mut report, line_num, &key, &value, 1, 50),
            "toast_duration_ms" => check_range(&mut report, line_num, &key, &value, 500, 60_000),
            "keybind" => check_keybind(&mut report, line_num, &value),
            _ => {}
        }
    }

    report
}

fn check_range(report: &mut Report, line_num: usize, key: &str, value: &str, min: u64, max: u64) {
    match value.parse::<u64>() {
        Ok(v) if (min..=max).contains(&v) => {}
        Ok(_) => report.warnings.push(format!(
            "Line {}: {} is outside {}..={} and will be clamped",
            line_num, key, min, max
        )),
        Err(_) => report.errors.push(format!(
            "Line {}: {} must be a positive integer",
            line_num, key
        )),
    }
}

fn check_keybind(report: &mut Report, line_num: usize, value: &str) {
    if value.eq_ignore_ascii_case("clear") {
        return;
    }
    let Some((trigger, action)) = value.rsplit_once('=') else {
        report.errors.push(format!(
            "Line {}: Invalid keybind format. Expected 'keybind = <trigger>=<action>'",
            line_num
        ));
        return;
    };

    if trigger.trim().is_empty() {
        report
            .errors
            .push(format!("Line {}: Keybind trigger is empty", line_num));
    }
    let action = action.trim();
    if !action.eq_ignore_ascii_case("unbind") && !ACTIONS.contains(&action) {
        report.warnings.push(format!(
            "Line {}: Unknown keybind action '{}'",
            line_num, action
        ));
    }
}
