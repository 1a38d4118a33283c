use colored::*;

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    println!("{line}");
}

/// Prints rendered results, highlighting open ports.
pub fn report(text: &str) {
    for line in text.lines() {
        match line.trim_start().strip_prefix("Port ") {
            Some(_) if line.contains(": open") => println!("{}", line.green()),
            _ => println!("{line}"),
        }
    }
}
