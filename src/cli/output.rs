//! Terminal output helpers for the CLI

use indicatif::{ProgressBar, ProgressStyle};

/// Width of section rules and the key column.
const RULE_WIDTH: usize = 58;
const KEY_WIDTH: usize = 22;

/// Spinner shown while a solver phase runs, with elapsed time.
pub fn phase_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_message(message.to_string());
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .expect("spinner template is well-formed"),
    );
    spinner
}

/// Print a section rule: `-- Title ------...` up to a fixed width.
pub fn section(title: &str) {
    let mut rule = format!("-- {title} ");
    while rule.len() < RULE_WIDTH {
        rule.push('-');
    }
    println!("\n{rule}");
}

/// Print a key-value line with the key right-aligned in a fixed column.
pub fn kv(key: &str, value: impl std::fmt::Display) {
    println!("{key:>KEY_WIDTH$}: {value}");
}

/// Render a count with comma separators between thousands groups.
pub fn with_separators(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::with_separators;

    #[test]
    fn separators_fall_on_thousands_boundaries() {
        assert_eq!(with_separators(0), "0");
        assert_eq!(with_separators(999), "999");
        assert_eq!(with_separators(1_000), "1,000");
        assert_eq!(with_separators(18_181), "18,181");
        assert_eq!(with_separators(1_234_567), "1,234,567");
    }
}
