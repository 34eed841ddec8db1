//! Scalar escaping for the generated document.
//!
//! Values carrying YAML-significant punctuation are double-quoted with
//! internal backslashes and quotes escaped; blank values render as an
//! explicit empty string so a key is never silently dropped mid-document.

use riveter_types::ConfigValue;

/// Characters that force a string into quoted form.
const SIGNIFICANT: [char; 21] = [
    ':', '"', '\'', '\n', '\t', '\\', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '?', '-',
    ',', '@', '%',
];

/// Render a string scalar, quoting and escaping when required.
pub fn escape_scalar(s: &str) -> String {
    if s.trim().is_empty() {
        return "\"\"".to_string();
    }
    if s.contains('`') || s.contains(SIGNIFICANT.as_slice()) {
        let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
        return format!("\"{escaped}\"");
    }
    s.to_string()
}

/// Render a command as a literal block scalar when it spans lines; a plain
/// escaped scalar otherwise. Continuation lines are indented to sit under a
/// step's `run:` key.
pub fn block_scalar(s: &str) -> String {
    if s.trim().is_empty() {
        return "\"\"".to_string();
    }
    if s.contains('\n') {
        let body = s
            .lines()
            .map(|line| format!("        {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        return format!("|\n{body}");
    }
    escape_scalar(s)
}

/// Render any configuration value in scalar position.
pub fn render_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::String(s) => escape_scalar(s),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() && n.abs() < 9e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        // Nested maps in scalar position collapse to a JSON one-liner.
        ConfigValue::Map(_) => serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string()),
    }
}
