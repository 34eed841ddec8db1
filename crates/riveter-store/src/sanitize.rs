//! Input sanitization for configuration fields.
//!
//! Generated workflows execute with repository privileges, so obviously
//! malicious strings are blocked before they ever reach a config field. The
//! contract is silent hardening: [`screen`] never fails, always returns a
//! validity flag plus a best-effort cleaned value, and callers apply the
//! cleaned value regardless of the flag.

use std::sync::OnceLock;

use regex::Regex;

/// Fields that hold free-text shell commands; shell metacharacters are legal
/// there and only there.
const COMMAND_KEYS: [&str; 2] = ["run", "command"];

/// Result of screening one input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screened {
    pub accepted: bool,
    pub value: String,
}

impl Screened {
    fn ok(value: impl Into<String>) -> Self {
        Self {
            accepted: true,
            value: value.into(),
        }
    }

    fn rejected(value: impl Into<String>) -> Self {
        Self {
            accepted: false,
            value: value.into(),
        }
    }
}

fn markup_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?is)<script\b.*?</script>",
            r"(?i)javascript:",
            r"(?i)\bon\w+\s*=",
            r"(?i)data:text/html",
            r"(?i)vbscript:",
            r"(?is)<iframe\b.*?</iframe>",
            r"(?is)<object\b.*?</object>",
            r"(?is)<embed\b.*?</embed>",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("markup pattern must compile"))
        .collect()
    })
}

fn sql_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\b(union|select|insert|update|delete|drop|create|alter)\b",
            r"(?i)\b(or|and)\b\s+\d+\s*=\s*\d+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("sql pattern must compile"))
        .collect()
    })
}

fn has_shell_metacharacters(value: &str) -> bool {
    value.contains('`') || value.contains("$(") || value.contains("&&") || value.contains("||")
}

fn strip_shell_metacharacters(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '`' | '$' | '(' | ')' | '&' | '|'))
        .collect()
}

/// Screen a raw string destined for the configuration field `key`.
///
/// Returns a validity flag plus a sanitized fallback. Never panics, never
/// errors; rejections are logged and otherwise invisible to the user.
pub fn screen(key: &str, raw: &str) -> Screened {
    if raw.trim().is_empty() {
        return Screened::ok(raw);
    }

    for pattern in markup_patterns() {
        if pattern.is_match(raw) {
            tracing::warn!(key, pattern = %pattern.as_str(), "blocked markup in config input");
            return Screened::rejected(pattern.replace_all(raw, "").into_owned());
        }
    }

    // A lone `${` is almost always a mistyped expression delimiter; rewrite
    // instead of rejecting outright.
    if raw.contains("${") && !raw.contains("${{") {
        let rewritten = raw.replace("${", "${{").replace('}', "}}");
        tracing::warn!(key, "rewrote malformed expression delimiter");
        return Screened::rejected(rewritten);
    }

    if !COMMAND_KEYS.contains(&key) && has_shell_metacharacters(raw) {
        tracing::warn!(key, "blocked shell metacharacters outside command field");
        return Screened::rejected(strip_shell_metacharacters(raw));
    }

    for pattern in sql_patterns() {
        if pattern.is_match(raw) {
            tracing::warn!(key, pattern = %pattern.as_str(), "blocked SQL keyword pattern");
            return Screened::rejected(pattern.replace_all(raw, "").into_owned());
        }
    }

    // YAML-significant punctuation is fine here; the serializer escapes it.
    Screened::ok(raw)
}

/// Clean a step display name: shell metacharacters, filename-unsafe
/// characters, and markup are stripped. Falls back to `Unnamed Step` when
/// nothing survives.
pub fn sanitize_step_name(raw: &str) -> String {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '`' | '$' | '(' | ')' | '&' | '|' | '<' | '>' | ':' | '"' | '/' | '\\' | '?' | '*'
            )
        })
        .collect();
    for pattern in markup_patterns() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Unnamed Step".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Key-aware normalization applied when a config field loses focus.
///
/// - `repository`: bare action names are expanded to `actions/<name>@v4`.
/// - command fields: mistyped expression delimiters are rewritten and markup
///   is stripped, but shell syntax passes through untouched.
/// - everything else: trimmed, markup stripped.
pub fn normalize_config_value(key: &str, raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if key == "repository" && !raw.contains('/') && !raw.contains('@') {
        return format!("actions/{raw}@v4");
    }

    if COMMAND_KEYS.contains(&key) {
        let mut value = if raw.contains("${") && !raw.contains("${{") {
            raw.replace("${", "${{").replace('}', "}}")
        } else {
            raw.to_string()
        };
        for pattern in markup_patterns() {
            value = pattern.replace_all(&value, "").into_owned();
        }
        return value;
    }

    let mut value = raw.trim().to_string();
    for pattern in markup_patterns() {
        value = pattern.replace_all(&value, "").into_owned();
    }
    value
}
