use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

const TEAM_PREFIX: &str = "t-";
const UNKNOWN_STACK: &str = "unknown";

const DATE_FORMAT: &str = "%b %-d";
const TIMESTAMP_FORMAT: &str = "%b %-d %H:%M:%S";

// First line up to and including its last " (#123)" pull request reference
static PR_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*\s\(#\d+\)").expect("pull request reference regex is valid")
});

// "[stage] customer-profile-events"
static ENV_STACK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\s+(.*)").expect("environment regex is valid"));

/// Team label from the first topic carrying the team prefix, or "" when none does.
pub fn extract_team(topics: &[String]) -> String {
    topics
        .iter()
        .find_map(|topic| topic.strip_prefix(TEAM_PREFIX))
        .unwrap_or_default()
        .to_string()
}

/// Cut a commit message right after its pull request reference.
pub fn extract_commit_message(message: &str) -> String {
    PR_REFERENCE_REGEX
        .find(message)
        .map_or(message, |m| m.as_str())
        .to_string()
}

/// Split a deployment environment such as `[stage] billing` into `(env, stack)`.
pub fn extract_stack(environment: &str) -> (String, String) {
    match ENV_STACK_REGEX.captures(environment) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (environment.to_string(), UNKNOWN_STACK.to_string()),
    }
}

/// "2023-06-15T10:30:00Z" -> "Jun 15".
pub fn format_date(raw: &str) -> String {
    format_rfc3339(raw, DATE_FORMAT)
}

/// "2023-06-15T10:30:00Z" -> "Jun 15 10:30:00".
pub fn format_timestamp(raw: &str) -> String {
    format_rfc3339(raw, TIMESTAMP_FORMAT)
}

// Unparsable input renders as the epoch rather than failing the record
fn format_rfc3339(raw: &str, format: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format(format).to_string(),
        Err(_) => DateTime::<Utc>::default().format(format).to_string(),
    }
}
