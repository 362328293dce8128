//! Label lists are stored as JSON array text in both the `users` and `tasks` tables.

/// Vocabulary every new user starts with.
pub const DEFAULT_LABELS: [&str; 3] = ["Trabajo", "Personal", "Urgente"];

pub fn encode_labels(labels: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(labels)
}

pub fn decode_labels(encoded: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(encoded)
}

pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|label| label.to_string()).collect()
}
