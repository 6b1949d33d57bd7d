//! Command lines for small `sh` programs used across tests.

/// Quote `script` so it survives the default tokenizer as one argument.
pub fn sh(script: &str) -> String {
    format!("sh -c '{}'", script.replace('\'', r"'\''"))
}

/// Runs for `secs` seconds unless stopped.
pub fn sleeper(secs: u32) -> String {
    format!("sleep {secs}")
}
