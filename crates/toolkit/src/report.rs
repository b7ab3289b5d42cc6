//! Key/value diagnostic output.

use tracing::info;

/// Formats one diagnostic row, padding the key to a fixed column.
pub fn table_row(key: &str, value: &str) -> String {
    format!("{key:<15}: {value}")
}

/// Logs one aligned key/value row at info level.
pub fn table(key: &str, value: &str) {
    info!("{}", table_row(key, value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_padded_to_fifteen_columns() {
        assert_eq!(table_row("version", "v1.0.0"), "version        : v1.0.0");
        assert_eq!(
            table_row("a-very-long-key-name", "x"),
            "a-very-long-key-name: x"
        );
    }
}
