//! Hex dump rendering for read results

/// Rendered in place of rows when there is nothing to show
pub const NO_DATA: &str = "(no data)";

/// Renders bytes as rows of space-separated lowercase hex pairs
///
/// `bytes_per_row` of zero is treated as one.
pub fn format_hex_dump(bytes: &[u8], bytes_per_row: usize) -> String {
    if bytes.is_empty() {
        return NO_DATA.to_string();
    }

    bytes
        .chunks(bytes_per_row.max(1))
        .map(|row| {
            row.iter()
                .map(|byte| hex::encode([*byte]))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
