// Compression statistics

/// Proportional size reduction from original to compressed, in percent.
///
/// Positive means the output shrank; negative (output larger than input) is
/// a valid result and is reported as-is, never clamped.
///
/// `original_size_bytes` must be non-zero: the runner rejects zero-byte
/// inputs pre-flight, so a zero here is a caller bug, not a runtime
/// condition this function defends against.
pub fn compression_percent(original_size_bytes: u64, compressed_size_bytes: u64) -> f64 {
    (1.0 - compressed_size_bytes as f64 / original_size_bytes as f64) * 100.0
}

/// Format bytes as human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
