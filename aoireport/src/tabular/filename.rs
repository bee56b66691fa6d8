//! Export filename sanitization.

/// Maximum length of a derived filename stem.
const FILENAME_MAX_LEN: usize = 120;

/// Derive a download-safe filename stem from a layer title.
///
/// Runs of characters outside `[A-Za-z0-9_-]` collapse to a single `_`,
/// leading and trailing `_` are trimmed, and the result is truncated to
/// 120 characters. A title that sanitizes to nothing yields `"export"`.
pub fn safe_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for ch in name.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' {
            ch
        } else {
            '_'
        };
        if mapped == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(mapped);
            prev_underscore = false;
        }
    }

    let trimmed: String = out.trim_matches('_').chars().take(FILENAME_MAX_LEN).collect();
    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_for_safe_names() {
        assert_eq!(safe_filename("Roads-2024"), "Roads-2024");
    }

    #[test]
    fn test_collapses_separator_runs() {
        assert_eq!(safe_filename("Parcels: City / County"), "Parcels_City_County");
        assert_eq!(safe_filename("a__b"), "a_b");
    }

    #[test]
    fn test_trims_leading_and_trailing_separators() {
        assert_eq!(safe_filename("  (Flood Zones)  "), "Flood_Zones");
    }

    #[test]
    fn test_truncates_to_max_len() {
        let long = "x".repeat(500);
        assert_eq!(safe_filename(&long).len(), 120);
    }

    #[test]
    fn test_degenerate_title_falls_back() {
        assert_eq!(safe_filename("!!!"), "export");
        assert_eq!(safe_filename(""), "export");
    }
}
