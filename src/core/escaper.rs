// EN: src/core/escaper.rs

use crate::models::Platform;
use std::fmt::Display;

/// Stringifies `value` and quotes it for `platform`.
pub fn escape_value(value: impl Display, platform: Platform) -> String {
    platform.escape(&value.to_string())
}

/// Quotes a filename for `platform`.
///
/// Same as `escape_value`, except that on Windows forward slashes are first turned
/// into backslashes.
pub fn escape_filename(name: impl Display, platform: Platform) -> String {
    let name = name.to_string();
    match platform {
        Platform::Unix => platform.escape(&name),
        Platform::Windows => platform.escape(&name.replace('/', "\\")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_value_stringifies() {
        assert_eq!(escape_value(123, Platform::Unix), "123");
        assert_eq!(escape_value(123, Platform::Windows), "\"123\"");
        assert_eq!(escape_value(1.5, Platform::Unix), "1.5");
    }

    #[test]
    fn test_escape_filename_with_space() {
        assert_eq!(escape_filename("output file", Platform::Unix), r"output\ file");
        assert_eq!(escape_filename("output file", Platform::Windows), "\"output file\"");
    }

    #[test]
    fn test_escape_filename_normalizes_separators_on_windows_only() {
        assert_eq!(escape_filename("dir/sub/file.txt", Platform::Unix), "dir/sub/file.txt");
        assert_eq!(
            escape_filename("dir/sub/file.txt", Platform::Windows),
            r#""dir\sub\file.txt""#
        );
        assert_eq!(escape_value("dir/sub", Platform::Windows), "\"dir/sub\"");
    }
}
