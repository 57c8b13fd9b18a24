//! Bucket classification for first-character subdirectories.
//!
//! Every filename stem maps to exactly one bucket: names starting with a
//! digit share the numeric bucket, names starting with a letter get a bucket
//! per letter, and everything else lands in the catch-all bucket.
//!
//! # Examples
//!
//! ```
//! use romsort::bucket::{BucketCase, BucketKey};
//!
//! assert_eq!(BucketKey::classify("1943", BucketCase::Upper).dir_name(), "0");
//! assert_eq!(BucketKey::classify("apple", BucketCase::Upper).dir_name(), "A");
//! assert_eq!(BucketKey::classify("_misc", BucketCase::Upper).dir_name(), "_");
//! ```

use std::fmt;

/// Directory name used for digit-leading names.
pub const NUMERIC_DIR: &str = "0";

/// Directory name used for names that start with neither a digit nor a letter.
pub const OTHER_DIR: &str = "_";

/// How letter buckets are cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketCase {
    /// Fold letters to uppercase so `apple` and `Apple` share a directory.
    #[default]
    Upper,
    /// Use the first letter exactly as it appears in the filename.
    Preserve,
}

/// The destination bucket for a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    /// First character is a decimal digit.
    Numeric,
    /// First character is alphabetic; holds the directory name.
    Letter(String),
    /// Anything else, including an empty stem.
    Other,
}

impl BucketKey {
    /// Classifies a filename stem by its first character.
    ///
    /// # Examples
    ///
    /// ```
    /// use romsort::bucket::{BucketCase, BucketKey};
    ///
    /// assert_eq!(
    ///     BucketKey::classify("apple", BucketCase::Preserve),
    ///     BucketKey::Letter("a".to_string())
    /// );
    /// assert_eq!(BucketKey::classify("", BucketCase::Upper), BucketKey::Other);
    /// ```
    pub fn classify(stem: &str, case: BucketCase) -> Self {
        match stem.chars().next() {
            // Only 0-9; other Unicode numerals fall through to the catch-all.
            Some(c) if c.is_ascii_digit() => BucketKey::Numeric,
            Some(c) if c.is_alphabetic() => {
                let name = match case {
                    BucketCase::Upper => c.to_uppercase().collect(),
                    BucketCase::Preserve => c.to_string(),
                };
                BucketKey::Letter(name)
            }
            _ => BucketKey::Other,
        }
    }

    /// Returns the subdirectory name for this bucket.
    pub fn dir_name(&self) -> &str {
        match self {
            BucketKey::Numeric => NUMERIC_DIR,
            BucketKey::Letter(name) => name,
            BucketKey::Other => OTHER_DIR,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_leading_names_are_numeric() {
        for stem in ["1943", "0 Game", "9lives"] {
            assert_eq!(BucketKey::classify(stem, BucketCase::Upper), BucketKey::Numeric);
        }
        assert_eq!(BucketKey::Numeric.dir_name(), "0");
    }

    #[test]
    fn test_letters_are_uppercased_by_default() {
        assert_eq!(
            BucketKey::classify("apple2", BucketCase::default()).dir_name(),
            "A"
        );
        assert_eq!(BucketKey::classify("Apple", BucketCase::Upper).dir_name(), "A");
    }

    #[test]
    fn test_preserve_keeps_letter_case() {
        assert_eq!(BucketKey::classify("apple", BucketCase::Preserve).dir_name(), "a");
        assert_eq!(BucketKey::classify("Apple", BucketCase::Preserve).dir_name(), "A");
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(BucketKey::classify("élan", BucketCase::Upper).dir_name(), "É");
        assert_eq!(BucketKey::classify("ßeta", BucketCase::Upper).dir_name(), "SS");
    }

    #[test]
    fn test_only_ascii_digits_are_numeric() {
        // Arabic-Indic and fullwidth digits are neither ASCII digits nor letters.
        assert_eq!(BucketKey::classify("١٩٤٣", BucketCase::Upper), BucketKey::Other);
        assert_eq!(BucketKey::classify("１９４３", BucketCase::Upper), BucketKey::Other);
        assert_eq!(BucketKey::classify("½ Life", BucketCase::Upper), BucketKey::Other);
    }

    #[test]
    fn test_everything_else_is_catch_all() {
        for stem in ["", "_misc", "[BIOS] Thing", " space", "(USA)", "!bang"] {
            assert_eq!(BucketKey::classify(stem, BucketCase::Upper), BucketKey::Other);
        }
        assert_eq!(BucketKey::Other.to_string(), "_");
    }
}
