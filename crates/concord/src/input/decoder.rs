//! Two-column CSV decoder with a quote-aware line splitter.

use tracing::{debug, trace};

use super::source::{FeatureMap, Source, SourceMetadata, SourceText};

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Whether the first line is a header. When set, the first line is
    /// discarded whatever it contains.
    pub has_header: bool,
    /// Field delimiter.
    pub delimiter: char,
    /// Quote character.
    pub quote: char,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: ',',
            quote: '"',
        }
    }
}

/// Decodes source text into a [`FeatureMap`].
///
/// Only the first two tokens of each line are used: the feature name and its
/// value. Lines without a feature token are skipped, a missing value decodes
/// as "", and a repeated feature keeps the value of its last line.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode raw text into a feature map.
    pub fn decode(&self, text: &str) -> FeatureMap {
        self.decode_counting(text).0
    }

    /// Decode a source occupying the given slot.
    pub fn decode_source(&self, slot: usize, input: &SourceText) -> Source {
        let (features, skipped) = self.decode_counting(&input.text);
        debug!(
            slot,
            name = %input.name,
            features = features.len(),
            skipped,
            "Decoded source"
        );

        Source {
            metadata: SourceMetadata::new(slot, input, features.len(), skipped),
            features,
        }
    }

    fn decode_counting(&self, text: &str) -> (FeatureMap, usize) {
        let mut features = FeatureMap::new();
        let mut skipped = 0;

        let mut lines = text.trim().lines();
        if self.config.has_header {
            lines.next();
        }

        for line in lines {
            let mut tokens = split_line(line, self.config.delimiter, self.config.quote).into_iter();
            let feature = tokens.next().unwrap_or_default();
            if feature.is_empty() {
                trace!(line, "Skipping line without a feature");
                skipped += 1;
                continue;
            }
            let value = tokens.next().unwrap_or_default();
            features.insert(feature, value);
        }

        (features, skipped)
    }
}

/// Split one line into trimmed tokens.
///
/// A token is either a quoted run or a run of characters that are neither
/// quotes nor delimiters. Either kind only counts when it is followed by
/// optional whitespace and then a delimiter or the end of the line. A quoted
/// run ends at the first closing quote that satisfies this, so it may contain
/// quotes and delimiters. Positions where no token can start are skipped,
/// which means empty fields produce no token at all.
pub fn split_line(line: &str, delimiter: char, quote: char) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        match token_end(&chars, pos, delimiter, quote) {
            Some(end) => {
                tokens.push(clean_token(&chars[pos..end], quote));
                pos = end;
            }
            None => pos += 1,
        }
    }

    tokens
}

/// End index (exclusive) of the token starting at `start`, if one starts there.
fn token_end(chars: &[char], start: usize, delimiter: char, quote: char) -> Option<usize> {
    let first = chars[start];

    if first == quote {
        for (offset, &c) in chars[start + 1..].iter().enumerate() {
            if is_line_break(c) {
                return None;
            }
            let close = start + 1 + offset;
            if c == quote && at_boundary(chars, close + 1, delimiter) {
                return Some(close + 1);
            }
        }
        return None;
    }

    if first == delimiter {
        return None;
    }

    let end = chars[start..]
        .iter()
        .position(|&c| c == quote || c == delimiter)
        .map_or(chars.len(), |n| start + n);
    at_boundary(chars, end, delimiter).then_some(end)
}

/// Whether only whitespace separates `pos` from a delimiter or the end.
fn at_boundary(chars: &[char], pos: usize, delimiter: char) -> bool {
    chars[pos..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_none_or(|&c| c == delimiter)
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn clean_token(raw: &[char], quote: char) -> String {
    let mut slice = raw;
    if let [first, rest @ ..] = slice {
        if *first == quote {
            slice = rest;
        }
    }
    if let [rest @ .., last] = slice {
        if *last == quote {
            slice = rest;
        }
    }
    slice.iter().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        split_line(line, ',', '"')
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(split("color,red"), vec!["color", "red"]);
        assert_eq!(split("  color ,  red  "), vec!["color", "red"]);
    }

    #[test]
    fn test_split_quoted_with_delimiter() {
        assert_eq!(split(r#""a,b","c""#), vec!["a,b", "c"]);
        assert_eq!(split(r#""size", "10 cm""#), vec!["size", "10 cm"]);
    }

    #[test]
    fn test_split_skips_empty_fields() {
        assert_eq!(split("a,,b"), vec!["a", "b"]);
        assert_eq!(split(",value"), vec!["value"]);
        assert!(split("").is_empty());
        assert!(split(",,").is_empty());
    }

    #[test]
    fn test_split_quote_inside_quoted_run() {
        // The first closing quote is followed by `b`, so the run extends.
        assert_eq!(split(r#""a"b",c"#), vec![r#"a"b"#, "c"]);
    }

    #[test]
    fn test_split_stray_quote_in_bare_run() {
        // `ab` is followed by a quote, so it is not a token; the quoted run is.
        assert_eq!(split(r#"ab"cd",x"#), vec!["cd", "x"]);
    }

    #[test]
    fn test_split_whitespace_run_is_a_token() {
        assert_eq!(split(r#""a" ,"b""#), vec!["a", "", "b"]);
        assert_eq!(split(" , "), vec!["", ""]);
    }

    #[test]
    fn test_split_unterminated_quote() {
        assert_eq!(split(r#""abc,def"#), vec!["abc", "def"]);
        assert!(split("\"").is_empty());
    }

    #[test]
    fn test_split_empty_quoted_value() {
        assert_eq!(split(r#""a","""#), vec!["a", ""]);
    }

    #[test]
    fn test_decode_discards_header() {
        let decoder = Decoder::new();
        let map = decoder.decode("x,1\ny,2\nz,3");

        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("x"));
        assert_eq!(map.get("y").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_decode_without_header() {
        let decoder = Decoder::with_config(DecoderConfig {
            has_header: false,
            ..DecoderConfig::default()
        });
        let map = decoder.decode("x,1\ny,2");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_decode_missing_value_and_last_write_wins() {
        let decoder = Decoder::new();
        let map = decoder.decode("Feature,Data\nweight\nheight,1\nheight,2\n");

        assert_eq!(map.get("weight").map(String::as_str), Some(""));
        assert_eq!(map.get("height").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_decode_counts_skipped_lines() {
        let decoder = Decoder::new();
        let source = decoder.decode_source(
            1,
            &SourceText::new("a.csv", "Feature,Data\n,\na,1\n   \n\"\"\n"),
        );

        assert_eq!(source.features.len(), 1);
        assert_eq!(source.metadata.skipped_lines, 3);
        assert_eq!(source.metadata.feature_count, 1);
    }

    #[test]
    fn test_decode_crlf() {
        let decoder = Decoder::new();
        let map = decoder.decode("Feature,Data\r\na,1\r\nb,2\r\n");

        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(map.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_decode_empty_text() {
        assert!(Decoder::new().decode("").is_empty());
        assert!(Decoder::new().decode("Feature,Data").is_empty());
    }
}
