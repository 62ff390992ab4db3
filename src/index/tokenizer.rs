use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        // "s" and "t" catch the halves of "someone's" and "don't"
        let words: &[&str] = &[
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
            "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "s", "t",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Removes a single trailing `s`
fn strip_s(token: &str) -> &str {
    token.strip_suffix('s').unwrap_or(token)
}

/// Splits text into index terms
///
/// Terms are maximal runs of word characters, lowercased, with stopwords
/// removed and one trailing `s` stripped. Indexing and querying must both go
/// through this function so their terms agree.
///
/// ```
/// use site_search::tokenize;
///
/// assert_eq!(tokenize("The Apples are Red"), vec!["apple", "red"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(strip_s)
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}
