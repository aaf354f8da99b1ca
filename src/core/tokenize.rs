//! Word tokenization and filtering for the content report.
//!
//! Tokenization follows the usual treebank conventions closely enough for
//! word counting: punctuation becomes its own token, contractions such as
//! `don't` stay whole, and clitics such as `'s` or `'ll` split off with their
//! apostrophe.

use std::collections::HashSet;
use std::sync::OnceLock;

/// English stopwords. Apostrophe forms are deliberately absent, so
/// contractions like `don't` are counted as content words.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Clitics split off the end of a word.
const CLITICS: &[&str] = &["'ll", "'re", "'ve", "'s", "'m", "'d"];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(token: &str) -> bool {
    stopwords().contains(token)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_joiner(c: char) -> bool {
    matches!(c, '\'' | '-' | '.')
}

/// Split text into raw tokens. Case is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for chunk in text.split_whitespace() {
        let chars: Vec<char> = chunk.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let starts_word = is_word_char(c)
                || (c == '\'' && chars.get(i + 1).copied().is_some_and(is_word_char));

            if !starts_word {
                tokens.push(c.to_string());
                i += 1;
                continue;
            }

            let start = i;
            i += 1;
            while i < chars.len() {
                if is_word_char(chars[i]) {
                    i += 1;
                } else if is_joiner(chars[i])
                    && is_word_char(chars[i - 1])
                    && chars.get(i + 1).copied().is_some_and(is_word_char)
                {
                    i += 2;
                } else {
                    break;
                }
            }

            let word: String = chars[start..i].iter().collect();
            push_with_clitic(&mut tokens, word);
        }
    }

    tokens
}

fn push_with_clitic(tokens: &mut Vec<String>, mut word: String) {
    let clitic = CLITICS
        .iter()
        .find(|c| word.len() > c.len() && word.ends_with(*c));

    match clitic {
        Some(clitic) => {
            let tail = word.split_off(word.len() - clitic.len());
            tokens.push(word);
            tokens.push(tail);
        }
        None => tokens.push(word),
    }
}

/// Lowercase, tokenize and filter a message into countable content words.
///
/// Stopwords, pure punctuation and all-digit tokens are dropped. A token
/// with a leading apostrophe loses it, unless only one character would be
/// left (`'s`), in which case the whole token goes. Anything of one
/// character or less is dropped last.
pub fn content_words(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase().replace('\u{2019}', "'");
    tokenize(&normalized)
        .into_iter()
        .filter_map(normalize_token)
        .collect()
}

fn normalize_token(token: String) -> Option<String> {
    if is_stopword(&token) || is_punctuation(&token) || is_all_digits(&token) {
        return None;
    }

    let word = match token.strip_prefix('\'') {
        Some(rest) if rest.chars().count() <= 1 => return None,
        Some(rest) => rest.to_string(),
        None => token,
    };

    (word.chars().count() > 1).then_some(word)
}

fn is_punctuation(token: &str) -> bool {
    token.chars().all(|c| !c.is_alphanumeric())
}

fn is_all_digits(token: &str) -> bool {
    token.chars().all(char::is_numeric)
}
