//! Plain-text preprocessing for the `/api/text-analysis` path: tokenize,
//! drop stop words, tag part of speech, lemmatize by tag.
//!
//! The Instagram pipeline deliberately skips this step and scores the
//! rewritten sentences as-is.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "am", "have", "has",
        "had", "having", "do", "does", "did", "doing", "will", "would", "could", "should", "may",
        "might", "must", "shall", "can", "to", "of", "in", "for", "on", "with", "at", "by",
        "from", "as", "into", "through", "during", "before", "after", "above", "below", "between",
        "under", "over", "again", "further", "then", "once", "here", "there", "when", "where",
        "why", "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
        "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
        "just", "don", "now", "and", "but", "if", "or", "because", "until", "while", "about",
        "against", "up", "down", "out", "off", "this", "that", "these", "those", "i", "me", "my",
        "myself", "we", "our", "ours", "ourselves", "you", "your", "yours", "yourself",
        "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself", "it", "its",
        "itself", "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom",
    ]
    .into_iter()
    .collect()
});

/// Adjectives the suffix heuristic alone would mistag.
static KNOWN_ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "bad", "great", "amazing", "stunning", "boring", "interesting", "exciting",
        "disappointing", "outstanding", "charming", "annoying", "disgusting", "terrifying",
        "happy", "sad", "angry", "ugly", "pretty", "big", "small", "new", "old", "young", "long",
        "short", "high", "low", "hot", "cold", "fast", "slow", "easy", "hard", "early", "late",
        "nice", "fine", "cool", "warm", "cheap", "rich", "poor", "strong", "weak", "clean",
        "dirty", "funny", "lovely", "silly", "friendly", "better", "best", "worse", "worst",
    ]
    .into_iter()
    .collect()
});

/// Irregular forms the rule stripper cannot reach.
static IRREGULAR_LEMMAS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("better", "good"),
        ("best", "good"),
        ("worse", "bad"),
        ("worst", "bad"),
        ("went", "go"),
        ("gone", "go"),
        ("made", "make"),
        ("took", "take"),
        ("taken", "take"),
        ("got", "get"),
        ("gotten", "get"),
        ("saw", "see"),
        ("seen", "see"),
        ("came", "come"),
        ("felt", "feel"),
        ("left", "leave"),
        ("said", "say"),
        ("told", "tell"),
        ("thought", "think"),
        ("knew", "know"),
        ("known", "know"),
        ("gave", "give"),
        ("given", "give"),
        ("found", "find"),
        ("kept", "keep"),
        ("children", "child"),
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
    ]
    .into_iter()
    .collect()
});

/// The four tag buckets the lemmatizer distinguishes, mirroring WordNet's
/// a/v/n/r split with noun as the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Adjective,
    Verb,
    Noun,
    Adverb,
}

pub fn tag_pos(word: &str) -> PosTag {
    if KNOWN_ADJECTIVES.contains(word) {
        return PosTag::Adjective;
    }
    if word.len() > 3 && word.ends_with("ly") {
        return PosTag::Adverb;
    }
    for suffix in ["ous", "ful", "ive", "able", "ible", "ish", "less", "est"] {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            return PosTag::Adjective;
        }
    }
    for suffix in ["ing", "ed", "ize", "ise", "ify"] {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            return PosTag::Verb;
        }
    }
    PosTag::Noun
}

fn collapse_double_consonant(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 2 && chars[n - 1] == chars[n - 2] && !"aeiou".contains(chars[n - 1]) {
        chars[..n - 1].iter().collect()
    } else {
        stem.to_string()
    }
}

/// Rule-based lemmatization. Inflected sentiment-bearing forms are also
/// listed in the scoring lexicon, so an imperfect stem only costs recall on
/// rare words.
pub fn lemmatize(word: &str, tag: PosTag) -> String {
    if let Some(lemma) = IRREGULAR_LEMMAS.get(word) {
        return lemma.to_string();
    }

    match tag {
        PosTag::Verb => {
            if word.len() > 5 && word.ends_with("ing") {
                return collapse_double_consonant(&word[..word.len() - 3]);
            }
            if word.len() > 4 && word.ends_with("ied") {
                return format!("{}y", &word[..word.len() - 3]);
            }
            if word.len() > 4 && word.ends_with("ed") {
                return collapse_double_consonant(&word[..word.len() - 2]);
            }
            if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
                return word[..word.len() - 1].to_string();
            }
            word.to_string()
        }
        PosTag::Noun => {
            if word.len() > 4 && word.ends_with("ies") {
                return format!("{}y", &word[..word.len() - 3]);
            }
            if word.len() > 4 && word.ends_with("es") && !word.ends_with("ses") {
                return word[..word.len() - 2].to_string();
            }
            if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
                return word[..word.len() - 1].to_string();
            }
            word.to_string()
        }
        PosTag::Adjective => {
            if word.len() > 4 && word.ends_with("est") {
                return collapse_double_consonant(&word[..word.len() - 3]);
            }
            word.to_string()
        }
        PosTag::Adverb => word.to_string(),
    }
}

/// Lowercase alphabetic tokens only, the shape the lexicon expects.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Full plain-text pipeline: tokenize, drop stop words, tag, lemmatize,
/// re-join for scoring.
pub fn prepare_for_scoring(text: &str) -> String {
    tokenize(text)
        .into_iter()
        .filter(|t| !STOP_WORDS.contains(t.as_str()))
        .map(|t| {
            let tag = tag_pos(&t);
            lemmatize(&t, tag)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
