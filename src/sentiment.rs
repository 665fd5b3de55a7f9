//! Lexicon/rule-based polarity scoring.
//!
//! Fixed valence lexicon plus a small rule layer (boosters, negation,
//! ALL-CAPS emphasis, exclamation amplification, but-clause weighting).
//! Deterministic for identical input; no per-request state.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const BOOST_INCR: f64 = 0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAIM_INCR: f64 = 0.292;
const NORMALIZE_ALPHA: f64 = 15.0;

/// Word valences on a -4..4 scale. Inflected forms are listed outright so
/// scoring never depends on the lemmatizer.
static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let entries: &[(&str, f64)] = &[
        // strong positive
        ("love", 3.2),
        ("loved", 2.9),
        ("loves", 3.0),
        ("loving", 2.9),
        ("adore", 3.2),
        ("adorable", 2.2),
        ("amazing", 2.8),
        ("awesome", 3.1),
        ("best", 3.2),
        ("brilliant", 2.8),
        ("excellent", 2.7),
        ("fantastic", 2.6),
        ("incredible", 2.6),
        ("magnificent", 2.9),
        ("outstanding", 2.8),
        ("perfect", 2.7),
        ("phenomenal", 2.9),
        ("spectacular", 2.7),
        ("stunning", 2.4),
        ("superb", 2.9),
        ("wonderful", 2.7),
        ("wow", 2.8),
        ("masterpiece", 2.9),
        ("flawless", 2.6),
        ("legend", 2.4),
        ("legendary", 2.5),
        ("queen", 1.7),
        ("king", 1.7),
        ("goat", 3.0),
        ("fire", 2.3),
        ("lit", 2.4),
        ("slay", 2.8),
        ("slays", 2.8),
        ("banger", 2.5),
        ("iconic", 2.3),
        ("vibes", 1.6),
        ("fave", 2.1),
        ("favorite", 2.0),
        ("favourite", 2.0),
        // moderate positive
        ("good", 1.9),
        ("great", 3.1),
        ("greatest", 3.2),
        ("nice", 1.8),
        ("beautiful", 2.9),
        ("beauty", 2.6),
        ("pretty", 2.2),
        ("gorgeous", 3.0),
        ("cute", 2.0),
        ("sweet", 2.0),
        ("cool", 1.3),
        ("dope", 2.3),
        ("fresh", 1.3),
        ("clean", 1.6),
        ("crisp", 1.2),
        ("happy", 2.7),
        ("happiness", 2.6),
        ("joy", 2.8),
        ("joyful", 2.9),
        ("glad", 2.0),
        ("fun", 2.3),
        ("funny", 1.9),
        ("hilarious", 1.8),
        ("enjoy", 2.2),
        ("enjoyed", 2.3),
        ("enjoying", 2.2),
        ("like", 1.5),
        ("liked", 1.6),
        ("likes", 1.5),
        ("impressive", 2.3),
        ("impressed", 2.1),
        ("inspiring", 2.4),
        ("inspired", 2.2),
        ("inspiration", 2.3),
        ("proud", 2.1),
        ("win", 2.8),
        ("winner", 2.8),
        ("winning", 2.4),
        ("congrats", 2.4),
        ("congratulations", 2.9),
        ("thanks", 1.9),
        ("thank", 1.5),
        ("grateful", 3.1),
        ("blessed", 2.9),
        ("hope", 1.9),
        ("hopeful", 2.3),
        ("excited", 2.2),
        ("exciting", 2.2),
        ("excitement", 2.4),
        ("thrilled", 2.9),
        ("delighted", 2.8),
        ("delightful", 2.8),
        ("pleasant", 2.3),
        ("pleased", 1.9),
        ("satisfying", 1.8),
        ("satisfied", 1.9),
        ("support", 1.7),
        ("supportive", 2.2),
        ("respect", 2.1),
        ("talented", 2.4),
        ("talent", 1.9),
        ("skill", 1.5),
        ("skilled", 1.9),
        ("creative", 1.9),
        ("helpful", 1.8),
        ("interesting", 1.7),
        ("intriguing", 1.6),
        ("curious", 1.3),
        ("smart", 1.7),
        ("clever", 1.9),
        ("genius", 2.7),
        ("strong", 2.3),
        ("powerful", 1.8),
        ("epic", 2.4),
        ("rad", 2.2),
        ("solid", 1.5),
        ("gem", 1.9),
        ("yes", 1.7),
        ("yay", 2.4),
        ("bravo", 2.7),
        ("encore", 1.4),
        ("goals", 1.8),
        ("magic", 2.1),
        ("magical", 2.4),
        ("paradise", 2.7),
        ("dream", 1.8),
        ("dreamy", 2.1),
        ("smile", 2.0),
        ("smiling", 2.1),
        ("laugh", 2.1),
        ("laughing", 2.0),
        ("charming", 2.4),
        ("elegant", 2.1),
        ("classy", 2.0),
        ("worth", 0.9),
        ("recommend", 1.5),
        ("recommended", 1.6),
        ("agree", 1.5),
        ("agreed", 1.4),
        ("true", 1.8),
        ("accurate", 1.3),
        ("clear", 1.2),
        ("understand", 0.9),
        ("understood", 0.8),
        ("accept", 1.2),
        ("accepted", 1.1),
        ("welcome", 2.0),
        ("care", 2.2),
        ("caring", 2.2),
        ("kind", 2.4),
        ("kindness", 2.5),
        ("gentle", 1.9),
        ("honest", 2.3),
        ("honestly", 1.2),
        ("peace", 2.5),
        ("peaceful", 2.2),
        ("relax", 1.9),
        ("relaxing", 1.9),
        ("safe", 1.9),
        ("free", 2.3),
        ("freedom", 3.2),
        ("heart", 1.6),
        ("hearts", 1.6),
        ("sparkles", 1.3),
        ("sunshine", 1.9),
        ("glow", 1.4),
        ("glowing", 1.8),
        ("crown", 1.3),
        ("trophy", 1.6),
        ("star", 1.6),
        ("rocket", 1.2),
        ("hundred", 1.4),
        ("clapping", 1.7),
        ("applause", 2.1),
        // weak/contextual positive
        ("ok", 0.9),
        ("okay", 0.9),
        ("fine", 0.8),
        ("decent", 1.1),
        ("alright", 1.0),
        // strong negative
        ("hate", -2.7),
        ("hated", -2.8),
        ("hates", -2.5),
        ("hating", -2.6),
        ("awful", -2.0),
        ("terrible", -2.1),
        ("horrible", -2.5),
        ("horrendous", -2.4),
        ("disgusting", -2.4),
        ("disgust", -2.4),
        ("gross", -1.7),
        ("worst", -3.1),
        ("trash", -1.9),
        ("garbage", -1.7),
        ("rubbish", -1.8),
        ("pathetic", -2.3),
        ("disaster", -2.2),
        ("nightmare", -2.3),
        ("cringe", -1.8),
        ("cringy", -1.8),
        ("vile", -2.7),
        ("evil", -3.4),
        ("scam", -2.3),
        ("fraud", -2.6),
        ("fake", -1.7),
        ("liar", -2.6),
        ("lies", -1.8),
        ("lie", -1.6),
        ("toxic", -2.4),
        ("shame", -2.1),
        ("shameful", -2.4),
        ("disgrace", -2.4),
        ("disgraceful", -2.5),
        // moderate negative
        ("bad", -2.5),
        ("poor", -2.1),
        ("sad", -2.1),
        ("sadly", -1.9),
        ("sadness", -2.2),
        ("unhappy", -1.9),
        ("angry", -2.3),
        ("anger", -2.7),
        ("mad", -2.4),
        ("furious", -2.6),
        ("annoyed", -1.6),
        ("annoying", -1.9),
        ("upset", -1.6),
        ("disappointed", -2.1),
        ("disappointing", -2.2),
        ("disappointment", -2.2),
        ("boring", -1.3),
        ("bored", -1.3),
        ("dull", -1.7),
        ("meh", -0.9),
        ("ugly", -2.4),
        ("hideous", -2.4),
        ("weak", -1.9),
        ("lame", -1.8),
        ("stupid", -2.4),
        ("dumb", -2.3),
        ("idiot", -2.3),
        ("fool", -1.9),
        ("foolish", -2.0),
        ("ridiculous", -1.5),
        ("nonsense", -1.7),
        ("useless", -1.8),
        ("worthless", -2.7),
        ("waste", -1.8),
        ("wasted", -2.2),
        ("fail", -2.5),
        ("failed", -2.3),
        ("failure", -2.5),
        ("failing", -2.2),
        ("flop", -1.9),
        ("lose", -1.7),
        ("loser", -2.4),
        ("losing", -1.9),
        ("lost", -1.3),
        ("wrong", -2.1),
        ("mistake", -1.7),
        ("error", -1.6),
        ("problem", -1.7),
        ("problems", -1.7),
        ("issue", -0.8),
        ("issues", -0.9),
        ("broken", -1.9),
        ("hurt", -2.4),
        ("hurts", -2.2),
        ("pain", -2.3),
        ("painful", -2.4),
        ("cry", -1.5),
        ("crying", -1.6),
        ("tears", -1.0),
        ("fear", -2.2),
        ("afraid", -2.2),
        ("scared", -2.2),
        ("scary", -2.2),
        ("terrifying", -2.8),
        ("terrified", -2.7),
        ("worried", -1.7),
        ("worry", -1.6),
        ("worrying", -1.8),
        ("anxious", -1.9),
        ("anxiety", -2.2),
        ("nervous", -1.4),
        ("panic", -2.2),
        ("dread", -2.3),
        ("doubt", -1.3),
        ("doubtful", -1.4),
        ("confused", -1.2),
        ("confusing", -1.3),
        ("confusion", -1.4),
        ("unclear", -1.1),
        ("frustrated", -2.1),
        ("frustrating", -2.0),
        ("frustration", -2.1),
        ("irritated", -1.9),
        ("irritating", -2.1),
        ("offensive", -2.4),
        ("offended", -1.9),
        ("insult", -2.1),
        ("insulting", -2.3),
        ("rude", -2.0),
        ("mean", -1.6),
        ("cruel", -2.8),
        ("unfair", -2.0),
        ("no", -1.2),
        ("never", -1.3),
        ("skull", -0.6),
        ("bomb", -1.4),
        ("clown", -1.3),
        ("snake", -1.2),
        ("flopped", -1.8),
        ("overrated", -1.6),
        ("underwhelming", -1.5),
        ("mid", -1.1),
        ("unfollow", -1.4),
        ("block", -1.2),
        ("blocked", -1.3),
        ("report", -0.9),
        ("spam", -1.6),
    ];
    entries.iter().copied().collect()
});

/// Degree modifiers: positive entries intensify, negative ones dampen.
static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let entries: &[(&str, f64)] = &[
        ("absolutely", BOOST_INCR),
        ("amazingly", BOOST_INCR),
        ("completely", BOOST_INCR),
        ("considerably", BOOST_INCR),
        ("deeply", BOOST_INCR),
        ("enormously", BOOST_INCR),
        ("entirely", BOOST_INCR),
        ("especially", BOOST_INCR),
        ("exceptionally", BOOST_INCR),
        ("extremely", BOOST_INCR),
        ("fully", BOOST_INCR),
        ("greatly", BOOST_INCR),
        ("hella", BOOST_INCR),
        ("highly", BOOST_INCR),
        ("hugely", BOOST_INCR),
        ("incredibly", BOOST_INCR),
        ("insanely", BOOST_INCR),
        ("majorly", BOOST_INCR),
        ("particularly", BOOST_INCR),
        ("purely", BOOST_INCR),
        ("quite", BOOST_INCR),
        ("really", BOOST_INCR),
        ("remarkably", BOOST_INCR),
        ("so", BOOST_INCR),
        ("substantially", BOOST_INCR),
        ("thoroughly", BOOST_INCR),
        ("totally", BOOST_INCR),
        ("tremendously", BOOST_INCR),
        ("unbelievably", BOOST_INCR),
        ("utterly", BOOST_INCR),
        ("very", BOOST_INCR),
        ("super", BOOST_INCR),
        ("truly", BOOST_INCR),
        ("almost", -BOOST_INCR),
        ("barely", -BOOST_INCR),
        ("hardly", -BOOST_INCR),
        ("kinda", -BOOST_INCR),
        ("less", -BOOST_INCR),
        ("little", -BOOST_INCR),
        ("marginally", -BOOST_INCR),
        ("occasionally", -BOOST_INCR),
        ("partly", -BOOST_INCR),
        ("scarcely", -BOOST_INCR),
        ("slightly", -BOOST_INCR),
        ("somewhat", -BOOST_INCR),
        ("sorta", -BOOST_INCR),
    ];
    entries.iter().copied().collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "none", "nope", "nor", "nothing", "nowhere", "neither", "cannot",
        "cant", "aint", "without", "rarely", "seldom", "despite", "dont", "didnt", "doesnt",
        "isnt", "wasnt", "wont", "shouldnt", "couldnt", "wouldnt", "hasnt", "havent", "arent",
        "werent",
    ]
    .into_iter()
    .collect()
});

/// Polarity proportions plus the bounded compound summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScores {
    fn neutral() -> Self {
        SentimentScores {
            neg: 0.0,
            neu: 1.0,
            pos: 0.0,
            compound: 0.0,
        }
    }
}

/// Stateless scorer over the static lexicon. Cheap to clone into handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        SentimentAnalyzer
    }

    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return SentimentScores::neutral();
        }

        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_diff = has_caps_difference(&words);

        let mut sentiments: Vec<f64> = Vec::with_capacity(words.len());
        for (i, word) in lowered.iter().enumerate() {
            if BOOSTERS.contains_key(word.as_str()) {
                sentiments.push(0.0);
                continue;
            }
            let Some(&base) = LEXICON.get(word.as_str()) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = base;
            if cap_diff && is_all_caps(words[i]) {
                valence += CAPS_INCR.copysign(base);
            }

            // degree modifiers within a 3-token window, damped by distance
            for back in 1..=3usize {
                let Some(j) = i.checked_sub(back) else { break };
                if let Some(&boost) = BOOSTERS.get(lowered[j].as_str()) {
                    // intensifiers push away from zero, dampeners pull toward it
                    let mut scalar = if boost < 0.0 {
                        -BOOST_INCR.copysign(base)
                    } else {
                        BOOST_INCR.copysign(base)
                    };
                    if cap_diff && is_all_caps(words[j]) {
                        scalar += CAPS_INCR.copysign(scalar);
                    }
                    match back {
                        2 => scalar *= 0.95,
                        3 => scalar *= 0.9,
                        _ => {}
                    }
                    valence += scalar;
                }
            }

            if is_negated(&lowered, i) {
                valence *= NEGATION_SCALAR;
            }

            sentiments.push(valence);
        }

        apply_but_clause(&lowered, &mut sentiments);

        let punct_emphasis = punctuation_emphasis(text);
        let mut total: f64 = sentiments.iter().sum();
        if total > 0.0 {
            total += punct_emphasis;
        } else if total < 0.0 {
            total -= punct_emphasis;
        }

        let compound = normalize(total);

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &s in &sentiments {
            if s > 0.0 {
                pos_sum += s + 1.0;
            } else if s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += punct_emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= punct_emphasis;
        }

        let denom = pos_sum + neg_sum.abs() + neu_count;
        if denom == 0.0 {
            return SentimentScores::neutral();
        }

        SentimentScores {
            pos: (pos_sum / denom).abs(),
            neg: (neg_sum / denom).abs(),
            neu: (neu_count / denom).abs(),
            compound,
        }
    }
}

fn normalize(score: f64) -> f64 {
    let norm = score / (score * score + NORMALIZE_ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

fn is_all_caps(word: &str) -> bool {
    word.len() > 1
        && word.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
        && word.chars().any(|c| c.is_alphabetic())
}

fn has_caps_difference(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_all_caps(w)).count();
    caps > 0 && caps < words.len()
}

fn is_negated(lowered: &[String], i: usize) -> bool {
    for back in 1..=3usize {
        let Some(j) = i.checked_sub(back) else { break };
        let prev = lowered[j].as_str();
        if NEGATIONS.contains(prev) || prev.ends_with("n't") {
            return true;
        }
    }
    false
}

/// Sentiment after a "but" outweighs sentiment before it.
fn apply_but_clause(lowered: &[String], sentiments: &mut [f64]) {
    if let Some(but_idx) = lowered.iter().position(|w| w == "but") {
        for (i, s) in sentiments.iter_mut().enumerate() {
            if i < but_idx {
                *s *= 0.5;
            } else if i > but_idx {
                *s *= 1.5;
            }
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclaims = text.chars().filter(|&c| c == '!').count().min(4);
    let questions = text.chars().filter(|&c| c == '?').count();
    let qm_emphasis = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclaims as f64 * EXCLAIM_INCR + qm_emphasis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new()
    }

    #[test]
    fn empty_string_is_fully_neutral() {
        let scores = analyzer().polarity_scores("");
        assert_eq!(scores.compound, 0.0);
        assert_eq!(scores.neu, 1.0);
        assert_eq!(scores.pos, 0.0);
        assert_eq!(scores.neg, 0.0);
    }

    #[test]
    fn enthusiastic_praise_clears_half() {
        let scores = analyzer().polarity_scores("I love this, it's amazing!");
        assert!(scores.compound > 0.5, "compound was {}", scores.compound);
        assert!(scores.pos > scores.neg);
    }

    #[test]
    fn clear_negative() {
        let scores = analyzer().polarity_scores("This is terrible and I hate it");
        assert!(scores.compound < -0.3);
        assert!(scores.neg > scores.pos);
    }

    #[test]
    fn negation_flips_polarity() {
        let plain = analyzer().polarity_scores("good");
        let negated = analyzer().polarity_scores("not good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn booster_intensifies() {
        let plain = analyzer().polarity_scores("good");
        let boosted = analyzer().polarity_scores("very good");
        assert!(boosted.compound > plain.compound);
    }

    #[test]
    fn dampener_softens() {
        let plain = analyzer().polarity_scores("good");
        let damped = analyzer().polarity_scores("slightly good");
        assert!(damped.compound < plain.compound);
        assert!(damped.compound > 0.0);
    }

    #[test]
    fn caps_add_emphasis_when_mixed_case() {
        let plain = analyzer().polarity_scores("this is great stuff");
        let shouted = analyzer().polarity_scores("this is GREAT stuff");
        assert!(shouted.compound > plain.compound);
    }

    #[test]
    fn exclamation_amplifies() {
        let calm = analyzer().polarity_scores("amazing");
        let loud = analyzer().polarity_scores("amazing!!!");
        assert!(loud.compound > calm.compound);
    }

    #[test]
    fn but_clause_shifts_weight() {
        let scores = analyzer().polarity_scores("The photo is great but the caption is horrible");
        assert!(scores.compound < 0.0, "compound was {}", scores.compound);
    }

    #[test]
    fn proportions_sum_to_one() {
        let scores = analyzer().polarity_scores("great photo, terrible caption, neutral words");
        let sum = scores.pos + scores.neu + scores.neg;
        assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let a = analyzer().polarity_scores("fire content, love it");
        let b = analyzer().polarity_scores("fire content, love it");
        assert_eq!(a, b);
    }

    #[test]
    fn compound_stays_bounded() {
        let text = "love love love love love love love love love love";
        let scores = analyzer().polarity_scores(text);
        assert!(scores.compound <= 1.0 && scores.compound >= -1.0);
    }

    #[test]
    fn unknown_words_are_neutral() {
        let scores = analyzer().polarity_scores("qwertyuiop zxcvbnm");
        assert_eq!(scores.compound, 0.0);
        assert_eq!(scores.neu, 1.0);
    }
}
