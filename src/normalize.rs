//! Comment cleaning: emoji glyphs become descriptive words so the lexicon
//! scorer and the rewrite model both see plain text.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Emoji the Instagram audience actually uses, mapped to lowercase names
/// (underscores already expanded to spaces).
static EMOJI_NAMES: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    let entries: &[(char, &str)] = &[
        ('\u{1F525}', "fire"),
        ('\u{2764}', "red heart"),
        ('\u{1F499}', "blue heart"),
        ('\u{1F49A}', "green heart"),
        ('\u{1F49B}', "yellow heart"),
        ('\u{1F5A4}', "black heart"),
        ('\u{1F90D}', "white heart"),
        ('\u{1F90E}', "brown heart"),
        ('\u{1F49C}', "purple heart"),
        ('\u{1F9E1}', "orange heart"),
        ('\u{1F496}', "sparkling heart"),
        ('\u{1F495}', "two hearts"),
        ('\u{1F493}', "beating heart"),
        ('\u{1F494}', "broken heart"),
        ('\u{1F60D}', "smiling face with heart eyes"),
        ('\u{1F970}', "smiling face with hearts"),
        ('\u{1F618}', "face blowing a kiss"),
        ('\u{1F602}', "face with tears of joy"),
        ('\u{1F923}', "rolling on the floor laughing"),
        ('\u{1F604}', "grinning face with smiling eyes"),
        ('\u{1F600}', "grinning face"),
        ('\u{1F603}', "grinning face with big eyes"),
        ('\u{1F601}', "beaming face with smiling eyes"),
        ('\u{1F606}', "grinning squinting face"),
        ('\u{1F60A}', "smiling face with smiling eyes"),
        ('\u{1F642}', "slightly smiling face"),
        ('\u{1F609}', "winking face"),
        ('\u{1F60E}', "smiling face with sunglasses"),
        ('\u{1F929}', "star struck"),
        ('\u{1F973}', "partying face"),
        ('\u{1F917}', "smiling face with open hands"),
        ('\u{1F60F}', "smirking face"),
        ('\u{1F644}', "face with rolling eyes"),
        ('\u{1F610}', "neutral face"),
        ('\u{1F611}', "expressionless face"),
        ('\u{1F914}', "thinking face"),
        ('\u{1F928}', "face with raised eyebrow"),
        ('\u{1F615}', "confused face"),
        ('\u{1F61F}', "worried face"),
        ('\u{1F628}', "fearful face"),
        ('\u{1F631}', "face screaming in fear"),
        ('\u{1F630}', "anxious face with sweat"),
        ('\u{1F622}', "crying face"),
        ('\u{1F62D}', "loudly crying face"),
        ('\u{1F614}', "pensive face"),
        ('\u{1F61E}', "disappointed face"),
        ('\u{1F620}', "angry face"),
        ('\u{1F621}', "enraged face"),
        ('\u{1F92C}', "face with symbols on mouth"),
        ('\u{1F624}', "face with steam from nose"),
        ('\u{1F612}', "unamused face"),
        ('\u{1F922}', "nauseated face"),
        ('\u{1F92E}', "face vomiting"),
        ('\u{1F62E}', "face with open mouth"),
        ('\u{1F632}', "astonished face"),
        ('\u{1F633}', "flushed face"),
        ('\u{1F97A}', "pleading face"),
        ('\u{1F64F}', "folded hands"),
        ('\u{1F44F}', "clapping hands"),
        ('\u{1F44D}', "thumbs up"),
        ('\u{1F44E}', "thumbs down"),
        ('\u{1F64C}', "raising hands"),
        ('\u{1F4AA}', "flexed biceps"),
        ('\u{1F91D}', "handshake"),
        ('\u{270C}', "victory hand"),
        ('\u{1F918}', "sign of the horns"),
        ('\u{1F44C}', "ok hand"),
        ('\u{1F446}', "backhand index pointing up"),
        ('\u{1F447}', "backhand index pointing down"),
        ('\u{1F4AF}', "hundred points"),
        ('\u{2B50}', "star"),
        ('\u{1F31F}', "glowing star"),
        ('\u{2728}', "sparkles"),
        ('\u{1F389}', "party popper"),
        ('\u{1F38A}', "confetti ball"),
        ('\u{1F3C6}', "trophy"),
        ('\u{1F451}', "crown"),
        ('\u{1F410}', "goat"),
        ('\u{1F40D}', "snake"),
        ('\u{1F4A3}', "bomb"),
        ('\u{1F4A5}', "collision"),
        ('\u{26A1}', "high voltage"),
        ('\u{1F308}', "rainbow"),
        ('\u{1F338}', "cherry blossom"),
        ('\u{1F339}', "rose"),
        ('\u{1F33A}', "hibiscus"),
        ('\u{1F480}', "skull"),
        ('\u{1F921}', "clown face"),
        ('\u{1F4A9}', "pile of poo"),
        ('\u{1F643}', "upside down face"),
        ('\u{1F605}', "grinning face with sweat"),
        ('\u{1F62C}', "grimacing face"),
        ('\u{1F648}', "see no evil monkey"),
        ('\u{1F649}', "hear no evil monkey"),
        ('\u{1F64A}', "speak no evil monkey"),
        ('\u{1F440}', "eyes"),
        ('\u{1F4F8}', "camera with flash"),
        ('\u{1F4F7}', "camera"),
        ('\u{1F3AF}', "bullseye"),
        ('\u{1F680}', "rocket"),
        ('\u{1F4C8}', "chart increasing"),
        ('\u{1F4C9}', "chart decreasing"),
        ('\u{1F3B5}', "musical note"),
        ('\u{1F3B6}', "musical notes"),
        ('\u{1F37E}', "bottle with popping cork"),
        ('\u{1F942}', "clinking glasses"),
    ];
    entries.iter().copied().collect()
});

/// Raw comments paired with their emoji-expanded counterparts. Construction
/// guarantees the two lists stay parallel and equal-length.
#[derive(Debug, Clone, Default)]
pub struct NormalizedComments {
    raw: Vec<String>,
    cleaned: Vec<String>,
}

impl NormalizedComments {
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn cleaned(&self) -> &[String] {
        &self.cleaned
    }

    pub fn len(&self) -> usize {
        self.cleaned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty()
    }
}

fn is_emoji_codepoint(c: char) -> bool {
    matches!(c,
        '\u{1F000}'..='\u{1FAFF}'
        | '\u{2600}'..='\u{27BF}'
        | '\u{2B00}'..='\u{2BFF}'
        | '\u{1F1E6}'..='\u{1F1FF}'
    )
}

/// Presentation plumbing that carries no meaning of its own.
fn is_joiner_or_selector(c: char) -> bool {
    matches!(c, '\u{FE0E}' | '\u{FE0F}' | '\u{200D}' | '\u{1F3FB}'..='\u{1F3FF}')
}

/// Replace every known emoji with its textual name, drop unknown emoji and
/// presentation selectors, pass everything else through. Whitespace is
/// collapsed so substitutions never fuse with neighbouring words.
pub fn demojize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(name) = EMOJI_NAMES.get(&c) {
            out.push(' ');
            out.push_str(name);
            out.push(' ');
        } else if is_joiner_or_selector(c) || is_emoji_codepoint(c) {
            // untabled glyph: contributes nothing the scorer can use
        } else {
            out.push(c);
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a batch of scraped comments. Pairs whose cleaned side ends up empty
/// are dropped together with their raw counterpart, so indexes stay aligned.
pub fn normalize_comments(comments: &[String]) -> NormalizedComments {
    let mut normalized = NormalizedComments::default();
    for raw in comments {
        let cleaned = demojize(raw);
        if cleaned.is_empty() {
            continue;
        }
        normalized.raw.push(raw.clone());
        normalized.cleaned.push(cleaned);
    }
    normalized
}
