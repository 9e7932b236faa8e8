pub const UNSCRAMBLE_WORDS: &[&str] = &[
    "apple",
    "banana",
    "cherry",
    "developer",
    "elephant",
    "framework",
    "javascript",
    "keyboard",
    "terminal",
    "compiler",
    "lantern",
    "orchard",
];

pub const WORDLE_WORDS: &[&str] = &[
    "react", "apple", "world", "train", "house", "crane", "slate", "plant", "ghost", "brick",
    "flame", "sword", "chair", "light", "stone", "water", "piano", "tiger", "lemon", "quiet",
];

pub const SAMPLE_TEXTS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Practice makes perfect, so keep coding every day.",
    "A small step every morning adds up to a long walk.",
    "Bright lights flicker above the quiet harbour.",
];

pub const ALLOWED_LETTERS: &[char] = &['a', 'e', 'i', 'r', 't', 'l', 's'];

pub const DICTIONARY: &[&str] = &[
    "art", "tar", "rat", "star", "tsar", "tear", "rate", "tier", "late", "real", "tail", "list",
    "salt", "rail", "alert", "alter", "later", "stare", "retail", "slate", "trail", "isle", "sire",
    "lit", "let", "set", "sir", "its", "taste", "east", "seat", "teal", "least", "tale", "tile",
    "rise", "site", "tire", "sat", "sit", "tea", "sea", "ate", "eat", "air", "ale", "ear",
];

/// Answers the computer "also thought of" per starting letter. Shared
/// answers score nothing.
pub const RIVAL_WORDS: &[(char, &[&str])] = &[
    ('a', &["apple", "ant", "axis", "area"]),
    ('b', &["ball", "bat", "barn", "beep"]),
    ('c', &["cat", "car", "cup", "cave"]),
    ('d', &["dog", "dove", "drum", "deal"]),
    ('e', &["echo", "egg", "ear", "edge"]),
    ('f', &["fan", "fish", "frog", "farm"]),
];
