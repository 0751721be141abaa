//! Fixed substitution tables for the humanizer.

/// Leading transitions that mark text as machine-written. Stripped only at the very start.
pub const FORMAL_TRANSITIONS: &[&str] = &[
    "In conclusion,",
    "To summarize,",
    "Furthermore,",
    "Moreover,",
    "Additionally,",
    "Consequently,",
    "Nevertheless,",
    "Subsequently,",
    "Ultimately,",
    "Initially,",
    "In essence,",
    "Essentially,",
    "Fundamentally,",
];

/// Formal connector → casual alternatives. Only the first occurrence of each is swapped.
pub const CASUAL_CONNECTORS: &[(&str, &[&str])] = &[
    ("however", &["but", "though", "still"]),
    ("therefore", &["so", "meaning", "which means"]),
    ("additionally", &["also", "plus", "and"]),
    ("furthermore", &["plus", "and", "also"]),
    ("moreover", &["also", "plus", "and"]),
    ("consequently", &["so", "meaning"]),
    ("nevertheless", &["but", "still", "though"]),
    ("thus", &["so"]),
    ("hence", &["so"]),
    ("regarding", &["about", "on"]),
    ("concerning", &["about"]),
    ("subsequently", &["then", "later"]),
    ("initially", &["first", "at first"]),
    ("ultimately", &["in the end", "finally"]),
];

/// Phrase swaps applied before cliché deletion, so multi-word phrases that contain
/// a cliché word are rewritten instead of mangled.
pub const NATURAL_REPLACEMENTS: &[(&str, &str)] = &[
    ("it takes immense courage", "takes guts"),
    ("your journey", "how you went"),
    ("truly inspiring", "impressive"),
    ("powerful reminder", "good reminder"),
    ("invaluable growth", "real growth"),
    ("transparent about", "open about"),
    ("fantastic reflection", "good take"),
    ("highlighted", "mentioned"),
    ("critical choice", "huge decision"),
    ("valuable to others", "helpful"),
    ("struggle with", "deal with"),
];

/// Words and phrases deleted outright. Longer phrases come first so they win over
/// the single words they contain.
pub const AI_CLICHES: &[&str] = &[
    // giveaway phrases
    "in today's digital landscape",
    "it's important to note",
    "at the end of the day",
    "thanks for sharing",
    "great insights",
    "i hope this finds you well",
    "to be honest",
    "in my humble opinion",
    "needless to say",
    "this is a fantastic reflection",
    "it takes immense courage",
    "which you highlighted",
    "your insights here could be valuable",
    "many founders struggle with",
    "separates sustainable ventures",
    "pave the way",
    "raw experience",
    // verbs
    "delve into",
    "delve",
    "embark on",
    "embark",
    "leverage",
    "revolutionize",
    "unlock",
    "unleash",
    "streamline",
    "supercharge",
    "underscore",
    "forged",
    "trumps",
    // nouns
    "endeavor",
    "realm",
    "tapestry",
    "landscape",
    "paradigm",
    "synergy",
    "acumen",
    // adjectives
    "cutting-edge",
    "game-changing",
    "unprecedented",
    "robust",
    "comprehensive",
    "seamless",
    "transformative",
    "thought-provoking",
    "invaluable",
    "fantastic",
    "immense",
    // adverbs
    "moreover",
    "furthermore",
    "additionally",
    "nevertheless",
    "nonetheless",
    "undoubtedly",
    "arguably",
    "remarkably",
    "incredibly",
    "exceptionally",
    "truly",
];

/// Word-bounded contraction table. Matching is case-insensitive.
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("cannot", "can't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
    ("should not", "shouldn't"),
    ("have not", "haven't"),
    ("has not", "hasn't"),
    ("had not", "hadn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("I am", "I'm"),
    ("you are", "you're"),
    ("he is", "he's"),
    ("she is", "she's"),
    ("it is", "it's"),
    ("we are", "we're"),
    ("they are", "they're"),
    ("I have", "I've"),
    ("you have", "you've"),
    ("we have", "we've"),
    ("they have", "they've"),
    ("I will", "I'll"),
    ("you will", "you'll"),
    ("he will", "he'll"),
    ("she will", "she'll"),
    ("we will", "we'll"),
    ("they will", "they'll"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("what is", "what's"),
    ("who is", "who's"),
    ("where is", "where's"),
    ("when is", "when's"),
    ("why is", "why's"),
    ("how is", "how's"),
];

/// Generic openers. Empty entries weight the draw towards "no opener".
pub const NATURAL_STARTERS: &[&str] = &[
    "",
    "Honestly,",
    "Real talk -",
    "Ngl,",
    "Tbh,",
    "Yeah,",
    "So,",
    "Look,",
    "",
    "",
    "",
];

pub const NATURAL_FILLERS: &[&str] = &[
    "kinda",
    "sorta",
    "pretty much",
    "basically",
    "honestly",
    "actually",
    "really",
    "just",
];

pub const CASUAL_EMOJIS: &[&str] = &["💯", "🎯", "👏", "💪", "🔥"];
