//! Fixed term lists for pattern-based recognition.

/// Entity label emitted for satellite gazetteer hits
pub const LABEL_SATELLITES: &str = "SATELLITES";
pub const LABEL_DATA_PRODUCTS: &str = "DATA_PRODUCTS";
pub const LABEL_SERVICES: &str = "SERVICES";
pub const LABEL_TECHNICAL_TERMS: &str = "TECHNICAL_TERMS";

/// Domain categories in match order.
pub const DOMAIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        LABEL_SATELLITES,
        &[
            "INSAT",
            "OCEANSAT",
            "CARTOSAT",
            "RESOURCESAT",
            "RISAT",
            "SARAL",
            "SCATSAT",
            "MEGHA-TROPIQUES",
            "ASTROSAT",
        ],
    ),
    (
        LABEL_DATA_PRODUCTS,
        &[
            "SST",
            "Sea Surface Temperature",
            "Chlorophyll",
            "Wind Speed",
            "Significant Wave Height",
            "Bathymetry",
            "Land Cover",
            "NDVI",
            "Ocean Color",
            "Altimetry",
        ],
    ),
    (
        LABEL_SERVICES,
        &[
            "Data Download",
            "Visualization",
            "API",
            "Subsetting",
            "Time Series",
            "Animation",
            "Browse Products",
        ],
    ),
    (
        LABEL_TECHNICAL_TERMS,
        &[
            "NetCDF",
            "HDF",
            "GeoTIFF",
            "WMS",
            "WCS",
            "OGC",
            "Metadata",
            "Projection",
            "Coordinate System",
        ],
    ),
];

/// Place names recognised as `GPE`.
pub const LOCATIONS: &[&str] = &[
    "India",
    "Indian Ocean",
    "Arabian Sea",
    "Bay of Bengal",
    "Andaman Sea",
    "Ahmedabad",
    "Bengaluru",
    "Bangalore",
    "Hyderabad",
    "Sriharikota",
    "Thiruvananthapuram",
    "New Delhi",
    "Himalayas",
    "Antarctica",
];

/// Organisations recognised as `ORG` without a suffix cue.
pub const ORGANIZATIONS: &[&str] = &[
    "ISRO", "MOSDAC", "SAC", "NRSC", "INCOIS", "IMD", "NCMRWF", "NASA", "NOAA", "ESA",
    "EUMETSAT", "CNES", "JAXA",
];

/// Words that terminate an organisation name ("Space Applications Centre").
pub const ORGANIZATION_SUFFIXES: &[&str] = &[
    "Organisation",
    "Organization",
    "Centre",
    "Center",
    "Agency",
    "Institute",
    "Department",
    "Administration",
    "Ministry",
    "University",
    "Laboratory",
];

/// Too common to be a relationship endpoint.
pub const COMMON_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "this", "that", "these", "those", "is", "are", "was", "were", "be", "been", "have", "has",
    "had", "do", "does", "did", "will", "would", "could", "should", "may", "might", "can",
];

/// Words skipped when walking from a verb to its subject or object.
pub const FILLER_WORDS: &[&str] = &[
    "also", "now", "currently", "primarily", "mainly", "regularly", "routinely", "only",
    "all", "its", "their", "our", "various", "several", "many", "new", "it", "they", "we",
];

/// Verb surface forms and their lemmas, for subject-verb-object matching.
pub const VERB_LEMMAS: &[(&str, &str)] = &[
    ("provides", "provide"),
    ("provided", "provide"),
    ("offers", "offer"),
    ("generates", "generate"),
    ("generated", "generate"),
    ("operates", "operate"),
    ("operated", "operate"),
    ("distributes", "distribute"),
    ("disseminates", "disseminate"),
    ("archives", "archive"),
    ("launched", "launch"),
    ("launches", "launch"),
    ("hosts", "host"),
    ("supports", "support"),
    ("produces", "produce"),
    ("produced", "produce"),
    ("measures", "measure"),
    ("monitors", "monitor"),
    ("observes", "observe"),
    ("covers", "cover"),
    ("carries", "carry"),
    ("includes", "include"),
    ("contains", "contain"),
    ("uses", "use"),
    ("processes", "process"),
    ("processed", "process"),
    ("delivers", "deliver"),
    ("acquires", "acquire"),
    ("tracks", "track"),
    ("manages", "manage"),
    ("develops", "develop"),
    ("developed", "develop"),
    ("maintains", "maintain"),
];

/// English stopwords excluded from keyword extraction.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "around", "as", "at", "be", "became", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "call", "can", "cannot", "could", "did", "do", "does",
    "doing", "done", "down", "during", "each", "either", "else", "enough", "even", "every",
    "few", "for", "from", "further", "get", "give", "go", "had", "has", "have", "having", "he",
    "her", "here", "hers", "him", "his", "how", "however", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "keep", "last", "least", "less", "made", "make", "many", "may",
    "me", "might", "more", "most", "much", "must", "my", "neither", "never", "next", "no",
    "nor", "not", "nothing", "now", "of", "off", "often", "on", "once", "one", "only", "or",
    "other", "our", "ours", "out", "over", "own", "part", "per", "please", "put", "quite",
    "rather", "really", "regarding", "same", "say", "see", "seem", "several", "she", "should",
    "show", "side", "since", "so", "some", "still", "such", "take", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "though", "through",
    "thus", "to", "together", "too", "toward", "under", "until", "up", "upon", "us", "used",
    "using", "various", "very", "via", "was", "we", "well", "were", "what", "when", "where",
    "whether", "which", "while", "who", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours",
];

pub fn is_common_word(word: &str) -> bool {
    word.chars().count() < 2 || COMMON_WORDS.contains(&word.to_lowercase().as_str())
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

pub fn verb_lemma(word: &str) -> Option<&'static str> {
    let lower = word.to_lowercase();
    VERB_LEMMAS
        .iter()
        .find(|(form, _)| *form == lower)
        .map(|(_, lemma)| *lemma)
}
