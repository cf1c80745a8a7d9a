use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    HowTo,
    SearchData,
    WhatIs,
    WhereIs,
    WhenIs,
    Help,
    Information,
    General,
}

/// Trigger substrings per intent. The first intent with a matching trigger wins,
/// so "how do I download" is `HowTo` even though "download" is a search trigger.
const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (Intent::HowTo, &["how to", "how do", "how can", "steps to"]),
    (
        Intent::SearchData,
        &["find", "search", "look for", "get", "download", "access"],
    ),
    (Intent::WhatIs, &["what is", "what are", "define", "explain"]),
    (Intent::WhereIs, &["where is", "where can", "location of"]),
    (Intent::WhenIs, &["when is", "when did", "when will"]),
    (Intent::Help, &["help", "assist", "support", "trouble", "problem"]),
    (
        Intent::Information,
        &["information", "details", "about", "describe"],
    ),
];

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::HowTo => "how_to",
            Intent::SearchData => "search_data",
            Intent::WhatIs => "what_is",
            Intent::WhereIs => "where_is",
            Intent::WhenIs => "when_is",
            Intent::Help => "help",
            Intent::Information => "information",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_intent(query: &str) -> Intent {
    let query = query.to_lowercase();
    INTENT_TABLE
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| query.contains(t)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    What,
    How,
    Where,
    When,
    Why,
    Who,
    Question,
    Statement,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::What => "what",
            QuestionType::How => "how",
            QuestionType::Where => "where",
            QuestionType::When => "when",
            QuestionType::Why => "why",
            QuestionType::Who => "who",
            QuestionType::Question => "question",
            QuestionType::Statement => "statement",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn question_type(query: &str) -> QuestionType {
    let query = query.trim().to_lowercase();

    let prefixed = [
        (&["what", "which"][..], QuestionType::What),
        (&["how"][..], QuestionType::How),
        (&["where"][..], QuestionType::Where),
        (&["when"][..], QuestionType::When),
        (&["why"][..], QuestionType::Why),
        (&["who"][..], QuestionType::Who),
    ];

    for (words, kind) in prefixed {
        if words.iter().any(|w| query.starts_with(w)) {
            return kind;
        }
    }

    if query.contains('?') {
        QuestionType::Question
    } else {
        QuestionType::Statement
    }
}
