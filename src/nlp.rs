//! Seams for the NLP collaborators, plus the rule-based stand-ins the
//! binary ships with.
//!
//! The counting engine only depends on the two traits here. Wire in a
//! real sentence tokenizer or noun-chunk model by implementing them;
//! the built-in [`RuleSegmenter`] and [`CapitalizedPhraseExtractor`]
//! are pragmatic heuristics that work well for country names, which
//! are capitalized in running English text.

/// Splits raw document text into an ordered sequence of sentences.
pub trait SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Extracts the surface text of each noun phrase from a text span.
pub trait PhraseExtractor {
    fn extract(&self, span: &str) -> Vec<String>;
}

/// Sentence splitting on terminator punctuation followed by
/// whitespace, with a small guard for initials and titles so
/// "the U.S. economy" stays in one sentence. Blank lines also end a
/// sentence. Not a linguistic model.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\n' {
                if matches!(chars.peek(), Some('\n')) {
                    flush(&mut sentences, &mut current);
                } else {
                    current.push(' ');
                }
                continue;
            }
            current.push(c);
            if matches!(c, '.' | '!' | '?')
                && chars.peek().is_none_or(|next| next.is_whitespace())
                && !(c == '.' && ends_in_abbreviation(&current))
            {
                flush(&mut sentences, &mut current);
            }
        }
        flush(&mut sentences, &mut current);
        sentences
    }
}

fn flush(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_owned());
    }
    current.clear();
}

/// True if the text ends with something like "U.", "U.S." or "Mr.",
/// where the dot is part of the word rather than a sentence end.
fn ends_in_abbreviation(text: &str) -> bool {
    let body = text.strip_suffix('.').unwrap_or(text);
    let Some(word) = body.split_whitespace().next_back() else {
        return false;
    };
    let core = word.rsplit('.').find(|part| !part.is_empty()).unwrap_or("");
    (core.len() == 1 && core.chars().all(char::is_uppercase))
        || matches!(core, "Mr" | "Mrs" | "Ms" | "Dr" | "Prof" | "St" | "vs")
}

/// Emits maximal runs of capitalized tokens as noun phrases, keeping
/// a lowercase "of" inside a run so "United States of America" comes
/// out whole. Edge punctuation and possessive suffixes are trimmed
/// from each token.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapitalizedPhraseExtractor;

impl PhraseExtractor for CapitalizedPhraseExtractor {
    fn extract(&self, span: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut held_of = false;
        for raw in span.split_whitespace() {
            let token = trim_token(raw);
            if !token.is_empty() && is_capitalized(token) {
                if held_of {
                    run.push("of");
                    held_of = false;
                }
                run.push(token);
            } else if !run.is_empty() && !held_of && token == "of" {
                held_of = true;
            } else {
                held_of = false;
                flush_run(&mut phrases, &mut run);
            }
        }
        flush_run(&mut phrases, &mut run);
        phrases
    }
}

fn flush_run(phrases: &mut Vec<String>, run: &mut Vec<&str>) {
    if !run.is_empty() {
        phrases.push(run.join(" "));
        run.clear();
    }
}

/// First alphabetic character is uppercase ("France", "USA").
fn is_capitalized(token: &str) -> bool {
    token
        .chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}

fn trim_token(raw: &str) -> &str {
    let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
    token
        .strip_suffix("'s")
        .or_else(|| token.strip_suffix("’s"))
        .unwrap_or(token)
}
