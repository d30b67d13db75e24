use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(word: &str) -> bool {
    let core = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .replace('\u{2019}', "'")
        .to_lowercase();
    STOPWORDS.contains(core.as_str())
}

/// Drop whitespace-delimited words that are English stopwords, ignoring case
/// and surrounding punctuation. Runs before tokenization so contractions like
/// "don't" are caught whole.
fn strip_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| !is_stopword(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on every character that is neither a letter nor a digit.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    RE.find_iter(text).map(|m| m.as_str())
}

/// Normalize text into search terms: NFKC, stopword removal, tokenization,
/// lowercasing and English stemming, in that order.
///
/// Stopwords glued to neighbours by punctuation ("fox/the/dog") only become
/// separate words after tokenization, so lowercased tokens are checked again.
///
/// Order is preserved and duplicates are kept; empty or all-stopword input
/// yields an empty vector.
pub fn analyze(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>();
    let cleaned = strip_stopwords(&normalized);
    tokenize(&cleaned)
        .map(str::to_lowercase)
        .filter(|token| !STOPWORDS.contains(token.as_str()))
        .map(|token| STEMMER.stem(&token).into_owned())
        .collect()
}
