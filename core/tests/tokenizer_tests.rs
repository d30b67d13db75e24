use marketsearch_core::tokenizer::analyze;

#[test]
fn it_normalizes_and_stems() {
    let words = analyze("The Quick, Brown Foxes!");
    assert!(words.contains(&"quick".to_string()));
    assert!(words.contains(&"brown".to_string()));
    assert!(words.contains(&"fox".to_string()));
    assert!(!words.contains(&"the".to_string()));
    assert_eq!(words.len(), 3);
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazi", "dog"]);
}

#[test]
fn it_keeps_order_and_duplicates() {
    let words = analyze("Running Runners RUN!");
    assert_eq!(words, vec!["run", "runner", "run"]);
}

#[test]
fn it_folds_compatibility_forms() {
    // full-width letters and the "ﬁ" ligature fold under NFKC
    let words = analyze("ＳＯＡＰ ﬁlter");
    assert_eq!(words, vec!["soap", "filter"]);
}

#[test]
fn it_splits_unicode_text() {
    let words = analyze("crème-brûlée, 12oz");
    assert_eq!(words.len(), 3);
    assert!(words[0].starts_with("cr"));
    assert_eq!(words[2], "12oz");
}
