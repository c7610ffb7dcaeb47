use words_crawler::{write_words, Vocabulary};

#[test]
fn increment_counts_occurrences() {
    let mut vocabulary = Vocabulary::new();
    vocabulary.increment("cat");
    vocabulary.increment("dog");
    vocabulary.increment("cat");

    assert_eq!(Some(2), vocabulary.count("cat"));
    assert_eq!(Some(1), vocabulary.count("dog"));
    assert_eq!(None, vocabulary.count("fish"));
    assert_eq!(2, vocabulary.len());
}

#[test]
fn ranked_by_descending_count() {
    let mut vocabulary = Vocabulary::new();
    for (word, count) in [("dog", 2), ("cat", 5), ("fish", 5)] {
        for _ in 0..count {
            vocabulary.increment(word);
        }
    }

    let ranked = vocabulary.ranked();
    assert_eq!(vec![("cat", 5), ("fish", 5), ("dog", 2)], ranked);
}

#[test]
fn ties_keep_first_seen_order() {
    let vocabulary = ["zebra", "apple", "mango", "apple", "zebra", "mango"]
        .into_iter()
        .collect::<Vocabulary>();

    let words = vocabulary
        .ranked()
        .into_iter()
        .map(|(w, _)| w)
        .collect::<Vec<_>>();
    assert_eq!(vec!["zebra", "apple", "mango"], words);
}

#[test]
fn write_one_word_per_line() {
    let vocabulary = ["dog", "cat", "cat", "fish", "cat", "fish"]
        .into_iter()
        .collect::<Vocabulary>();

    let mut out = Vec::new();
    let written = write_words(&vocabulary, &mut out).unwrap();

    assert_eq!(3, written);
    assert_eq!("cat\nfish\ndog\n", String::from_utf8(out).unwrap());
}

#[test]
fn write_nothing_when_empty() {
    let mut out = Vec::new();
    let written = write_words(&Vocabulary::new(), &mut out).unwrap();

    assert_eq!(0, written);
    assert!(out.is_empty());
}
