use std::io::{self, Write};

use crate::vocabulary::Vocabulary;

/// Writes words by descending frequency, one per line, and returns how many
/// were written. Nothing at all is written for an empty vocabulary.
pub fn write_words<W: Write>(vocabulary: &Vocabulary, mut sink: W) -> io::Result<usize> {
    let ranked = vocabulary.ranked();
    for (word, _) in &ranked {
        writeln!(sink, "{word}")?;
    }
    sink.flush()?;
    Ok(ranked.len())
}
