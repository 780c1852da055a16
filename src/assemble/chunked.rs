//! Sentence-preserving chunking.

use crate::model::Chunk;
use crate::text::{segment, Sentence};

/// Default word target per chunk.
pub const DEFAULT_CHUNK_TARGET_WORDS: usize = 100;

/// Group the sentences of `text` into chunks of about `target_words` words.
///
/// A chunk is closed as soon as its word count exceeds the target, so it may
/// overshoot by one sentence. A sentence is never split and no chunk is empty.
pub fn chunk_text(text: &str, target_words: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<Sentence<'_>> = Vec::new();
    let mut words = 0usize;

    for sentence in segment(text) {
        words += sentence.word_count();
        current.push(sentence);
        if words > target_words {
            chunks.push(build_chunk(chunks.len(), &current, words));
            current.clear();
            words = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(build_chunk(chunks.len(), &current, words));
    }

    log::debug!(
        "Chunked {} words into {} chunks (target {})",
        chunks.iter().map(|c| c.word_count).sum::<usize>(),
        chunks.len(),
        target_words
    );
    chunks
}

fn build_chunk(index: usize, sentences: &[Sentence<'_>], word_count: usize) -> Chunk {
    let text = sentences
        .iter()
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join(" ");
    Chunk {
        index,
        text,
        word_count,
        sentence_count: sentences.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overshoot_by_one_sentence() {
        let text = "One two three four. Five six seven eight. Nine ten eleven twelve. \
                    Thirteen fourteen fifteen sixteen.";
        let chunks = chunk_text(text, 10);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].sentence_count, 3);
        assert_eq!(chunks[0].word_count, 12);
        assert_eq!(chunks[1].sentence_count, 1);
        assert_eq!(chunks[1].text, "Thirteen fourteen fifteen sixteen.");
    }

    #[test]
    fn test_long_sentence_is_its_own_chunk() {
        let text = "A very long sentence with many more words than the target allows. Short.";
        let chunks = chunk_text(text, 3);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].sentence_count, 1);
        assert_eq!(chunks[1].text, "Short.");
    }

    #[test]
    fn test_chunks_never_split_sentences() {
        let text = "Let f be continuous. Then f is bounded on [a, b]. By Thm. 2 it attains \
                    its maximum. See Fig. 3 for the graph. The proof is complete. \
                    Now consider g. It is 3.5 times larger";
        let whole: Vec<&str> = segment(text).iter().map(|s| s.text).collect();
        for target in 1..12 {
            let chunks = chunk_text(text, target);
            let rejoined: Vec<&str> = chunks
                .iter()
                .flat_map(|c| segment(&c.text).into_iter().map(|s| s.text).collect::<Vec<_>>())
                .collect();
            assert_eq!(rejoined, whole, "target {}", target);
            assert!(chunks.iter().all(|c| c.sentence_count > 0));
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, i);
            }
        }
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
    }
}
