//! Overlapping text splitter.
//!
//! Splits a document body into windows of at most `chunk_size` characters,
//! each subsequent window starting `chunk_size - overlap` characters after
//! the previous one's start. Window ends prefer natural boundaries
//! (paragraph, then sentence, then word) when one exists past the next
//! window's start, so consecutive chunks always cover the text with no gaps.
//!
//! Chunks are ephemeral: the answer pipeline rebuilds them on every request.

use crate::models::Chunk;

/// Split text into overlapping chunks. `overlap` must be smaller than
/// `chunk_size` (enforced at config load); the stride is clamped to >= 1
/// so malformed inputs still terminate.
///
/// Text no longer than one window yields exactly one chunk equal to the
/// input.
pub fn split_text(document_id: &str, text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let stride = chunk_size.saturating_sub(overlap).max(1);

    if total <= chunk_size {
        return vec![make_chunk(document_id, 0, 0, total, text.to_string())];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut index: i64 = 0;

    loop {
        let hard_end = (start + chunk_size).min(total);
        let end = if hard_end < total {
            // The snapped end must stay past the next window's start so
            // coverage is never broken.
            snap_end(&chars, start + stride + 1, hard_end)
        } else {
            hard_end
        };

        let piece: String = chars[start..end].iter().collect();
        chunks.push(make_chunk(document_id, index, start, end, piece));
        index += 1;

        if hard_end >= total {
            break;
        }
        start += stride;
    }

    chunks
}

/// Picks the best end position in `[min_end, hard_end]`: the latest
/// paragraph break, else sentence end, else word break, else `hard_end`.
fn snap_end(chars: &[char], min_end: usize, hard_end: usize) -> usize {
    if min_end >= hard_end {
        return hard_end;
    }

    // Paragraph boundary: end just after "\n\n".
    for e in (min_end..=hard_end).rev() {
        if e >= 2 && chars[e - 1] == '\n' && chars[e - 2] == '\n' {
            return e;
        }
    }
    // Sentence boundary: punctuation followed by whitespace, or a newline.
    for e in (min_end..=hard_end).rev() {
        let last = chars[e - 1];
        if last == '\n' {
            return e;
        }
        if e >= 2 && last.is_whitespace() && matches!(chars[e - 2], '.' | '!' | '?') {
            return e;
        }
    }
    // Word boundary.
    for e in (min_end..=hard_end).rev() {
        if chars[e - 1].is_whitespace() {
            return e;
        }
    }
    hard_end
}

fn make_chunk(document_id: &str, index: i64, start: usize, end: usize, text: String) -> Chunk {
    Chunk {
        document_id: document_id.to_string(),
        chunk_index: index,
        start,
        end,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the original text from chunk spans by dropping each chunk's
    /// overlap with its predecessor.
    fn reconstruct(chunks: &[Chunk]) -> String {
        let mut out = String::new();
        let mut covered = 0usize;
        for c in chunks {
            let skip = covered.saturating_sub(c.start);
            out.extend(c.text.chars().skip(skip));
            covered = c.end;
        }
        out
    }

    #[test]
    fn short_text_single_chunk() {
        let chunks = split_text("doc1", "Hello, world!", 1000, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello, world!");
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[0].end, 13);
    }

    #[test]
    fn empty_text_single_chunk() {
        let chunks = split_text("doc1", "", 1000, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "");
    }

    #[test]
    fn text_exactly_chunk_size_single_chunk() {
        let text = "a".repeat(100);
        let chunks = split_text("doc1", &text, 100, 20);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn chunks_respect_max_length() {
        let text = "word ".repeat(400);
        let chunks = split_text("doc1", &text, 100, 20);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.text.chars().count() <= 100, "chunk too long: {}", c.text.len());
        }
    }

    #[test]
    fn stride_is_chunk_size_minus_overlap() {
        let text = "x".repeat(1000);
        let chunks = split_text("doc1", &text, 100, 30);
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start - pair[0].start, 70);
        }
    }

    #[test]
    fn indices_contiguous_from_zero() {
        let text = "word ".repeat(300);
        let chunks = split_text("doc1", &text, 120, 40);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i as i64);
        }
    }

    #[test]
    fn consecutive_chunks_never_leave_gaps() {
        let text = "Sentence one. Sentence two. Sentence three. ".repeat(50);
        let chunks = split_text("doc1", &text, 100, 25);
        for pair in chunks.windows(2) {
            assert!(
                pair[1].start <= pair[0].end,
                "gap between chunks {} and {}",
                pair[0].chunk_index,
                pair[1].chunk_index
            );
        }
    }

    #[test]
    fn reconstruction_recovers_original_text() {
        let text =
            "First paragraph with some words.\n\nSecond paragraph, a bit longer than the first one.\n\nThird paragraph closes it out. The end is near. Final sentence here."
                .repeat(8);
        let chunks = split_text("doc1", &text, 120, 30);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn reconstruction_with_multibyte_chars() {
        let text = "Héllo wörld. Ünïcode tëxt hère. ".repeat(40);
        let chunks = split_text("doc1", &text, 80, 16);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn prefers_paragraph_boundary() {
        let para1 = "a".repeat(30);
        let para2 = "b".repeat(40);
        let text = format!("{}\n\n{}", para1, para2);
        // stride 30, window 40: the paragraph break at char 32 is eligible.
        let chunks = split_text("doc1", &text, 40, 10);
        assert!(chunks[0].text.ends_with("\n\n"));
    }

    #[test]
    fn unbreakable_text_hard_cuts() {
        let text = "z".repeat(250);
        let chunks = split_text("doc1", &text, 100, 0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text.len(), 100);
        assert_eq!(chunks[2].text.len(), 50);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn deterministic() {
        let text = "Alpha beta gamma delta. ".repeat(30);
        let a = split_text("doc1", &text, 90, 20);
        let b = split_text("doc1", &text, 90, 20);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.text, y.text);
            assert_eq!((x.start, x.end), (y.start, y.end));
        }
    }
}
