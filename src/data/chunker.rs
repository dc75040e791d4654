// ============================================================
// Layer 4 — Token Chunker
// ============================================================
// Splits a long token stream into overlapping windows so each
// window fits the classifier's input length.
//
// Sliding window with overlap:
//   - Each window holds at most `max_tokens` tokens
//   - Consecutive windows share `stride` tokens
//   - The window start advances by step = max_tokens - stride
//   - Chunking stops at the first window that reaches the end,
//     so the last window may be short
//
// Example with max_tokens=5, stride=2 (step=3):
//   Tokens:   A B C D E F G H I J
//   Chunk 1:  A B C D E            (positions 0-4)
//   Chunk 2:        D E F G H      (positions 3-7)
//   Chunk 3:              G H I J  (positions 6-9)
//
// Taking the first `step` tokens of every chunk but the last, plus
// the whole last chunk, gives back the input exactly.

use crate::domain::error::DetectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    /// Maximum number of tokens per chunk
    max_tokens: usize,
    /// Number of tokens shared between adjacent chunks
    stride: usize,
}

impl Chunker {
    /// Create a new Chunker.
    ///
    /// Fails if `stride >= max_tokens`: the window would never advance.
    pub fn new(max_tokens: usize, stride: usize) -> Result<Self, DetectError> {
        if max_tokens == 0 || stride >= max_tokens {
            return Err(DetectError::InvalidChunking { max_tokens, stride });
        }
        Ok(Self { max_tokens, stride })
    }

    /// How far the window start moves between chunks
    pub fn step(&self) -> usize {
        self.max_tokens - self.stride
    }

    /// Split a token slice into ordered, overlapping windows.
    ///
    /// An empty slice is an `EmptyInput` error: there would be no chunk
    /// to score and no average to take.
    pub fn chunk<'a, T>(&self, tokens: &'a [T]) -> Result<Vec<&'a [T]>, DetectError> {
        if tokens.is_empty() {
            return Err(DetectError::EmptyInput);
        }

        let mut chunks = Vec::with_capacity(self.num_chunks(tokens.len()));
        let mut start = 0;
        loop {
            let end = (start + self.max_tokens).min(tokens.len());
            chunks.push(&tokens[start..end]);
            if end == tokens.len() {
                break;
            }
            start += self.step();
        }
        Ok(chunks)
    }

    /// Returns how many chunks a stream of `token_count` tokens produces
    pub fn num_chunks(&self, token_count: usize) -> usize {
        match token_count {
            0 => 0,
            n if n <= self.max_tokens => 1,
            n => 1 + (n - self.max_tokens).div_ceil(self.step()),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    /// Rebuild the stream from each chunk's non-overlapping prefix
    fn reconstruct(chunker: &Chunker, chunks: &[&[usize]]) -> Vec<usize> {
        let (last, rest) = chunks.split_last().unwrap();
        let mut out: Vec<usize> = rest
            .iter()
            .flat_map(|c| c[..chunker.step()].iter().copied())
            .collect();
        out.extend_from_slice(last);
        out
    }

    #[test]
    fn test_basic_chunking() {
        let c      = Chunker::new(5, 2).unwrap();
        let toks   = tokens(10);
        let chunks = c.chunk(&toks).unwrap();

        assert_eq!(chunks[0], &[0, 1, 2, 3, 4]);
        assert_eq!(chunks[1], &[3, 4, 5, 6, 7]);
        assert_eq!(chunks[2], &[6, 7, 8, 9]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.len(), c.num_chunks(toks.len()));
    }

    #[test]
    fn test_no_chunk_after_the_end_is_reached() {
        let c = Chunker::new(5, 2).unwrap();
        for n in 1..60 {
            let toks   = tokens(n);
            let chunks = c.chunk(&toks).unwrap();
            assert_eq!(chunks.len(), c.num_chunks(n), "n = {n}");
            // only the final window touches the last token
            let touching = chunks.iter().filter(|ch| ch.last() == Some(&(n - 1))).count();
            assert_eq!(touching, 1, "n = {n}");
        }
    }

    #[test]
    fn test_overlap_is_correct() {
        let c      = Chunker::new(4, 2).unwrap();
        let toks   = tokens(6);
        let chunks = c.chunk(&toks).unwrap();

        for pair in chunks.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.len() == 4 {
                assert_eq!(&prev[2..], &next[..2.min(next.len())]);
            }
        }
    }

    #[test]
    fn test_short_text_gives_one_chunk() {
        let c = Chunker::new(300, 50).unwrap();
        for n in 1..=300 {
            let toks = tokens(n);
            let chunks = c.chunk(&toks).unwrap();
            assert_eq!(chunks.len(), 1, "n = {n}");
            assert_eq!(chunks[0].len(), n);
        }
    }

    #[test]
    fn test_prefixes_reconstruct_tokens() {
        for (max_tokens, stride) in [(5, 2), (4, 3), (7, 0), (300, 50), (3, 1)] {
            let c = Chunker::new(max_tokens, stride).unwrap();
            for n in 1..40 {
                let toks   = tokens(n);
                let chunks = c.chunk(&toks).unwrap();
                assert_eq!(reconstruct(&c, &chunks), toks, "max={max_tokens} stride={stride} n={n}");
                assert!(chunks.iter().all(|ch| ch.len() <= max_tokens));
            }
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let c = Chunker::new(5, 2).unwrap();
        let empty: Vec<u32> = Vec::new();
        assert!(matches!(c.chunk(&empty), Err(DetectError::EmptyInput)));
        assert_eq!(c.num_chunks(0), 0);
    }

    #[test]
    fn test_stride_must_be_less_than_max_tokens() {
        assert!(matches!(
            Chunker::new(5, 5),
            Err(DetectError::InvalidChunking { max_tokens: 5, stride: 5 })
        ));
        assert!(Chunker::new(0, 0).is_err());
    }
}
