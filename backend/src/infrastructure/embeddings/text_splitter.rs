/// Fixed-window text splitting for embeddings
use crate::domain::value_objects::{ChunkUnit, ChunkingPolicy};

/// Splits text into fixed-size windows that overlap by a fixed amount.
///
/// Windows start at multiples of `size - overlap`, so every pair of adjacent
/// chunks shares exactly `overlap` units. Sizes are counted in characters
/// (Unicode scalar values) or in whitespace-separated words.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSplitter {
    policy: ChunkingPolicy,
}

impl TextSplitter {
    pub fn new(policy: ChunkingPolicy) -> Self {
        TextSplitter { policy }
    }

    pub fn policy(&self) -> ChunkingPolicy {
        self.policy
    }

    /// Split text into chunks. Blank text yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        match self.policy.unit() {
            ChunkUnit::Characters => {
                let chars: Vec<char> = text.chars().collect();
                self.windows(chars.len())
                    .map(|(start, end)| chars[start..end].iter().collect())
                    .collect()
            }
            ChunkUnit::Words => {
                let words: Vec<&str> = text.split_whitespace().collect();
                self.windows(words.len())
                    .map(|(start, end)| words[start..end].join(" "))
                    .collect()
            }
        }
    }

    /// `(start, end)` ranges of every window over `len` units
    fn windows(&self, len: usize) -> impl Iterator<Item = (usize, usize)> {
        let size = self.policy.size();
        let step = self.policy.step();
        let mut start = 0;
        let mut done = len == 0;

        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let end = (start + size).min(len);
            let window = (start, end);
            if end >= len {
                done = true;
            } else {
                start += step;
            }
            Some(window)
        })
    }
}
