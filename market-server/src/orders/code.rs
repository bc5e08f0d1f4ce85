//! Human-readable order codes
//!
//! `<prefix><3 digits>`, e.g. `ORD042`. The allocator only proposes
//! candidates; uniqueness is decided by the unique index on insert.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct CodeAllocator {
    prefix: String,
}

impl CodeAllocator {
    pub const SPACE: u16 = 1000;

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Random candidate code
    pub fn candidate(&self) -> String {
        let n = rand::thread_rng().gen_range(0..Self::SPACE);
        self.format(n)
    }

    pub fn format(&self, n: u16) -> String {
        format!("{}{:03}", self.prefix, n)
    }

    /// A random code not in `taken`, or `None` once the space is full.
    /// Random rather than lowest-free so concurrent callers rarely collide.
    pub fn pick_free(&self, taken: &HashSet<String>) -> Option<String> {
        let free: Vec<u16> = (0..Self::SPACE)
            .filter(|n| !taken.contains(&self.format(*n)))
            .collect();
        free.choose(&mut rand::thread_rng()).map(|n| self.format(*n))
    }
}

impl Default for CodeAllocator {
    fn default() -> Self {
        Self::new("ORD")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_shape() {
        let codes = CodeAllocator::default();
        for _ in 0..200 {
            let code = codes.candidate();
            assert_eq!(code.len(), 6);
            assert!(code.starts_with("ORD"));
            assert!(code[3..].bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_zero_padding() {
        let codes = CodeAllocator::new("ORD");
        assert_eq!(codes.format(7), "ORD007");
        assert_eq!(codes.format(999), "ORD999");
    }

    #[test]
    fn test_pick_free_finds_the_last_gap() {
        let codes = CodeAllocator::new("ORD");
        let mut taken: HashSet<String> = (0..CodeAllocator::SPACE)
            .filter(|n| *n != 500)
            .map(|n| codes.format(n))
            .collect();
        assert_eq!(codes.pick_free(&taken).as_deref(), Some("ORD500"));

        taken.insert("ORD500".into());
        assert_eq!(codes.pick_free(&taken), None);
    }
}
