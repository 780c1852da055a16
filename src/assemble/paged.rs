//! Paged layout.

use crate::model::{DocumentOutput, PageResult};

/// Paged output. Every page keeps its section, empty pages included.
pub fn paged(pages: Vec<PageResult>) -> DocumentOutput {
    DocumentOutput::Paged(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pages_keep_their_header() {
        let pages = (1..=4)
            .map(|n| PageResult::new(n, if n == 2 { "" } else { "Text." }))
            .collect();
        let rendered = paged(pages).render();
        for n in 1..=4 {
            assert!(rendered.contains(&format!("=== Page {} ===", n)));
        }
        assert_eq!(rendered.matches("=== Page").count(), 4);
    }
}
