/// Suppresses translations identical to the last one spoken
#[derive(Debug, Default)]
pub struct DedupFilter {
    last: Option<String>,
}

impl DedupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `text` is non-empty and differs from the remembered text.
    /// Does not remember anything.
    pub fn is_fresh(&self, text: &str) -> bool {
        !text.is_empty() && self.last.as_deref() != Some(text)
    }

    /// Check and remember in one step
    pub fn accept(&mut self, text: &str) -> bool {
        if !self.is_fresh(text) {
            return false;
        }
        self.last = Some(text.to_string());
        true
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_text() {
        let mut filter = DedupFilter::new();
        assert!(!filter.accept(""));
        assert_eq!(filter.last(), None);
    }

    #[test]
    fn test_rejects_repeat() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept("bonjour"));
        assert!(!filter.accept("bonjour"));
        assert_eq!(filter.last(), Some("bonjour"));
    }

    #[test]
    fn test_accepts_text_seen_before_but_not_last() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept("bonjour"));
        assert!(filter.accept("salut"));
        assert!(filter.accept("bonjour"));
    }

    #[test]
    fn test_is_fresh_does_not_remember() {
        let filter = DedupFilter::new();
        assert!(filter.is_fresh("bonjour"));
        assert_eq!(filter.last(), None);
    }
}
