use std::collections::HashSet;

/// Listing URLs already captured during this run, across every category.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and remembers `id` the first time it is offered,
    /// false on every later call.
    pub fn check_and_mark(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_accepted_once() {
        let mut visited = VisitedSet::new();
        assert!(visited.check_and_mark("https://example.com/listings/1"));
        assert!(!visited.check_and_mark("https://example.com/listings/1"));
        assert!(visited.check_and_mark("https://example.com/listings/2"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn empty_until_marked() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());
        visited.check_and_mark("a");
        assert!(!visited.is_empty());
    }
}
