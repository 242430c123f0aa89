//! Current findings per document.

use std::collections::HashMap;

use url::Url;

use crate::finding::Finding;

/// Findings keyed by document URI. Entries are replaced wholesale.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticsStore {
    entries: HashMap<Url, Vec<Finding>>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, uri: Url, findings: Vec<Finding>) {
        self.entries.insert(uri, findings);
    }

    /// Remove the entry for `uri`, returning what was stored
    pub fn clear(&mut self, uri: &Url) -> Option<Vec<Finding>> {
        self.entries.remove(uri)
    }

    pub fn get(&self, uri: &Url) -> Option<&[Finding]> {
        self.entries.get(uri).map(Vec::as_slice)
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.entries.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;

    fn uri(path: &str) -> Url {
        Url::from_file_path(path).unwrap()
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut store = DiagnosticsStore::new();
        let a = uri("/tmp/a.html");
        store.set(
            a.clone(),
            vec![Finding {
                severity: Severity::Error,
                line: 1,
                column: 2,
                message: "old".to_string(),
            }],
        );
        store.set(a.clone(), Vec::new());
        assert_eq!(store.get(&a), Some(&[][..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_removes_entry() {
        let mut store = DiagnosticsStore::new();
        let a = uri("/tmp/a.html");
        store.set(a.clone(), Vec::new());
        assert!(store.clear(&a).is_some());
        assert!(!store.contains(&a));
        assert!(store.is_empty());
        assert!(store.clear(&a).is_none());
    }
}
