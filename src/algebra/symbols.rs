use smol_str::SmolStr;
use std::collections::HashMap;

/// A case-sensitive list of auxiliary quantity names, numbered in the order
/// they were first inserted (`0, 1, 2, ...`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolTable {
    names: Vec<SmolStr>,
    offsets: HashMap<SmolStr, usize>,
}

impl SymbolTable {
    pub fn new() -> Self { SymbolTable::default() }

    /// Register a new name, returning `true` if it was assigned the next
    /// offset.
    ///
    /// Empty names and names which are already present are rejected.
    pub fn insert(&mut self, name: &str) -> bool {
        if name.is_empty() || self.offsets.contains_key(name) {
            return false;
        }

        let name = SmolStr::from(name);
        self.offsets.insert(name.clone(), self.names.len());
        self.names.push(name);

        true
    }

    /// Get the offset a name was registered with.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    /// The name registered at a particular offset.
    pub fn name(&self, offset: usize) -> Option<&str> {
        self.names.get(offset).map(|name| name.as_str())
    }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn clear(&mut self) {
        self.names.clear();
        self.offsets.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|name| name.as_str())
    }
}

impl<'a> std::iter::FromIterator<&'a str> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = SymbolTable::new();

        for name in iter {
            table.insert(name);
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_never_inserted() {
        let mut table = SymbolTable::new();

        assert!(!table.insert(""));
        assert!(table.lookup("").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn duplicates_keep_their_original_offset() {
        let mut table = SymbolTable::new();

        assert!(table.insert("123"));
        assert!(table.insert("abc"));
        assert!(!table.insert("abc"));
        assert!(table.insert("def"));

        assert_eq!(table.lookup("abc"), Some(1));
        assert_eq!(table.lookup("def"), Some(2));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn offsets_follow_insertion_order() {
        let mut table = SymbolTable::new();

        for name in &["abc", "", "d", "e", "!"] {
            table.insert(name);
        }

        assert_eq!(table.lookup("abc"), Some(0));
        assert_eq!(table.lookup("d"), Some(1));
        assert_eq!(table.lookup("!"), Some(3));
        assert_eq!(table.name(2), Some("e"));
        assert_eq!(table.name(4), None);
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let table: SymbolTable = vec!["abc", "d", "aBc"].into_iter().collect();

        assert!(table.lookup("abC").is_none());
        assert_eq!(table.lookup("aBc"), Some(2));
    }

    #[test]
    fn clearing_restarts_numbering() {
        let mut table: SymbolTable =
            vec!["012", "abc", "def"].into_iter().collect();
        assert_eq!(table.lookup("abc"), Some(1));

        table.clear();

        assert!(table.insert("abc"));
        assert_eq!(table.lookup("abc"), Some(0));
    }
}
