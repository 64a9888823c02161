//! Registry of custom equality comparers.

use std::rc::Rc;

use crate::comparer::EqualityComparer;
use crate::comparers::dom_node_comparer;
use crate::error::{CompareError, CompareResult};

/// Registry of named equality comparers.
///
/// Comparers are consulted in registration order. The registry is an ordinary
/// value: construct one per suite (or share it through an `Rc`) and pass it to
/// comparisons explicitly.
#[derive(Debug, Clone)]
pub struct ComparerRegistry {
    comparers: Vec<Rc<EqualityComparer>>,
}

impl ComparerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            comparers: Vec::new(),
        }
    }

    /// Create a registry with the built-in comparers.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.comparers.push(Rc::new(dom_node_comparer()));
        registry
    }

    /// Register a comparer. Names must be unique.
    pub fn register(&mut self, comparer: EqualityComparer) -> CompareResult<()> {
        if self.get(comparer.name()).is_some() {
            return Err(CompareError::DuplicateComparer(comparer.name().to_string()));
        }
        log::debug!("Registered equality comparer '{}'", comparer.name());
        self.comparers.push(Rc::new(comparer));
        Ok(())
    }

    /// Remove a comparer by name, returning it if it was registered.
    pub fn unregister(&mut self, name: &str) -> Option<Rc<EqualityComparer>> {
        let index = self.comparers.iter().position(|c| c.name() == name)?;
        Some(self.comparers.remove(index))
    }

    /// Get a comparer by name.
    pub fn get(&self, name: &str) -> Option<&EqualityComparer> {
        self.comparers
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Names of the registered comparers, in consultation order.
    pub fn names(&self) -> Vec<&str> {
        self.comparers.iter().map(|c| c.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<EqualityComparer>> {
        self.comparers.iter()
    }

    /// Get the number of registered comparers.
    pub fn len(&self) -> usize {
        self.comparers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.comparers.is_empty()
    }
}

impl Default for ComparerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparers::DOM_NODE_COMPARER;

    fn named(name: &str) -> EqualityComparer {
        EqualityComparer::new(name, |_| Ok(false))
    }

    #[test]
    fn test_standard_has_dom_comparer() {
        let registry = ComparerRegistry::standard();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(DOM_NODE_COMPARER).is_some());
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = ComparerRegistry::new();
        assert!(registry.is_empty());

        registry.register(named("first")).unwrap();
        registry.register(named("second")).unwrap();
        assert_eq!(registry.names(), vec!["first", "second"]);
        assert!(registry.get("first").is_some());
        assert!(registry.get("third").is_none());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut registry = ComparerRegistry::new();
        registry.register(named("dup")).unwrap();

        let err = registry.register(named("dup")).unwrap_err();
        assert!(matches!(err, CompareError::DuplicateComparer(ref n) if n == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = ComparerRegistry::standard();
        registry.register(named("extra")).unwrap();

        let removed = registry.unregister(DOM_NODE_COMPARER).unwrap();
        assert_eq!(removed.name(), DOM_NODE_COMPARER);
        assert_eq!(registry.names(), vec!["extra"]);
        assert!(registry.unregister(DOM_NODE_COMPARER).is_none());
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(ComparerRegistry::default().len(), 1);
    }
}
