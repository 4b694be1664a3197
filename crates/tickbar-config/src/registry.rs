//! Tracked symbol registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Exchange routing for a tracked symbol, as the market-data feed expects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Exchange segment code.
    pub exchange_type: u8,
    /// Feed token for the symbol.
    pub token: String,
}

impl SymbolEntry {
    /// Creates a new symbol entry.
    #[must_use]
    pub fn new(exchange_type: u8, token: impl Into<String>) -> Self {
        Self {
            exchange_type,
            token: token.into(),
        }
    }
}

/// Symbols the aggregator should track, keyed by instrument identifier.
///
/// Identifiers are opaque and matched case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolRegistry {
    symbols: BTreeMap<String, SymbolEntry>,
}

impl SymbolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            symbols: BTreeMap::new(),
        }
    }

    /// Adds or replaces a symbol, returning the previous entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.symbols.insert(name.into(), entry)
    }

    /// Looks up a symbol by identifier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.symbols.get(name)
    }

    /// Returns true if the symbol is tracked.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Returns the first symbol whose feed token matches.
    #[must_use]
    pub fn by_token(&self, token: &str) -> Option<&str> {
        self.symbols
            .iter()
            .find(|(_, entry)| entry.token == token)
            .map(|(name, _)| name.as_str())
    }

    /// Iterates over symbols in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> {
        self.symbols.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Iterates over symbol identifiers in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// Returns the number of tracked symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbols are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<(String, SymbolEntry)> for SymbolRegistry {
    fn from_iter<I: IntoIterator<Item = (String, SymbolEntry)>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}
