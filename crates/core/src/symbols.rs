use crate::RngState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type SymbolId = usize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    Normal,
    Bonus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolDef {
    pub id: SymbolId,
    pub key: String,
    pub display_name: String,
    pub value: i64,
    pub weight: u32,
    #[serde(default)]
    pub bonus_weight: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub names: HashMap<String, String>,
}

impl SymbolDef {
    pub fn new(id: SymbolId, key: &str, display_name: &str, value: i64, weight: u32) -> Self {
        Self {
            id,
            key: key.to_string(),
            display_name: display_name.to_string(),
            value,
            weight,
            bonus_weight: weight,
            names: HashMap::new(),
        }
    }

    pub fn with_bonus_weight(mut self, weight: u32) -> Self {
        self.bonus_weight = weight;
        self
    }

    pub fn with_name(mut self, locale: &str, name: &str) -> Self {
        self.names.insert(locale.to_string(), name.to_string());
        self
    }
}

/// Symbols indexed by id. Weight tables are cached per draw mode.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<SymbolDef>,
    normal_weights: Vec<u32>,
    bonus_weights: Vec<u32>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<SymbolDef>) -> Self {
        let normal_weights = symbols.iter().map(|s| s.weight).collect();
        let bonus_weights = symbols.iter().map(|s| s.bonus_weight).collect();
        Self {
            symbols,
            normal_weights,
            bonus_weights,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolDef> {
        self.symbols.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolDef> {
        self.symbols.iter()
    }

    pub fn value(&self, id: SymbolId) -> i64 {
        self.symbols.get(id).map(|s| s.value).unwrap_or(0)
    }

    pub fn name(&self, id: SymbolId) -> &str {
        self.symbols
            .get(id)
            .map(|s| s.display_name.as_str())
            .unwrap_or("?")
    }

    pub fn weights(&self, mode: DrawMode) -> &[u32] {
        match mode {
            DrawMode::Normal => &self.normal_weights,
            DrawMode::Bonus => &self.bonus_weights,
        }
    }

    pub fn draw(&self, mode: DrawMode, rng: &mut RngState) -> SymbolId {
        rng.weighted_index(self.weights(mode))
    }

    /// Ids of the `count` highest-value symbols, best first.
    pub fn top_by_value(&self, count: usize) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = (0..self.symbols.len()).collect();
        ids.sort_by(|a, b| self.value(*b).cmp(&self.value(*a)).then(b.cmp(a)));
        ids.truncate(count);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![
            SymbolDef::new(0, "ball", "Blue Ball", 10, 50).with_bonus_weight(5),
            SymbolDef::new(1, "bell", "Bell", 20, 35),
            SymbolDef::new(2, "seven", "Seven", 300, 1).with_bonus_weight(40),
        ])
    }

    #[test]
    fn lookups_by_id() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(1), 20);
        assert_eq!(table.name(2), "Seven");
        assert_eq!(table.value(99), 0);
        assert_eq!(table.name(99), "?");
    }

    #[test]
    fn weight_tables_follow_mode() {
        let table = table();
        assert_eq!(table.weights(DrawMode::Normal), &[50, 35, 1]);
        assert_eq!(table.weights(DrawMode::Bonus), &[5, 35, 40]);
    }

    #[test]
    fn top_by_value_orders_descending() {
        assert_eq!(table().top_by_value(2), vec![2, 1]);
    }
}
