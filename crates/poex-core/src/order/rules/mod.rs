//! Pattern rules and claim bookkeeping for item block extraction.

pub mod patterns;

pub use patterns::*;

use std::collections::BTreeMap;

use crate::models::order::ItemRow;

/// Lines of one block already consumed by a rule, keyed by line position.
///
/// A repeated line stays available after its first copy is claimed. Keying by
/// text instead would hide every copy at once. A claim set lives for exactly one
/// block extraction.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    owners: BTreeMap<usize, &'static str>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a line for `rule`. Returns false if another rule already owns it.
    pub fn claim(&mut self, index: usize, rule: &'static str) -> bool {
        if self.owners.contains_key(&index) {
            return false;
        }
        self.owners.insert(index, rule);
        true
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        self.owners.contains_key(&index)
    }

    /// Name of the rule that claimed the line at `index`.
    pub fn owner(&self, index: usize) -> Option<&'static str> {
        self.owners.get(&index).copied()
    }

    /// Positions claimed by `rule`, ascending.
    pub fn claimed_by(&self, rule: &str) -> Vec<usize> {
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == rule)
            .map(|(index, _)| *index)
            .collect()
    }

    /// Iterate over lines no rule has claimed yet.
    pub fn unclaimed<'a>(
        &'a self,
        lines: &'a [String],
    ) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        lines
            .iter()
            .enumerate()
            .filter(move |(index, _)| !self.is_claimed(*index))
            .map(|(index, line)| (index, line.as_str()))
    }
}

/// One field rule applied to a block's lines, in a fixed order.
pub trait BlockRule: Sync {
    /// Rule name recorded in the claim set.
    fn name(&self) -> &'static str;

    /// Fill this rule's fields of `row`, claiming at most one line.
    fn apply(&self, lines: &[String], claims: &mut ClaimSet, row: &mut ItemRow);
}
