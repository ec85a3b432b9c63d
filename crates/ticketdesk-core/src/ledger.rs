// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Points ledger: per-helper balances and per-category point values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::TicketdeskError;
use crate::types::UserId;

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user: UserId,
    pub points: u64,
}

/// Accumulated helper credit, keyed by user.
///
/// Balances only grow, except through [`HelperLedger::reset`] which clears
/// every entry at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HelperLedger(BTreeMap<UserId, u64>);

impl HelperLedger {
    /// Adds `amount` to the user's balance, starting from zero if absent.
    pub fn award(&mut self, user: &UserId, amount: u32) {
        debug_assert!(amount > 0, "awards are always positive");
        let balance = self.0.entry(user.clone()).or_insert(0);
        *balance = balance.saturating_add(u64::from(amount));
    }

    pub fn balance(&self, user: &UserId) -> u64 {
        self.0.get(user).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The top `limit` balances, highest first. Ties keep ascending user id order.
    pub fn rank(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .0
            .iter()
            .map(|(user, points)| LeaderboardEntry {
                user: user.clone(),
                points: *points,
            })
            .collect();
        // sort_by is stable, so equal balances stay in key order.
        entries.sort_by(|a, b| b.points.cmp(&a.points));
        entries.truncate(limit);
        entries
    }
}

/// Points each nominated helper earns per resolved ticket, keyed by category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPoints(BTreeMap<String, u32>);

impl Default for CategoryPoints {
    fn default() -> Self {
        let mut points = Self(BTreeMap::new());
        points.backfill();
        points
    }
}

impl CategoryPoints {
    /// The configured value, or the default for a category never configured.
    pub fn value_for(&self, category: Category) -> u32 {
        self.0
            .get(category.name())
            .copied()
            .filter(|v| *v > 0)
            .unwrap_or(Category::DEFAULT_POINTS)
    }

    /// Overwrites the value for a category.
    pub fn set(&mut self, category: Category, value: u32) -> Result<(), TicketdeskError> {
        if value == 0 {
            return Err(TicketdeskError::Validation {
                message: "Points must be a positive number!".into(),
            });
        }
        self.0.insert(category.name().to_string(), value);
        Ok(())
    }

    /// Seeds the default value for every category missing from the table.
    pub fn backfill(&mut self) {
        for category in Category::ALL {
            self.0
                .entry(category.name().to_string())
                .or_insert(Category::DEFAULT_POINTS);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn award_creates_and_accumulates() {
        let mut ledger = HelperLedger::default();
        let alice = UserId::from("alice");
        ledger.award(&alice, 3);
        ledger.award(&alice, 2);
        assert_eq!(ledger.balance(&alice), 5);
        assert_eq!(ledger.balance(&UserId::from("bob")), 0);
    }

    #[test]
    fn reset_empties_ranking() {
        let mut ledger = HelperLedger::default();
        ledger.award(&UserId::from("a"), 1);
        ledger.award(&UserId::from("b"), 4);
        ledger.reset();
        assert!(ledger.rank(10).is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn rank_orders_by_points_and_limits() {
        let mut ledger = HelperLedger::default();
        for (i, points) in [5u32, 1, 9, 9, 2, 7, 3, 8, 4, 6, 10, 1].iter().enumerate() {
            ledger.award(&UserId(format!("u{i:02}")), *points);
        }
        let top = ledger.rank(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].points, 10);
        // u02 and u03 both hold 9; key order decides.
        assert_eq!(top[1].user, UserId::from("u02"));
        assert_eq!(top[2].user, UserId::from("u03"));
        assert!(top.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn category_points_default_to_one() {
        let points = CategoryPoints::default();
        for category in Category::ALL {
            assert_eq!(points.value_for(category), 1);
        }
    }

    #[test]
    fn category_points_reject_zero() {
        let mut points = CategoryPoints::default();
        assert!(points.set(Category::Spamming, 0).is_err());
        points.set(Category::Spamming, 4).unwrap();
        assert_eq!(points.value_for(Category::Spamming), 4);
    }

    #[test]
    fn backfill_keeps_configured_values() {
        let mut points: CategoryPoints =
            serde_json::from_str(r#"{"Ultra Dailies": 3}"#).unwrap();
        points.backfill();
        assert_eq!(points.value_for(Category::UltraDailies), 3);
        assert_eq!(points.value_for(Category::Others), 1);
    }

    proptest! {
        #[test]
        fn balance_is_order_independent(amounts in proptest::collection::vec(1u32..1000, 0..40)) {
            let user = UserId::from("helper");
            let mut forward = HelperLedger::default();
            for a in &amounts {
                forward.award(&user, *a);
            }
            let mut backward = HelperLedger::default();
            for a in amounts.iter().rev() {
                backward.award(&user, *a);
            }
            let expected: u64 = amounts.iter().map(|a| u64::from(*a)).sum();
            prop_assert_eq!(forward.balance(&user), expected);
            prop_assert_eq!(backward.balance(&user), expected);
        }
    }
}
