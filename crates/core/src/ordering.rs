//! Dense `1..=N` ordering of lessons inside a subject.
//!
//! The functions here only plan and check. The database layer applies a plan
//! inside one transaction, so the gap-free ordering is never visible in a
//! half-applied state.
//!
//! - Append: [`next_order`]
//! - Move one lesson: [`validate_position`] + [`plan_move`]
//! - Delete one lesson: [`plan_compaction`]
//! - Bulk reorder: [`plan_bulk_reorder`]
//! - Post-write check: [`verify_dense`]

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, SortOrder};

/// Adds `delta` to every sibling whose order lies in `low..=high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShift {
    pub low: SortOrder,
    pub high: SortOrder,
    pub delta: i32,
}

impl RangeShift {
    /// The order a sibling ends up with after this shift.
    pub fn apply(&self, order: SortOrder) -> SortOrder {
        if (self.low..=self.high).contains(&order) {
            order + self.delta
        } else {
            order
        }
    }
}

/// One `(lesson id, target order)` pair of a bulk reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: DbId,
    pub sort_order: SortOrder,
}

/// Order for a lesson appended to a subject whose highest order is `current_max`.
pub fn next_order(current_max: Option<SortOrder>) -> SortOrder {
    current_max.unwrap_or(0) + 1
}

/// Check that `target` is a valid position among `count` siblings.
pub fn validate_position(target: SortOrder, count: i64) -> Result<(), CoreError> {
    if target < 1 || i64::from(target) > count {
        return Err(CoreError::OutOfRange {
            requested: target,
            max: count,
        });
    }
    Ok(())
}

/// Plan the sibling shift for moving one lesson from `current` to `target`.
///
/// Moving forward slides `(current, target]` down by one; moving backward
/// slides `[target, current)` up by one. Returns `None` when nothing moves.
pub fn plan_move(current: SortOrder, target: SortOrder) -> Option<RangeShift> {
    match target.cmp(&current) {
        Ordering::Greater => Some(RangeShift {
            low: current + 1,
            high: target,
            delta: -1,
        }),
        Ordering::Less => Some(RangeShift {
            low: target,
            high: current - 1,
            delta: 1,
        }),
        Ordering::Equal => None,
    }
}

/// Plan the shift that closes the gap left by deleting the lesson at `removed`.
pub fn plan_compaction(removed: SortOrder) -> RangeShift {
    RangeShift {
        low: removed + 1,
        high: SortOrder::MAX,
        delta: -1,
    }
}

/// Validate a bulk reorder against the subject's current `(id, order)` rows.
///
/// Rejects the whole batch when:
/// - it is empty,
/// - a lesson id or a target order appears twice,
/// - a target order is outside `1..=N`,
/// - a lesson does not belong to the subject,
/// - the assigned orders together with the unchanged orders of unlisted
///   lessons would not form exactly `1..=N`.
///
/// On success returns only the assignments that change a lesson's order,
/// sorted by target order.
pub fn plan_bulk_reorder(
    current: &[(DbId, SortOrder)],
    assignments: &[OrderAssignment],
) -> Result<Vec<OrderAssignment>, CoreError> {
    if assignments.is_empty() {
        return Err(CoreError::Validation(
            "Reorder request must contain at least one item".into(),
        ));
    }

    let count = current.len() as i64;
    let mut seen_ids = HashSet::with_capacity(assignments.len());
    let mut seen_orders = HashSet::with_capacity(assignments.len());

    for a in assignments {
        if !seen_ids.insert(a.id) {
            return Err(CoreError::Validation(format!(
                "Lesson {} appears more than once",
                a.id
            )));
        }
        if !seen_orders.insert(a.sort_order) {
            return Err(CoreError::Validation(format!(
                "Order {} is assigned more than once",
                a.sort_order
            )));
        }
        if a.sort_order < 1 || i64::from(a.sort_order) > count {
            return Err(CoreError::Validation(format!(
                "Order {} is out of range (valid: 1..={count})",
                a.sort_order
            )));
        }
    }

    let existing: HashMap<DbId, SortOrder> = current.iter().copied().collect();
    if let Some(missing) = assignments.iter().find(|a| !existing.contains_key(&a.id)) {
        return Err(CoreError::NotFound {
            entity: "Lesson",
            id: missing.id,
        });
    }

    let assigned: HashMap<DbId, SortOrder> =
        assignments.iter().map(|a| (a.id, a.sort_order)).collect();
    let mut holders: HashMap<SortOrder, DbId> = HashMap::with_capacity(current.len());
    for &(id, order) in current {
        let resulting = assigned.get(&id).copied().unwrap_or(order);
        if let Some(other) = holders.insert(resulting, id) {
            return Err(CoreError::Validation(format!(
                "Order {resulting} would be shared by lessons {other} and {id}"
            )));
        }
    }

    let resulting: Vec<SortOrder> = holders.keys().copied().collect();
    if let Some((expected, found)) = first_gap(&resulting) {
        return Err(CoreError::Validation(format!(
            "Resulting order is not contiguous: expected {expected}, found {found}"
        )));
    }

    let mut changes: Vec<OrderAssignment> = assignments
        .iter()
        .filter(|a| existing.get(&a.id) != Some(&a.sort_order))
        .copied()
        .collect();
    changes.sort_by_key(|a| a.sort_order);
    Ok(changes)
}

/// Check that `orders` is exactly `{1, 2, ..., len}`.
///
/// Used as the last step of every mutating transaction; a failure means the
/// transaction must not commit.
pub fn verify_dense(orders: &[SortOrder]) -> Result<(), CoreError> {
    match first_gap(orders) {
        None => Ok(()),
        Some((expected, found)) => Err(CoreError::Internal(format!(
            "Lesson ordering is not dense: expected {expected}, found {found}"
        ))),
    }
}

/// First position where the sorted `orders` diverge from `1..=len`.
fn first_gap(orders: &[SortOrder]) -> Option<(SortOrder, SortOrder)> {
    let mut sorted = orders.to_vec();
    sorted.sort_unstable();
    sorted
        .into_iter()
        .zip(1..)
        .find(|(found, expected)| found != expected)
        .map(|(found, expected)| (expected, found))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Lessons 10, 20, 30, 40 at orders 1..=4.
    fn four_lessons() -> Vec<(DbId, SortOrder)> {
        vec![(10, 1), (20, 2), (30, 3), (40, 4)]
    }

    /// Apply a single-lesson move the way the database layer does.
    fn simulate_move(
        rows: &[(DbId, SortOrder)],
        moved: DbId,
        target: SortOrder,
    ) -> Vec<(DbId, SortOrder)> {
        let current = rows.iter().find(|(id, _)| *id == moved).unwrap().1;
        let shift = plan_move(current, target);
        rows.iter()
            .map(|&(id, order)| {
                if id == moved {
                    (id, target)
                } else {
                    (id, shift.map_or(order, |s| s.apply(order)))
                }
            })
            .collect()
    }

    fn order_of(rows: &[(DbId, SortOrder)], id: DbId) -> SortOrder {
        rows.iter().find(|(i, _)| *i == id).unwrap().1
    }

    // -- append --------------------------------------------------------------

    #[test]
    fn next_order_starts_at_one() {
        assert_eq!(next_order(None), 1);
    }

    #[test]
    fn next_order_appends_after_max() {
        assert_eq!(next_order(Some(3)), 4);
    }

    // -- bounds --------------------------------------------------------------

    #[test]
    fn position_bounds() {
        assert!(validate_position(1, 4).is_ok());
        assert!(validate_position(4, 4).is_ok());
        assert_matches!(
            validate_position(0, 4),
            Err(CoreError::OutOfRange { requested: 0, max: 4 })
        );
        assert_matches!(
            validate_position(5, 4),
            Err(CoreError::OutOfRange { requested: 5, max: 4 })
        );
    }

    #[test]
    fn position_in_empty_subject_is_out_of_range() {
        assert_matches!(validate_position(1, 0), Err(CoreError::OutOfRange { .. }));
    }

    // -- move ----------------------------------------------------------------

    #[test]
    fn move_forward_shifts_range_down() {
        assert_eq!(
            plan_move(1, 3),
            Some(RangeShift {
                low: 2,
                high: 3,
                delta: -1
            })
        );

        let rows = simulate_move(&four_lessons(), 10, 3);
        assert_eq!(order_of(&rows, 20), 1);
        assert_eq!(order_of(&rows, 30), 2);
        assert_eq!(order_of(&rows, 10), 3);
        assert_eq!(order_of(&rows, 40), 4);
    }

    #[test]
    fn move_backward_shifts_range_up() {
        assert_eq!(
            plan_move(4, 2),
            Some(RangeShift {
                low: 2,
                high: 3,
                delta: 1
            })
        );

        let rows = simulate_move(&four_lessons(), 40, 2);
        assert_eq!(order_of(&rows, 10), 1);
        assert_eq!(order_of(&rows, 40), 2);
        assert_eq!(order_of(&rows, 20), 3);
        assert_eq!(order_of(&rows, 30), 4);
    }

    #[test]
    fn move_to_same_position_is_noop() {
        assert_eq!(plan_move(2, 2), None);
    }

    #[test]
    fn every_move_keeps_ordering_dense() {
        let rows = four_lessons();
        for &(moved, _) in &rows {
            for target in 1..=4 {
                let after = simulate_move(&rows, moved, target);
                let orders: Vec<_> = after.iter().map(|(_, o)| *o).collect();
                assert!(verify_dense(&orders).is_ok(), "{moved} -> {target}");
            }
        }
    }

    // -- delete --------------------------------------------------------------

    #[test]
    fn compaction_closes_gap() {
        let shift = plan_compaction(2);
        let remaining: Vec<SortOrder> = [1, 3, 4].iter().map(|&o| shift.apply(o)).collect();
        assert_eq!(remaining, vec![1, 2, 3]);
    }

    #[test]
    fn compaction_of_last_is_noop_for_siblings() {
        let shift = plan_compaction(4);
        assert_eq!(shift.apply(3), 3);
        assert_eq!(shift.apply(1), 1);
    }

    // -- bulk ----------------------------------------------------------------

    #[test]
    fn bulk_full_permutation_is_accepted() {
        let plan = plan_bulk_reorder(
            &four_lessons(),
            &[
                OrderAssignment { id: 10, sort_order: 4 },
                OrderAssignment { id: 20, sort_order: 3 },
                OrderAssignment { id: 30, sort_order: 2 },
                OrderAssignment { id: 40, sort_order: 1 },
            ],
        )
        .unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0], OrderAssignment { id: 40, sort_order: 1 });
    }

    #[test]
    fn bulk_swap_subset_is_accepted() {
        let plan = plan_bulk_reorder(
            &four_lessons(),
            &[
                OrderAssignment { id: 20, sort_order: 3 },
                OrderAssignment { id: 30, sort_order: 2 },
            ],
        )
        .unwrap();
        assert_eq!(
            plan,
            vec![
                OrderAssignment { id: 30, sort_order: 2 },
                OrderAssignment { id: 20, sort_order: 3 },
            ]
        );
    }

    #[test]
    fn bulk_skips_unchanged_assignments() {
        let plan = plan_bulk_reorder(
            &four_lessons(),
            &[
                OrderAssignment { id: 10, sort_order: 1 },
                OrderAssignment { id: 20, sort_order: 2 },
            ],
        )
        .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn bulk_rejects_duplicate_target() {
        let result = plan_bulk_reorder(
            &four_lessons(),
            &[
                OrderAssignment { id: 10, sort_order: 1 },
                OrderAssignment { id: 20, sort_order: 1 },
            ],
        );
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("more than once"));
    }

    #[test]
    fn bulk_rejects_duplicate_lesson() {
        let result = plan_bulk_reorder(
            &four_lessons(),
            &[
                OrderAssignment { id: 10, sort_order: 2 },
                OrderAssignment { id: 10, sort_order: 3 },
            ],
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn bulk_rejects_out_of_range() {
        for bad in [0, 5] {
            let result = plan_bulk_reorder(
                &four_lessons(),
                &[OrderAssignment { id: 10, sort_order: bad }],
            );
            assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("out of range"));
        }
    }

    #[test]
    fn bulk_rejects_empty_request() {
        assert_matches!(
            plan_bulk_reorder(&four_lessons(), &[]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn bulk_rejects_foreign_lesson() {
        let result = plan_bulk_reorder(
            &four_lessons(),
            &[OrderAssignment { id: 99, sort_order: 1 }],
        );
        assert_matches!(result, Err(CoreError::NotFound { entity: "Lesson", id: 99 }));
    }

    #[test]
    fn bulk_rejects_collision_with_unlisted_sibling() {
        // Moving lesson 10 to order 3 without moving lesson 30 away.
        let result = plan_bulk_reorder(
            &four_lessons(),
            &[OrderAssignment { id: 10, sort_order: 3 }],
        );
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("shared by"));
    }

    // -- invariant -----------------------------------------------------------

    #[test]
    fn dense_check() {
        assert!(verify_dense(&[]).is_ok());
        assert!(verify_dense(&[3, 1, 2]).is_ok());
        assert_matches!(verify_dense(&[1, 3]), Err(CoreError::Internal(_)));
        assert_matches!(verify_dense(&[1, 1, 2]), Err(CoreError::Internal(_)));
        assert_matches!(verify_dense(&[0, 1]), Err(CoreError::Internal(_)));
    }
}
