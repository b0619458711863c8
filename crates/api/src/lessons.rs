//! Transactional lesson ordering.
//!
//! Every mutation of a subject's lessons goes through [`LessonOrdering`]. Each
//! operation runs in a single transaction that:
//!
//! 1. locks the subject row (`FOR UPDATE`), serializing writers per subject,
//! 2. checks the caller may manage the subject,
//! 3. applies the planned writes from [`elearn_core::ordering`],
//! 4. re-reads the subject's orders and verifies they are exactly `1..=N`,
//! 5. commits.
//!
//! Any error drops the transaction, which rolls every write back.

use elearn_core::error::CoreError;
use elearn_core::ordering::{
    next_order, plan_bulk_reorder, plan_compaction, plan_move, validate_position, verify_dense,
    OrderAssignment,
};
use elearn_core::types::{DbId, SortOrder};
use elearn_core::validation::require_non_blank;
use elearn_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use elearn_db::models::subject::Subject;
use elearn_db::repositories::{LessonRepo, SubjectRepo};
use elearn_db::DbPool;
use sqlx::PgConnection;

use crate::access::Caller;
use crate::error::AppResult;

/// Ordered content manager for lessons.
pub struct LessonOrdering;

impl LessonOrdering {
    /// Append a lesson to the end of the subject's ordering.
    pub async fn create(
        pool: &DbPool,
        caller: &Caller,
        subject_id: DbId,
        input: &CreateLesson,
    ) -> AppResult<Lesson> {
        require_non_blank(&input.title, "title")?;

        let mut tx = pool.begin().await?;
        lock_managed_subject(&mut tx, caller, subject_id).await?;

        let max = LessonRepo::find_max_order(&mut *tx, subject_id).await?;
        let order = next_order(max);
        let lesson = LessonRepo::create_with_order(&mut *tx, subject_id, input, order).await?;

        ensure_dense(&mut tx, subject_id).await?;
        tx.commit().await?;

        tracing::info!(
            subject_id,
            lesson_id = lesson.id,
            sort_order = order,
            user_id = caller.user_id,
            "Lesson created"
        );
        Ok(lesson)
    }

    /// Remove a lesson and close the gap it leaves behind.
    pub async fn delete(
        pool: &DbPool,
        caller: &Caller,
        subject_id: DbId,
        lesson_id: DbId,
    ) -> AppResult<()> {
        let mut tx = pool.begin().await?;
        lock_managed_subject(&mut tx, caller, subject_id).await?;
        let lesson = find_lesson(&mut tx, subject_id, lesson_id).await?;

        LessonRepo::delete(&mut *tx, lesson.id).await?;
        let shifted =
            LessonRepo::shift_order_range(&mut *tx, subject_id, &plan_compaction(lesson.sort_order))
                .await?;

        ensure_dense(&mut tx, subject_id).await?;
        tx.commit().await?;

        tracing::info!(
            subject_id,
            lesson_id,
            removed_order = lesson.sort_order,
            shifted,
            user_id = caller.user_id,
            "Lesson deleted"
        );
        Ok(())
    }

    /// Move one lesson to `target`, sliding the siblings in between by one.
    ///
    /// `target` must lie in `1..=N`. Moving a lesson onto its own position
    /// writes nothing.
    pub async fn reorder_one(
        pool: &DbPool,
        caller: &Caller,
        subject_id: DbId,
        lesson_id: DbId,
        target: SortOrder,
    ) -> AppResult<Lesson> {
        let mut tx = pool.begin().await?;
        lock_managed_subject(&mut tx, caller, subject_id).await?;
        let lesson = find_lesson(&mut tx, subject_id, lesson_id).await?;

        let moved = move_lesson(&mut tx, caller, lesson, target).await?;

        ensure_dense(&mut tx, subject_id).await?;
        tx.commit().await?;
        Ok(moved)
    }

    /// Apply a batch of `(lesson, order)` assignments all-or-nothing.
    ///
    /// Returns the subject's lessons in their new order.
    pub async fn reorder_bulk(
        pool: &DbPool,
        caller: &Caller,
        subject_id: DbId,
        assignments: &[OrderAssignment],
    ) -> AppResult<Vec<Lesson>> {
        let mut tx = pool.begin().await?;
        lock_managed_subject(&mut tx, caller, subject_id).await?;

        let current = LessonRepo::list_orders(&mut *tx, subject_id).await?;
        let changes = plan_bulk_reorder(&current, assignments)?;

        for change in &changes {
            LessonRepo::update_order(&mut *tx, change.id, change.sort_order)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Lesson",
                    id: change.id,
                })?;
        }

        ensure_dense(&mut tx, subject_id).await?;
        let lessons = LessonRepo::list_by_subject(&mut *tx, subject_id).await?;
        tx.commit().await?;

        tracing::info!(
            subject_id,
            requested = assignments.len(),
            changed = changes.len(),
            user_id = caller.user_id,
            "Lessons reordered"
        );
        Ok(lessons)
    }

    /// Patch a lesson's content and, when `sort_order` is given, move it.
    ///
    /// Both happen in one transaction; a rejected move discards the content
    /// change as well.
    pub async fn update(
        pool: &DbPool,
        caller: &Caller,
        subject_id: DbId,
        lesson_id: DbId,
        patch: &UpdateLesson,
        sort_order: Option<SortOrder>,
    ) -> AppResult<Lesson> {
        let mut tx = pool.begin().await?;
        lock_managed_subject(&mut tx, caller, subject_id).await?;
        find_lesson(&mut tx, subject_id, lesson_id).await?;

        let mut lesson = LessonRepo::update_content(&mut *tx, lesson_id, patch)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lesson",
                id: lesson_id,
            })?;

        if let Some(target) = sort_order {
            lesson = move_lesson(&mut tx, caller, lesson, target).await?;
        }

        ensure_dense(&mut tx, subject_id).await?;
        tx.commit().await?;

        tracing::info!(subject_id, lesson_id, user_id = caller.user_id, "Lesson updated");
        Ok(lesson)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the subject row and check the caller owns it.
async fn lock_managed_subject(
    conn: &mut PgConnection,
    caller: &Caller,
    subject_id: DbId,
) -> AppResult<Subject> {
    let subject = SubjectRepo::lock_for_update(conn, subject_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subject",
            id: subject_id,
        })?;
    caller.ensure_can_manage(&subject)?;
    Ok(subject)
}

async fn find_lesson(
    conn: &mut PgConnection,
    subject_id: DbId,
    lesson_id: DbId,
) -> AppResult<Lesson> {
    let lesson = LessonRepo::find_in_subject(conn, subject_id, lesson_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        })?;
    Ok(lesson)
}

/// Shift the siblings between the lesson's position and `target`, then place
/// the lesson at `target`. The caller must hold the subject lock.
async fn move_lesson(
    conn: &mut PgConnection,
    caller: &Caller,
    lesson: Lesson,
    target: SortOrder,
) -> AppResult<Lesson> {
    let count = LessonRepo::count_by_subject(&mut *conn, lesson.subject_id).await?;
    validate_position(target, count)?;

    let Some(shift) = plan_move(lesson.sort_order, target) else {
        return Ok(lesson);
    };

    let shifted = LessonRepo::shift_order_range(&mut *conn, lesson.subject_id, &shift).await?;
    let moved = LessonRepo::update_order(&mut *conn, lesson.id, target)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lesson",
            id: lesson.id,
        })?;

    tracing::info!(
        subject_id = lesson.subject_id,
        lesson_id = lesson.id,
        from = lesson.sort_order,
        to = target,
        shifted,
        user_id = caller.user_id,
        "Lesson moved"
    );
    Ok(moved)
}

/// Re-read the subject's orders and fail unless they are exactly `1..=N`.
async fn ensure_dense(conn: &mut PgConnection, subject_id: DbId) -> AppResult<()> {
    let orders: Vec<SortOrder> = LessonRepo::list_orders(conn, subject_id)
        .await?
        .into_iter()
        .map(|(_, order)| order)
        .collect();
    verify_dense(&orders)?;
    Ok(())
}
