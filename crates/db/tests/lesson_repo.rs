//! Integration tests for the lesson storage primitives.
//!
//! Exercises `LessonRepo` against a real database:
//! - Append order and max-order lookup
//! - Range shifts used by moves and compaction
//! - Deferred uniqueness of `(subject_id, sort_order)`
//! - Cascade delete from subjects

use elearn_core::ordering::{plan_compaction, plan_move};
use elearn_core::roles::ROLE_ID_TEACHER;
use elearn_core::types::{DbId, SortOrder};
use elearn_db::models::lesson::{CreateLesson, UpdateLesson};
use elearn_db::models::subject::{CreateSubject, SubjectFilter};
use elearn_db::models::teacher::CreateTeacher;
use elearn_db::models::user::CreateUser;
use elearn_db::repositories::{LessonRepo, SubjectRepo, TeacherRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_teacher(pool: &PgPool, username: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            full_name: format!("Guru {username}"),
            username: username.to_string(),
            email: format!("{username}@sekolah.test"),
            password_hash: "not-a-real-hash".to_string(),
            role_id: ROLE_ID_TEACHER,
        },
    )
    .await
    .unwrap();
    TeacherRepo::create(
        pool,
        &CreateTeacher {
            user_id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            nrk: format!("NRK-{username}"),
            phone: "0812345678".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_subject(pool: &PgPool, teacher_id: DbId, title: &str) -> DbId {
    SubjectRepo::create(
        pool,
        &CreateSubject {
            title: title.to_string(),
            description: "Materi semester ganjil".to_string(),
            category: "KELAS_7".to_string(),
            teacher_id,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_lesson(title: &str) -> CreateLesson {
    CreateLesson {
        title: title.to_string(),
        body: None,
        files: Vec::new(),
    }
}

/// Insert `n` lessons with orders `1..=n`, returning their ids in order.
async fn seed_lessons(pool: &PgPool, subject_id: DbId, n: i32) -> Vec<DbId> {
    let mut ids = Vec::new();
    for order in 1..=n {
        let lesson = LessonRepo::create_with_order(
            pool,
            subject_id,
            &new_lesson(&format!("Bab {order}")),
            order,
        )
        .await
        .unwrap();
        ids.push(lesson.id);
    }
    ids
}

async fn orders(pool: &PgPool, subject_id: DbId) -> Vec<(DbId, SortOrder)> {
    LessonRepo::list_orders(pool, subject_id).await.unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn max_order_is_none_for_empty_subject(pool: PgPool) {
    let teacher = new_teacher(&pool, "budi").await;
    let subject = new_subject(&pool, teacher, "IPA").await;

    assert_eq!(LessonRepo::find_max_order(&pool, subject).await.unwrap(), None);
    assert_eq!(LessonRepo::count_by_subject(&pool, subject).await.unwrap(), 0);

    seed_lessons(&pool, subject, 3).await;
    assert_eq!(LessonRepo::find_max_order(&pool, subject).await.unwrap(), Some(3));
    assert_eq!(LessonRepo::count_by_subject(&pool, subject).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn forward_move_shifts_range_down(pool: PgPool) {
    let teacher = new_teacher(&pool, "sari").await;
    let subject = new_subject(&pool, teacher, "Matematika").await;
    let ids = seed_lessons(&pool, subject, 4).await;

    // Move the first lesson to position 3.
    let shift = plan_move(1, 3).unwrap();
    let mut tx = pool.begin().await.unwrap();
    let moved = LessonRepo::shift_order_range(&mut *tx, subject, &shift)
        .await
        .unwrap();
    LessonRepo::update_order(&mut *tx, ids[0], 3).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(moved, 2);
    assert_eq!(
        orders(&pool, subject).await,
        vec![(ids[1], 1), (ids[2], 2), (ids[0], 3), (ids[3], 4)]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn compaction_closes_gap_after_delete(pool: PgPool) {
    let teacher = new_teacher(&pool, "andi").await;
    let subject = new_subject(&pool, teacher, "Bahasa").await;
    let ids = seed_lessons(&pool, subject, 4).await;

    let mut tx = pool.begin().await.unwrap();
    assert!(LessonRepo::delete(&mut *tx, ids[1]).await.unwrap());
    LessonRepo::shift_order_range(&mut *tx, subject, &plan_compaction(2))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        orders(&pool, subject).await,
        vec![(ids[0], 1), (ids[2], 2), (ids[3], 3)]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shift_leaves_other_subjects_alone(pool: PgPool) {
    let teacher = new_teacher(&pool, "rina").await;
    let a = new_subject(&pool, teacher, "IPS").await;
    let b = new_subject(&pool, teacher, "PKN").await;
    seed_lessons(&pool, a, 3).await;
    let b_ids = seed_lessons(&pool, b, 3).await;

    let mut tx = pool.begin().await.unwrap();
    let moved = LessonRepo::shift_order_range(&mut *tx, a, &plan_move(3, 1).unwrap())
        .await
        .unwrap();
    let b_orders = LessonRepo::list_orders(&mut *tx, b).await.unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(moved, 2);
    assert_eq!(b_orders, vec![(b_ids[0], 1), (b_ids[1], 2), (b_ids[2], 3)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_order_is_rejected_at_commit(pool: PgPool) {
    let teacher = new_teacher(&pool, "dewi").await;
    let subject = new_subject(&pool, teacher, "Seni").await;
    let ids = seed_lessons(&pool, subject, 2).await;

    let mut tx = pool.begin().await.unwrap();
    // Allowed mid-transaction: the constraint is deferred.
    LessonRepo::update_order(&mut *tx, ids[1], 1).await.unwrap();
    let err = tx.commit().await.unwrap_err();

    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.constraint(), Some("uq_lessons_subject_sort_order"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_content_keeps_order(pool: PgPool) {
    let teacher = new_teacher(&pool, "eko").await;
    let subject = new_subject(&pool, teacher, "Informatika").await;
    let ids = seed_lessons(&pool, subject, 2).await;

    let patch = UpdateLesson {
        title: Some("Algoritma".to_string()),
        files: Some(vec!["https://cdn.test/algo.pdf".to_string()]),
        ..Default::default()
    };
    let lesson = LessonRepo::update_content(&pool, ids[1], &patch)
        .await
        .unwrap()
        .expect("lesson exists");

    assert_eq!(lesson.title, "Algoritma");
    assert_eq!(lesson.files, vec!["https://cdn.test/algo.pdf".to_string()]);
    assert_eq!(lesson.sort_order, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lessons_are_scoped_to_their_subject(pool: PgPool) {
    let teacher = new_teacher(&pool, "fajar").await;
    let a = new_subject(&pool, teacher, "Fisika").await;
    let b = new_subject(&pool, teacher, "Kimia").await;
    let a_ids = seed_lessons(&pool, a, 1).await;

    assert!(LessonRepo::find_in_subject(&pool, a, a_ids[0])
        .await
        .unwrap()
        .is_some());
    assert!(LessonRepo::find_in_subject(&pool, b, a_ids[0])
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paged_listing_searches_title_and_body(pool: PgPool) {
    let teacher = new_teacher(&pool, "gita").await;
    let subject = new_subject(&pool, teacher, "Biologi").await;
    seed_lessons(&pool, subject, 3).await;
    LessonRepo::create_with_order(
        &pool,
        subject,
        &CreateLesson {
            title: "Sel".to_string(),
            body: Some("Mitokondria dan ribosom".to_string()),
            files: Vec::new(),
        },
        4,
    )
    .await
    .unwrap();

    let page = LessonRepo::list_page(&pool, subject, None, 2, 2).await.unwrap();
    assert_eq!(
        page.iter().map(|l| l.sort_order).collect::<Vec<_>>(),
        vec![3, 4]
    );

    let hits = LessonRepo::list_page(&pool, subject, Some("mitokondria"), 10, 0)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Sel");
    assert_eq!(
        LessonRepo::count_page(&pool, subject, Some("bab")).await.unwrap(),
        3
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_subject_cascades_to_lessons(pool: PgPool) {
    let teacher = new_teacher(&pool, "hadi").await;
    let subject = new_subject(&pool, teacher, "Sejarah").await;
    seed_lessons(&pool, subject, 3).await;

    assert!(SubjectRepo::delete(&pool, subject).await.unwrap());
    assert!(orders(&pool, subject).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subject_filter_matches_teacher_and_category(pool: PgPool) {
    let t1 = new_teacher(&pool, "indah").await;
    let t2 = new_teacher(&pool, "joko").await;
    new_subject(&pool, t1, "Geografi").await;
    new_subject(&pool, t1, "Ekonomi").await;
    new_subject(&pool, t2, "Sosiologi").await;

    let mine = SubjectFilter {
        teacher_id: Some(t1),
        ..Default::default()
    };
    assert_eq!(SubjectRepo::count(&pool, &mine).await.unwrap(), 2);

    let search = SubjectFilter {
        search: Some("sosio".to_string()),
        category: Some("KELAS_7".to_string()),
        ..Default::default()
    };
    let found = SubjectRepo::list(&pool, &search, 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].teacher_id, t2);
}
