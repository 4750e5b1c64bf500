//! Integration tests for `SqliteStore` and the session it backs, against an
//! in-memory database.

use roster_core::{
  Error, Handle, Lookup, Session,
  department::DepartmentId,
  employee::{Employee, EmployeeId},
  review::ReviewId,
};

use crate::SqliteStore;

type TestSession = Session<SqliteStore, SqliteStore>;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// A store with all three tables and one department.
async fn setup() -> (SqliteStore, DepartmentId) {
  let s = store().await;
  s.create_departments_table().await.unwrap();
  let engineering = s.add_department("Engineering").await.unwrap();

  let session = s.session();
  session.employees().create_table().await.unwrap();
  session.reviews().create_table().await.unwrap();
  (s, engineering)
}

async fn alice(session: &TestSession, department: DepartmentId) -> Handle<Employee> {
  session
    .employees()
    .create("Alice", "Engineer", department)
    .await
    .unwrap()
}

fn id_of(employee: &Handle<Employee>) -> EmployeeId {
  employee.read().id().expect("persisted employee")
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_drop_table_are_idempotent() {
  let (s, _) = setup().await;
  let session = s.session();

  session.employees().create_table().await.unwrap();
  session.reviews().create_table().await.unwrap();

  session.reviews().drop_table().await.unwrap();
  session.reviews().drop_table().await.unwrap();
  session.employees().drop_table().await.unwrap();
  session.employees().drop_table().await.unwrap();

  // Reads against a dropped table surface the store error untranslated.
  let err = session.employees().get_all().await.unwrap_err();
  assert!(matches!(err, Error::Store(_)));
}

#[tokio::test]
async fn employees_drop_while_reviews_reference_them() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);
  session
    .reviews()
    .create(2023, "Good work", employee_id)
    .await
    .unwrap();

  session.employees().drop_table().await.unwrap();
  assert_eq!(session.reviews().get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn departments_table_drops_idempotently() {
  let (s, engineering) = setup().await;
  alice(&s.session(), engineering).await;

  s.drop_departments_table().await.unwrap();
  s.drop_departments_table().await.unwrap();

  // Without the table the department check itself fails.
  let err = s
    .session()
    .employees()
    .create("Bob", "Designer", engineering)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Store(_)));
}

/// Accepts every department id.
struct AnyDepartment;

impl Lookup<DepartmentId> for AnyDepartment {
  async fn exists(&self, _id: DepartmentId) -> roster_core::Result<bool> { Ok(true) }
}

#[tokio::test]
async fn injected_department_lookup_needs_no_local_table() {
  let s = store().await;
  let session = Session::new(s.clone(), AnyDepartment);
  session.employees().create_table().await.unwrap();
  session.reviews().create_table().await.unwrap();

  let employee = session
    .employees()
    .create("Alice", "Engineer", DepartmentId(1))
    .await
    .unwrap();
  let id = id_of(&employee);

  let review = session.reviews().create(2024, "Strong", id).await.unwrap();
  assert!(review.read().id().is_some());

  let found = session.employees().find_by_id(id).await.unwrap().unwrap();
  assert!(Handle::ptr_eq(&employee, &found));
  assert_eq!(found.read().department_id(), DepartmentId(1));
}

// ─── Employees ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_employee_assigns_id_and_caches_instance() {
  let (s, engineering) = setup().await;
  let session = s.session();

  let employee = alice(&session, engineering).await;
  let id = id_of(&employee);

  let found = session.employees().find_by_id(id).await.unwrap().unwrap();
  assert!(Handle::ptr_eq(&employee, &found));
  assert_eq!(found.read().name(), "Alice");
  assert_eq!(found.read().job_title(), "Engineer");
  assert_eq!(found.read().department_id(), engineering);
}

#[tokio::test]
async fn find_employee_missing_returns_none() {
  let (s, _) = setup().await;
  let found = s.session().employees().find_by_id(EmployeeId(42)).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn unknown_department_is_referential_and_inserts_nothing() {
  let (s, _) = setup().await;
  let session = s.session();

  let err = session
    .employees()
    .create("Bob", "Designer", DepartmentId(999))
    .await
    .unwrap_err();
  assert!(err.is_referential());

  assert!(session.employees().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn reassigning_department_is_checked() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee = alice(&session, engineering).await;

  let err = session
    .employees()
    .set_department(&employee, DepartmentId(999))
    .await
    .unwrap_err();
  assert!(err.is_referential());
  assert_eq!(employee.read().department_id(), engineering);

  let sales = s.add_department("Sales").await.unwrap();
  session
    .employees()
    .set_department(&employee, sales)
    .await
    .unwrap();
  assert_eq!(employee.read().department_id(), sales);
}

#[tokio::test]
async fn blank_employee_fields_are_rejected() {
  let (s, engineering) = setup().await;
  let session = s.session();

  for blank in ["", "   ", "\t\n"] {
    let err = session
      .employees()
      .create(blank, "Engineer", engineering)
      .await
      .unwrap_err();
    assert!(err.is_validation());

    let err = session
      .employees()
      .create("Alice", blank, engineering)
      .await
      .unwrap_err();
    assert!(err.is_validation());
  }
  assert!(session.employees().get_all().await.unwrap().is_empty());

  let employee = alice(&session, engineering).await;
  assert!(employee.write().set_name(" ").is_err());
  assert!(employee.write().set_job_title("").is_err());
  assert_eq!(employee.read().name(), "Alice");
}

#[tokio::test]
async fn repeated_lookups_share_one_instance() {
  let (s, engineering) = setup().await;
  let id = id_of(&alice(&s.session(), engineering).await);

  // A fresh session has nothing cached yet.
  let session = s.session();
  let first = session.employees().find_by_id(id).await.unwrap().unwrap();
  let second = session.employees().find_by_id(id).await.unwrap().unwrap();
  assert!(Handle::ptr_eq(&first, &second));

  first.write().set_name("Alice Liddell").unwrap();
  assert_eq!(second.read().name(), "Alice Liddell");
}

#[tokio::test]
async fn sessions_do_not_share_instances() {
  let (s, engineering) = setup().await;
  let one = s.session();
  let two = s.session();

  let employee = alice(&one, engineering).await;
  let other = two
    .employees()
    .find_by_id(id_of(&employee))
    .await
    .unwrap()
    .unwrap();
  assert!(!Handle::ptr_eq(&employee, &other));
}

#[tokio::test]
async fn get_all_returns_one_instance_per_row() {
  let (s, engineering) = setup().await;
  let session = s.session();

  let a = alice(&session, engineering).await;
  session
    .employees()
    .create("Bob", "Designer", engineering)
    .await
    .unwrap();
  session.clear();

  // Cache one of the two rows before listing.
  let cached = session
    .employees()
    .find_by_id(id_of(&a))
    .await
    .unwrap()
    .unwrap();

  let all = session.employees().get_all().await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().any(|e| Handle::ptr_eq(e, &cached)));
  assert!(!Handle::ptr_eq(&all[0], &all[1]));
  assert_eq!(session.cached().0, 2);
}

#[tokio::test]
async fn employee_save_twice_does_not_duplicate() {
  let (s, engineering) = setup().await;
  let session = s.session();

  let employee = session
    .employees()
    .build("Alice", "Engineer", engineering)
    .await
    .unwrap();
  assert!(employee.read().id().is_none());
  assert!(session.employees().get_all().await.unwrap().is_empty());

  let first = session.employees().save(&employee).await.unwrap();
  let second = session.employees().save(&employee).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(session.employees().get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn employee_update_writes_current_fields() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee = alice(&session, engineering).await;

  employee.write().set_job_title("Staff Engineer").unwrap();
  session.employees().update(&employee).await.unwrap();

  let fresh = s.session();
  let stored = fresh
    .employees()
    .find_by_id(id_of(&employee))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored.read().job_title(), "Staff Engineer");
}

#[tokio::test]
async fn update_requires_a_saved_instance() {
  let (s, engineering) = setup().await;
  let session = s.session();

  let employee = session
    .employees()
    .build("Alice", "Engineer", engineering)
    .await
    .unwrap();
  let err = session.employees().update(&employee).await.unwrap_err();
  assert!(matches!(err, Error::NotPersisted { entity: "employee" }));

  let review = session
    .reviews()
    .build(2023, "Good work", id_of(&alice(&session, engineering).await))
    .await
    .unwrap();
  let err = session.reviews().update(&review).await.unwrap_err();
  assert!(matches!(err, Error::NotPersisted { entity: "review" }));
}

#[tokio::test]
async fn employee_reviews() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let a = alice(&session, engineering).await;
  let b = session
    .employees()
    .create("Bob", "Designer", engineering)
    .await
    .unwrap();

  assert!(session.employees().reviews(&a).await.unwrap().is_empty());

  let r1 = session.reviews().create(2022, "Steady", id_of(&a)).await.unwrap();
  let r2 = session.reviews().create(2023, "Great", id_of(&a)).await.unwrap();
  session.reviews().create(2023, "Fine", id_of(&b)).await.unwrap();

  let reviews = session.employees().reviews(&a).await.unwrap();
  assert_eq!(reviews.len(), 2);
  assert!(Handle::ptr_eq(&reviews[0], &r1));
  assert!(Handle::ptr_eq(&reviews[1], &r2));

  let by_id = session.reviews().for_employee(id_of(&b)).await.unwrap();
  assert_eq!(by_id.len(), 1);
  assert_eq!(by_id[0].read().summary(), "Fine");

  let unsaved = session
    .employees()
    .build("Carol", "Manager", engineering)
    .await
    .unwrap();
  assert!(session.employees().reviews(&unsaved).await.unwrap().is_empty());
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn review_round_trip() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);

  let review = session
    .reviews()
    .create(2023, "Good work", employee_id)
    .await
    .unwrap();
  let id = review.read().id().unwrap();

  let same = session.reviews().find_by_id(id).await.unwrap().unwrap();
  assert!(Handle::ptr_eq(&review, &same));

  let fresh = s.session();
  let stored = fresh.reviews().find_by_id(id).await.unwrap().unwrap();
  let stored = stored.read();
  assert_eq!(stored.year(), 2023);
  assert_eq!(stored.summary(), "Good work");
  assert_eq!(stored.employee_id(), employee_id);
}

#[tokio::test]
async fn review_year_minimum() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);

  let err = session
    .reviews()
    .create(1999, "Too early", employee_id)
    .await
    .unwrap_err();
  assert!(err.is_validation());
  assert!(session.reviews().get_all().await.unwrap().is_empty());

  let review = session
    .reviews()
    .create(2000, "Just in time", employee_id)
    .await
    .unwrap();
  assert_eq!(review.read().year(), 2000);

  assert!(review.write().set_year(1950).is_err());
  assert_eq!(review.read().year(), 2000);
}

#[tokio::test]
async fn blank_summary_is_rejected() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);

  let err = session
    .reviews()
    .create(2023, "  ", employee_id)
    .await
    .unwrap_err();
  assert!(err.is_validation());

  let review = session.reviews().create(2023, "Ok", employee_id).await.unwrap();
  assert!(review.write().set_summary("").is_err());
  assert_eq!(review.read().summary(), "Ok");
}

#[tokio::test]
async fn unknown_employee_is_referential() {
  let (s, engineering) = setup().await;
  let session = s.session();

  let err = session
    .reviews()
    .create(2023, "Ghost", EmployeeId(77))
    .await
    .unwrap_err();
  assert!(err.is_referential());
  assert!(session.reviews().get_all().await.unwrap().is_empty());

  let employee_id = id_of(&alice(&session, engineering).await);
  let review = session
    .reviews()
    .create(2023, "Real", employee_id)
    .await
    .unwrap();
  let err = session
    .reviews()
    .set_employee(&review, EmployeeId(77))
    .await
    .unwrap_err();
  assert!(err.is_referential());
  assert_eq!(review.read().employee_id(), employee_id);
}

#[tokio::test]
async fn review_update_keeps_the_cached_instance() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let a = id_of(&alice(&session, engineering).await);
  let b = id_of(
    &session
      .employees()
      .create("Bob", "Designer", engineering)
      .await
      .unwrap(),
  );

  let review = session.reviews().create(2022, "Draft", a).await.unwrap();
  let id = review.read().id().unwrap();

  review.write().set_summary("Final").unwrap();
  review.write().set_year(2024).unwrap();
  session.reviews().set_employee(&review, b).await.unwrap();
  session.reviews().update(&review).await.unwrap();

  let cached = session.reviews().find_by_id(id).await.unwrap().unwrap();
  assert!(Handle::ptr_eq(&review, &cached));

  let stored = s.session().reviews().find_by_id(id).await.unwrap().unwrap();
  let stored = stored.read();
  assert_eq!(stored.summary(), "Final");
  assert_eq!(stored.year(), 2024);
  assert_eq!(stored.employee_id(), b);
}

#[tokio::test]
async fn review_save_twice_does_not_duplicate() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);

  let review = session
    .reviews()
    .create(2023, "Good work", employee_id)
    .await
    .unwrap();
  session.reviews().save(&review).await.unwrap();
  assert_eq!(session.reviews().get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_twice_is_idempotent() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);

  let review = session
    .reviews()
    .create(2023, "Good work", employee_id)
    .await
    .unwrap();
  let id: ReviewId = review.read().id().unwrap();

  session.reviews().delete(&review).await.unwrap();
  assert!(review.read().id().is_none());
  assert!(session.reviews().find_by_id(id).await.unwrap().is_none());
  assert_eq!(session.cached().1, 0);

  session.reviews().delete(&review).await.unwrap();
  assert!(session.reviews().find_by_id(id).await.unwrap().is_none());

  // Detached instances keep their values.
  assert_eq!(review.read().summary(), "Good work");
  assert_eq!(review.read().year(), 2023);
}

#[tokio::test]
async fn deleting_through_another_session_reads_as_absent() {
  let (s, engineering) = setup().await;
  let one = s.session();
  let employee_id = id_of(&alice(&one, engineering).await);
  let review = one.reviews().create(2023, "Good work", employee_id).await.unwrap();
  let id = review.read().id().unwrap();

  let two = s.session();
  let other = two.reviews().find_by_id(id).await.unwrap().unwrap();
  two.reviews().delete(&other).await.unwrap();

  assert!(one.reviews().find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn saving_a_detached_review_inserts_it_again() {
  let (s, engineering) = setup().await;
  let session = s.session();
  let employee_id = id_of(&alice(&session, engineering).await);

  let review = session
    .reviews()
    .create(2023, "Good work", employee_id)
    .await
    .unwrap();
  session.reviews().delete(&review).await.unwrap();
  assert!(session.reviews().get_all().await.unwrap().is_empty());

  let id = session.reviews().save(&review).await.unwrap();
  assert_eq!(review.read().id(), Some(id));

  let all = session.reviews().get_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert!(Handle::ptr_eq(&all[0], &review));
}

#[tokio::test]
async fn reused_key_needs_clear_to_reload() {
  let (s, engineering) = setup().await;
  let one = s.session();
  let employee_id = id_of(&alice(&one, engineering).await);
  let original = one.reviews().create(2023, "First", employee_id).await.unwrap();
  let id = original.read().id().unwrap();

  // Another session deletes the row; SQLite hands the freed key to the
  // next insert.
  let two = s.session();
  let other = two.reviews().find_by_id(id).await.unwrap().unwrap();
  two.reviews().delete(&other).await.unwrap();
  let replacement = two.reviews().create(2024, "Second", employee_id).await.unwrap();
  assert_eq!(replacement.read().id(), Some(id));

  let stale = one.reviews().find_by_id(id).await.unwrap().unwrap();
  assert!(Handle::ptr_eq(&stale, &original));
  assert_eq!(stale.read().summary(), "First");

  one.clear();
  let fresh = one.reviews().find_by_id(id).await.unwrap().unwrap();
  assert_eq!(fresh.read().summary(), "Second");
  assert_eq!(fresh.read().year(), 2024);
}
