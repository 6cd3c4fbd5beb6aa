use movieshelf_core::db::open_db_in_memory;
use movieshelf_core::{RepoError, SqliteUserRepository, User, UserRepository, ValidationError};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn setup() -> SqliteUserRepository {
    SqliteUserRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

#[test]
fn create_assigns_id_and_get_returns_equal_record() {
    let repo = setup();

    let mut user = User::new("bilbo", "there-and-back");
    let id = repo.create(&mut user).unwrap();

    assert!(id > 0);
    assert_eq!(user.id, Some(id));
    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, user);
}

#[test]
fn create_never_reuses_ids() {
    let repo = setup();

    let first = repo.create(&mut User::new("merry", "a")).unwrap();
    assert!(repo.delete(first).unwrap());
    let second = repo.create(&mut User::new("pippin", "b")).unwrap();

    assert_ne!(first, second);
}

#[test]
fn duplicate_username_is_constraint_violation_and_first_user_survives() {
    let repo = setup();

    let mut first = User::new("samwise", "potatoes");
    let first_id = repo.create(&mut first).unwrap();

    let mut second = User::new("samwise", "other");
    let err = repo.create(&mut second).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    assert_eq!(second.id, None);

    assert_eq!(repo.get_by_id(first_id).unwrap(), Some(first));
}

#[test]
fn validation_failure_blocks_create() {
    let repo = setup();

    let err = repo.create(&mut User::new("", "secret")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyUsername)
    ));

    let err = repo.create(&mut User::new("gimli", "  ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyPassword)
    ));
}

#[test]
fn get_missing_user_returns_none() {
    let repo = setup();
    assert_eq!(repo.get_by_id(404).unwrap(), None);
}

#[test]
fn delete_reports_whether_row_existed() {
    let repo = setup();
    let id = repo.create(&mut User::new("boromir", "horn")).unwrap();

    assert!(repo.delete(id).unwrap());
    assert!(!repo.delete(id).unwrap());
    assert!(!repo.delete(9_999).unwrap());
    assert_eq!(repo.get_by_id(id).unwrap(), None);
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    let repo = Arc::new(setup());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                (0..10)
                    .map(|n| {
                        let mut user = User::new(format!("user-{worker}-{n}"), "pw");
                        let id = repo.create(&mut user).unwrap();
                        assert_eq!(user.id, Some(id));
                        id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: HashSet<_> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(ids.len(), 80);
}

#[test]
fn user_json_omits_unset_id() {
    let user = User::new("legolas", "bow");
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "username": "legolas", "password": "bow" })
    );

    let parsed: User =
        serde_json::from_str(r#"{ "id": 7, "username": "aragorn", "password": "anduril" }"#)
            .unwrap();
    assert_eq!(parsed.id, Some(7));
}
