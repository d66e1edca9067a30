mod common;

use common::open_guarded_memory_db;
use contactbook_core::{
    ContactPageQuery, ContactRepository, ContactService, ContactValidationError, NewContact,
    PageRequest, RepoError, ServiceError, SqliteContactRepository,
};

#[test]
fn create_with_only_name_persists_null_optionals_and_returns_id() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);

    let created = repo.create_contact(&NewContact::new("Ada")).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Ada");
    assert_eq!(created.email, None);
    assert_eq!(created.phone, None);

    let (email, phone): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT email, phone FROM contacts WHERE id = ?1",
            [created.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(email, None);
    assert_eq!(phone, None);
}

#[test]
fn create_returns_all_supplied_fields() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);

    let created = repo
        .create_contact(
            &NewContact::new("Grace")
                .with_email("grace@example.com")
                .with_phone("5550001111"),
        )
        .unwrap();
    assert_eq!(created.email.as_deref(), Some("grace@example.com"));
    assert_eq!(created.phone.as_deref(), Some("5550001111"));
}

#[test]
fn duplicate_contacts_are_permitted() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);
    let payload = NewContact::new("Same").with_email("same@example.com");

    let first = repo.create_contact(&payload).unwrap();
    let second = repo.create_contact(&payload).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(stored_count(&repo), 2);
}

#[test]
fn blank_name_is_rejected_before_insert() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);

    let err = repo.create_contact(&NewContact::new("  ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ContactValidationError::EmptyName)
    ));
    assert_eq!(stored_count(&repo), 0);
}

#[test]
fn ids_increase_and_are_never_reused_after_delete() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);

    let first = repo.create_contact(&NewContact::new("one")).unwrap();
    let second = repo.create_contact(&NewContact::new("two")).unwrap();
    assert!(second.id > first.id);

    repo.delete_contact(second.id).unwrap();
    let third = repo.create_contact(&NewContact::new("three")).unwrap();
    assert!(third.id > second.id);
}

#[test]
fn delete_returns_row_then_not_found() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);
    let created = repo
        .create_contact(&NewContact::new("Linus").with_phone("123"))
        .unwrap();

    let deleted = repo.delete_contact(created.id).unwrap();
    assert_eq!(deleted, created);

    let err = repo.delete_contact(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn list_reads_window_and_total_together() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);
    for index in 0..4 {
        repo.create_contact(&NewContact::new(format!("c{index}")))
            .unwrap();
    }

    let slice = repo
        .list_contacts(&ContactPageQuery {
            limit: 2,
            offset: 1,
        })
        .unwrap();
    assert_eq!(slice.total_count, 4);
    let ids: Vec<_> = slice.contacts.iter().map(|contact| contact.id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[test]
fn list_with_offset_past_end_is_empty() {
    let conn = open_guarded_memory_db();
    let repo = SqliteContactRepository::new(&conn);
    repo.create_contact(&NewContact::new("only")).unwrap();

    let slice = repo
        .list_contacts(&ContactPageQuery {
            limit: 5,
            offset: u64::MAX,
        })
        .unwrap();
    assert!(slice.contacts.is_empty());
    assert_eq!(slice.total_count, 1);
}

#[test]
fn service_maps_not_found_and_validation() {
    let conn = open_guarded_memory_db();
    let service = ContactService::new(SqliteContactRepository::new(&conn));

    let err = service.delete_contact(404).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(404)));

    let err = service.create_contact(&NewContact::new("")).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn service_list_derives_has_next_page() {
    let conn = open_guarded_memory_db();
    let service = ContactService::new(SqliteContactRepository::new(&conn));
    for index in 0..3 {
        service
            .create_contact(&NewContact::new(format!("c{index}")))
            .unwrap();
    }

    let first = service
        .list_contacts(&PageRequest { page: 1, limit: 2 })
        .unwrap();
    assert_eq!(first.contacts.len(), 2);
    assert!(first.has_next_page);

    let second = service
        .list_contacts(&PageRequest { page: 2, limit: 2 })
        .unwrap();
    assert_eq!(second.contacts.len(), 1);
    assert!(!second.has_next_page);
}

fn stored_count(repo: &SqliteContactRepository<'_>) -> u64 {
    repo.list_contacts(&ContactPageQuery {
        limit: 0,
        offset: 0,
    })
    .unwrap()
    .total_count
}
