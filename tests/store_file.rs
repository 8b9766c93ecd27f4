use std::fs;

use contact_book::{Contact, ContactStore};
use tempfile::TempDir;

fn temp_store() -> (TempDir, ContactStore) {
    let dir = TempDir::new().unwrap();
    let store = ContactStore::new(dir.path().join("contacts.csv"));
    (dir, store)
}

#[test]
fn ensure_initialized_writes_header_once() {
    let (_dir, store) = temp_store();
    store.ensure_initialized().unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "Name,Phone,Email\r\n");

    store
        .append(&Contact::new("A", "1234567890", "a@b.co"))
        .unwrap();
    store.ensure_initialized().unwrap();
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[test]
fn ensure_initialized_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let store = ContactStore::new(dir.path().join("nested").join("deeper").join("contacts.csv"));
    assert!(store.load_all().unwrap().is_empty());
    assert!(store.path().exists());
}

#[test]
fn append_then_load_returns_the_row() {
    let (_dir, store) = temp_store();
    let contact = Contact::new("A", "1234567890", "a@b.co");
    store.append(&contact).unwrap();
    assert_eq!(store.load_all().unwrap(), vec![contact]);
}

#[test]
fn append_does_not_deduplicate() {
    let (_dir, store) = temp_store();
    let contact = Contact::new("A", "1234567890", "a@b.co");
    store.append(&contact).unwrap();
    store.append(&contact).unwrap();
    assert_eq!(store.load_all().unwrap(), vec![contact.clone(), contact]);
}

#[test]
fn replace_all_round_trips_in_order() {
    let (_dir, store) = temp_store();
    let contacts = vec![
        Contact::new("Zed", "0000000001", "z@z.co"),
        Contact::new("Doe, Jane", "0000000002", "jane@doe.io"),
        Contact::new("\"Quoted\" Name", "0000000003", "q@q.co"),
        Contact::new("Ada", "0000000004", "ada@example.com"),
    ];

    store.replace_all(&contacts).unwrap();
    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, contacts);

    store.replace_all(&loaded).unwrap();
    assert_eq!(store.load_all().unwrap(), contacts);
}

#[test]
fn replace_all_with_nothing_keeps_header() {
    let (_dir, store) = temp_store();
    store
        .append(&Contact::new("A", "1234567890", "a@b.co"))
        .unwrap();
    store.replace_all(&[]).unwrap();

    assert!(store.load_all().unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "Name,Phone,Email\r\n");
}

#[test]
fn replace_all_leaves_no_temporary_files_behind() {
    let (dir, store) = temp_store();
    store
        .replace_all(&[Contact::new("A", "1234567890", "a@b.co")])
        .unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn quoted_fields_are_written_with_standard_quoting() {
    let (_dir, store) = temp_store();
    store
        .append(&Contact::new("Doe, Jane", "1234567890", "jane@doe.io"))
        .unwrap();
    let raw = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        raw,
        "Name,Phone,Email\r\n\"Doe, Jane\",1234567890,jane@doe.io\r\n"
    );
}

#[test]
fn hand_edited_files_are_read() {
    let (_dir, store) = temp_store();
    fs::write(
        store.path(),
        "Name,Phone,Email\nAda,5551234567,ada@example.com\nShort\n",
    )
    .unwrap();

    assert_eq!(
        store.load_all().unwrap(),
        vec![
            Contact::new("Ada", "5551234567", "ada@example.com"),
            Contact::new("Short", "", ""),
        ]
    );
}

#[test]
fn load_all_rereads_the_file_every_time() {
    let (_dir, store) = temp_store();
    assert!(store.load_all().unwrap().is_empty());

    let other_handle = ContactStore::new(store.path());
    other_handle
        .append(&Contact::new("A", "1234567890", "a@b.co"))
        .unwrap();

    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn replace_all_writes_through_a_symlinked_record_file() {
    use std::os::unix::fs::symlink;

    use contact_book::delete_contact;

    let dir = TempDir::new().unwrap();
    let real = dir.path().join("synced.csv");
    let link = dir.path().join("contacts.csv");
    let x = Contact::new("X", "1111111111", "x@x.co");
    let y = Contact::new("Y", "2222222222", "y@y.co");
    ContactStore::new(&real)
        .replace_all(&[x.clone(), y.clone()])
        .unwrap();
    symlink(&real, &link).unwrap();

    let store = ContactStore::new(&link);
    assert!(delete_contact(&store, &x).unwrap());

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(ContactStore::new(&real).load_all().unwrap(), vec![y.clone()]);
    assert_eq!(store.load_all().unwrap(), vec![y]);
}

#[cfg(unix)]
#[test]
fn replace_all_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, store) = temp_store();
    store.ensure_initialized().unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

    store
        .replace_all(&[Contact::new("A", "1234567890", "a@b.co")])
        .unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
