use super::*;

#[test]
fn memory_slots_overwrite_previous_value() {
    let mut slots = MemorySlots::new();
    assert_eq!(slots.get("key").expect("get"), None);

    slots.set("key", "first").expect("set first");
    slots.set("key", "second").expect("set second");
    assert_eq!(slots.get("key").expect("get").as_deref(), Some("second"));

    slots.remove("key").expect("remove");
    assert_eq!(slots.get("key").expect("get"), None);
}

#[test]
fn file_slots_create_missing_data_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("nested").join("data");

    let slots = FileSlots::open(&root).expect("open");
    assert!(root.is_dir(), "data dir should exist: {}", root.display());
    assert_eq!(slots.root(), root.as_path());
}

#[test]
fn file_slots_round_trip_and_leave_no_temp_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut slots = FileSlots::open(temp.path()).expect("open");

    assert_eq!(slots.get("gambiaBTRData").expect("get"), None);
    slots.set("gambiaBTRData", "{\"a\":1}").expect("set");
    assert_eq!(
        slots.get("gambiaBTRData").expect("get").as_deref(),
        Some("{\"a\":1}")
    );
    assert!(temp.path().join("gambiaBTRData.json").is_file());
    assert!(!temp.path().join(".gambiaBTRData.json.tmp").exists());

    slots.remove("gambiaBTRData").expect("remove");
    assert_eq!(slots.get("gambiaBTRData").expect("get"), None);
}

#[test]
fn file_slots_reject_keys_that_escape_the_data_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut slots = FileSlots::open(temp.path()).expect("open");

    assert!(slots.set("../outside", "x").is_err());
    assert!(slots.get("").is_err());
    assert!(slots.slot_path("with space").is_err());
}
