use addrline::domain::ErrorKind;
use addrline::symbolization::ModuleCache;
use std::io::Write;

#[test]
fn test_parse_failure_cached_without_rereading() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"\x7fELF but not really").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let cache = ModuleCache::new();
    let first = cache.get_or_load(&path).err().expect("garbage should not load");
    assert_eq!(first.kind(), ErrorKind::Parse);
    assert!(cache.is_failed(&path));

    // With the file gone a fresh load would fail to open; the cached parse failure wins
    drop(file);
    let second = cache.get_or_load(&path).err().expect("failure should be cached");
    assert_eq!(second.kind(), ErrorKind::Parse);
    assert_eq!(second.to_string(), first.to_string());
    assert_eq!(cache.load_attempts(), 1);
}

#[test]
fn test_missing_debug_info_is_parse_failure() {
    // A real binary with its debug sections removed
    let dir = tempfile::tempdir().unwrap();
    let stripped = dir.path().join("stripped");

    let status = std::process::Command::new("objcopy")
        .arg("--strip-debug")
        .arg(env!("CARGO_BIN_EXE_addrline"))
        .arg(&stripped)
        .status();
    if !status.is_ok_and(|s| s.success()) {
        println!("objcopy not available, skipping");
        return;
    }
    let path = stripped.to_string_lossy().into_owned();

    let cache = ModuleCache::new();
    let err = cache.get_or_load(&path).err().expect("stripped binary should not load");
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains(".debug_"), "unexpected error: {}", err);
    assert!(cache.is_failed(&path));
}

#[test]
fn test_reader_and_path_share_cache_entry() {
    let binary_path = env!("CARGO_BIN_EXE_addrline");
    let bytes = std::fs::read(binary_path).unwrap();

    let cache = ModuleCache::new();
    let from_reader = cache.get_or_load_at(bytes.as_slice(), binary_path).expect("load failed");
    let from_path = cache.get_or_load(binary_path).expect("load failed");

    assert!(std::sync::Arc::ptr_eq(&from_reader, &from_path));
    assert_eq!(cache.load_attempts(), 1);
}
