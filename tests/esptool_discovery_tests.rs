//! esptool discovery tests against fake PlatformIO trees


use espupload::errors::UploadError;
use espupload::utils::esptool_utils::{packaged_esptool_path, resolve_esptool};
use std::fs;
use tempfile::TempDir;
use test_fixtures::PlatformIoFixture;

#[test]
fn test_resolves_packaged_esptool() {
    let fixture = PlatformIoFixture::with_esptool().unwrap();

    let resolved = resolve_esptool(None, &fixture.packages_dir()).unwrap();
    assert_eq!(resolved, fixture.esptool_path());
}

#[test]
fn test_explicit_override_is_used() {
    let fixture = PlatformIoFixture::with_esptool().unwrap();
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("esptool.py");
    fs::write(&custom, "# custom esptool\n").unwrap();

    // The override wins even though the packaged tool exists
    let resolved = resolve_esptool(Some(&custom), &fixture.packages_dir()).unwrap();
    assert_eq!(resolved, custom);
}

#[test]
fn test_explicit_override_must_exist() {
    let fixture = PlatformIoFixture::with_esptool().unwrap();
    let missing = fixture.root.path().join("nowhere").join("esptool.py");

    let err = resolve_esptool(Some(&missing), &fixture.packages_dir()).unwrap_err();
    match err {
        UploadError::ToolNotFound(path) => assert_eq!(path, missing),
        other => panic!("Expected ToolNotFound, got: {:?}", other),
    }
}

#[test]
fn test_missing_tool_names_expected_location() {
    let fixture = PlatformIoFixture::empty().unwrap();
    let expected = packaged_esptool_path(&fixture.packages_dir());

    match resolve_esptool(None, &fixture.packages_dir()) {
        Err(UploadError::ToolNotFound(path)) => assert_eq!(path, expected),
        // Hosts with esptool installed system-wide fall back to PATH
        Ok(found) => assert!(which::which(found.file_name().unwrap()).is_ok()),
        Err(other) => panic!("Expected ToolNotFound, got: {:?}", other),
    }
}
