//! Tests for asset resolution order and fallbacks.

use super::*;
use crate::assets::test_support::{write_encrypted, write_plain};
use tempfile::TempDir;

fn setup() -> (TempDir, Arc<LauncherPaths>, AssetResolver) {
    let dir = tempfile::tempdir().unwrap();
    let paths = Arc::new(LauncherPaths::new(dir.path().join("install"), dir.path().join("data")));
    let resolver = AssetResolver::new(paths.clone());
    (dir, paths, resolver)
}

#[test]
fn test_encrypted_bundle_beats_plain() {
    let (_dir, paths, resolver) = setup();
    write_plain(&paths.plain_asset("x.mp4"), b"plain copy");
    write_encrypted(&paths.encrypted_bundle("x.mp4"), b"decrypted copy");

    let resolution = resolver.resolve("x.mp4").unwrap();
    assert_eq!(resolution.origin, AssetOrigin::DecryptedCache);
    assert_eq!(resolution.path, paths.cache_entry("x.mp4"));
    assert_eq!(std::fs::read(&resolution.path).unwrap(), b"decrypted copy");
}

#[test]
fn test_raw_override_returned_without_decryption() {
    let (_dir, paths, resolver) = setup();
    write_plain(&paths.raw_override("x.mp4"), b"raw legacy");

    let resolution = resolver.resolve("x.mp4").unwrap();
    assert_eq!(resolution.origin, AssetOrigin::RawOverride);
    assert_eq!(resolution.path, paths.raw_override("x.mp4"));
    assert_eq!(resolver.cache().stats().source_reads, 0);
    assert!(!paths.cache_dir().exists());
}

#[test]
fn test_plain_asset() {
    let (_dir, paths, resolver) = setup();
    write_plain(&paths.plain_asset("buttons.mp3"), b"click");
    write_plain(&paths.raw_override("buttons.mp3"), b"raw click");

    let resolution = resolver.resolve("buttons.mp3").unwrap();
    assert_eq!(resolution.origin, AssetOrigin::Plain);
    assert_eq!(resolution.path, paths.plain_asset("buttons.mp3"));
}

#[test]
fn test_user_raw_override_is_last_resort() {
    let (_dir, paths, resolver) = setup();
    write_plain(&paths.user_raw_override("back.mp4"), b"user copy");

    let resolution = resolver.resolve("back.mp4").unwrap();
    assert_eq!(resolution.origin, AssetOrigin::UserRawOverride);
    assert_eq!(resolution.path, paths.user_raw_override("back.mp4"));
}

#[test]
fn test_user_encrypted_bundle() {
    let (_dir, paths, resolver) = setup();
    write_encrypted(&paths.user_encrypted_bundle("back.mp4"), b"user bundle");

    assert_eq!(resolver.find_encrypted("back.mp4"), Some(paths.user_encrypted_bundle("back.mp4")));
    let path = resolver.resolve_playable_asset("back.mp4").unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"user bundle");
}

#[test]
fn test_probe_dirs_searched_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    let paths = Arc::new(
        LauncherPaths::new(dir.path().join("install"), dir.path().join("data"))
            .with_probe_dirs(vec![first.clone(), second.clone()]),
    );
    write_encrypted(&LauncherPaths::encrypted_bundle_in(&second, "back.mp4"), b"second");
    write_encrypted(&paths.user_encrypted_bundle("back.mp4"), b"user");

    let resolver = AssetResolver::new(paths.clone());
    assert_eq!(
        resolver.find_encrypted("back.mp4"),
        Some(LauncherPaths::encrypted_bundle_in(&second, "back.mp4"))
    );

    write_encrypted(&LauncherPaths::encrypted_bundle_in(&first, "back.mp4"), b"first");
    assert_eq!(
        resolver.find_encrypted("back.mp4"),
        Some(LauncherPaths::encrypted_bundle_in(&first, "back.mp4"))
    );
}

#[test]
fn test_corrupt_bundle_falls_back_to_plain() {
    let (_dir, paths, resolver) = setup();
    write_plain(&paths.encrypted_bundle("x.mp4"), &[0u8; 7]);
    write_plain(&paths.plain_asset("x.mp4"), b"plain copy");

    let resolution = resolver.resolve("x.mp4").unwrap();
    assert_eq!(resolution.origin, AssetOrigin::Plain);
    assert_eq!(resolver.cache().stats().decrypt_failures, 1);
}

#[test]
fn test_corrupt_bundle_falls_back_to_raw_override() {
    let (_dir, paths, resolver) = setup();
    let mut bytes = crate::security::AssetCipher::global().encrypt(b"ABCD").unwrap();
    bytes.truncate(20);
    write_plain(&paths.encrypted_bundle("x.mp4"), &bytes);
    write_plain(&paths.raw_override("x.mp4"), b"raw");

    let path = resolver.resolve_playable_asset("x.mp4").unwrap();
    assert_eq!(path, paths.raw_override("x.mp4"));
}

#[test]
fn test_nothing_found() {
    let (_dir, _paths, resolver) = setup();
    assert!(resolver.resolve_playable_asset("missing.mp4").is_none());
    assert!(matches!(resolver.resolve("missing.mp4"), Err(AssetError::NotFound(_))));
}

#[test]
fn test_invalid_names_resolve_to_none() {
    let (_dir, paths, resolver) = setup();
    write_plain(&paths.data_dir().join("secret.txt"), b"nope");
    for name in ["", "..", "../secret.txt", "Assets/../../secret.txt"] {
        assert!(resolver.resolve_playable_asset(name).is_none(), "{:?}", name);
    }
}

#[test]
fn test_second_resolution_hits_cache() {
    let (_dir, paths, resolver) = setup();
    write_encrypted(&paths.encrypted_bundle("back.mp4"), b"video");

    let a = resolver.resolve_playable_asset("back.mp4").unwrap();
    let b = resolver.resolve_playable_asset("back.mp4").unwrap();
    assert_eq!(a, b);
    assert_eq!(resolver.cache().stats().source_reads, 1);
    assert_eq!(resolver.cache().stats().cache_hits, 1);
}

#[test]
fn test_warm_up_counts_resolved() {
    let (_dir, paths, resolver) = setup();
    write_encrypted(&paths.encrypted_bundle("back.mp4"), b"video");
    assert_eq!(warm_up(&resolver, &["back.mp4", "buttons.mp3"]), 1);
    assert!(paths.cache_entry("back.mp4").is_file());
}
