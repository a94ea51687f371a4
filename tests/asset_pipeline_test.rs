//! End-to-end asset pipeline tests
//!
//! Startup maintenance followed by resolution, driven only through the
//! public API the launcher UI uses.

use std::fs;

use launcher_assets::security::AssetCipher;
use launcher_assets::{AssetConfig, AssetOrigin, AssetRuntime, LauncherPaths};

fn runtime_in(root: &std::path::Path) -> AssetRuntime {
    let paths = LauncherPaths::new(root.join("install"), root.join("data"));
    AssetRuntime::with_paths(AssetConfig::default(), paths)
}

/// Plain bundle is encrypted at startup and then played from the cache.
#[tokio::test]
async fn test_maintenance_then_resolve_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = runtime_in(dir.path());
    let plain = runtime.paths.plain_asset("back.mp4");
    fs::create_dir_all(plain.parent().unwrap()).unwrap();
    fs::write(&plain, b"video-bytes").unwrap();

    let report = runtime.run_startup_maintenance().await;
    assert!(report.is_clean());
    assert_eq!(report.encrypted, vec![runtime.paths.encrypted_bundle("back.mp4")]);

    let bundle = fs::read(runtime.paths.encrypted_bundle("back.mp4")).unwrap();
    assert_eq!(bundle.len(), 16 + 16);

    let resolution = runtime.resolver.resolve("back.mp4").unwrap();
    assert_eq!(resolution.origin, AssetOrigin::DecryptedCache);
    assert_eq!(resolution.path, runtime.paths.cache_entry("back.mp4"));
    assert_eq!(fs::read(&resolution.path).unwrap(), b"video-bytes");
}

/// A raw file dropped in AssetsEncrypted is picked up by maintenance.
#[tokio::test]
async fn test_raw_override_is_encrypted_and_decrypts_to_same_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = runtime_in(dir.path());
    let raw = runtime.paths.raw_override("buttons.mp3");
    fs::create_dir_all(raw.parent().unwrap()).unwrap();
    fs::write(&raw, b"click").unwrap();

    let report = runtime.run_startup_maintenance().await;
    assert_eq!(report.encrypted.len(), 1);

    let bundle = fs::read(runtime.paths.encrypted_bundle("buttons.mp3")).unwrap();
    assert_eq!(AssetCipher::global().decrypt(&bundle).unwrap(), b"click");

    let path = runtime.resolver.resolve_playable_asset("buttons.mp3").unwrap();
    assert_eq!(fs::read(path).unwrap(), b"click");
}

/// Nothing on disk: maintenance is a no-op and resolution finds nothing.
#[tokio::test]
async fn test_empty_install_resolves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = runtime_in(dir.path());

    let report = runtime.run_startup_maintenance().await;
    assert!(report.is_clean());
    assert!(report.encrypted.is_empty());

    for name in ["back.mp4", "backg.mp4", "buttons.mp3"] {
        assert!(runtime.resolver.resolve_playable_asset(name).is_none());
    }
}

/// Running maintenance twice leaves existing bundles byte-identical.
#[tokio::test]
async fn test_repeated_startup_does_not_rewrite_bundles() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = runtime_in(dir.path());
    let plain = runtime.paths.plain_asset("backg.mp4");
    fs::create_dir_all(plain.parent().unwrap()).unwrap();
    fs::write(&plain, vec![7u8; 100_000]).unwrap();

    runtime.run_startup_maintenance().await;
    let first = fs::read(runtime.paths.encrypted_bundle("backg.mp4")).unwrap();

    let second_report = runtime.spawn_startup_maintenance().await.unwrap();
    assert!(second_report.encrypted.is_empty());
    assert_eq!(fs::read(runtime.paths.encrypted_bundle("backg.mp4")).unwrap(), first);
}
