//! Dev reload against a fixture native crate and Unity project.

mod support;

use gigadeploy::{
    CounterIdSource, DeployConfig, DeployError, DevReloader, FixedIdSource, IdSource, Layout,
    Platform, ReloadConfig, ReloadId, ReloadOptions,
};
use std::fs;
use support::{list_files, siblings_of, Fixture, BINDING, LINUX_DEV, WINDOWS_DEV};

fn layout(fixture: &Fixture) -> Layout {
    Layout::new(&fixture.native, fixture.project_root(), DeployConfig::default())
}

fn fixed(value: u32) -> FixedIdSource {
    FixedIdSource::new(ReloadId::new(value, 5))
}

#[test]
fn test_reload_linux_renames_library_and_binding() {
    let fixture = Fixture::built();
    let layout = layout(&fixture);

    let receipt = DevReloader::new(&layout)
        .reload(Platform::Linux, &mut fixed(42), &ReloadOptions::default())
        .unwrap();

    assert_eq!(receipt.reload_id.as_deref(), Some("00042"));
    assert_eq!(list_files(&fixture.plugins()), vec!["_dev/libgigagen-00042.so"]);
    assert_eq!(
        fs::read(fixture.plugins().join("_dev/libgigagen-00042.so")).unwrap(),
        LINUX_DEV
    );
    assert_eq!(
        fs::read_to_string(fixture.scripts_binding()).unwrap(),
        BINDING.replace(r#"__DllName = "gigagen""#, r#"__DllName = "gigagen-00042""#)
    );
}

#[test]
fn test_reload_embeds_same_id_for_each_platform() {
    for (platform, content) in [(Platform::Linux, LINUX_DEV), (Platform::Windows, WINDOWS_DEV)] {
        let fixture = Fixture::built();
        let layout = layout(&fixture);

        DevReloader::new(&layout)
            .reload(platform, &mut fixed(7), &ReloadOptions::default())
            .unwrap();

        let file = platform.library_file("gigagen-00007");
        assert_eq!(list_files(&fixture.plugins()), vec![format!("_dev/{file}")]);
        assert_eq!(fs::read(fixture.plugins().join("_dev").join(&file)).unwrap(), content);
        let binding = fs::read_to_string(fixture.scripts_binding()).unwrap();
        assert!(binding.contains(r#"__DllName = "gigagen-00007""#));
        assert!(!binding.contains(r#"__DllName = "gigagen""#));
    }
}

#[test]
fn test_reload_replaces_release_tree() {
    let fixture = Fixture::built();
    let layout = layout(&fixture);
    support::write(&fixture.plugins().join("x86_64/libgigagen.so"), b"release");
    support::write(&fixture.plugins().join("_dev/libgigagen-00001.so"), b"older dev");

    DevReloader::new(&layout)
        .reload(Platform::Linux, &mut fixed(2), &ReloadOptions::default())
        .unwrap();

    assert_eq!(list_files(&fixture.plugins()), vec!["_dev/libgigagen-00002.so"]);
    assert_eq!(siblings_of(&fixture.plugins()), vec!["Plugins", "Scripts"]);
}

#[test]
fn test_reload_binding_without_reference_fails_before_mutation() {
    let fixture = Fixture::built();
    fixture.write_binding(&BINDING.replace(r#""gigagen""#, r#""other""#));
    let layout = layout(&fixture);
    support::write(&fixture.plugins().join("_dev/libgigagen-00001.so"), b"older dev");

    let err = DevReloader::new(&layout)
        .reload(Platform::Linux, &mut fixed(3), &ReloadOptions::default())
        .unwrap_err();

    assert!(matches!(err, DeployError::LibraryReferenceMissing { .. }));
    assert_eq!(list_files(&fixture.plugins()), vec!["_dev/libgigagen-00001.so"]);
    assert!(!fixture.scripts_binding().exists());
}

#[test]
fn test_rejected_binding_leaves_counter_alone() {
    let fixture = Fixture::built();
    fixture.write_binding(&BINDING.replace(r#""gigagen""#, r#""other""#));
    let layout = layout(&fixture);
    support::write(&layout.counter_path(), b"10\n");
    let mut ids = CounterIdSource::new(layout.counter_path(), ReloadConfig::default());

    let err = DevReloader::new(&layout)
        .reload(Platform::Linux, &mut ids, &ReloadOptions::default())
        .unwrap_err();

    assert!(matches!(err, DeployError::LibraryReferenceMissing { .. }));
    assert_eq!(fs::read_to_string(layout.counter_path()).unwrap(), "10\n");
    assert!(!layout.state_dir().join("deploy.lock").exists());
}

#[test]
fn test_rejected_binding_creates_no_state_dir() {
    let fixture = Fixture::built();
    fixture.write_binding(&format!("{BINDING}{BINDING}"));
    let layout = layout(&fixture);
    let mut ids = CounterIdSource::new(layout.counter_path(), ReloadConfig::default());

    let err = DevReloader::new(&layout)
        .reload(Platform::Windows, &mut ids, &ReloadOptions::default())
        .unwrap_err();

    assert!(matches!(err, DeployError::LibraryReferenceAmbiguous { count: 2, .. }));
    assert!(!layout.state_dir().exists());
    assert!(!fixture.project_root().join("Assets").exists());
}

#[test]
fn test_reload_duplicate_reference_is_ambiguous() {
    let fixture = Fixture::built();
    fixture.write_binding(&format!("{BINDING}\n// const string __DllName = \"gigagen\";\n"));
    let layout = layout(&fixture);

    let err = DevReloader::new(&layout)
        .reload(Platform::Windows, &mut fixed(3), &ReloadOptions::default())
        .unwrap_err();

    assert!(matches!(err, DeployError::LibraryReferenceAmbiguous { count: 2, .. }));
    assert!(!fixture.plugins().exists());
}

#[test]
fn test_reload_unknown_platform_mutates_nothing() {
    let fixture = Fixture::built();
    let layout = layout(&fixture);
    let mut ids = CounterIdSource::new(layout.counter_path(), ReloadConfig::default());

    let err = DevReloader::new(&layout)
        .reload_selector("macos", &mut ids, &ReloadOptions::default())
        .unwrap_err();

    assert_eq!(err.to_string(), "unknown platform 'macos'");
    assert!(!fixture.project_root().join("Assets").exists());
    assert!(!layout.state_dir().exists());
}

#[test]
fn test_reload_missing_dev_library() {
    let fixture = Fixture::empty();
    fixture.write_binding(BINDING);
    let layout = layout(&fixture);

    let err = DevReloader::new(&layout)
        .reload(Platform::Windows, &mut fixed(1), &ReloadOptions::default())
        .unwrap_err();

    match err {
        DeployError::MissingSource { kind, path } => {
            assert_eq!(kind, Platform::Windows.source_kind());
            assert!(path.ends_with("target/release/gigagen.dll"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!fixture.project_root().join("Assets").exists());
}

#[test]
fn test_counter_gives_distinct_names_across_reloads() {
    let fixture = Fixture::built();
    let layout = layout(&fixture);
    fs::create_dir_all(layout.state_dir()).unwrap();
    fs::write(layout.counter_path(), "99997\n").unwrap();
    let mut ids = CounterIdSource::new(layout.counter_path(), ReloadConfig::default());

    let mut seen = Vec::new();
    for _ in 0..3 {
        let receipt = DevReloader::new(&layout)
            .reload(Platform::Linux, &mut ids, &ReloadOptions::default())
            .unwrap();
        seen.push(receipt.reload_id.unwrap());
        assert_eq!(list_files(&fixture.plugins()).len(), 1);
    }

    assert_eq!(seen, vec!["99997", "99998", "00000"]);
    assert_eq!(ids.peek_id().unwrap().to_string(), "00001");
}

#[test]
fn test_pinned_id_does_not_touch_counter() {
    let fixture = Fixture::built();
    let layout = layout(&fixture);
    let mut ids = CounterIdSource::new(layout.counter_path(), ReloadConfig::default());
    let options = ReloadOptions {
        reload_id: Some(42),
        dry_run: false,
    };

    DevReloader::new(&layout)
        .reload(Platform::Linux, &mut ids, &options)
        .unwrap();

    assert_eq!(list_files(&fixture.plugins()), vec!["_dev/libgigagen-00042.so"]);
    assert!(!layout.counter_path().exists());
}
