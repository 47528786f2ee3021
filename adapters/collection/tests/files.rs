use std::{
    fs,
    path::PathBuf,
    process,
    sync::atomic::{AtomicUsize, Ordering},
};

use pushbox_collection::{export, import, CollectionError, ExportOptions};

static NEXT: AtomicUsize = AtomicUsize::new(0);

fn scratch(extension: &str) -> PathBuf {
    let id = NEXT.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "pushbox-collection-{}-{id}.{extension}",
        process::id()
    ))
}

const DUPLICATES: &str = "\
Twin
#####
#@$.#
#####

Twin
######
#@ $.#
######
Par: 2
";

#[test]
fn duplicate_names_are_renamed_and_reported() {
    let path = scratch("sok");
    fs::write(&path, DUPLICATES).expect("write fixture");

    let imported = import(&path).expect("collection imports");
    fs::remove_file(&path).expect("remove fixture");

    let names: Vec<&str> = imported.levels.keys().map(String::as_str).collect();
    assert_eq!(names, ["Twin", "Twin (2)"]);
    assert_eq!(imported.levels["Twin (2)"].name(), "Twin (2)");
    assert_eq!(imported.levels["Twin (2)"].size_x(), 6);
    assert!(imported.report.starts_with("loaded 2 level(s)"));
    assert!(imported.report.contains("renamed duplicate level `Twin` to `Twin (2)`"));
}

#[test]
fn export_then_import_keeps_levels() {
    let source = scratch("sok");
    fs::write(&source, DUPLICATES).expect("write fixture");
    let imported = import(&source).expect("collection imports");
    fs::remove_file(&source).expect("remove fixture");

    let target = scratch("txt");
    export(&target, &imported.levels, ExportOptions { compact: true }).expect("export");
    let reimported = import(&target).expect("exported collection imports");
    fs::remove_file(&target).expect("remove export");

    assert_eq!(reimported.levels.len(), 2);
    for (name, level) in &imported.levels {
        let copy = &reimported.levels[name];
        assert_eq!(copy.columns(), level.columns());
        assert!(copy.metadata_entries().eq(level.metadata_entries()));
    }
}

#[test]
fn missing_file_reports_open_error() {
    let path = scratch("sok");
    match import(&path) {
        Err(CollectionError::Open { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected open error, got {other:?}"),
    }
}
