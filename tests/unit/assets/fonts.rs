use super::*;

#[test]
fn empty_catalog_fails_with_render_error() {
    let catalog = FontCatalog::empty();
    assert!(catalog.is_empty());
    assert!(catalog.families().is_empty());
    let err = catalog.resolve("Poppins", FontWeight::Bold).unwrap_err();
    assert!(matches!(err, CertstampError::Render(_)));
}

#[test]
fn missing_directory_loads_nothing() {
    let mut catalog = FontCatalog::empty();
    let loaded = catalog.load_dir(Path::new("this/dir/does/not/exist"));
    assert_eq!(loaded, 0);
    assert!(catalog.is_empty());
}

#[test]
fn directory_scan_ignores_non_font_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"not a font").unwrap();
    std::fs::write(dir.path().join("image.png"), b"not a font either").unwrap();

    let mut catalog = FontCatalog::empty();
    assert_eq!(catalog.load_dir(dir.path()), 0);
    assert!(catalog.is_empty());
}

#[test]
fn generic_names_map_to_generic_families() {
    assert!(matches!(requested_family("serif"), fontdb::Family::Serif));
    assert!(matches!(
        requested_family("Sans-Serif"),
        fontdb::Family::SansSerif
    ));
    assert!(matches!(
        requested_family("monospace"),
        fontdb::Family::Monospace
    ));
    assert!(matches!(
        requested_family("Georgia"),
        fontdb::Family::Name("Georgia")
    ));
}

#[test]
fn system_catalog_resolves_some_face_when_fonts_exist() {
    let catalog = FontCatalog::system();
    let Some(family) = catalog.families().into_iter().next() else {
        eprintln!("no system fonts installed; skipping");
        return;
    };

    let face = catalog.resolve(&family, FontWeight::Normal).unwrap();
    assert!(!face.bytes.is_empty());
    assert!(!face.is_fallback);

    let fallback = catalog
        .resolve("Definitely Not A Real Family 1234", FontWeight::Bold)
        .unwrap();
    assert!(fallback.is_fallback);
    assert!(!fallback.bytes.is_empty());
}
