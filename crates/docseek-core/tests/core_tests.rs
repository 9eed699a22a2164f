use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use docseek_core::config::{BackendKind, Config};
use docseek_core::traits::TextSource;
use docseek_core::{Error, FolderExtractor, SearchRequest};

#[test]
fn extract_walks_tree_in_sorted_order_with_relative_paths() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("pets/cats")).unwrap();
    fs::write(dir.join("b.txt"), "bravo").unwrap();
    fs::write(dir.join("a.md"), "alpha").unwrap();
    fs::write(dir.join("pets/cats/tom.txt"), "Кошка спит на стуле.").unwrap();

    let docs = FolderExtractor::new().extract(dir).expect("extract");
    let paths: Vec<PathBuf> = docs.iter().map(|d| d.path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("a.md"), PathBuf::from("b.txt"), PathBuf::from("pets/cats/tom.txt")]);
    assert_eq!(docs[2].text, "Кошка спит на стуле.");
}

#[test]
fn extract_skips_formats_without_a_decoder() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("notes.txt"), "kept").unwrap();
    fs::write(dir.join("report.pdf"), [0x25u8, 0x50, 0x44, 0x46]).unwrap();
    fs::write(dir.join("letter.docx"), [0x50u8, 0x4b, 0x03, 0x04]).unwrap();

    let docs = FolderExtractor::new().extract(dir).expect("extract");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].path, PathBuf::from("notes.txt"));
}

#[test]
fn extract_decodes_invalid_utf8_lossily() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.txt"), [b'o', b'k', 0xff, b'!']).unwrap();
    let docs = FolderExtractor::new().extract(tmp.path()).expect("extract");
    assert!(docs[0].text.starts_with("ok"));
    assert!(docs[0].text.ends_with('!'));
}

#[test]
fn extract_rejects_missing_root() {
    let tmp = TempDir::new().unwrap();
    let err = FolderExtractor::new().extract(&tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, Error::Extraction { .. }));
}

#[cfg(unix)]
#[test]
fn extract_skips_unreadable_entries() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("cats.txt"), "Кошка спит на стуле.").unwrap();
    fs::write(dir.join("locked.txt"), "secret").unwrap();
    fs::create_dir_all(dir.join("vault")).unwrap();
    fs::write(dir.join("vault/inner.txt"), "hidden").unwrap();
    fs::set_permissions(dir.join("locked.txt"), fs::Permissions::from_mode(0o000)).unwrap();
    fs::set_permissions(dir.join("vault"), fs::Permissions::from_mode(0o000)).unwrap();

    let result = FolderExtractor::new().extract(dir);

    fs::set_permissions(dir.join("vault"), fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(dir.join("locked.txt"), fs::Permissions::from_mode(0o644)).unwrap();

    let docs = result.expect("unreadable entries must not abort extraction");
    let paths: Vec<PathBuf> = docs.iter().map(|d| d.path.clone()).collect();
    assert_eq!(paths[0], PathBuf::from("cats.txt"));
    assert_eq!(docs[0].text, "Кошка спит на стуле.");
    // a privileged user can still read both, otherwise they are left out
    assert!(paths.len() == 1 || paths.len() == 3, "{paths:?}");
}

#[test]
fn custom_extension_list_is_case_insensitive() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("README.RST"), "text").unwrap();
    fs::write(tmp.path().join("a.txt"), "text").unwrap();
    let docs = FolderExtractor::with_extensions(["rst"]).extract(tmp.path()).expect("extract");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].path, PathBuf::from("README.RST"));
}

#[test]
fn settings_defaults_apply_when_sections_are_missing() {
    let settings = Config::from_toml_str("").settings().expect("settings");
    assert_eq!(settings.search.chunk_length, 400);
    assert_eq!(settings.search.top_k, 5);
    assert!(settings.search.workers >= 1);
    assert_eq!(settings.index.backend, BackendKind::Lance);
    assert_eq!(settings.normalizer.cyrillic_language, "russian");
}

#[test]
fn settings_read_overrides_and_reject_zero_bounds() {
    let cfg = Config::from_toml_str("[search]\nchunk_length = 120\ntop_k = 3\n[index]\nbackend = \"memory\"\n");
    let settings = cfg.settings().expect("settings");
    assert_eq!(settings.search.chunk_length, 120);
    assert_eq!(settings.search.top_k, 3);
    assert_eq!(settings.index.backend, BackendKind::Memory);
    let top_k: usize = cfg.get("search.top_k").expect("get");
    assert_eq!(top_k, 3);

    let bad = Config::from_toml_str("[search]\ntop_k = 0\n").settings();
    assert!(matches!(bad, Err(Error::InvalidConfig(_))));
}

#[test]
fn search_request_validates_fields() {
    let req = SearchRequest::new("/docs", "кошки", 400, 5).expect("valid");
    assert_eq!(req.query(), "кошки");
    assert_eq!(req.chunk_length(), 400);
    assert_eq!(req.top_k(), 5);

    assert!(matches!(SearchRequest::new("/docs", "q", 0, 5), Err(Error::InvalidConfig(_))));
    assert!(matches!(SearchRequest::new("/docs", "q", 10, 0), Err(Error::InvalidConfig(_))));
    assert!(matches!(SearchRequest::new("/docs", "  ", 10, 5), Err(Error::InvalidConfig(_))));
}

#[test]
fn expand_path_resolves_env_vars() {
    std::env::set_var("DOCSEEK_TEST_ROOT", "/srv/data");
    let p = docseek_core::config::expand_path("${DOCSEEK_TEST_ROOT}/indexes");
    assert_eq!(p, PathBuf::from("/srv/data/indexes"));
}
