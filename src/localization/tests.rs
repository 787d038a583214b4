//! Tests for localization tables and templates.

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const BUNDLE: &str = "\u{feff}/*\nCopyright (c) 2003-2023, CKSource Holding sp. z o.o. All rights reserved.\n*/\nCKEDITOR.lang['gl']={\"application\":\"Editor de texto mellorado\",\"common\":{\"ok\":\"Aceptar\",\"invalidLength\":\"O valor especificado para o campo «%1» debe ser un número positivo (%2).\"},\"table\":{\"cell\":{\"menu\":\"Cela\"}},\"clipboard\":{\"fileFormatNotSupportedNotification\":\"Os formatos de ficheiro ${formats} non son compatíbeis.\"},\"uploadwidget\":{\"uploadMany\":\"Enviando ficheiros, {current} de {max} feito o ({percentage}%)...\"}};";

// ==================== Bundle parsing tests ====================

#[test]
fn test_parse_bundle_language() {
    let table = LocalizationTable::parse_editor_bundle(BUNDLE).unwrap();
    assert_eq!(table.language(), "gl");
    assert_eq!(table.len(), 6);
    assert!(!table.is_empty());
}

#[test]
fn test_parse_bundle_flattens_keys() {
    let table = LocalizationTable::parse_editor_bundle(BUNDLE).unwrap();
    assert_eq!(table.get("application"), Some("Editor de texto mellorado"));
    assert_eq!(table.get("common.ok"), Some("Aceptar"));
    assert_eq!(table.get("table.cell.menu"), Some("Cela"));
    assert_eq!(table.get("common"), None);
    assert_eq!(table.get("missing.key"), None);
}

#[test]
fn test_keys_sorted() {
    let table = LocalizationTable::parse_editor_bundle(BUNDLE).unwrap();
    let keys: Vec<&str> = table.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_parse_bundle_double_quoted_code() {
    let table =
        LocalizationTable::parse_editor_bundle("CKEDITOR.lang[\"pt-br\"] = {\"a\":\"b\"};").unwrap();
    assert_eq!(table.language(), "pt-br");
    assert_eq!(table.get("a"), Some("b"));
}

#[test]
fn test_parse_bundle_missing_header() {
    let result = LocalizationTable::parse_editor_bundle("{\"a\":\"b\"}");
    assert!(matches!(result, Err(LocalizationError::MissingHeader)));
}

#[test]
fn test_parse_bundle_invalid_json() {
    let result = LocalizationTable::parse_editor_bundle("CKEDITOR.lang['gl']={\"a\":};");
    assert!(matches!(result, Err(LocalizationError::Json(_))));
}

#[test]
fn test_from_json_rejects_non_string_values() {
    let result = LocalizationTable::from_json("gl", "{\"common\":{\"count\":3}}");
    match result {
        Err(LocalizationError::UnsupportedValue { key }) => assert_eq!(key, "common.count"),
        other => panic!("expected unsupported value, got {:?}", other),
    }
}

#[test]
fn test_from_json_rejects_non_object_root() {
    let result = LocalizationTable::from_json("gl", "[\"a\"]");
    assert!(matches!(result, Err(LocalizationError::NotAnObject)));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(BUNDLE.as_bytes()).unwrap();

    let table = LocalizationTable::load(file.path()).unwrap();
    assert_eq!(table.get("common.ok"), Some("Aceptar"));
}

#[test]
fn test_table_does_not_substitute() {
    let table = LocalizationTable::parse_editor_bundle(BUNDLE).unwrap();
    let text = table.get("uploadwidget.uploadMany").unwrap();
    assert!(text.contains("{current}"));
    assert!(text.contains("{percentage}%"));
}

// ==================== Placeholder tests ====================

#[test]
fn test_placeholders_positional() {
    let found = placeholders("O valor para o campo «%1» debe ser (%2).");
    assert_eq!(
        found,
        vec![Placeholder::Positional(1), Placeholder::Positional(2)]
    );
}

#[test]
fn test_placeholders_named() {
    let found = placeholders("Enviando ficheiros, {current} de {max} feito o ({percentage}%)...");
    assert_eq!(
        found,
        vec![
            Placeholder::Named("current".into()),
            Placeholder::Named("max".into()),
            Placeholder::Named("percentage".into()),
        ]
    );
}

#[test]
fn test_placeholders_dollar_brace() {
    let found = placeholders("Os formatos ${formats} non son compatíbeis.");
    assert_eq!(found, vec![Placeholder::Named("formats".into())]);
}

#[test]
fn test_placeholders_ignores_literals() {
    assert!(placeholders("100% {} { spaced } %0 $").is_empty());
}

// ==================== Render tests ====================

#[test]
fn test_render_positional() {
    let args = TemplateArgs::new().arg("Largo").arg("px, %");
    assert_eq!(
        render("O campo «%1» admite (%2).", &args),
        "O campo «Largo» admite (px, %)."
    );
}

#[test]
fn test_render_named() {
    let args = TemplateArgs::new()
        .named("current", "2")
        .named("max", "5")
        .named("percentage", "40");
    assert_eq!(
        render("{current} de {max} ({percentage}%)", &args),
        "2 de 5 (40%)"
    );
}

#[test]
fn test_render_dollar_brace() {
    let args = TemplateArgs::new().named("formats", "PNG, JPG");
    assert_eq!(render("Formatos ${formats}.", &args), "Formatos PNG, JPG.");
}

#[test]
fn test_render_leaves_unknown_placeholders() {
    let args = TemplateArgs::new().arg("x");
    assert_eq!(render("%1 %2 {max}", &args), "x %2 {max}");
}
