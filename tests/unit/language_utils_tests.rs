/*!
 * Tests for language identifier utilities
 */

use sheetlate::language_utils::{
    base_subtag, dedupe_languages, get_language_name, target_field_name, validate_language_identifier,
};

#[test]
fn test_target_field_name_withSameBaseSubtag_shouldStayDistinct() {
    assert_ne!(target_field_name("desc", "pt-BR"), target_field_name("desc", "pt-PT"));
    assert_eq!(base_subtag("pt-BR"), base_subtag("pt-PT"));
}

#[test]
fn test_dedupe_languages_shouldKeepFirstOccurrence() {
    assert_eq!(dedupe_languages(["de", " en", "de ", ""]), vec!["de", "en"]);
}

#[test]
fn test_dedupe_languages_shouldTreatCaseAsDistinct() {
    assert_eq!(dedupe_languages(["pt-BR", "pt-br"]), vec!["pt-BR", "pt-br"]);
}

#[test]
fn test_validate_language_identifier_withThreeLetterCode_shouldPass() {
    assert!(validate_language_identifier("spa").is_ok());
    assert!(validate_language_identifier("zh-Hant-TW").is_ok());
    assert!(validate_language_identifier("english").is_err());
}

#[test]
fn test_get_language_name_shouldResolveBaseSubtag() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("pt-BR").unwrap(), "Portuguese");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert!(get_language_name("xx").is_err());
}
