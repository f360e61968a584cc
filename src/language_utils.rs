use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language utilities for target language identifiers
///
/// Identifiers are short codes such as `es` or `fr`, optionally carrying
/// region or script subtags (`pt-BR`, `zh-Hant`). Providers only receive the
/// base subtag; target column names keep the identifier as the user typed it.
static LANGUAGE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8})*$").expect("language identifier pattern is valid")
});

/// Separator placed between the source column name and the language identifier
pub const TARGET_FIELD_SEPARATOR: char = '_';

/// Check that an identifier looks like a language tag (`es`, `pt-BR`, `zh-Hant-TW`)
pub fn validate_language_identifier(identifier: &str) -> Result<()> {
    let trimmed = identifier.trim();
    if LANGUAGE_IDENTIFIER.is_match(trimmed) {
        Ok(())
    } else {
        Err(anyhow!("Invalid language identifier: '{}'", identifier))
    }
}

/// Reduce an identifier to the base subtag handed to providers.
///
/// Splits on the first `-` and lowercases the leading part, so `pt-BR`
/// becomes `pt` and `EN` becomes `en`.
pub fn base_subtag(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let base = trimmed.split_once('-').map_or(trimmed, |(base, _)| base);
    base.to_lowercase()
}

/// Name of the column holding translations of `source_field` into `language`.
///
/// Pure function of its inputs: the identifier is only trimmed, never
/// normalized, so `desc` + `pt-BR` is always `desc_pt-BR`.
pub fn target_field_name(source_field: &str, language: &str) -> String {
    format!("{}{}{}", source_field, TARGET_FIELD_SEPARATOR, language.trim())
}

/// Split a comma separated list of identifiers.
///
/// Entries are trimmed, blanks are dropped and duplicates keep their first
/// occurrence.
pub fn parse_language_list(input: &str) -> Vec<String> {
    dedupe_languages(input.split(','))
}

/// Trim, drop blanks and remove duplicate identifiers while keeping order
pub fn dedupe_languages<I, S>(languages: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for language in languages {
        let trimmed = language.as_ref().trim();
        if trimmed.is_empty() || result.iter().any(|existing| existing == trimmed) {
            continue;
        }
        result.push(trimmed.to_string());
    }
    result
}

/// Look up the English name of an identifier's base subtag
pub fn get_language_name(identifier: &str) -> Result<String> {
    let base = base_subtag(identifier);
    let language = match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", identifier))
}
