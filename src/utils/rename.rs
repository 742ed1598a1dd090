use std::{
    ffi::{OsStr, OsString},
    path::Path,
};

use crate::config::RenameRule;

/// New file name for `name` under the first rule whose suffix matches, if any.
///
/// A rule's `except` list stops the search: `foo.d.ts` matches the `.ts` rule,
/// is excepted, and stays as it is. Names need not be valid UTF-8.
pub fn renamed_file_name(name: &OsStr, rules: &[RenameRule]) -> Option<OsString> {
    let bytes = name.as_encoded_bytes();
    let rule = rules
        .iter()
        .find(|rule| bytes.ends_with(rule.from.as_bytes()))?;
    if rule
        .except
        .iter()
        .any(|suffix| bytes.ends_with(suffix.as_bytes()))
    {
        return None;
    }

    let stem = strip_suffix(name, &rule.from)?;
    let mut renamed = stem.to_os_string();
    renamed.push(&rule.to);
    Some(renamed)
}

/// `name` without `suffix`, peeling one extension per `.` in the suffix.
/// `None` when nothing would remain.
fn strip_suffix<'a>(name: &'a OsStr, suffix: &str) -> Option<&'a OsStr> {
    let mut stem = Path::new(name);
    for _ in 0..suffix.matches('.').count() {
        stem = Path::new(stem.file_stem()?);
    }
    let stem = stem.as_os_str();
    let expected = name.as_encoded_bytes().len() - suffix.len();
    (expected > 0 && stem.as_encoded_bytes().len() == expected).then_some(stem)
}
