//! Table naming rules.
//!
//! A table name is non-empty, consists of ASCII letters and digits,
//! does not start with a digit and does not end with `Ref`. The suffix is
//! reserved for reference fields: stripping it from a field name yields
//! the name of the table the field points into.

use crate::error::{NameError, NameViolation};
use crate::{HASH_KEY, REF_SUFFIX};

/// Check a single table name.
pub fn validate_table_name(name: &str) -> Result<(), NameError> {
    let reject = |reason| {
        Err(NameError {
            name: name.to_string(),
            reason,
        })
    };

    let Some(first) = name.chars().next() else {
        return reject(NameViolation::Empty);
    };

    if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return reject(NameViolation::InvalidCharacter(c));
    }

    if first.is_ascii_digit() {
        return reject(NameViolation::StartsWithDigit);
    }

    if name.ends_with(REF_SUFFIX) {
        return reject(NameViolation::EndsWithRef);
    }

    Ok(())
}

/// Check every name, skipping the reserved `_hash` key.
///
/// All violations are collected rather than stopping at the first.
pub fn validate_table_names<'a, I>(names: I) -> Result<(), Vec<NameError>>
where
    I: IntoIterator<Item = &'a str>,
{
    let errors: Vec<NameError> = names
        .into_iter()
        .filter(|name| *name != HASH_KEY)
        .filter_map(|name| validate_table_name(name).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Target table of a reference field, or `None` for plain fields.
///
/// ```
/// use rljson_core::ref_target;
///
/// assert_eq!(ref_target("tableARef"), Some("tableA"));
/// assert_eq!(ref_target("name"), None);
/// ```
pub fn ref_target(field: &str) -> Option<&str> {
    field.strip_suffix(REF_SUFFIX)
}
