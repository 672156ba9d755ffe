//! Path compiler.
//!
//! ```text
//! path      = [namespace ":"] attr *("." attr)
//! attr      = name ["[" filter "]"]
//! namespace = known schema URN | "urn:" ...
//! ```
//!
//! A namespace prefix compiles to its own leading [`Step::Path`], so callers
//! can decide whether it addresses a container (an extension) or is just a
//! redundant qualifier (the main schema).

use scim_schema::{Result, ScimError};

use crate::expression::{Expression, Step};
use crate::parser::compile_filter;

/// Compile a path without any known namespaces.
pub fn compile_path(path: &str) -> Result<Expression> {
    compile_path_in(path, &[])
}

/// Compile a path, recognizing the given schema namespaces as prefixes.
///
/// Known namespaces match case-insensitively and are emitted in their
/// registered spelling. An unknown `urn:` prefix ends at the last `:`
/// before the first `[`; attribute names never contain `:`.
pub fn compile_path_in(path: &str, namespaces: &[&str]) -> Result<Expression> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ScimError::invalid_path("path is empty"));
    }

    let mut steps = Vec::new();
    let rest = match split_namespace(path, namespaces)? {
        Some((ns, rest)) => {
            steps.push(Step::Path(ns));
            rest
        }
        None => path,
    };

    if !rest.is_empty() {
        parse_attributes(rest, path, &mut steps)?;
    }

    Expression::from_steps(steps).ok_or_else(|| ScimError::invalid_path("path is empty"))
}

fn split_namespace<'a>(path: &'a str, namespaces: &[&str]) -> Result<Option<(String, &'a str)>> {
    let mut known: Vec<&str> = namespaces.to_vec();
    known.sort_by_key(|ns| std::cmp::Reverse(ns.len()));
    for ns in known {
        let Some(prefix) = path.get(..ns.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(ns) {
            continue;
        }
        let rest = &path[ns.len()..];
        if rest.is_empty() {
            return Ok(Some((ns.to_string(), rest)));
        }
        if let Some(rest) = rest.strip_prefix(':') {
            return Ok(Some((ns.to_string(), rest)));
        }
    }

    let is_urn = path.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("urn:"));
    if !is_urn {
        return Ok(None);
    }
    let boundary = path.find('[').unwrap_or(path.len());
    match path[..boundary].rfind(':') {
        Some(idx) if idx > 3 && idx + 1 < path.len() => {
            Ok(Some((path[..idx].to_string(), &path[idx + 1..])))
        }
        _ => Err(ScimError::invalid_path(format!(
            "'{path}' has a namespace but no attribute"
        ))),
    }
}

fn parse_attributes(rest: &str, full: &str, steps: &mut Vec<Step>) -> Result<()> {
    let bytes = rest.as_bytes();
    let mut pos = 0;

    loop {
        let start = pos;
        while pos < bytes.len() && !matches!(bytes[pos], b'.' | b'[') {
            pos += 1;
        }
        let name = &rest[start..pos];
        validate_name(name, full)?;
        steps.push(Step::Path(name.to_string()));

        if pos < bytes.len() && bytes[pos] == b'[' {
            let close = closing_bracket(rest, pos).ok_or_else(|| {
                ScimError::invalid_path(format!("unbalanced '[' in '{full}'"))
            })?;
            let filter = compile_filter(&rest[pos + 1..close])?;
            steps.push(Step::Filter(filter));
            pos = close + 1;
        }

        if pos >= bytes.len() {
            return Ok(());
        }
        if bytes[pos] != b'.' {
            return Err(ScimError::invalid_path(format!(
                "expected '.' after filter in '{full}'"
            )));
        }
        pos += 1;
    }
}

/// Index of the `]` closing the `[` at `open`, skipping quoted text.
fn closing_bracket(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut pos = open + 1;
    let mut in_string = false;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if in_string => pos += 1,
            b'"' => in_string = !in_string,
            b']' if !in_string => return Some(pos),
            b'[' if !in_string => return None,
            _ => {}
        }
        pos += 1;
    }
    None
}

fn validate_name(name: &str, full: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScimError::invalid_path(format!(
            "empty attribute name in '{full}'"
        )));
    }
    let valid = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '$' || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '$' | '_' | '-'));
    if !valid {
        return Err(ScimError::invalid_path(format!(
            "invalid attribute name '{name}' in '{full}'"
        )));
    }
    Ok(())
}
