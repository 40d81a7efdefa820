//! Pattern-based selection, replacement, and deletion across a key's
//! ordered value sequence.

use super::entries::EntryMap;
use crate::core::{Result, StoreError};
use regex::Regex;

/// Compiles an optional pattern. `None` means match-all. Compilation errors
/// surface before any store mutation happens.
fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    match pattern {
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|e| StoreError::Pattern(e.to_string())),
        None => Ok(None),
    }
}

fn is_match(matcher: Option<&Regex>, value: &str) -> bool {
    matcher.is_none_or(|re| re.is_match(value))
}

/// Replaces every value of `name` matching `pattern` with `value`, in place,
/// preserving positions. Appends `value` when nothing matched — the
/// compatibility behavior of the reference file backend. Creates the key
/// with `[value]` when absent.
pub fn set_multivar(
    map: &mut EntryMap,
    name: &str,
    pattern: Option<&str>,
    value: &str,
) -> Result<()> {
    let matcher = compile(pattern)?;

    if !map.contains(name) {
        map.set_all(name, vec![value.to_string()]);
        return Ok(());
    }

    if let Some(bucket) = map.bucket_mut(name) {
        let mut found = false;
        for n in 0..bucket.len() {
            if is_match(matcher.as_ref(), &bucket[n]) {
                bucket[n] = value.to_string();
                found = true;
            }
        }
        if !found {
            bucket.push(value.to_string());
        }
    }
    Ok(())
}

/// Removes every value of `name` matching `pattern`, compacting the
/// survivors into a zero-based sequence in their original relative order.
/// Removes the key itself when nothing survives.
pub fn del_multivar(map: &mut EntryMap, name: &str, pattern: Option<&str>) -> Result<()> {
    let matcher = compile(pattern)?;

    if !map.contains(name) {
        return Err(StoreError::NotFound(name.to_string()));
    }

    let mut emptied = false;
    if let Some(bucket) = map.bucket_mut(name) {
        bucket.retain(|value| !is_match(matcher.as_ref(), value));
        emptied = bucket.is_empty();
    }
    if emptied {
        map.remove(name);
    }
    Ok(())
}
