//! Column resolution: map logical fields onto an unknown header
//!
//! Two passes over the catalogue. First every field tries its exact
//! candidates in priority order. Fields still missing then scan the header,
//! in header order, for a keyword substring (case- and accent-insensitive),
//! skipping columns another field already claimed.

use std::collections::HashSet;

use crate::model::{Catalogue, FieldMapping, FieldSpec, MatchSource, ResolvedColumn};

/// Resolve every catalogue field against `headers`.
///
/// Deterministic: the same header and catalogue always give the same mapping.
pub fn resolve_columns(headers: &[String], catalogue: &Catalogue) -> FieldMapping {
    let fields = catalogue.fields();

    let mut picks: Vec<Option<(String, MatchSource)>> = fields
        .iter()
        .map(|(_, spec)| exact_match(headers, spec).map(|c| (c.to_string(), MatchSource::Exact)))
        .collect();

    let mut claimed: HashSet<String> = picks
        .iter()
        .flatten()
        .map(|(column, _)| column.clone())
        .collect();

    for (pick, (_, spec)) in picks.iter_mut().zip(fields.iter()) {
        if pick.is_some() {
            continue;
        }
        if let Some(column) = keyword_match(headers, spec, &claimed) {
            claimed.insert(column.to_string());
            *pick = Some((column.to_string(), MatchSource::Keyword));
        }
    }

    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    for ((field, _), pick) in fields.into_iter().zip(picks) {
        match pick {
            Some((column, source)) => resolved.push(ResolvedColumn {
                field,
                column,
                source,
            }),
            None => unresolved.push(field),
        }
    }

    FieldMapping::from_parts(resolved, unresolved)
}

fn exact_match<'a>(headers: &'a [String], spec: &FieldSpec) -> Option<&'a str> {
    spec.candidates
        .iter()
        .find_map(|candidate| headers.iter().find(|h| *h == candidate))
        .map(String::as_str)
}

fn keyword_match<'a>(
    headers: &'a [String],
    spec: &FieldSpec,
    claimed: &HashSet<String>,
) -> Option<&'a str> {
    if spec.keywords.is_empty() {
        return None;
    }
    let keywords: Vec<String> = spec.keywords.iter().map(|k| fold(k)).collect();
    let exclude: Vec<String> = spec.exclude.iter().map(|k| fold(k)).collect();

    headers
        .iter()
        .filter(|h| !claimed.contains(h.as_str()))
        .find(|h| {
            let folded = fold(h);
            keywords.iter().any(|k| folded.contains(k.as_str()))
                && !exclude.iter().any(|x| folded.contains(x.as_str()))
        })
        .map(String::as_str)
}

/// Uppercase with acute/grave accents and diaeresis removed. Ñ stays distinct.
fn fold(s: &str) -> String {
    s.to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            other => other,
        })
        .collect()
}
