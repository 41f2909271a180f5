//! Resolving rider-typed station and line names.
//!
//! Riders type partial or slightly misspelled names. Stations resolve by
//! exact case-insensitive match, then by prefix or substring. Lines add a
//! Levenshtein fallback so "yelow line" still finds "YELLOW LINE".

use crate::domain::{Line, LineId};

use super::Dataset;

/// Resolve a station name anywhere in the dataset.
///
/// Exact case-insensitive match first, then the first station in name
/// order that starts with the query.
pub fn match_station<'a>(dataset: &'a Dataset, query: &str) -> Option<&'a str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    dataset
        .station_names()
        .find(|name| name.to_lowercase() == query)
        .or_else(|| {
            dataset
                .station_names()
                .find(|name| name.to_lowercase().starts_with(&query))
        })
}

/// Resolve a station on one line, returning its position.
///
/// Exact case-insensitive match first; otherwise among stations whose name
/// contains the query, one that starts with it is preferred, else the first
/// in line order.
pub fn match_station_on_line(line: &Line, query: &str) -> Option<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let lowered: Vec<String> = line
        .stations()
        .iter()
        .map(|s| s.name.to_lowercase())
        .collect();

    if let Some(idx) = lowered.iter().position(|name| *name == query) {
        return Some(idx);
    }

    let candidates: Vec<usize> = lowered
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains(&query))
        .map(|(idx, _)| idx)
        .collect();

    candidates
        .iter()
        .copied()
        .find(|&idx| lowered[idx].starts_with(&query))
        .or_else(|| candidates.first().copied())
}

/// Resolve a line name.
///
/// 1. Exact case-insensitive match.
/// 2. Substring match in either direction; a single candidate wins, several
///    prefer one starting with the query, else the first.
/// 3. Closest normalized name by edit distance, accepted only within
///    `max(1, min(3, len / 3))` edits of the candidate's length.
pub fn match_line(dataset: &Dataset, query: &str) -> Option<LineId> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let names: Vec<(LineId, String)> = dataset
        .iter()
        .map(|(id, line)| (id, line.name().to_lowercase()))
        .collect();

    if let Some((id, _)) = names.iter().find(|(_, name)| *name == query) {
        return Some(*id);
    }

    let substring: Vec<&(LineId, String)> = names
        .iter()
        .filter(|(_, name)| name.contains(&query) || query.contains(name.as_str()))
        .collect();
    if let Some((id, _)) = substring
        .iter()
        .find(|(_, name)| name.starts_with(&query))
        .or_else(|| substring.first())
    {
        return Some(*id);
    }

    let normalized_query = normalize(&query);
    let (id, candidate, distance) = names
        .iter()
        .map(|(id, name)| {
            let candidate = normalize(name);
            let distance = levenshtein(&normalized_query, &candidate);
            (*id, candidate, distance)
        })
        .min_by_key(|(_, _, distance)| *distance)?;

    let allowed = (candidate.chars().count() / 3).clamp(1, 3);
    (distance <= allowed).then_some(id)
}

/// Lowercase, keep only alphanumerics and whitespace, trim.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Edit distance counting single-character insertions, deletions and
/// substitutions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixture;

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("yelow line", "yellow line"), 1);
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("  Blue-Line (Main) "), "blueline main");
    }

    #[test]
    fn station_exact_then_prefix() {
        let dataset = fixture::network();
        assert_eq!(match_station(&dataset, "central"), Some("Central"));
        assert_eq!(match_station(&dataset, " DELTA "), Some("Delta"));
        assert_eq!(match_station(&dataset, "delta p"), Some("Delta Park"));
        assert_eq!(match_station(&dataset, "ha"), Some("Harbour"));
        assert_eq!(match_station(&dataset, "arbour"), None);
        assert_eq!(match_station(&dataset, ""), None);
    }

    #[test]
    fn station_on_line_prefers_prefix() {
        let dataset = fixture::network();
        let red = &dataset.lines()[0];
        assert_eq!(match_station_on_line(red, "bravo"), Some(1));
        assert_eq!(match_station_on_line(red, "ta"), Some(3));
        assert_eq!(match_station_on_line(red, "al"), Some(0));
        assert_eq!(match_station_on_line(red, "north"), None);

        let orange = &dataset.lines()[3];
        assert_eq!(match_station_on_line(orange, "park"), Some(0));
    }

    #[test]
    fn line_exact_and_substring() {
        let dataset = fixture::network();
        assert_eq!(match_line(&dataset, "blue line"), Some(LineId(1)));
        assert_eq!(match_line(&dataset, "orange"), Some(LineId(3)));
        assert_eq!(match_line(&dataset, "RED LINE please"), Some(LineId(0)));
        // Several contain "line"; none starts with it, so the first wins.
        assert_eq!(match_line(&dataset, "line"), Some(LineId(0)));
    }

    #[test]
    fn line_fuzzy_match() {
        let dataset = fixture::network();
        assert_eq!(match_line(&dataset, "gren line"), Some(LineId(2)));
        assert_eq!(match_line(&dataset, "grey lnie"), Some(LineId(4)));
        assert_eq!(match_line(&dataset, "purple route"), None);
        assert_eq!(match_line(&dataset, "   "), None);
    }
}
