//! Edit-distance based string similarity used by the name and drug extractors.
//!
//! Two metrics live here and are deliberately kept separate: the Levenshtein
//! similarity drives roster-spelling correction, while the cheaper
//! character-overlap ratio drives the drug-vs-patient-name skip filter.

/// Compute Levenshtein edit distance between two strings.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Normalized Levenshtein similarity in [0,1].
///
/// `(max_len - distance) / max_len`; two empty strings are identical (1.0).
/// Case-insensitive: OCR text and roster entries differ freely in case.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_uppercase();
    let b = b.to_uppercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    (max_len - edit_distance(&a, &b)) as f64 / max_len as f64
}

/// Character-overlap ratio: fraction of `name`'s characters that appear
/// anywhere in `candidate`, case-insensitive.
///
/// Much cheaper than edit distance and intentionally order-blind; used to
/// spot a patient's name bleeding into a drug-name candidate line.
pub fn char_overlap(name: &str, candidate: &str) -> f64 {
    let name_upper = name.to_uppercase();
    let candidate_upper = candidate.to_uppercase();
    let total = name_upper.chars().count();
    if total == 0 {
        return 0.0;
    }
    let present = name_upper
        .chars()
        .filter(|&c| candidate_upper.contains(c))
        .count();
    present as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("DOXYCYCLINE", "DOXYCYCLlNE"), 1);
    }

    #[test]
    fn similarity_bounds() {
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("abc", "abc") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("abc", "xyz")).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_is_case_insensitive() {
        assert!((similarity("Lisinopril", "LISINOPRIL") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_single_substitution() {
        // SMITH vs SMYTH: one substitution over five characters
        assert!((similarity("SMITH", "SMYTH") - 0.8).abs() < 1e-9);
        // JOHM vs JOHN: one substitution over four characters
        assert!((similarity("JOHM", "JOHN") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn full_name_with_two_substitutions_stays_close() {
        assert!(similarity("JOHM SMITH", "JOHN SMYTH") >= 0.8);
    }

    #[test]
    fn char_overlap_counts_present_characters() {
        // Only M and I from SMITH occur in CLINDAMYCIN.
        let ratio = char_overlap("SMITH", "CLINDAMYCIN");
        assert!((ratio - 0.4).abs() < 1e-9);
        assert!((char_overlap("SMITH", "SMITHS") - 1.0).abs() < f64::EPSILON);
        assert!(char_overlap("", "anything").abs() < f64::EPSILON);
    }

    #[test]
    fn char_overlap_is_order_blind() {
        assert!((char_overlap("SMITH", "HTIMS") - 1.0).abs() < f64::EPSILON);
    }
}
