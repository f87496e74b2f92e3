use crate::sbom_generation::domain::License;
use std::collections::HashSet;

/// Number of consecutive words forming one shingle
const SHINGLE_SIZE: usize = 3;

/// Default share of a license's shingles that must appear in a text
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.75;

/// Outcome of a successful classification
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseMatch {
    pub license_id: String,
    /// Share of the license's shingles found in the text, in `0.0..=1.0`
    pub confidence: f64,
    /// Number of license shingles found in the text
    pub matched: usize,
}

#[derive(Debug)]
struct CorpusEntry {
    id: String,
    shingles: HashSet<String>,
}

/// LicenseMatcher - Classifies text against a license corpus
///
/// Texts are normalized (copyright notice lines dropped, lowercased,
/// punctuation removed) and compared as sets of word 3-grams. A license matches when at
/// least `threshold` of its shingles appear in the text. Among matching
/// licenses the one with the most matched shingles wins, so a longer, more
/// specific license beats a shorter one embedded in it. Remaining ties go
/// to the lowest license id.
#[derive(Debug)]
pub struct LicenseMatcher {
    entries: Vec<CorpusEntry>,
    threshold: f64,
}

impl LicenseMatcher {
    pub fn new(licenses: &[License]) -> Self {
        let mut entries: Vec<CorpusEntry> = licenses
            .iter()
            .filter_map(|license| {
                let shingles = shingles(license.text()?);
                if shingles.is_empty() {
                    return None;
                }
                Some(CorpusEntry {
                    id: license.id().to_string(),
                    shingles,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries.dedup_by(|a, b| a.id == b.id);

        Self {
            entries,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Number of licenses usable for matching
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn classify(&self, text: &str) -> Option<LicenseMatch> {
        let candidate = shingles(text);
        if candidate.is_empty() {
            return None;
        }

        let mut best: Option<LicenseMatch> = None;
        for entry in &self.entries {
            let matched = entry.shingles.intersection(&candidate).count();
            let confidence = matched as f64 / entry.shingles.len() as f64;
            if confidence < self.threshold {
                continue;
            }
            let better = match &best {
                None => true,
                Some(b) => {
                    matched > b.matched || (matched == b.matched && confidence > b.confidence)
                }
            };
            if better {
                best = Some(LicenseMatch {
                    license_id: entry.id.clone(),
                    confidence,
                    matched,
                });
            }
        }
        best
    }
}

fn normalize(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim_start().to_lowercase().starts_with("copyright"))
        .flat_map(|line| {
            line.split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn shingles(text: &str) -> HashSet<String> {
    let words = normalize(text);
    if words.len() < SHINGLE_SIZE {
        return HashSet::new();
    }
    words.windows(SHINGLE_SIZE).map(|w| w.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIT: &str = "Permission is hereby granted, free of charge, to any person obtaining \
        a copy of this software and associated documentation files (the \"Software\"), to deal \
        in the Software without restriction, including without limitation the rights to use, \
        copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software.";

    const ISC: &str = "Permission to use, copy, modify, and/or distribute this software for any \
        purpose with or without fee is hereby granted, provided that the above copyright notice \
        and this permission notice appear in all copies.";

    fn corpus() -> Vec<License> {
        vec![
            License::new("MIT").with_text(MIT),
            License::new("ISC").with_text(ISC),
            License::new("Empty"),
        ]
    }

    #[test]
    fn test_classify_exact_text() {
        let matcher = LicenseMatcher::new(&corpus());
        assert_eq!(matcher.len(), 2);

        let result = matcher.classify(MIT).unwrap();
        assert_eq!(result.license_id, "MIT");
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_classify_ignores_copyright_and_formatting() {
        let matcher = LicenseMatcher::new(&corpus());
        let text = format!(
            "MIT License\n\nCopyright (c) 2021 The Authors\n\n{}",
            MIT.to_uppercase().replace(", ", ",\n")
        );
        assert_eq!(matcher.classify(&text).unwrap().license_id, "MIT");
    }

    #[test]
    fn test_classify_unrelated_text() {
        let matcher = LicenseMatcher::new(&corpus());
        assert!(matcher.classify("package main\n\nfunc main() {}\n").is_none());
        assert!(matcher.classify("").is_none());
    }

    #[test]
    fn test_longer_match_wins() {
        let short = License::new("Short").with_text(&MIT[..120]);
        let matcher = LicenseMatcher::new(&[short, License::new("MIT").with_text(MIT)]);
        assert_eq!(matcher.classify(MIT).unwrap().license_id, "MIT");
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let a = License::new("B-License").with_text(ISC);
        let b = License::new("A-License").with_text(ISC);
        let matcher = LicenseMatcher::new(&[a, b]);
        assert_eq!(matcher.classify(ISC).unwrap().license_id, "A-License");
    }

    #[test]
    fn test_threshold() {
        let matcher = LicenseMatcher::new(&corpus()).with_threshold(1.0);
        let half = &MIT[..MIT.len() / 2];
        assert!(matcher.classify(half).is_none());

        let matcher = LicenseMatcher::new(&corpus()).with_threshold(0.3);
        assert_eq!(matcher.classify(half).unwrap().license_id, "MIT");
    }

    #[test]
    fn test_classification_is_idempotent() {
        let matcher = LicenseMatcher::new(&corpus());
        assert_eq!(matcher.classify(ISC), matcher.classify(ISC));
    }
}
