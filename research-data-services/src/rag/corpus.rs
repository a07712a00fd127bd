//! Bundled ETF market commentary used as retrieval context.

/// (file stem, document text) for every bundled commentary.
const DOCUMENTS: [(&str, &str); 9] = [
    ("broadening_rally", include_str!("../../corpus/01_broadening_rally.txt")),
    ("fed_easing_cycle", include_str!("../../corpus/02_fed_easing_cycle.txt")),
    ("cautious_optimism", include_str!("../../corpus/03_cautious_optimism.txt")),
    ("junk_bond_spreads", include_str!("../../corpus/04_junk_bond_spreads.txt")),
    ("goldilocks_yields", include_str!("../../corpus/05_goldilocks_yields.txt")),
    ("value_leadership", include_str!("../../corpus/06_value_leadership.txt")),
    ("volatile_world", include_str!("../../corpus/07_volatile_world.txt")),
    ("etf_industry_kpi", include_str!("../../corpus/08_etf_industry_kpi.txt")),
    ("china_takes_off", include_str!("../../corpus/09_china_takes_off.txt")),
];

/// The fixed commentary corpus, in a stable order. Document ids assigned at
/// ingestion are positions in this list.
pub fn etf_commentary() -> Vec<String> {
    DOCUMENTS
        .iter()
        .map(|(_, text)| text.trim().to_string())
        .collect()
}

/// Short names of the bundled documents, aligned with [`etf_commentary`].
pub fn document_names() -> Vec<&'static str> {
    DOCUMENTS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_is_fixed_and_non_empty() {
        let docs = etf_commentary();
        assert_eq!(docs.len(), 9);
        assert_eq!(docs.len(), document_names().len());
        assert!(docs.iter().all(|d| !d.is_empty()));
        assert_eq!(docs, etf_commentary());
    }

    #[test]
    fn test_corpus_mentions_energy_etf() {
        let docs = etf_commentary();
        assert!(docs[2].contains("XLE"));
        assert!(docs[3].contains("2.84"));
    }
}
