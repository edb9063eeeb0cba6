use sciname::ScientificNameParser;
use sciname::types::{HybridKind, WordType};

fn parse(s: &str) -> sciname::ParsedName {
    ScientificNameParser::new().from_string(s)
}

fn warnings(s: &str) -> Vec<&'static str> {
    parse(s).quality_warnings.iter().map(|w| w.message()).collect()
}

#[test]
fn homo_sapiens_linnaeus() {
    let p = parse("Homo sapiens L.");
    assert!(p.parsed);
    assert_eq!(p.quality, 1);
    assert!(p.quality_warnings.is_empty());
    assert_eq!(p.normalized.as_deref(), Some("Homo sapiens L."));
    assert_eq!(p.canonical(), Some("Homo sapiens"));
    assert_eq!(p.cardinality, 2);
    assert_eq!(p.authorship().unwrap().value, "L.");
    assert!(p.year().is_none());
    assert_eq!(p.parser_version, sciname::PARSER_VERSION);

    let kinds: Vec<(WordType, usize, usize)> = p
        .positions
        .iter()
        .map(|w| (w.word_type, w.start, w.end))
        .collect();
    assert_eq!(
        kinds,
        [
            (WordType::Genus, 0, 4),
            (WordType::SpecificEpithet, 5, 12),
            (WordType::AuthorWord, 13, 15),
        ]
    );
}

#[test]
fn render_json_compact_and_pretty() {
    let p = parse("Homo sapiens L.");
    let compact = p.render_json(true).unwrap();
    let pretty = p.render_json(false).unwrap();
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
    let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(a, b);
    assert_eq!(a["details"][0]["specific_epithet"]["authorship"]["value"], "L.");
    assert_eq!(a["positions"][0]["type"], "genus");
}

#[test]
fn ids_are_stable_per_verbatim() {
    let a = parse("Homo sapiens L.");
    let b = parse("Homo sapiens L.");
    let c = parse("Homo sapiens");
    assert_eq!(a.name_string_id, b.name_string_id);
    assert_ne!(a.name_string_id, c.name_string_id);
}

#[test]
fn infraspecific_with_basionym_and_year() {
    let p = parse("Abies alba var. pendula (Carrière) Beissn. 1891");
    assert_eq!(p.canonical(), Some("Abies alba pendula"));
    assert_eq!(
        p.canonical_name.as_ref().unwrap().value_ranked,
        "Abies alba var. pendula"
    );
    assert_eq!(p.cardinality, 3);
    let a = p.authorship().unwrap();
    assert_eq!(a.value, "(Carrière) Beissn. 1891");
    assert_eq!(p.year().unwrap().value, "1891");
}

#[test]
fn named_hybrid_and_formula() {
    let p = parse("Salix ×rubens Schrank");
    assert_eq!(p.hybrid, Some(HybridKind::NamedHybrid));
    assert!(warnings("Salix ×rubens Schrank").contains(&"Hybrid char not separated by space"));

    let p = parse("Salix alba L. × S. fragilis L.");
    assert_eq!(p.hybrid, Some(HybridKind::HybridFormula));
    assert_eq!(p.canonical(), Some("Salix alba × Salix fragilis"));
    assert_eq!(p.cardinality, 0);
    assert!(p.authorship().is_none());
    assert_eq!(p.details.len(), 2);
    assert!(p.positions.iter().any(|w| w.word_type == WordType::HybridChar));
}

#[test]
fn surrogates() {
    let p = parse("Aus sp. 1");
    assert!(p.surrogate);
    assert_eq!(p.canonical(), Some("Aus"));
    assert_eq!(p.cardinality, 0);
    assert_eq!(p.quality, 3);

    let p = parse("Aus cf. bus");
    assert!(p.surrogate);
    assert_eq!(p.canonical(), Some("Aus bus"));
    assert_eq!(p.cardinality, 0);
}

#[test]
fn viruses_and_no_parse_names() {
    for s in ["Tobacco mosaic virus", "Escherichia phage T4", "Unidentified species", ""] {
        let p = parse(s);
        assert!(!p.parsed, "{s:?}");
        assert_eq!(p.quality, 0);
        assert!(p.canonical_name.is_none());
        assert!(p.positions.is_empty());
    }
    assert!(parse("Tobacco mosaic virus").virus);
    assert!(!parse("Unidentified species").virus);
}

#[test]
fn whitespace_is_reported_not_rejected() {
    let p = parse(" Homo  sapiens");
    assert!(p.parsed);
    assert_eq!(p.canonical(), Some("Homo sapiens"));
    assert_eq!(p.quality, 2);
    let w = warnings(" Homo  sapiens");
    assert!(w.contains(&"Leading or trailing spaces"));
    assert!(w.contains(&"Multiple adjacent space characters"));
    assert_eq!(p.positions[0].start, 1);
}

#[test]
fn unparsed_tail_is_kept() {
    let p = parse("Aus bus 12 something");
    assert!(p.parsed);
    assert_eq!(p.canonical(), Some("Aus bus"));
    assert_eq!(p.unparsed_tail.as_deref(), Some("12 something"));
    assert_eq!(p.quality, 3);
}

#[test]
fn transliterated_canonical() {
    let p = parse("Aëdes aegypti L.");
    assert_eq!(p.canonical(), Some("Aedes aegypti"));
    assert_eq!(p.normalized.as_deref(), Some("Aëdes aegypti L."));
    assert!(warnings("Aëdes aegypti L.").contains(&"Non-standard characters in canonical"));
}

#[test]
fn positions_are_ordered_and_inside_verbatim() {
    for s in [
        "Homo sapiens L.",
        "Abies alba ssp. pendula (Carr.) Beissn.",
        "Aus (Bus) cus Smith & Jones, 1900",
        "Salix alba L. × S. fragilis L.",
        "Aconitum subgen. Lycoctonum DC.",
    ] {
        let p = parse(s);
        let len = s.chars().count();
        assert!(!p.positions.is_empty(), "{s}");
        for pair in p.positions.windows(2) {
            assert!(pair[0].start <= pair[1].start, "{s}");
        }
        for w in &p.positions {
            assert!(w.start < w.end && w.end <= len, "{s}");
        }
    }
}

#[test]
fn parser_is_shareable_across_threads() {
    use rayon::prelude::*;
    let parser = ScientificNameParser::new();
    let names: Vec<String> = (0..64).map(|i| format!("Aus bus Smith, {}", 1800 + i)).collect();
    let parsed: Vec<_> = names.par_iter().map(|n| parser.from_string(n)).collect();
    for (n, p) in names.iter().zip(&parsed) {
        assert_eq!(&p.verbatim, n);
        assert_eq!(p.canonical(), Some("Aus bus"));
    }
}

#[test]
fn notho_rank_is_a_named_hybrid() {
    let p = parse("Aus bus nothosubsp. cus");
    assert_eq!(p.hybrid, Some(HybridKind::NamedHybrid));
    assert_eq!(p.quality, 2);
    assert!(warnings("Aus bus nothosubsp. cus").contains(&"Named hybrid"));
    assert_eq!(
        p.canonical_name.as_ref().unwrap().value_ranked,
        "Aus bus nothosubsp. cus"
    );
}

#[test]
fn ascii_x_before_author_stays_in_tail() {
    let p = parse("Aus bus Mill. x Smith");
    assert_eq!(p.hybrid, None);
    assert_eq!(p.canonical(), Some("Aus bus"));
    assert_eq!(p.unparsed_tail.as_deref(), Some("x Smith"));
    assert_eq!(p.quality, 3);

    let p = parse("Aus bus x Cus dus");
    assert_eq!(p.hybrid, Some(HybridKind::HybridFormula));
    assert_eq!(p.canonical(), Some("Aus bus × Cus dus"));
}
