//! Normalized and canonical renderings of a parsed name.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::dictionaries::Dictionaries;
use crate::parser::NameTree;
use crate::types::{AnnotationKind, AuthorGroup, AuthorsTeam, Canonical, Epithet, NameDetails};

/// Strings derived from a name tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub normalized: String,
    pub canonical: Canonical,
    pub cardinality: u8,
}

/// Plain-Latin form of a word for canonical names (`Aëdes` -> `Aedes`,
/// `Cæsalpinia` -> `Caesalpinia`). The flag is set when anything changed.
pub fn transliterate(word: &str, dict: &Dictionaries) -> (String, bool) {
    if word.is_ascii() {
        return (word.to_string(), false);
    }
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(lig) = dict.ligature(c) {
            out.push_str(lig);
        } else {
            let stripped: String = std::iter::once(c)
                .nfd()
                .filter(|d| !is_combining_mark(*d))
                .collect();
            if stripped.is_empty() {
                out.push(c);
            } else {
                out.push_str(&stripped);
            }
        }
    }
    let changed = out != word;
    (out, changed)
}

fn team_value(team: &AuthorsTeam) -> String {
    let mut out = match team.authors.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} & {}", init.join(", "), last),
    };
    if let Some(y) = &team.year {
        if y.approximate {
            out.push_str(&format!(" ({})", y.value));
        } else {
            out.push(' ');
            out.push_str(&y.value);
        }
    }
    out
}

fn group_value(group: &AuthorGroup) -> String {
    let mut out = team_value(&group.team);
    if let Some(ex) = &group.ex_authors {
        out.push_str(" ex ");
        out.push_str(&team_value(ex));
    }
    if let Some(emend) = &group.emend_authors {
        out.push_str(" emend. ");
        out.push_str(&team_value(emend));
    }
    out
}

/// `(Basionym authors year) Combination authors year`
pub fn authorship_value(basionym: Option<&AuthorGroup>, combination: Option<&AuthorGroup>) -> String {
    match (basionym, combination) {
        (Some(b), Some(c)) => format!("({}) {}", group_value(b), group_value(c)),
        (Some(b), None) => format!("({})", group_value(b)),
        (None, Some(c)) => group_value(c),
        (None, None) => String::new(),
    }
}

fn push_word(out: &mut String, word: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(word);
}

fn push_epithet_normalized(out: &mut String, e: &Epithet) {
    if e.hybrid {
        push_word(out, "×");
    }
    if let Some(rank) = &e.rank {
        push_word(out, rank);
    }
    push_word(out, &e.verbatim);
    if let Some(a) = &e.authorship {
        push_word(out, &a.value);
    }
}

fn normalized_single(d: &NameDetails) -> String {
    let mut out = String::new();
    if let Some(u) = &d.uninomial {
        if u.hybrid {
            push_word(&mut out, "×");
        }
        if let Some(parent) = &u.parent {
            push_word(&mut out, parent);
        }
        if let Some(rank) = &u.rank {
            push_word(&mut out, rank);
        }
        push_word(&mut out, &u.verbatim);
        if let Some(a) = &u.authorship {
            push_word(&mut out, &a.value);
        }
        return out;
    }
    if let Some(g) = &d.genus {
        push_epithet_normalized(&mut out, g);
    }
    if let Some(sub) = &d.infrageneric_epithet {
        push_word(&mut out, &format!("({})", sub.verbatim));
    }
    let annotation = d.annotation.as_ref();
    if let Some(a) = annotation.filter(|a| a.kind == AnnotationKind::Comparison) {
        push_word(&mut out, &a.marker);
    }
    if let Some(sp) = &d.specific_epithet {
        push_epithet_normalized(&mut out, sp);
    }
    for e in &d.infraspecific_epithets {
        push_epithet_normalized(&mut out, e);
    }
    if let Some(a) = annotation.filter(|a| a.kind == AnnotationKind::Approximation) {
        push_word(&mut out, &a.marker);
    }
    out
}

/// Canonical forms of one element. `genus_fallback` fills in a missing or
/// abbreviated genus in later hybrid formula members.
fn canonical_single(d: &NameDetails, genus_fallback: Option<&str>) -> Canonical {
    let mut value = String::new();
    let mut ranked = String::new();

    if let Some(u) = &d.uninomial {
        if u.hybrid {
            push_word(&mut ranked, "×");
        }
        if let (Some(parent), Some(rank)) = (&u.parent, &u.rank) {
            push_word(&mut ranked, parent);
            push_word(&mut ranked, rank);
        }
        push_word(&mut value, &u.value);
        push_word(&mut ranked, &u.value);
        return Canonical {
            value,
            value_ranked: ranked,
        };
    }

    let genus = match (d.genus.as_ref(), genus_fallback) {
        (Some(g), Some(full)) if g.value.ends_with('.') && full.starts_with(&g.value[..g.value.len() - 1]) => {
            Some(full.to_string())
        }
        (Some(g), _) => Some(g.value.clone()),
        (None, fallback) => fallback.map(str::to_string),
    };
    if let Some(g) = genus {
        if d.genus.as_ref().is_some_and(|g| g.hybrid) {
            push_word(&mut ranked, "×");
        }
        push_word(&mut value, &g);
        push_word(&mut ranked, &g);
    }
    let approximate = d
        .annotation
        .as_ref()
        .is_some_and(|a| a.kind == AnnotationKind::Approximation);
    if !approximate {
        for e in d.specific_epithet.iter().chain(&d.infraspecific_epithets) {
            if e.hybrid {
                push_word(&mut ranked, "×");
            }
            if let Some(rank) = &e.rank {
                push_word(&mut ranked, rank);
            }
            push_word(&mut value, &e.value);
            push_word(&mut ranked, &e.value);
        }
    }
    Canonical {
        value,
        value_ranked: ranked,
    }
}

fn cardinality_single(d: &NameDetails) -> u8 {
    if d.annotation.is_some() {
        return 0;
    }
    if d.uninomial.is_some() {
        return 1;
    }
    if d.specific_epithet.is_some() {
        let infra = u8::try_from(d.infraspecific_epithets.len()).unwrap_or(u8::MAX - 2);
        return 2 + infra;
    }
    0
}

pub fn render(tree: &NameTree) -> Rendered {
    match tree {
        NameTree::Single(d) => Rendered {
            normalized: normalized_single(d),
            canonical: canonical_single(d, None),
            cardinality: cardinality_single(d),
        },
        NameTree::Formula {
            parts, incomplete, ..
        } => {
            let first_genus = parts
                .first()
                .and_then(|p| p.genus.as_ref().or(p.uninomial.as_ref()))
                .map(|g| g.value.as_str());
            let mut normalized: Vec<String> = Vec::with_capacity(parts.len());
            let mut value: Vec<String> = Vec::with_capacity(parts.len());
            let mut ranked: Vec<String> = Vec::with_capacity(parts.len());
            for (i, part) in parts.iter().enumerate() {
                normalized.push(normalized_single(part));
                let c = canonical_single(part, if i == 0 { None } else { first_genus });
                value.push(c.value);
                ranked.push(c.value_ranked);
            }
            let mut normalized = normalized.join(" × ");
            let mut value = value.join(" × ");
            let mut ranked = ranked.join(" × ");
            if *incomplete {
                for s in [&mut normalized, &mut value, &mut ranked] {
                    s.push_str(" ×");
                }
            }
            Rendered {
                normalized,
                canonical: Canonical {
                    value,
                    value_ranked: ranked,
                },
                cardinality: 0,
            }
        }
    }
}
