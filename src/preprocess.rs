use crate::dictionaries::Dictionaries;
use crate::types::Warning;

/// What the grammar gets to see of a verbatim name, plus early verdicts.
#[derive(Debug, Clone)]
pub struct Preprocessed<'a> {
    /// Verbatim prefix handed to the tokenizer; an annotation tail is cut off.
    pub body: &'a str,
    pub virus: bool,
    pub no_parse: bool,
    pub warnings: Vec<Warning>,
}

/// Word separators inside a name. Underscores stand in for spaces in dumps.
pub fn is_name_space(c: char) -> bool {
    c.is_whitespace() || c == '_'
}

pub fn preprocess<'a>(verbatim: &'a str, dict: &Dictionaries) -> Preprocessed<'a> {
    let warnings = space_warnings(verbatim);
    let virus = is_virus(verbatim, dict);
    let body = cut_annotation_tail(verbatim, dict);
    let no_parse = !virus && is_no_parse(body, dict);
    if virus || no_parse {
        tracing::debug!(verbatim, virus, "name excluded from parsing");
    }
    Preprocessed {
        body,
        virus,
        no_parse,
        warnings,
    }
}

fn space_warnings(verbatim: &str) -> Vec<Warning> {
    let mut out = Vec::new();
    if verbatim.starts_with(is_name_space) || verbatim.ends_with(is_name_space) {
        out.push(Warning::LeadingTrailingSpace);
    }
    if verbatim.chars().any(|c| is_name_space(c) && c != ' ') {
        out.push(Warning::NonStandardSpace);
    }
    let trimmed = verbatim.trim_matches(is_name_space);
    let mut prev_space = false;
    for c in trimmed.chars() {
        let space = is_name_space(c);
        if space && prev_space {
            out.push(Warning::MultipleSpaces);
            break;
        }
        prev_space = space;
    }
    out
}

/// Words split on name spaces with their byte offsets.
fn words_with_offsets(s: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut start: Option<usize> = None;
    let mut out = Vec::new();
    for (i, c) in s.char_indices() {
        if is_name_space(c) {
            if let Some(st) = start.take() {
                out.push((st, &s[st..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out.into_iter()
}

fn strip_punct(word: &str) -> &str {
    word.trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | ',' | ';' | '"'))
}

fn is_virus(verbatim: &str, dict: &Dictionaries) -> bool {
    words_with_offsets(verbatim).any(|(_, w)| {
        let w = strip_punct(w);
        if dict.is_virus_marker(w) {
            return true;
        }
        let lower = w.to_lowercase();
        ["virus", "viruses", "viroid", "viroids", "phage", "phages"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
    })
}

fn is_no_parse(body: &str, dict: &Dictionaries) -> bool {
    let trimmed = body.trim_matches(is_name_space);
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_lowercase();
    dict.no_parse_prefixes().iter().any(|p| {
        lower.starts_with(p.as_str())
            && lower[p.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Cuts the name at the first annotation word (`sensu`, `non`, `auct.` ...).
/// The first word never counts, so a name can't be cut to nothing.
fn cut_annotation_tail<'a>(verbatim: &'a str, dict: &Dictionaries) -> &'a str {
    let words: Vec<(usize, &str)> = words_with_offsets(verbatim).collect();
    for (i, &(offset, word)) in words.iter().enumerate().skip(1) {
        let w = word.trim_start_matches(',').trim_end_matches(',');
        if !dict.is_tail_annotation(w) {
            continue;
        }
        // "pro" only opens a tail as "pro parte" / "pro syn."
        if w == "pro"
            && !words
                .get(i + 1)
                .is_some_and(|(_, next)| matches!(*next, "parte" | "syn." | "sp."))
        {
            continue;
        }
        let mut cut = offset;
        // Keep a separating comma with the tail: "Aus bus L., sensu Smith".
        let head = verbatim[..cut].trim_end_matches(is_name_space);
        if head.ends_with(',') {
            cut = head.len() - 1;
        }
        tracing::trace!(annotation = w, "annotation tail");
        return &verbatim[..cut];
    }
    verbatim
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionaries::dictionaries;

    fn pre(s: &str) -> Preprocessed<'_> {
        preprocess(s, dictionaries())
    }

    #[test]
    fn clean_name_has_no_warnings() {
        let p = pre("Homo sapiens L.");
        assert_eq!(p.body, "Homo sapiens L.");
        assert!(p.warnings.is_empty());
        assert!(!p.virus);
        assert!(!p.no_parse);
    }

    #[test]
    fn space_problems_are_reported() {
        let p = pre(" Homo  sapiens\t");
        assert!(p.warnings.contains(&Warning::LeadingTrailingSpace));
        assert!(p.warnings.contains(&Warning::MultipleSpaces));
        assert!(p.warnings.contains(&Warning::NonStandardSpace));

        let p = pre("Homo_sapiens");
        assert_eq!(p.warnings, vec![Warning::NonStandardSpace]);
    }

    #[test]
    fn viruses_are_detected() {
        assert!(pre("Tobacco mosaic virus").virus);
        assert!(pre("Escherichia phage T4").virus);
        assert!(!pre("Cydia pomonella GV").virus);
        assert!(pre("Autographa californica NPV").virus);
        assert!(!pre("Virusia alba").virus);
    }

    #[test]
    fn no_parse_prefixes() {
        assert!(pre("Unidentified species").no_parse);
        assert!(pre("incertae sedis").no_parse);
        assert!(pre("   ").no_parse);
        assert!(!pre("Unknownia alba").no_parse);
    }

    #[test]
    fn annotation_tail_is_cut() {
        assert_eq!(pre("Aus bus sensu Smith").body, "Aus bus ");
        assert_eq!(pre("Aus bus L., non Mill.").body, "Aus bus L.");
        assert_eq!(pre("Aus bus auct. non L.").body, "Aus bus ");
        assert_eq!(pre("Aus pro Smith").body, "Aus pro Smith");
        assert_eq!(pre("Aus bus pro parte").body, "Aus bus ");
        assert_eq!(pre("sensu Smith").body, "sensu Smith");
    }
}
