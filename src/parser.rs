use crate::dictionaries::{Dictionaries, dictionaries};
use crate::id::name_string_id;
use crate::preprocess::{is_name_space, preprocess};
use crate::render::render;
use crate::tokenizer::tokenize;
use crate::types::{
    HybridKind, NameDetails, ParsedName, Warning, WordPos, WordType, sort_warnings,
};

mod authorship;
mod grammar;

pub use grammar::NameTree;
use grammar::Parser;

pub const PARSER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scientific name parser.
///
/// Owns nothing mutable: share one instance across threads or build one per
/// call, both are cheap.
#[derive(Clone, Copy)]
pub struct ScientificNameParser {
    dict: &'static Dictionaries,
}

impl Default for ScientificNameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScientificNameParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScientificNameParser")
            .field("version", &PARSER_VERSION)
            .finish()
    }
}

impl ScientificNameParser {
    pub fn new() -> Self {
        ScientificNameParser {
            dict: dictionaries(),
        }
    }

    /// Parses one name string. Never fails: names the grammar can't take
    /// come back with `parsed: false`.
    pub fn from_string(&self, verbatim: &str) -> ParsedName {
        let _span = tracing::trace_span!("parse", verbatim).entered();
        let pre = preprocess(verbatim, self.dict);
        if pre.virus || pre.no_parse {
            return unparsed(verbatim, pre.virus);
        }

        let tokens = tokenize(pre.body);
        let mut parser = Parser::new(&tokens, pre.body, self.dict);
        let Some(tree) = parser.parse_name() else {
            tracing::debug!(verbatim, "no name found");
            return unparsed(verbatim, false);
        };
        let consumed = parser.position();
        let mut warnings = pre.warnings;
        warnings.extend(parser.into_warnings());

        let tail_start = tokens
            .get(consumed)
            .map_or(pre.body.len(), |t| t.byte_start);
        let tail = verbatim[tail_start..].trim_matches(|c: char| is_name_space(c) || c == ',');
        let unparsed_tail = if tail.is_empty() {
            None
        } else {
            tracing::debug!(verbatim, tail, "unparsed tail");
            warnings.push(Warning::UnparsedTail);
            Some(tail.to_string())
        };

        let rendered = render(&tree);
        let (details, signs) = match tree {
            NameTree::Single(d) => (vec![d], Vec::new()),
            NameTree::Formula { parts, signs, .. } => (parts, signs),
        };
        let hybrid = if !signs.is_empty() {
            Some(HybridKind::HybridFormula)
        } else if details.iter().any(is_named_hybrid) {
            Some(HybridKind::NamedHybrid)
        } else {
            None
        };
        let surrogate = details.iter().any(|d| d.annotation.is_some());

        let mut positions: Vec<WordPos> = Vec::new();
        for d in &details {
            d.collect_positions(&mut positions);
        }
        positions.extend(signs.iter().map(|s| WordPos::new(WordType::HybridChar, *s)));
        positions.sort_by_key(|p| (p.start, p.end));
        positions.dedup();

        sort_warnings(&mut warnings);
        let quality = warnings.first().map_or(1, |w| w.quality());

        ParsedName {
            name_string_id: name_string_id(verbatim),
            parsed: true,
            quality,
            quality_warnings: warnings,
            parser_version: PARSER_VERSION,
            verbatim: verbatim.to_string(),
            normalized: Some(rendered.normalized),
            canonical_name: Some(rendered.canonical),
            cardinality: rendered.cardinality,
            hybrid,
            surrogate,
            virus: false,
            unparsed_tail,
            details,
            positions,
        }
    }

    /// Same as [`ScientificNameParser::from_string`].
    pub fn parse(&self, verbatim: &str) -> ParsedName {
        self.from_string(verbatim)
    }
}

fn is_named_hybrid(d: &NameDetails) -> bool {
    [&d.uninomial, &d.genus, &d.specific_epithet]
        .into_iter()
        .flatten()
        .chain(&d.infraspecific_epithets)
        .any(|e| e.hybrid || e.rank.as_deref().is_some_and(|r| r.starts_with("notho")))
}

fn unparsed(verbatim: &str, virus: bool) -> ParsedName {
    ParsedName {
        name_string_id: name_string_id(verbatim),
        parsed: false,
        quality: 0,
        quality_warnings: Vec::new(),
        parser_version: PARSER_VERSION,
        verbatim: verbatim.to_string(),
        normalized: None,
        canonical_name: None,
        cardinality: 0,
        hybrid: None,
        surrogate: false,
        virus,
        unparsed_tail: None,
        details: Vec::new(),
        positions: Vec::new(),
    }
}

#[cfg(test)]
pub(crate) fn parse_tree(s: &str) -> Option<NameTree> {
    let tokens = tokenize(s);
    Parser::new(&tokens, s, dictionaries()).parse_name()
}
