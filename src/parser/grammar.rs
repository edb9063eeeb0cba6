use crate::dictionaries::Dictionaries;
use crate::render::transliterate;
use crate::tokenizer::{Token, TokenKind};
use crate::types::{Annotation, AnnotationKind, Epithet, NameDetails, Span, Warning, WordType};

/// Parsed name before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTree {
    Single(NameDetails),
    Formula {
        parts: Vec<NameDetails>,
        signs: Vec<Span>,
        incomplete: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: usize,
    warnings: usize,
}

/// Recursive descent over tokens. Every rule either consumes what it matched
/// or leaves the cursor (and collected warnings) where it found them.
pub struct Parser<'t, 'a> {
    pub(super) tokens: &'t [Token<'a>],
    pub(super) source: &'a str,
    pub(super) pos: usize,
    pub(super) dict: &'static Dictionaries,
    pub(super) warnings: Vec<Warning>,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>], source: &'a str, dict: &'static Dictionaries) -> Self {
        Parser {
            tokens,
            source,
            pos: 0,
            dict,
            warnings: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            warnings: self.warnings.len(),
        }
    }

    pub(super) fn rewind(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.warnings.truncate(cp.warnings);
    }

    pub(super) fn warn(&mut self, w: Warning) {
        self.warnings.push(w);
    }

    pub(super) fn peek(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + offset).copied()
    }

    /// Text of the word token at `offset`, if it is a word.
    pub(super) fn peek_word(&self, offset: usize) -> Option<&'a str> {
        self.peek(offset).filter(Token::is_word).map(|t| t.text)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.peek(0).is_some_and(|t| t.kind == kind)
    }

    pub(super) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn bump(&mut self) -> Option<Token<'a>> {
        let t = self.peek(0)?;
        self.pos += 1;
        Some(t)
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    /// name := single (× part)*
    pub fn parse_name(&mut self) -> Option<NameTree> {
        let first = self.parse_single(true)?;
        let mut parts = vec![first];
        let mut signs = Vec::new();
        let mut incomplete = false;

        while self.at(TokenKind::Hybrid) {
            let cp = self.checkpoint();
            let ascii = self.peek(0).is_some_and(|t| t.is_ascii_hybrid());
            let Some(sign) = self.hybrid_sign() else {
                break;
            };
            match self.parse_formula_part() {
                // After an ascii `x` only species-level members count.
                Some(part) if !ascii || part.specific_epithet.is_some() => {
                    signs.push(sign);
                    parts.push(part);
                    continue;
                }
                Some(_) => self.rewind(cp),
                None if self.at_end() => {
                    signs.push(sign);
                    incomplete = true;
                }
                None => self.rewind(cp),
            }
            break;
        }

        if signs.is_empty() {
            return parts.pop().map(NameTree::Single);
        }
        self.warn(Warning::HybridFormula);
        if incomplete {
            self.warn(Warning::IncompleteHybridFormula);
        }
        Some(NameTree::Formula {
            parts,
            signs,
            incomplete,
        })
    }

    /// Consumes a hybrid sign, warning about ascii `x` and missing spaces.
    fn hybrid_sign(&mut self) -> Option<Span> {
        let t = self.eat(TokenKind::Hybrid)?;
        if t.is_ascii_hybrid() {
            self.warn(Warning::AsciiHybridChar);
        }
        if t.glued {
            self.warn(Warning::HybridCharNoSpace);
        }
        Some(t.span)
    }

    /// A later formula member: a full name, or bare epithets sharing the
    /// first member's genus (`Aus bus × cus`).
    fn parse_formula_part(&mut self) -> Option<NameDetails> {
        if let Some(d) = self.parse_single(false) {
            return Some(d);
        }
        let cp = self.checkpoint();
        let Some(species) = self.parse_epithet(WordType::SpecificEpithet) else {
            self.rewind(cp);
            return None;
        };
        let infraspecific_epithets = self.parse_infraspecifics();
        Some(NameDetails {
            specific_epithet: Some(species),
            infraspecific_epithets,
            ..NameDetails::default()
        })
    }

    /// single := [×] Genus (binomial | approximation | combination | uninomial)
    fn parse_single(&mut self, first: bool) -> Option<NameDetails> {
        let cp = self.checkpoint();
        let hybrid_span = if self.at(TokenKind::Hybrid) {
            let span = self.hybrid_sign();
            self.warn(Warning::NamedHybrid);
            span
        } else {
            None
        };

        let Some(tok) = self.peek(0).filter(Token::is_word) else {
            self.rewind(cp);
            return None;
        };
        let abbreviated = if is_capitalized_word(tok.text) {
            false
        } else if is_abbreviated_genus(tok.text) {
            true
        } else {
            self.rewind(cp);
            return None;
        };
        self.bump();
        if abbreviated && first {
            self.warn(Warning::AbbreviatedGenus);
        }

        let mut genus = self.word_epithet(WordType::Genus, tok);
        genus.hybrid = hybrid_span.is_some();
        genus.hybrid_span = hybrid_span;

        if let Some(d) = self.parse_binomial_rest(&genus) {
            return Some(d);
        }
        if let Some(d) = self.parse_approximation(&genus) {
            return Some(d);
        }
        if !abbreviated && let Some(d) = self.parse_uninomial_combination(&genus) {
            return Some(d);
        }

        let mut uninomial = genus;
        uninomial.word_type = WordType::Uninomial;
        if !abbreviated {
            uninomial.authorship = self.parse_authorship();
        }
        Some(NameDetails {
            uninomial: Some(uninomial),
            ..NameDetails::default()
        })
    }

    /// Genus [(Subgenus)] [cf.] [×] epithet [authorship] infraspecific*
    fn parse_binomial_rest(&mut self, genus: &Epithet) -> Option<NameDetails> {
        let cp = self.checkpoint();
        let infrageneric_epithet = self.parse_subgenus();

        let annotation = match self.peek(0).filter(Token::is_word) {
            Some(t) if self.dict.is_comparison(t.text) => {
                self.bump();
                Some(Annotation {
                    kind: AnnotationKind::Comparison,
                    marker: "cf.".to_string(),
                    ignored: None,
                    span: t.span,
                })
            }
            _ => None,
        };

        let hybrid_span = if self.at(TokenKind::Hybrid) {
            self.hybrid_sign()
        } else {
            None
        };

        let Some(mut species) = self.parse_epithet(WordType::SpecificEpithet) else {
            self.rewind(cp);
            return None;
        };
        if hybrid_span.is_some() {
            species.hybrid = true;
            species.hybrid_span = hybrid_span;
            self.warn(Warning::NamedHybrid);
        }
        if annotation.is_some() {
            self.warn(Warning::Comparison);
        }
        let infraspecific_epithets = self.parse_infraspecifics();

        Some(NameDetails {
            genus: Some(genus.clone()),
            infrageneric_epithet,
            specific_epithet: Some(species),
            infraspecific_epithets,
            annotation,
            ..NameDetails::default()
        })
    }

    /// `(Subgenus)`, kept only when a specific epithet follows; otherwise the
    /// parentheses hold basionym authors.
    fn parse_subgenus(&mut self) -> Option<Epithet> {
        self.peek(0).filter(|t| t.kind == TokenKind::OpenParen)?;
        let word = self.peek(1).filter(Token::is_word)?;
        self.peek(2).filter(|t| t.kind == TokenKind::CloseParen)?;
        if !is_capitalized_word(word.text) {
            return None;
        }
        let after = self.peek(3)?;
        let epithet_follows = match after.kind {
            TokenKind::Word => {
                self.dict.is_comparison(after.text)
                    || (is_epithet_word(after.text) && !self.dict.is_reserved(after.text))
            }
            TokenKind::Hybrid => true,
            _ => false,
        };
        if !epithet_follows {
            return None;
        }
        self.pos += 3;
        Some(self.word_epithet(WordType::InfragenericEpithet, word))
    }

    /// Genus approximation: `Aus sp.`, `Aus spp. 1`, `Aus aff. bus`.
    fn parse_approximation(&mut self, genus: &Epithet) -> Option<NameDetails> {
        let t = self.peek(0).filter(Token::is_word)?;
        if !self.dict.is_approximation(t.text) {
            return None;
        }
        self.bump();
        let marker = match t.text {
            "sp" => "sp.",
            "spp" => "spp.",
            "aff" => "aff.",
            "nr" => "nr.",
            other => other,
        };
        let ignored = self.peek(0).map(|next| {
            let rest = self.source[next.byte_start..].trim().to_string();
            self.pos = self.tokens.len();
            rest
        });
        self.warn(Warning::Approximation);
        Some(NameDetails {
            genus: Some(genus.clone()),
            annotation: Some(Annotation {
                kind: AnnotationKind::Approximation,
                marker: marker.to_string(),
                ignored: ignored.filter(|s| !s.is_empty()),
                span: t.span,
            }),
            ..NameDetails::default()
        })
    }

    /// `Aus subgen. Bus [authorship]`
    fn parse_uninomial_combination(&mut self, parent: &Epithet) -> Option<NameDetails> {
        let cp = self.checkpoint();
        let rank_tok = self.peek(0).filter(Token::is_word)?;
        let rank = self.dict.infrageneric_rank(rank_tok.text)?.to_string();
        self.bump();
        let Some(tok) = self
            .peek(0)
            .filter(|t| t.is_word() && is_capitalized_word(t.text))
        else {
            self.rewind(cp);
            return None;
        };
        self.bump();
        if rank.starts_with("notho") {
            self.warn(Warning::NamedHybrid);
        }
        let mut uninomial = self.word_epithet(WordType::Uninomial, tok);
        uninomial.rank = Some(rank);
        uninomial.rank_span = Some(rank_tok.span);
        uninomial.parent = Some(parent.value.clone());
        uninomial.parent_span = Some(parent.span);
        uninomial.hybrid = parent.hybrid;
        uninomial.hybrid_span = parent.hybrid_span;
        uninomial.authorship = self.parse_authorship();
        Some(NameDetails {
            uninomial: Some(uninomial),
            ..NameDetails::default()
        })
    }

    fn parse_infraspecifics(&mut self) -> Vec<Epithet> {
        let mut out = Vec::new();
        while let Some(e) = self.parse_infraspecific() {
            out.push(e);
        }
        out
    }

    /// [rank] epithet [authorship]
    fn parse_infraspecific(&mut self) -> Option<Epithet> {
        let cp = self.checkpoint();
        let rank = self
            .peek(0)
            .filter(Token::is_word)
            .and_then(|t| Some((self.dict.infraspecific_rank(t.text)?.to_string(), t.span)));
        if rank.is_some() {
            self.bump();
        }
        let Some(mut epithet) = self.parse_epithet(WordType::InfraspecificEpithet) else {
            self.rewind(cp);
            return None;
        };
        if let Some((rank, span)) = rank {
            if rank.starts_with("notho") {
                self.warn(Warning::NamedHybrid);
            }
            epithet.rank = Some(rank);
            epithet.rank_span = Some(span);
        }
        Some(epithet)
    }

    /// Lowercase epithet with optional authorship.
    fn parse_epithet(&mut self, word_type: WordType) -> Option<Epithet> {
        let tok = self.peek(0).filter(Token::is_word)?;
        if !is_epithet_word(tok.text) || self.dict.is_reserved(tok.text) {
            return None;
        }
        // "de Candolle": an author prefix, not an epithet.
        if self.dict.is_author_prefix(tok.text)
            && self.peek_word(1).is_some_and(starts_uppercase)
        {
            return None;
        }
        self.bump();
        let mut epithet = self.word_epithet(word_type, tok);
        epithet.authorship = self.parse_authorship();
        Some(epithet)
    }

    pub(super) fn word_epithet(&mut self, word_type: WordType, tok: Token<'a>) -> Epithet {
        let (value, changed) = transliterate(tok.text, self.dict);
        if changed {
            self.warn(Warning::CanonicalTransliterated);
        }
        Epithet::new(word_type, tok.text, value, tok.span)
    }
}

pub(super) fn starts_uppercase(w: &str) -> bool {
    w.chars().next().is_some_and(char::is_uppercase)
}

/// `Homo`, `Aëdes`, `Saint-Hilairea`
pub(super) fn is_capitalized_word(w: &str) -> bool {
    let mut chars = w.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() || w.chars().count() < 2 || w.ends_with('-') {
        return false;
    }
    chars.all(|c| c.is_lowercase() || c == '-')
}

/// `H.`, `Ch.`, `Chr.`
pub(super) fn is_abbreviated_genus(w: &str) -> bool {
    let Some(stem) = w.strip_suffix('.') else {
        return false;
    };
    let mut chars = stem.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest: Vec<char> = chars.collect();
    first.is_uppercase() && rest.len() <= 2 && rest.iter().all(|c| c.is_lowercase())
}

/// `sapiens`, `saint-hilairei`, `o'donelli`
pub(super) fn is_epithet_word(w: &str) -> bool {
    let mut chars = w.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_lowercase()
        && w.chars().count() >= 2
        && !w.ends_with('-')
        && chars.all(|c| c.is_lowercase() || c == '-' || c == '\'')
}
