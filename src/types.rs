use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::Result;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

/// Half-open span in Unicode scalar offsets into the verbatim string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub const fn join(self, other: Span) -> Span {
        Span {
            start: if self.start < other.start { self.start } else { other.start },
            end: if self.end > other.end { self.end } else { other.end },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordType {
    Uninomial,
    Genus,
    InfragenericEpithet,
    SpecificEpithet,
    InfraspecificEpithet,
    Rank,
    HybridChar,
    AuthorWord,
    AuthorWordFilius,
    Year,
    ApproximateYear,
    Approximation,
    Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordPos {
    #[serde(rename = "type")]
    pub word_type: WordType,
    pub start: usize,
    pub end: usize,
}

impl WordPos {
    pub const fn new(word_type: WordType, span: Span) -> Self {
        WordPos {
            word_type,
            start: span.start,
            end: span.end,
        }
    }
}

/// Parse quality warnings. Each carries a fixed quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    LeadingTrailingSpace,
    MultipleSpaces,
    NonStandardSpace,
    UnparsedTail,
    AbbreviatedGenus,
    AsciiHybridChar,
    HybridCharNoSpace,
    NamedHybrid,
    HybridFormula,
    IncompleteHybridFormula,
    Approximation,
    Comparison,
    ExAuthors,
    EmendAuthors,
    UppercaseAuthor,
    YearCharacter,
    YearQuestionMark,
    YearRange,
    YearSquareBrackets,
    YearParentheses,
    CanonicalTransliterated,
}

impl Warning {
    pub const fn quality(self) -> u8 {
        match self {
            Warning::LeadingTrailingSpace
            | Warning::MultipleSpaces
            | Warning::NonStandardSpace
            | Warning::AsciiHybridChar
            | Warning::HybridCharNoSpace
            | Warning::NamedHybrid
            | Warning::HybridFormula
            | Warning::ExAuthors
            | Warning::EmendAuthors
            | Warning::UppercaseAuthor
            | Warning::YearCharacter
            | Warning::YearQuestionMark
            | Warning::YearRange
            | Warning::YearSquareBrackets
            | Warning::YearParentheses
            | Warning::CanonicalTransliterated => 2,
            Warning::UnparsedTail
            | Warning::AbbreviatedGenus
            | Warning::IncompleteHybridFormula
            | Warning::Approximation
            | Warning::Comparison => 3,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Warning::LeadingTrailingSpace => "Leading or trailing spaces",
            Warning::MultipleSpaces => "Multiple adjacent space characters",
            Warning::NonStandardSpace => "Non-standard space characters",
            Warning::UnparsedTail => "Unparsed tail",
            Warning::AbbreviatedGenus => "Abbreviated uninomial word",
            Warning::AsciiHybridChar => "Ascii x used as hybrid sign",
            Warning::HybridCharNoSpace => "Hybrid char not separated by space",
            Warning::NamedHybrid => "Named hybrid",
            Warning::HybridFormula => "Hybrid formula",
            Warning::IncompleteHybridFormula => "Incomplete hybrid formula",
            Warning::Approximation => "Name is approximate",
            Warning::Comparison => "Name comparison",
            Warning::ExAuthors => "Ex authors are not required",
            Warning::EmendAuthors => "Emend authors are not required",
            Warning::UppercaseAuthor => "Author in upper case",
            Warning::YearCharacter => "Year with latin character",
            Warning::YearQuestionMark => "Year with question mark",
            Warning::YearRange => "Years range",
            Warning::YearSquareBrackets => "Year with square brackets",
            Warning::YearParentheses => "Year with parentheses",
            Warning::CanonicalTransliterated => "Non-standard characters in canonical",
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Warning", 2)?;
        s.serialize_field("quality", &self.quality())?;
        s.serialize_field("warning", self.message())?;
        s.end()
    }
}

/// Highest level first, then alphabetical; duplicates dropped.
pub fn sort_warnings(warnings: &mut Vec<Warning>) {
    warnings.sort_by(|a, b| {
        b.quality()
            .cmp(&a.quality())
            .then_with(|| a.message().cmp(b.message()))
    });
    warnings.dedup();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Year {
    pub value: String,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthorsTeam {
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    #[serde(skip)]
    pub words: Vec<WordPos>,
}

impl AuthorsTeam {
    fn collect_positions(&self, out: &mut Vec<WordPos>) {
        out.extend_from_slice(&self.words);
        if let Some(y) = &self.year {
            let t = if y.approximate {
                WordType::ApproximateYear
            } else {
                WordType::Year
            };
            out.push(WordPos::new(t, y.span));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthorGroup {
    #[serde(flatten)]
    pub team: AuthorsTeam,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_authors: Option<AuthorsTeam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emend_authors: Option<AuthorsTeam>,
}

impl AuthorGroup {
    fn collect_positions(&self, out: &mut Vec<WordPos>) {
        self.team.collect_positions(out);
        for t in [&self.ex_authors, &self.emend_authors].into_iter().flatten() {
            t.collect_positions(out);
        }
    }

    /// Year of the group: the main team's, falling back to the ex team's.
    pub fn year(&self) -> Option<&Year> {
        self.team
            .year
            .as_ref()
            .or_else(|| self.ex_authors.as_ref().and_then(|t| t.year.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorship {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basionym_authorship: Option<AuthorGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combination_authorship: Option<AuthorGroup>,
}

impl Authorship {
    pub fn collect_positions(&self, out: &mut Vec<WordPos>) {
        for g in [&self.basionym_authorship, &self.combination_authorship]
            .into_iter()
            .flatten()
        {
            g.collect_positions(out);
        }
    }

    /// Year of the name as cited: combination year, else basionym year.
    pub fn year(&self) -> Option<&Year> {
        self.combination_authorship
            .as_ref()
            .and_then(AuthorGroup::year)
            .or_else(|| self.basionym_authorship.as_ref().and_then(AuthorGroup::year))
    }
}

/// One word of a name: uninomial, genus, subgenus or epithet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Epithet {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub hybrid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorship: Option<Authorship>,
    #[serde(skip)]
    pub verbatim: String,
    #[serde(skip)]
    pub word_type: WordType,
    #[serde(skip)]
    pub span: Span,
    #[serde(skip)]
    pub rank_span: Option<Span>,
    #[serde(skip)]
    pub parent_span: Option<Span>,
    #[serde(skip)]
    pub hybrid_span: Option<Span>,
}

impl Epithet {
    pub fn new(word_type: WordType, verbatim: &str, value: String, span: Span) -> Self {
        Epithet {
            value,
            rank: None,
            parent: None,
            hybrid: false,
            authorship: None,
            verbatim: verbatim.to_string(),
            word_type,
            span,
            rank_span: None,
            parent_span: None,
            hybrid_span: None,
        }
    }

    fn collect_positions(&self, out: &mut Vec<WordPos>) {
        if let Some(p) = self.parent_span {
            out.push(WordPos::new(WordType::Uninomial, p));
        }
        if let Some(h) = self.hybrid_span {
            out.push(WordPos::new(WordType::HybridChar, h));
        }
        if let Some(r) = self.rank_span {
            out.push(WordPos::new(WordType::Rank, r));
        }
        out.push(WordPos::new(self.word_type, self.span));
        if let Some(a) = &self.authorship {
            a.collect_positions(out);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Approximation,
    Comparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub marker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
    #[serde(skip)]
    pub span: Span,
}

/// Structured parts of a single name element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NameDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uninomial: Option<Epithet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genus: Option<Epithet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrageneric_epithet: Option<Epithet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_epithet: Option<Epithet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub infraspecific_epithets: Vec<Epithet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl NameDetails {
    pub fn collect_positions(&self, out: &mut Vec<WordPos>) {
        let annotation_pos = self.annotation.as_ref().map(|a| {
            let t = match a.kind {
                AnnotationKind::Approximation => WordType::Approximation,
                AnnotationKind::Comparison => WordType::Comparison,
            };
            WordPos::new(t, a.span)
        });
        for e in [&self.uninomial, &self.genus, &self.infrageneric_epithet, &self.specific_epithet]
            .into_iter()
            .flatten()
        {
            e.collect_positions(out);
        }
        for e in &self.infraspecific_epithets {
            e.collect_positions(out);
        }
        out.extend(annotation_pos);
    }

    /// The most specific element that can carry an authorship.
    pub fn terminal(&self) -> Option<&Epithet> {
        self.infraspecific_epithets
            .last()
            .or(self.specific_epithet.as_ref())
            .or(self.uninomial.as_ref())
    }

    pub fn authorship(&self) -> Option<&Authorship> {
        self.terminal().and_then(|e| e.authorship.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridKind {
    NamedHybrid,
    HybridFormula,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Canonical {
    pub value: String,
    pub value_ranked: String,
}

/// Result of parsing one name string.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedName {
    pub name_string_id: String,
    pub parsed: bool,
    pub quality: u8,
    pub quality_warnings: Vec<Warning>,
    pub parser_version: &'static str,
    pub verbatim: String,
    pub normalized: Option<String>,
    pub canonical_name: Option<Canonical>,
    pub cardinality: u8,
    pub hybrid: Option<HybridKind>,
    pub surrogate: bool,
    pub virus: bool,
    pub unparsed_tail: Option<String>,
    pub details: Vec<NameDetails>,
    pub positions: Vec<WordPos>,
}

impl ParsedName {
    /// Renders the result as JSON: one line when `compact`, indented otherwise.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn render_json(&self, compact: bool) -> Result<String> {
        let s = if compact {
            serde_json::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        Ok(s)
    }

    pub fn authorship(&self) -> Option<&Authorship> {
        match self.hybrid {
            Some(HybridKind::HybridFormula) => None,
            _ => self.details.first().and_then(NameDetails::authorship),
        }
    }

    pub fn year(&self) -> Option<&Year> {
        self.authorship().and_then(Authorship::year)
    }

    pub fn canonical(&self) -> Option<&str> {
        self.canonical_name.as_ref().map(|c| c.value.as_str())
    }
}
