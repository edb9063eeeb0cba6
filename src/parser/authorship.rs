use super::grammar::{Parser, is_epithet_word, starts_uppercase};
use crate::render::authorship_value;
use crate::tokenizer::{Token, TokenKind};
use crate::types::{AuthorGroup, Authorship, AuthorsTeam, Warning, WordPos, WordType, Year};

impl Parser<'_, '_> {
    /// authorship := [( group )] [group]
    pub(super) fn parse_authorship(&mut self) -> Option<Authorship> {
        let basionym = self.parse_basionym();
        let combination = self.parse_author_group();
        if basionym.is_none() && combination.is_none() {
            return None;
        }
        Some(Authorship {
            value: authorship_value(basionym.as_ref(), combination.as_ref()),
            basionym_authorship: basionym,
            combination_authorship: combination,
        })
    }

    fn parse_basionym(&mut self) -> Option<AuthorGroup> {
        let cp = self.checkpoint();
        self.eat(TokenKind::OpenParen)?;
        let Some(group) = self.parse_author_group() else {
            self.rewind(cp);
            return None;
        };
        if self.eat(TokenKind::CloseParen).is_none() {
            self.rewind(cp);
            return None;
        }
        Some(group)
    }

    /// group := team [ex team] [emend. team]
    fn parse_author_group(&mut self) -> Option<AuthorGroup> {
        let team = self.parse_team()?;
        let ex_authors = self.parse_marked_team(|p, w| p.dict.is_ex_marker(w), Warning::ExAuthors);
        let emend_authors =
            self.parse_marked_team(|p, w| p.dict.is_emend_marker(w), Warning::EmendAuthors);
        Some(AuthorGroup {
            team,
            ex_authors,
            emend_authors,
        })
    }

    fn parse_marked_team(
        &mut self,
        is_marker: impl Fn(&Self, &str) -> bool,
        warning: Warning,
    ) -> Option<AuthorsTeam> {
        let cp = self.checkpoint();
        let marker = self.peek_word(0)?;
        if !is_marker(self, marker) {
            return None;
        }
        self.bump();
        let Some(team) = self.parse_team() else {
            self.rewind(cp);
            return None;
        };
        self.warn(warning);
        Some(team)
    }

    /// team := author ((, | & | et | and) author)* [et al.] [[,] year]
    fn parse_team(&mut self) -> Option<AuthorsTeam> {
        let mut team = AuthorsTeam::default();
        let (first, words) = self.parse_author()?;
        team.authors.push(first);
        team.words.extend(words);

        loop {
            let cp = self.checkpoint();
            if self.peek_word(0) == Some("et") && self.peek_word(1) == Some("al.") {
                let et = self.bump().map(|t| t.span);
                let al = self.bump().map(|t| t.span);
                if let (Some(et), Some(al), Some(last)) = (et, al, team.authors.last_mut()) {
                    last.push_str(" et al.");
                    team.words.push(WordPos::new(WordType::AuthorWord, et.join(al)));
                }
                break;
            }
            let is_separator = match self.peek(0) {
                Some(t) if t.kind == TokenKind::Comma || t.kind == TokenKind::Ampersand => true,
                Some(t) if t.is_word() => self.dict.is_author_separator(t.text),
                _ => false,
            };
            if !is_separator {
                break;
            }
            self.bump();
            match self.parse_author() {
                Some((name, words)) => {
                    team.authors.push(name);
                    team.words.extend(words);
                }
                None => {
                    self.rewind(cp);
                    break;
                }
            }
        }

        let cp = self.checkpoint();
        self.eat(TokenKind::Comma);
        match self.parse_year() {
            Some(y) => team.year = Some(y),
            None => self.rewind(cp),
        }
        Some(team)
    }

    /// author := (prefix | Word)+ [filius]
    fn parse_author(&mut self) -> Option<(String, Vec<WordPos>)> {
        let cp = self.checkpoint();
        let mut parts: Vec<String> = Vec::new();
        let mut words = Vec::new();
        let mut has_name = false;

        while let Some(t) = self.peek(0).filter(Token::is_word) {
            if is_author_word(t.text) {
                parts.push(self.normalize_author_word(t.text));
                has_name = true;
            } else if self.dict.is_author_prefix(t.text)
                && self
                    .peek_word(1)
                    .is_some_and(|w| is_author_word(w) || self.dict.is_author_prefix(w))
            {
                parts.push(t.text.to_string());
            } else {
                break;
            }
            words.push(WordPos::new(WordType::AuthorWord, t.span));
            self.bump();
        }
        if !has_name {
            self.rewind(cp);
            return None;
        }

        if let Some(t) = self.peek(0).filter(Token::is_word)
            && self.dict.is_author_suffix(t.text)
        {
            // "f." right before an epithet is the forma rank, not filius.
            let forma = t.text == "f." && self.peek_word(1).is_some_and(is_epithet_word);
            if !forma {
                parts.push(normalize_suffix(t.text).to_string());
                words.push(WordPos::new(WordType::AuthorWordFilius, t.span));
                self.bump();
            }
        }
        Some((parts.join(" "), words))
    }

    /// `LINNAEUS` -> `Linnaeus`, with a warning; anything else verbatim.
    fn normalize_author_word(&mut self, w: &str) -> String {
        let letters = w.chars().filter(|c| c.is_alphabetic()).count();
        let shouting = letters > 3 && w.chars().all(|c| !c.is_alphabetic() || c.is_uppercase());
        if !shouting {
            return w.to_string();
        }
        self.warn(Warning::UppercaseAuthor);
        let mut out = String::with_capacity(w.len());
        let mut word_start = true;
        for c in w.chars() {
            if c.is_alphabetic() {
                if word_start {
                    out.push(c);
                } else {
                    out.extend(c.to_lowercase());
                }
                word_start = false;
            } else {
                out.push(c);
                word_start = matches!(c, '-' | '.' | '\'');
            }
        }
        out
    }

    /// year := YYYY | [YYYY] | (YYYY)
    fn parse_year(&mut self) -> Option<Year> {
        let cp = self.checkpoint();
        let (close, bracket_warning) = match self.peek(0)?.kind {
            TokenKind::OpenBracket => (Some(TokenKind::CloseBracket), Some(Warning::YearSquareBrackets)),
            TokenKind::OpenParen => (Some(TokenKind::CloseParen), Some(Warning::YearParentheses)),
            TokenKind::Word => (None, None),
            _ => return None,
        };
        let open_span = if close.is_some() { self.bump().map(|t| t.span) } else { None };

        let Some(tok) = self.peek(0).filter(Token::is_word) else {
            self.rewind(cp);
            return None;
        };
        let Some((value, approximate, warning)) = year_word(tok.text) else {
            self.rewind(cp);
            return None;
        };
        self.bump();
        let mut span = tok.span;
        if let (Some(close), Some(open)) = (close, open_span) {
            let Some(end) = self.eat(close) else {
                self.rewind(cp);
                return None;
            };
            span = open.join(end.span);
        }
        if let Some(w) = warning {
            self.warn(w);
        }
        if let Some(w) = bracket_warning {
            self.warn(w);
        }
        Some(Year {
            value,
            approximate: approximate || close == Some(TokenKind::CloseBracket),
            span,
        })
    }
}

/// `L.`, `Mill.`, `DC.`, `Hook.f.`, `O'Brien`, `d'Urv.`, `Saint-Hilaire`
pub(super) fn is_author_word(w: &str) -> bool {
    let stem = w
        .strip_prefix("d'")
        .or_else(|| w.strip_prefix("D'"))
        .or_else(|| w.strip_prefix("O'"))
        .unwrap_or(w);
    if !starts_uppercase(stem) {
        return false;
    }
    w.chars()
        .all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
}

fn normalize_suffix(w: &str) -> &str {
    match w {
        "f." | "fil." | "filius" | "fils" => "f.",
        "jr." | "Jr." => "Jr.",
        "sr." | "Sr." => "Sr.",
        other => other,
    }
}

/// Year value, whether it is approximate, and the warning it earns.
fn year_word(w: &str) -> Option<(String, bool, Option<Warning>)> {
    let digits: String = w.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    let year: u32 = digits.parse().ok()?;
    if !(1000..=2100).contains(&year) {
        return None;
    }
    let rest = &w[4..];
    match rest {
        "" => Some((digits, false, None)),
        "?" => Some((digits, true, Some(Warning::YearQuestionMark))),
        r if r.len() == 1 && r.chars().all(|c| c.is_ascii_lowercase()) => {
            Some((digits, false, Some(Warning::YearCharacter)))
        }
        r if r.starts_with('-')
            && (3..=5).contains(&r.len())
            && r[1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            Some((digits, false, Some(Warning::YearRange)))
        }
        _ => None,
    }
}
