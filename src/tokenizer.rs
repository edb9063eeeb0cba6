use crate::preprocess::is_name_space;
use crate::types::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Semicolon,
    Ampersand,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Char offsets, for positions.
    pub span: Span,
    /// Byte offsets, for slicing the source.
    pub byte_start: usize,
    pub byte_end: usize,
    /// Hybrid sign touching a neighbouring word (`×rubens`).
    pub glued: bool,
}

impl Token<'_> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// `x`/`X` standing in for the multiplication sign.
    pub fn is_ascii_hybrid(&self) -> bool {
        self.kind == TokenKind::Hybrid && self.text != "×"
    }
}

const fn punct_kind(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        '[' => Some(TokenKind::OpenBracket),
        ']' => Some(TokenKind::CloseBracket),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '&' => Some(TokenKind::Ampersand),
        '×' => Some(TokenKind::Hybrid),
        _ => None,
    }
}

struct Pending {
    byte_start: usize,
    char_start: usize,
}

/// Splits a name body into words and punctuation.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut prev: Option<char> = None;
    let mut chars = source.char_indices().enumerate().peekable();

    while let Some((ci, (bi, c))) = chars.next() {
        if is_name_space(c) {
            flush(source, &mut pending, bi, ci, &mut out);
        } else if let Some(kind) = punct_kind(c) {
            flush(source, &mut pending, bi, ci, &mut out);
            let next = chars.peek().map(|&(_, (_, n))| n);
            let glued = kind == TokenKind::Hybrid
                && (prev.is_some_and(|p| !is_name_space(p) && punct_kind(p).is_none())
                    || next.is_some_and(|n| !is_name_space(n) && punct_kind(n).is_none()));
            let end = bi + c.len_utf8();
            out.push(Token {
                kind,
                text: &source[bi..end],
                span: Span::new(ci, ci + 1),
                byte_start: bi,
                byte_end: end,
                glued,
            });
        } else if pending.is_none() {
            pending = Some(Pending {
                byte_start: bi,
                char_start: ci,
            });
        }
        prev = Some(c);
    }
    let total_chars = source.chars().count();
    flush(source, &mut pending, source.len(), total_chars, &mut out);
    out
}

fn flush<'a>(
    source: &'a str,
    pending: &mut Option<Pending>,
    byte_end: usize,
    char_end: usize,
    out: &mut Vec<Token<'a>>,
) {
    let Some(p) = pending.take() else {
        return;
    };
    let text = &source[p.byte_start..byte_end];
    let kind = if text == "x" || text == "X" {
        TokenKind::Hybrid
    } else {
        TokenKind::Word
    };
    out.push(Token {
        kind,
        text,
        span: Span::new(p.char_start, char_end),
        byte_start: p.byte_start,
        byte_end,
        glued: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<(TokenKind, &str)> {
        tokenize(s).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn words_and_punctuation() {
        assert_eq!(
            kinds("Aus bus (L.,1758) Mill. & Sm."),
            vec![
                (TokenKind::Word, "Aus"),
                (TokenKind::Word, "bus"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Word, "L."),
                (TokenKind::Comma, ","),
                (TokenKind::Word, "1758"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Word, "Mill."),
                (TokenKind::Ampersand, "&"),
                (TokenKind::Word, "Sm."),
            ]
        );
    }

    #[test]
    fn spans_are_char_offsets() {
        let toks = tokenize("Aëdes  ægypti");
        assert_eq!(toks[0].span, Span::new(0, 5));
        assert_eq!(toks[1].span, Span::new(7, 13));
        assert_eq!(&"Aëdes  ægypti"[toks[1].byte_start..toks[1].byte_end], "ægypti");
    }

    #[test]
    fn hybrid_signs() {
        let toks = tokenize("Salix ×rubens");
        assert_eq!(toks[1].kind, TokenKind::Hybrid);
        assert!(toks[1].glued);
        assert_eq!(toks[2].text, "rubens");

        let toks = tokenize("Salix alba x fragilis");
        assert_eq!(toks[2].kind, TokenKind::Hybrid);
        assert!(toks[2].is_ascii_hybrid());
        assert!(!toks[2].glued);

        let toks = tokenize("Salix alba × S. fragilis");
        assert_eq!(toks[2].kind, TokenKind::Hybrid);
        assert!(!toks[2].glued);
        assert!(!toks[2].is_ascii_hybrid());
    }

    #[test]
    fn underscores_and_tabs_separate() {
        assert_eq!(
            kinds("Homo_sapiens\tL."),
            vec![
                (TokenKind::Word, "Homo"),
                (TokenKind::Word, "sapiens"),
                (TokenKind::Word, "L."),
            ]
        );
    }
}
