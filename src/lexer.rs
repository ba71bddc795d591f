//! Chord marker scanner for a single line of ChordPro text.
//!
//! Splits a line into plain text and `[Chord]` markers. Matching is lazy and
//! non-nested: the first `]` after a `[` closes the marker, so `[[C]]` yields
//! the chord `[C` followed by the text `]`. A `[` with no `]` anywhere after it
//! swallows the text up to the next `[` (or the end of the line) as its chord
//! name. Markers whose content is blank are left in the text.

/// A piece of one source line
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Plain text, brackets included when they did not form a marker
    Text(&'a str),
    /// A chord marker with its trimmed name
    Chord { name: &'a str, terminated: bool },
}

/// A token with its byte offset in the line
#[derive(Debug, Clone)]
pub struct LocatedToken<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

/// Lexer for one line of song text
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    text_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            text_start: 0,
        }
    }

    /// Byte offset of the next `[` at or after the current position
    fn next_open(&self) -> Option<usize> {
        self.input[self.position..]
            .find('[')
            .map(|i| self.position + i)
    }

    /// Content range and end offset of the marker opened at `open`
    fn marker_extent(&self, open: usize) -> (&'a str, usize, bool) {
        let body_start = open + 1;
        let rest = &self.input[body_start..];
        match rest.find(']') {
            Some(close) => (&rest[..close], body_start + close + 1, true),
            None => {
                // Unterminated: absorb up to the next `[` or the end of the line
                let end = rest.find('[').map_or(self.input.len(), |i| body_start + i);
                (&self.input[body_start..end], end, false)
            }
        }
    }

    fn flush_text(&mut self, until: usize, tokens: &mut Vec<LocatedToken<'a>>) {
        if until > self.text_start {
            tokens.push(LocatedToken {
                token: Token::Text(&self.input[self.text_start..until]),
                offset: self.text_start,
            });
        }
    }

    pub fn tokenize(&mut self) -> Vec<LocatedToken<'a>> {
        let mut tokens = Vec::new();

        while let Some(open) = self.next_open() {
            let (content, end, terminated) = self.marker_extent(open);
            let name = content.trim();

            if name.is_empty() {
                // `[]` and `[   ]` stay as ordinary text
                self.position = open + 1;
                continue;
            }

            self.flush_text(open, &mut tokens);
            tokens.push(LocatedToken {
                token: Token::Chord { name, terminated },
                offset: open,
            });
            self.position = end;
            self.text_start = end;
        }

        self.flush_text(self.input.len(), &mut tokens);
        tokens
    }
}

/// Split text into alternating runs of whitespace and non-whitespace.
pub fn split_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                runs.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<Token<'_>> {
        Lexer::new(line).tokenize().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_markers_and_text() {
        assert_eq!(
            tokens("[C]Hello [G]world"),
            vec![
                Token::Chord { name: "C", terminated: true },
                Token::Text("Hello "),
                Token::Chord { name: "G", terminated: true },
                Token::Text("world"),
            ]
        );
    }

    #[test]
    fn test_leading_text_and_offsets() {
        let located = Lexer::new("Oh [Am]my").tokenize();
        assert_eq!(located.len(), 3);
        assert_eq!(located[0].token, Token::Text("Oh "));
        assert_eq!(located[1].offset, 3);
        assert_eq!(located[2].offset, 7);
    }

    #[test]
    fn test_blank_brackets_are_text() {
        assert_eq!(tokens("a [] b [  ] c"), vec![Token::Text("a [] b [  ] c")]);
        assert_eq!(
            tokens("[]x[D]y"),
            vec![
                Token::Text("[]x"),
                Token::Chord { name: "D", terminated: true },
                Token::Text("y"),
            ]
        );
    }

    #[test]
    fn test_nested_brackets_fold_into_chord() {
        assert_eq!(
            tokens("[[C]]"),
            vec![
                Token::Chord { name: "[C", terminated: true },
                Token::Text("]"),
            ]
        );
    }

    #[test]
    fn test_unterminated_bracket_absorbs_rest() {
        assert_eq!(
            tokens("[C unclosed bracket and weird content"),
            vec![Token::Chord {
                name: "C unclosed bracket and weird content",
                terminated: false,
            }]
        );
        assert_eq!(
            tokens("la [Am la [G la"),
            vec![
                Token::Text("la "),
                Token::Chord { name: "Am la", terminated: false },
                Token::Chord { name: "G la", terminated: false },
            ]
        );
    }

    #[test]
    fn test_split_runs() {
        assert_eq!(split_runs("Hello  world "), vec!["Hello", "  ", "world", " "]);
        assert_eq!(split_runs(" x"), vec![" ", "x"]);
        assert!(split_runs("").is_empty());
    }
}
