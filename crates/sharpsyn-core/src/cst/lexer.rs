//! Trivia-preserving C# lexer
//!
//! Every byte of the input ends up either in a token's text or in one of its
//! trivia pieces, so concatenating `leading + text + trailing` over all
//! tokens reproduces the source. Trailing trivia runs up to and including the
//! first end-of-line; everything after that is leading trivia of the next
//! token.
//!
//! Interpolated strings are lexed with a mode stack. Inside the string body
//! the lexer produces text tokens, and at each `{` it switches back to normal
//! lexing until the matching `}`. Trivia is only recognised in normal mode
//! and inside interpolation holes.
//!
//! `>` is never combined with a following `>`: the parser fuses `> >` into a
//! shift operator when the two tokens are adjacent, which keeps nested
//! generic argument lists (`List<List<int>>`) simple.

use crate::cst::SyntaxKind;
use crate::diagnostics::{Diagnostic, ErrorCode, Span};

/// A piece of trivia attached to a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// A token together with its surrounding trivia
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    /// Byte offset of `text` in the source
    pub offset: u32,
    pub leading: Vec<Trivia<'a>>,
    pub trailing: Vec<Trivia<'a>>,
}

impl<'a> Token<'a> {
    /// Span of the token text, excluding trivia
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len() as u32)
    }

    pub fn end(&self) -> u32 {
        self.offset + self.text.len() as u32
    }

    pub fn has_leading_trivia(&self) -> bool {
        !self.leading.is_empty()
    }

    pub fn has_trailing_trivia(&self) -> bool {
        !self.trailing.is_empty()
    }

    /// Whether the leading trivia contains a line break
    pub fn starts_line(&self) -> bool {
        self.leading.iter().any(|t| t.kind == SyntaxKind::EndOfLine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Inside the body of an interpolated string
    Text { verbatim: bool, start: u32 },
    /// Inside `{ ... }` of an interpolated string
    Hole { verbatim: bool, nesting: u32 },
    /// After the top-level `:` of a hole
    Format { verbatim: bool },
}

/// Lazily produces tokens from C# source text
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    modes: Vec<Mode>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            modes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Produce the next token. Returns `EndOfFile` forever once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token<'a> {
        let leading = if self.trivia_allowed() {
            self.scan_trivia(false)
        } else {
            Vec::new()
        };

        let start = self.pos;
        let kind = self.scan_token();
        let text = &self.text[start..self.pos];

        let trailing = if kind != SyntaxKind::EndOfFile && self.trivia_allowed() {
            self.scan_trivia(true)
        } else {
            Vec::new()
        };

        Token {
            kind,
            text,
            offset: start as u32,
            leading,
            trailing,
        }
    }

    /// Lexical diagnostics reported so far
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn trivia_allowed(&self) -> bool {
        matches!(self.modes.last(), None | Some(Mode::Hole { .. }))
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
            count += 1;
        }
        count
    }

    fn error(&mut self, code: ErrorCode, start: usize, args: &[&str]) {
        let span = Span::new(start as u32, self.pos as u32);
        self.diagnostics
            .push(Diagnostic::with_args(code, span, args.iter().copied()));
    }

    // --- trivia ---------------------------------------------------------

    fn scan_trivia(&mut self, trailing: bool) -> Vec<Trivia<'a>> {
        let mut trivia = Vec::new();
        loop {
            let start = self.pos;
            let Some(c) = self.peek() else { break };
            let kind = match c {
                c if is_newline(c) => {
                    self.scan_newline();
                    SyntaxKind::EndOfLine
                }
                c if is_whitespace(c) => {
                    self.eat_while(is_whitespace);
                    SyntaxKind::Whitespace
                }
                '/' if self.peek_nth(1) == Some('/') => self.scan_line_comment(),
                '/' if self.peek_nth(1) == Some('*') => self.scan_block_comment(),
                '#' if !trailing && self.modes.is_empty() && self.at_line_start(start) => {
                    self.eat_while(|c| !is_newline(c));
                    SyntaxKind::PreprocessorDirective
                }
                _ => break,
            };
            trivia.push(Trivia {
                kind,
                text: &self.text[start..self.pos],
            });
            if trailing && kind == SyntaxKind::EndOfLine {
                break;
            }
        }
        trivia
    }

    fn scan_newline(&mut self) {
        if self.peek() == Some('\r') && self.peek_nth(1) == Some('\n') {
            self.pos += 2;
        } else {
            self.bump();
        }
    }

    fn scan_line_comment(&mut self) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        let doc = rest.starts_with("///") && !rest.starts_with("////");
        self.eat_while(|c| !is_newline(c));
        if doc {
            SyntaxKind::SingleLineDocComment
        } else {
            SyntaxKind::SingleLineComment
        }
    }

    fn scan_block_comment(&mut self) -> SyntaxKind {
        let start = self.pos;
        let rest = &self.text[self.pos..];
        let doc = rest.starts_with("/**") && !rest.starts_with("/**/");
        match rest[2..].find("*/") {
            Some(end) => self.pos += 2 + end + 2,
            None => {
                self.pos = self.text.len();
                self.diagnostics.push(Diagnostic::new(
                    ErrorCode::UnterminatedComment,
                    Span::new(start as u32, start as u32 + 2),
                ));
            }
        }
        if doc {
            SyntaxKind::MultiLineDocComment
        } else {
            SyntaxKind::MultiLineComment
        }
    }

    /// Only whitespace separates `pos` from the previous line break
    fn at_line_start(&self, pos: usize) -> bool {
        self.text[..pos]
            .chars()
            .rev()
            .take_while(|c| !is_newline(*c))
            .all(is_whitespace)
    }

    // --- tokens ---------------------------------------------------------

    fn scan_token(&mut self) -> SyntaxKind {
        match self.modes.last().copied() {
            Some(Mode::Text { verbatim, start }) => self.scan_interpolated_text(verbatim, start),
            Some(Mode::Format { verbatim }) => {
                let start = self.pos;
                self.scan_format_text(verbatim);
                self.modes.pop();
                if self.pos > start {
                    SyntaxKind::InterpolatedStringTextToken
                } else {
                    self.scan_token()
                }
            }
            Some(Mode::Hole { .. }) | None => {
                let kind = self.scan_normal();
                self.track_hole(kind);
                kind
            }
        }
    }

    fn scan_normal(&mut self) -> SyntaxKind {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.scan_end_of_file();
        };

        match c {
            '"' => self.scan_string(),
            '\'' => self.scan_char(),
            '@' => match (self.peek_nth(1), self.peek_nth(2)) {
                (Some('"'), _) => {
                    self.pos += 1;
                    self.scan_verbatim_string()
                }
                (Some('$'), Some('"')) => {
                    self.pos += 3;
                    self.push_text(true, start);
                    SyntaxKind::InterpolatedVerbatimStringStart
                }
                (Some(c), _) if is_ident_start(c) => {
                    self.pos += 1;
                    self.eat_while(is_ident_continue);
                    SyntaxKind::Identifier
                }
                _ => self.bad_character(start),
            },
            '$' => match (self.peek_nth(1), self.peek_nth(2)) {
                (Some('"'), _) => {
                    self.pos += 2;
                    self.push_text(false, start);
                    SyntaxKind::InterpolatedStringStart
                }
                (Some('@'), Some('"')) => {
                    self.pos += 3;
                    self.push_text(true, start);
                    SyntaxKind::InterpolatedVerbatimStringStart
                }
                _ => self.bad_character(start),
            },
            '0'..='9' => self.scan_number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if is_ident_start(c) => {
                self.eat_while(is_ident_continue);
                let word = &self.text[start..self.pos];
                SyntaxKind::from_keyword(word).unwrap_or(SyntaxKind::Identifier)
            }
            c => match self.scan_punct(c) {
                Some(kind) => kind,
                None => self.bad_character(start),
            },
        }
    }

    fn scan_end_of_file(&mut self) -> SyntaxKind {
        match self.modes.last().copied() {
            Some(Mode::Hole { .. }) | Some(Mode::Format { .. }) => {
                // The parser reports the missing `}`; the enclosing string
                // reports that it is unterminated.
                self.modes.pop();
                self.scan_token()
            }
            _ => SyntaxKind::EndOfFile,
        }
    }

    fn bad_character(&mut self, start: usize) -> SyntaxKind {
        self.bump();
        let text = &self.text[start..self.pos];
        self.error(ErrorCode::UnexpectedCharacter, start, &[text]);
        SyntaxKind::BadToken
    }

    fn scan_punct(&mut self, c: char) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let next = self.peek_nth(1);
        let next2 = self.peek_nth(2);
        let (kind, len) = match (c, next) {
            ('?', Some('?')) if next2 == Some('=') => (QuestionQuestionEquals, 3),
            ('?', Some('?')) => (QuestionQuestion, 2),
            ('<', Some('<')) if next2 == Some('=') => (LessThanLessThanEquals, 3),
            ('<', Some('<')) => (LessThanLessThan, 2),
            ('<', Some('=')) => (LessThanEquals, 2),
            ('>', Some('=')) => (GreaterThanEquals, 2),
            ('=', Some('=')) => (EqualsEquals, 2),
            ('=', Some('>')) => (EqualsGreaterThan, 2),
            ('!', Some('=')) => (ExclamationEquals, 2),
            ('-', Some('>')) => (MinusGreaterThan, 2),
            ('-', Some('-')) => (MinusMinus, 2),
            ('-', Some('=')) => (MinusEquals, 2),
            ('+', Some('+')) => (PlusPlus, 2),
            ('+', Some('=')) => (PlusEquals, 2),
            ('&', Some('&')) => (AmpersandAmpersand, 2),
            ('&', Some('=')) => (AmpersandEquals, 2),
            ('|', Some('|')) => (BarBar, 2),
            ('|', Some('=')) => (BarEquals, 2),
            ('*', Some('=')) => (AsteriskEquals, 2),
            ('/', Some('=')) => (SlashEquals, 2),
            ('%', Some('=')) => (PercentEquals, 2),
            ('^', Some('=')) => (CaretEquals, 2),
            (':', Some(':')) => (ColonColon, 2),
            ('.', Some('.')) => (DotDot, 2),
            ('~', _) => (Tilde, 1),
            ('!', _) => (Exclamation, 1),
            ('%', _) => (Percent, 1),
            ('^', _) => (Caret, 1),
            ('&', _) => (Ampersand, 1),
            ('*', _) => (Asterisk, 1),
            ('(', _) => (OpenParen, 1),
            (')', _) => (CloseParen, 1),
            ('-', _) => (Minus, 1),
            ('+', _) => (Plus, 1),
            ('=', _) => (Equals, 1),
            ('{', _) => (OpenBrace, 1),
            ('}', _) => (CloseBrace, 1),
            ('[', _) => (OpenBracket, 1),
            (']', _) => (CloseBracket, 1),
            ('|', _) => (Bar, 1),
            (':', _) => (Colon, 1),
            (';', _) => (Semicolon, 1),
            ('<', _) => (LessThan, 1),
            (',', _) => (Comma, 1),
            ('>', _) => (GreaterThan, 1),
            ('.', _) => (Dot, 1),
            ('?', _) => (Question, 1),
            ('/', _) => (Slash, 1),
            _ => return None,
        };
        self.pos += len;
        Some(kind)
    }

    // --- literals -------------------------------------------------------

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut valid = true;
        let radix_prefix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix_prefix {
            self.pos += 2;
            let digits_start = self.pos;
            let count = self.eat_while(|c| c == '_' || c.is_digit(radix));
            let digits = &self.text[digits_start..self.pos];
            if count == 0 || digits.ends_with('_') || digits.chars().all(|c| c == '_') {
                valid = false;
            }
            self.scan_integer_suffix();
        } else {
            let mut real = false;
            valid &= self.scan_digits();
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
                valid &= self.scan_digits();
                real = true;
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.pos += 1;
                if matches!(self.peek(), Some('+' | '-')) {
                    self.pos += 1;
                }
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    valid &= self.scan_digits();
                } else {
                    valid = false;
                }
                real = true;
            }
            match self.peek() {
                Some('f' | 'F' | 'd' | 'D' | 'm' | 'M') => self.pos += 1,
                _ if !real => self.scan_integer_suffix(),
                _ => {}
            }
        }

        if !valid {
            let text = &self.text[start..self.pos];
            self.error(ErrorCode::InvalidNumber, start, &[text]);
        }
        SyntaxKind::NumericLiteral
    }

    /// Decimal digits with `_` separators; false when a separator trails
    fn scan_digits(&mut self) -> bool {
        let start = self.pos;
        self.eat_while(|c| c.is_ascii_digit() || c == '_');
        !self.text[start..self.pos].ends_with('_')
    }

    fn scan_integer_suffix(&mut self) {
        match self.peek() {
            Some('u' | 'U') => {
                self.pos += 1;
                if matches!(self.peek(), Some('l' | 'L')) {
                    self.pos += 1;
                }
            }
            Some('l' | 'L') => {
                self.pos += 1;
                if matches!(self.peek(), Some('u' | 'U')) {
                    self.pos += 1;
                }
            }
            _ => {}
        }
    }

    fn scan_char(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut count = 0;
        loop {
            match self.peek() {
                Some('\'') => {
                    self.pos += 1;
                    break;
                }
                None => {
                    self.error(ErrorCode::UnterminatedCharacter, start, &[]);
                    return SyntaxKind::CharacterLiteral;
                }
                Some(c) if is_newline(c) => {
                    self.error(ErrorCode::UnterminatedCharacter, start, &[]);
                    return SyntaxKind::CharacterLiteral;
                }
                Some('\\') => {
                    self.scan_escape();
                    count += 1;
                }
                Some(_) => {
                    self.bump();
                    count += 1;
                }
            }
        }
        match count {
            0 => self.error(ErrorCode::EmptyCharacterLiteral, start, &[]),
            1 => {}
            _ => self.error(ErrorCode::TooManyCharactersInCharacterLiteral, start, &[]),
        }
        SyntaxKind::CharacterLiteral
    }

    fn scan_string(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => self.scan_escape(),
                Some(c) if !is_newline(c) => self.bump(),
                _ => {
                    self.error(ErrorCode::UnterminatedString, start, &[]);
                    break;
                }
            }
        }
        SyntaxKind::StringLiteral
    }

    /// `@"..."`, positioned on the opening quote
    fn scan_verbatim_string(&mut self) -> SyntaxKind {
        let start = self.pos - 1;
        self.pos += 1;
        loop {
            match self.peek() {
                Some('"') if self.peek_nth(1) == Some('"') => self.pos += 2,
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.bump(),
                None => {
                    self.error(ErrorCode::UnterminatedString, start, &[]);
                    break;
                }
            }
        }
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let valid = match self.peek() {
            Some('\'' | '"' | '\\' | '0' | 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v') => {
                self.pos += 1;
                true
            }
            Some('u') => {
                self.pos += 1;
                self.scan_hex_digits(4) == 4
            }
            Some('U') => {
                self.pos += 1;
                self.scan_hex_digits(8) == 8
            }
            Some('x') => {
                self.pos += 1;
                self.scan_hex_digits(4) > 0
            }
            Some(c) if !is_newline(c) => {
                self.bump();
                false
            }
            _ => false,
        };
        if !valid {
            let text = &self.text[start..self.pos];
            self.error(ErrorCode::InvalidEscapeSequence, start, &[text]);
        }
    }

    fn scan_hex_digits(&mut self, max: usize) -> usize {
        let mut count = 0;
        while count < max && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.pos += 1;
            count += 1;
        }
        count
    }

    // --- interpolated strings -------------------------------------------

    fn push_text(&mut self, verbatim: bool, start: usize) {
        self.modes.push(Mode::Text {
            verbatim,
            start: start as u32,
        });
    }

    fn scan_interpolated_text(&mut self, verbatim: bool, string_start: u32) -> SyntaxKind {
        let start = self.pos;
        loop {
            match self.peek() {
                None => break,
                Some('"') if verbatim && self.peek_nth(1) == Some('"') => self.pos += 2,
                Some('"') => break,
                Some('{') if self.peek_nth(1) == Some('{') => self.pos += 2,
                Some('{') => break,
                Some('}') if self.peek_nth(1) == Some('}') => self.pos += 2,
                Some('\\') if !verbatim => self.scan_escape(),
                Some(c) if !verbatim && is_newline(c) => break,
                Some(_) => self.bump(),
            }
        }
        if self.pos > start {
            return SyntaxKind::InterpolatedStringTextToken;
        }

        match self.peek() {
            Some('"') => {
                self.pos += 1;
                self.modes.pop();
                SyntaxKind::InterpolatedStringEnd
            }
            Some('{') => {
                self.pos += 1;
                self.modes.push(Mode::Hole {
                    verbatim,
                    nesting: 0,
                });
                SyntaxKind::OpenBrace
            }
            _ => {
                // Zero-width end so the string node stays well formed.
                self.modes.pop();
                self.diagnostics.push(Diagnostic::new(
                    ErrorCode::UnterminatedString,
                    Span::new(string_start, self.pos as u32),
                ));
                SyntaxKind::InterpolatedStringEnd
            }
        }
    }

    fn scan_format_text(&mut self, verbatim: bool) {
        loop {
            match self.peek() {
                None | Some('}') | Some('"') => break,
                Some('{') if self.peek_nth(1) == Some('{') => self.pos += 2,
                Some('{') => break,
                Some('\\') if !verbatim => self.scan_escape(),
                Some(c) if !verbatim && is_newline(c) => break,
                Some(_) => self.bump(),
            }
        }
    }

    /// Keep brace nesting inside an interpolation hole up to date
    fn track_hole(&mut self, kind: SyntaxKind) {
        let Some(Mode::Hole { verbatim, nesting }) = self.modes.last_mut() else {
            return;
        };
        match kind {
            SyntaxKind::OpenParen | SyntaxKind::OpenBracket | SyntaxKind::OpenBrace => {
                *nesting += 1
            }
            SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                *nesting = nesting.saturating_sub(1)
            }
            SyntaxKind::CloseBrace if *nesting > 0 => *nesting -= 1,
            SyntaxKind::CloseBrace => {
                self.modes.pop();
            }
            SyntaxKind::Colon if *nesting == 0 => {
                let verbatim = *verbatim;
                self.modes.push(Mode::Format { verbatim });
            }
            _ => {}
        }
    }
}

/// Lex the whole input
pub fn lex(text: &str) -> (Vec<Token<'_>>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == SyntaxKind::EndOfFile;
        tokens.push(token);
        if done {
            break;
        }
    }
    (tokens, lexer.take_diagnostics())
}

pub(crate) fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

pub(crate) fn is_whitespace(c: char) -> bool {
    !is_newline(c) && (c.is_whitespace() || c == '\u{FEFF}')
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
