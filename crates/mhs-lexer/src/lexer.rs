//! The micro-Haskell lexer.
//! micro-Haskell 词法分析器。

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{LexError, LexErrorKind};
use crate::token::{Token, TokenKind};
use mhs_common::{Position, Span};

/// Returns true for characters that make up operator symbols.
pub fn is_symbol_char(ch: char) -> bool {
    matches!(
        ch,
        '!' | '#' | '$' | '%' | '&' | '*' | '+' | '.' | '/' | '<' | '=' | '>' | '?' | '@' | '\\'
            | '^' | '|' | '-' | '~' | ':'
    )
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '\''
}

/// The micro-Haskell lexer.
/// micro-Haskell 词法分析器。
///
/// A lazy iterator of tokens. Cloning a lexer snapshots its position, so a
/// clone can be used to look ahead or restart scanning. After yielding
/// `Eof` or an error the lexer is exhausted.
#[derive(Clone)]
pub struct Lexer<'src> {
    /// Character iterator with position info
    /// 带位置信息的字符迭代器
    chars: Peekable<CharIndices<'src>>,
    /// Current byte offset in source
    /// 当前在源码中的位置
    pos: usize,
    /// Line/column of `pos`
    position: Position,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    /// 为给定的源代码创建新的词法分析器。
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            pos: 0,
            position: Position::START,
            finished: false,
        }
    }

    /// Tokenize the entire source. The result always ends with `Eof`.
    /// 对整个源代码进行词法分析。
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    /// Scan the next token.
    /// 获取下一个 token。
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.pos;
        let start_position = self.position;

        let Some((_, ch)) = self.advance() else {
            return Ok(Token::new(
                TokenKind::Eof,
                Span::from_usize(start, start),
                start_position,
            ));
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '`' => TokenKind::Backtick,
            '"' => self.string_literal(start, start_position)?,
            c if c.is_ascii_digit() => self.number(c, start, start_position)?,
            c if is_ident_start(c) => self.identifier(c),
            c if is_symbol_char(c) => self.operator(c),
            c if c.is_control() => {
                return Err(LexError::new(
                    LexErrorKind::InvalidCharacter(c),
                    Span::from_usize(start, self.pos),
                    start_position,
                ));
            }
            c => TokenKind::Unknown(c),
        };

        Ok(Token::new(
            kind,
            Span::from_usize(start, self.pos),
            start_position,
        ))
    }

    /// Advance to the next character.
    /// 前进到下一个字符。
    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.pos = pos + ch.len_utf8();
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        result
    }

    /// Peek at the next character without consuming it.
    /// 查看下一个字符但不消耗它。
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    /// Peek at the nth character ahead.
    /// 查看前方第 n 个字符。
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, ch)| ch)
    }

    /// Skip whitespace and comments.
    /// 跳过空白字符和注释。
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_nth(1) == Some('-') && self.starts_line_comment() => {
                    self.skip_line_comment();
                }
                Some('{') if self.peek_nth(1) == Some('-') => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// A run of two or more dashes starts a comment unless it is followed by
    /// another symbol character, in which case it is an operator like `-->`.
    fn starts_line_comment(&self) -> bool {
        let mut rest = self.chars.clone().map(|(_, ch)| ch).skip_while(|&ch| ch == '-');
        !matches!(rest.next(), Some(ch) if is_symbol_char(ch))
    }

    /// Skip a line comment (-- to end of line).
    /// 跳过行注释（-- 到行尾）。
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip a nestable block comment (`{- ... -}`).
    /// 跳过可嵌套的块注释（`{- ... -}`）。
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let start_position = self.position;
        self.advance(); // {
        self.advance(); // -
        let mut depth = 1usize;

        while depth > 0 {
            match self.advance() {
                Some((_, '{')) if self.peek_char() == Some('-') => {
                    self.advance();
                    depth += 1;
                }
                Some((_, '-')) if self.peek_char() == Some('}') => {
                    self.advance();
                    depth -= 1;
                }
                Some(_) => {}
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedComment,
                        Span::from_usize(start, self.pos),
                        start_position,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parse a string literal (double-quoted). Strings may not span lines.
    /// 解析字符串字面量（双引号包围）。
    fn string_literal(&mut self, start: usize, start_position: Position) -> Result<TokenKind, LexError> {
        let mut value = String::new();

        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::Str(value));
                }
                Some('\\') => {
                    self.advance();
                    value.push(self.escape_char(start, start_position)?);
                }
                Some('\n') | None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        Span::from_usize(start, self.pos),
                        start_position,
                    ));
                }
                Some(ch) => {
                    self.advance();
                    value.push(ch);
                }
            }
        }
    }

    /// Parse an escape character sequence.
    /// 解析转义字符序列。
    fn escape_char(&mut self, start: usize, start_position: Position) -> Result<char, LexError> {
        let escape_position = self.position;
        match self.advance() {
            Some((_, 'n')) => Ok('\n'),
            Some((_, 'r')) => Ok('\r'),
            Some((_, 't')) => Ok('\t'),
            Some((_, '0')) => Ok('\0'),
            Some((_, '\\')) => Ok('\\'),
            Some((_, '"')) => Ok('"'),
            Some((_, '\'')) => Ok('\''),
            Some((pos, ch)) => Err(LexError::new(
                LexErrorKind::InvalidEscape(ch),
                Span::from_usize(pos - 1, self.pos),
                Position::new(escape_position.line, escape_position.column - 1),
            )),
            None => Err(LexError::new(
                LexErrorKind::UnterminatedString,
                Span::from_usize(start, self.pos),
                start_position,
            )),
        }
    }

    /// Parse a decimal integer literal.
    /// 解析十进制整数字面量。
    fn number(&mut self, first: char, start: usize, start_position: Position) -> Result<TokenKind, LexError> {
        let mut value = String::from(first);

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        value.parse::<i64>().map(TokenKind::Int).map_err(|_| {
            LexError::new(
                LexErrorKind::IntegerOverflow(value.clone()),
                Span::from_usize(start, self.pos),
                start_position,
            )
        })
    }

    /// Parse an identifier, constructor name or keyword.
    /// 解析标识符、构造器名或关键字。
    fn identifier(&mut self, first: char) -> TokenKind {
        let mut value = String::from(first);

        while let Some(ch) = self.peek_char() {
            if is_ident_char(ch) {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if value == "_" {
            return TokenKind::Underscore;
        }
        if first.is_uppercase() {
            return TokenKind::ConIdent(value);
        }

        // Check for keywords - 检查是否为关键字
        TokenKind::keyword_from_str(&value).unwrap_or(TokenKind::Ident(value))
    }

    /// Parse a maximal run of symbol characters.
    /// 解析最长的符号字符序列。
    fn operator(&mut self, first: char) -> TokenKind {
        let mut value = String::from(first);

        while let Some(ch) = self.peek_char() {
            if is_symbol_char(ch) {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::reserved_symbol(&value).unwrap_or(TokenKind::Operator(value))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if !matches!(&result, Ok(token) if token.kind != TokenKind::Eof) {
            self.finished = true;
        }
        Some(result)
    }
}
