//! Import-only parsing of Go source files.
//!
//! Only the leading part of a file is read: the `package` clause followed by
//! any `import` declarations. Scanning stops at the first token that does not
//! start another import declaration, so function bodies are never looked at.
//!
//! Declarations must be separated by a newline or `;`, and import paths are
//! checked with the same character rules the Go toolchain applies. `\x` and
//! octal escapes denote raw bytes. Source files are decoded lossily: invalid
//! UTF-8 becomes U+FFFD, which is rejected inside an import path and ignored
//! everywhere else.

use crate::error::{Result, VendError};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Read `path` and return its import paths in declaration order.
pub fn extract_imports(path: &Path) -> Result<Vec<String>> {
    let bytes =
        fs::read(path).map_err(|e| VendError::io(format!("Failed to read {}", path.display()), e))?;
    let src = String::from_utf8_lossy(&bytes);

    parse_imports(&src).map_err(|e| VendError::Parse {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })
}

pub fn parse_imports(src: &str) -> std::result::Result<Vec<String>, SyntaxError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut scanner = Scanner::new(src);

    if scanner.next_token()? != Token::Ident("package") {
        return Err(scanner.error("expected 'package'"));
    }
    if !matches!(scanner.next_token()?, Token::Ident(_)) {
        return Err(scanner.error("expected package name"));
    }

    let mut imports = Vec::new();
    loop {
        let tok = scanner.next_token()?;
        if tok == Token::Eof {
            break;
        }
        if !scanner.separated {
            return Err(scanner.error("expected ';'"));
        }
        match tok {
            Token::Ident("import") => import_decl(&mut scanner, &mut imports)?,
            Token::Str(_) => return Err(scanner.error("expected declaration")),
            _ => break,
        }
    }

    Ok(imports)
}

/// Everything after the `import` keyword: one spec or a parenthesized group.
fn import_decl(
    scanner: &mut Scanner<'_>,
    imports: &mut Vec<String>,
) -> std::result::Result<(), SyntaxError> {
    let tok = scanner.next_token()?;
    if tok != Token::LParen {
        imports.push(import_spec(scanner, tok)?);
        return Ok(());
    }

    let mut tok = scanner.next_token()?;
    loop {
        match tok {
            Token::RParen => return Ok(()),
            Token::Eof => return Err(scanner.error("import group is not closed")),
            first => imports.push(import_spec(scanner, first)?),
        }
        tok = scanner.next_token()?;
        if !matches!(tok, Token::RParen | Token::Eof) && !scanner.separated {
            return Err(scanner.error("expected ';'"));
        }
    }
}

/// `[ "." | "_" | identifier ] ImportPath`, with `first` already consumed.
fn import_spec(
    scanner: &mut Scanner<'_>,
    first: Token<'_>,
) -> std::result::Result<String, SyntaxError> {
    let path = match first {
        Token::Dot => scanner.next_token()?,
        Token::Ident(_) => {
            let next = scanner.next_token()?;
            if scanner.separated {
                return Err(scanner.error("missing import path"));
            }
            next
        }
        other => other,
    };

    match path {
        Token::Str(p) if p.is_empty() => Err(scanner.error("invalid import path: empty")),
        Token::Str(p) if !is_valid_import_path(&p) => {
            Err(scanner.error(format!("invalid import path: {p:?}")))
        }
        Token::Str(p) => Ok(p),
        _ => Err(scanner.error("missing import path")),
    }
}

const ILLEGAL_PATH_CHARS: &str = "!\"#$%&'()*,:;<=>?[\\]^`{|}\u{fffd}";

fn is_valid_import_path(path: &str) -> bool {
    path.chars().all(|c| {
        !c.is_control() && !c.is_whitespace() && !ILLEGAL_PATH_CHARS.contains(c)
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(String),
    LParen,
    RParen,
    Dot,
    Other,
    Eof,
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    /// A newline or `;` preceded the last token.
    separated: bool,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            separated: false,
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    /// Skip whitespace, semicolons and comments, noting whether a newline or
    /// `;` was among them.
    fn skip_trivia(&mut self) -> std::result::Result<(), SyntaxError> {
        let start_line = self.line;
        let mut semicolon = false;
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if rest.starts_with("/*") {
                let comment_line = self.line;
                self.pos += 2;
                loop {
                    if self.rest().starts_with("*/") {
                        self.pos += 2;
                        break;
                    }
                    if self.bump().is_none() {
                        return Err(SyntaxError {
                            line: comment_line,
                            message: "comment not terminated".to_string(),
                        });
                    }
                }
            } else if matches!(self.peek(), Some(c) if c.is_whitespace() || c == ';') {
                semicolon |= self.bump() == Some(';');
            } else {
                self.separated = semicolon || self.line > start_line;
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> std::result::Result<Token<'a>, SyntaxError> {
        self.skip_trivia()?;

        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };

        if c.is_alphabetic() || c == '_' {
            let start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
                self.bump();
            }
            let src = self.src;
            return Ok(Token::Ident(&src[start..self.pos]));
        }

        self.bump();
        match c {
            '(' => Ok(Token::LParen),
            ')' => Ok(Token::RParen),
            '.' => Ok(Token::Dot),
            '"' => self.interpreted_string().map(Token::Str),
            '`' => self.raw_string().map(Token::Str),
            _ => Ok(Token::Other),
        }
    }

    fn raw_string(&mut self) -> std::result::Result<String, SyntaxError> {
        let start_line = self.line;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('`') => return Ok(out),
                Some('\r') => {}
                Some(c) => out.push(c),
                None => {
                    return Err(SyntaxError {
                        line: start_line,
                        message: "raw string literal not terminated".to_string(),
                    });
                }
            }
        }
    }

    fn interpreted_string(&mut self) -> std::result::Result<String, SyntaxError> {
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error("string literal not terminated")),
                Some('"') => {
                    self.bump();
                    return Ok(String::from_utf8_lossy(&out).into_owned());
                }
                Some('\\') => {
                    self.bump();
                    self.escape(&mut out)?;
                }
                Some(c) => {
                    self.bump();
                    out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
                }
            }
        }
    }

    /// Byte escapes are pushed as-is, so they may leave invalid UTF-8 behind.
    fn escape(&mut self, out: &mut Vec<u8>) -> std::result::Result<(), SyntaxError> {
        let simple = match self.peek() {
            Some('a') => Some('\u{07}'),
            Some('b') => Some('\u{08}'),
            Some('f') => Some('\u{0c}'),
            Some('n') => Some('\n'),
            Some('r') => Some('\r'),
            Some('t') => Some('\t'),
            Some('v') => Some('\u{0b}'),
            Some('\\') => Some('\\'),
            Some('"') => Some('"'),
            _ => None,
        };
        if let Some(c) = simple {
            self.bump();
            out.push(c as u8);
            return Ok(());
        }

        // (digits, radix, whether the value is a single byte)
        let (digits, radix, byte) = match self.peek() {
            Some('x') => (2, 16, true),
            Some('u') => (4, 16, false),
            Some('U') => (8, 16, false),
            Some('0'..='7') => (3, 8, true),
            _ => return Err(self.error("unknown escape sequence")),
        };
        if radix == 16 {
            self.bump();
        }

        let mut value: u32 = 0;
        for _ in 0..digits {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(radix))
                .ok_or_else(|| self.error("illegal character in escape sequence"))?;
            self.bump();
            value = value * radix + digit;
        }

        let invalid = || self.error("escape sequence is invalid Unicode code point");
        if byte {
            out.push(u8::try_from(value).map_err(|_| invalid())?);
        } else {
            let c = char::from_u32(value).ok_or_else(invalid)?;
            out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_grouped_imports() {
        let src = r#"// Package main does things.
package main

import "fmt"

import (
	"os"
	log "github.com/sirupsen/logrus"
	_ "github.com/lib/pq"
	. "gopkg.in/check.v1"
)

func main() { fmt.Println("import \"not/this\"") }
"#;
        assert_eq!(
            parse_imports(src).unwrap(),
            [
                "fmt",
                "os",
                "github.com/sirupsen/logrus",
                "github.com/lib/pq",
                "gopkg.in/check.v1"
            ]
        );
    }

    #[test]
    fn test_no_imports() {
        assert!(parse_imports("package empty\n\nvar x = 1\n").unwrap().is_empty());
    }

    #[test]
    fn test_build_tags_and_block_comments() {
        let src = "//go:build linux\n\n/* header\n * spanning lines */\npackage sys; import \"syscall\"; import (\"unsafe\";)\n";
        assert_eq!(parse_imports(src).unwrap(), ["syscall", "unsafe"]);
    }

    #[test]
    fn test_raw_string_and_escapes() {
        let src = "package p\nimport (\n\t`github.com/a/raw`\n\t\"github.com/b/\\x65sc\"\n)\n";
        assert_eq!(
            parse_imports(src).unwrap(),
            ["github.com/a/raw", "github.com/b/esc"]
        );
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        let src = "package p\nimport \"a.io/x\"\nimport \"b.io/y\"\nimport z \"a.io/x\"\n";
        assert_eq!(parse_imports(src).unwrap(), ["a.io/x", "b.io/y", "a.io/x"]);
    }

    #[test]
    fn test_byte_order_mark_skipped() {
        assert_eq!(
            parse_imports("\u{feff}package p\nimport \"fmt\"\n").unwrap(),
            ["fmt"]
        );
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_imports("import \"fmt\"\n").unwrap_err();
        assert_eq!(err.message, "expected 'package'");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_missing_package_name() {
        let err = parse_imports("package \"main\"\n").unwrap_err();
        assert_eq!(err.message, "expected package name");
    }

    #[test]
    fn test_unterminated_string_reports_line() {
        let err = parse_imports("package p\n\nimport \"fmt\n").unwrap_err();
        assert_eq!(err.message, "string literal not terminated");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse_imports("package p\nimport (\n\"fmt\"\n").unwrap_err();
        assert_eq!(err.message, "import group is not closed");
    }

    #[test]
    fn test_missing_and_empty_import_path() {
        assert_eq!(
            parse_imports("package p\nimport fmt\n").unwrap_err().message,
            "missing import path"
        );
        assert_eq!(
            parse_imports("package p\nimport \"\"\n").unwrap_err().message,
            "invalid import path: empty"
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse_imports("package p\n/* never closed\n").unwrap_err();
        assert_eq!(err.message, "comment not terminated");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_bad_escape() {
        let err = parse_imports("package p\nimport \"a\\q\"\n").unwrap_err();
        assert_eq!(err.message, "unknown escape sequence");
    }

    #[test]
    fn test_declarations_need_separator() {
        for src in [
            "package p import \"a.io/x\"\n",
            "package p\nimport \"a.io/x\" \"b.io/y\"\n",
            "package p\nimport \"a.io/x\" import \"b.io/y\"\n",
            "package p\nimport (\"a.io/x\" \"b.io/y\")\n",
            "package p\nimport ( x \"a.io/x\" y \"b.io/y\" )\n",
        ] {
            let err = parse_imports(src).unwrap_err();
            assert_eq!(err.message, "expected ';'", "{src:?}");
        }
    }

    #[test]
    fn test_comment_newline_separates() {
        let src = "package p /*\n*/ import \"a.io/x\" // trailing\nimport \"b.io/y\"\n";
        assert_eq!(parse_imports(src).unwrap(), ["a.io/x", "b.io/y"]);
    }

    #[test]
    fn test_stray_string_after_imports() {
        let err = parse_imports("package p\nimport \"a.io/x\"\n\"b.io/y\"\n").unwrap_err();
        assert_eq!(err.message, "expected declaration");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_alias_on_its_own_line() {
        let err = parse_imports("package p\nimport (\n\tx\n\t\"a.io/x\"\n)\n").unwrap_err();
        assert_eq!(err.message, "missing import path");
    }

    #[test]
    fn test_invalid_import_path_characters() {
        for path in ["a b", "a\\tb", "a:b", "a!b", "a{b}", "a\\u00a0b", "a\\ufffdb"] {
            let src = format!("package p\nimport \"{path}\"\n");
            let err = parse_imports(&src).unwrap_err();
            assert!(err.message.starts_with("invalid import path"), "{path}: {}", err.message);
        }
        assert!(parse_imports("package p\nimport \"gopkg.in/yaml.v2~x+y@1\"\n").is_ok());
    }

    #[test]
    fn test_byte_escapes() {
        // \x and octal escapes are bytes, so a lone high byte is not a character
        for esc in ["\\xff", "\\377"] {
            let src = format!("package p\nimport \"a.io/{esc}\"\n");
            assert!(parse_imports(&src).unwrap_err().message.starts_with("invalid import path"));
        }
        // two byte escapes forming one UTF-8 sequence
        assert_eq!(
            parse_imports("package p\nimport \"a.io/caf\\xc3\\xa9\"\n").unwrap(),
            ["a.io/caf\u{e9}"]
        );
        assert_eq!(
            parse_imports("package p\nimport \"a.io/\\400\"\n").unwrap_err().message,
            "escape sequence is invalid Unicode code point"
        );
    }

    #[test]
    fn test_invalid_utf8_outside_imports_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin1.go");
        let mut body = b"package p\nimport \"a.io/x\"\n// caf".to_vec();
        body.extend_from_slice(&[0xe9, b'\n']);
        fs::write(&file, body).unwrap();

        assert_eq!(extract_imports(&file).unwrap(), ["a.io/x"]);
    }

    #[test]
    fn test_extract_imports_wraps_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.go");
        fs::write(&file, "not go at all").unwrap();

        match extract_imports(&file) {
            Err(VendError::Parse { path, line, .. }) => {
                assert_eq!(path, file);
                assert_eq!(line, 1);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
