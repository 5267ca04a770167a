use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Segment

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    /// The member `name` of an object: `.name` or `['name']`.
    Key(Cow<'a, str>),
    /// Any member of an object: `.*`
    AnyKey,
    /// The element at a position: `[2]`
    Index(usize),
    /// Any element of an array: `[*]`
    AnyIndex,
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) if is_plain(name) => write!(f, ".{name}"),
            Segment::Key(name) => {
                f.write_str("['")?;
                for c in name.chars() {
                    if matches!(c, '\'' | '\\') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("']")
            }
            Segment::AnyKey => f.write_str(".*"),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::AnyIndex => f.write_str("[*]"),
        }
    }
}

#[inline]
fn is_plain(name: &str) -> bool {
    !name.is_empty() && name != "*" && !name.contains(['.', '[', ']', '\'', '"', '\\'])
}

// -----------------------------------------------------------------------------
// Error

/// A path expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// Byte offset in `path`.
    pub offset: usize,
    /// The expression being parsed.
    pub path: &'a str,
    /// What went wrong.
    pub error: Cow<'a, str>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid path `{}` at offset {}: {}",
            self.path, self.offset, self.error,
        )
    }
}

impl core::error::Error for ParseError<'_> {}

// -----------------------------------------------------------------------------
// Parser

/// Splits a path expression into its segments.
///
/// ```
/// use sp_path::{Segment, parse};
///
/// let segments = parse("$.a['b.c'][*]").unwrap();
/// assert_eq!(
///     segments,
///     [Segment::Key("a".into()), Segment::Key("b.c".into()), Segment::AnyIndex],
/// );
///
/// let err = parse("a..b").unwrap_err();
/// assert_eq!(err.offset, 2);
/// ```
pub fn parse(path: &str) -> Result<Vec<Segment<'_>>, ParseError<'_>> {
    let mut cursor = Cursor { path, pos: 0 };
    let mut segments = Vec::new();

    cursor.eat('$');
    if cursor.peek().is_some_and(|c| c != '.' && c != '[') {
        segments.push(cursor.member()?);
    }

    while let Some(c) = cursor.bump() {
        let segment = match c {
            '.' => cursor.member()?,
            '[' => cursor.bracket()?,
            _ => return Err(cursor.error(cursor.pos - c.len_utf8(), "expected `.` or `[`")),
        };
        segments.push(segment);
    }
    Ok(segments)
}

struct Cursor<'a> {
    path: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    fn peek(&self) -> Option<char> {
        self.path[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    #[inline]
    fn eat(&mut self, expected: char) -> bool {
        let found = self.peek() == Some(expected);
        if found {
            self.pos += expected.len_utf8();
        }
        found
    }

    #[inline]
    fn error(&self, offset: usize, error: impl Into<Cow<'a, str>>) -> ParseError<'a> {
        ParseError {
            offset,
            path: self.path,
            error: error.into(),
        }
    }

    /// A bare member name, up to the next `.`, `[` or `]`.
    fn member(&mut self) -> Result<Segment<'a>, ParseError<'a>> {
        let path = self.path;
        let start = self.pos;
        while self.peek().is_some_and(|c| !matches!(c, '.' | '[' | ']')) {
            self.bump();
        }
        match &path[start..self.pos] {
            "" => Err(self.error(start, "expected a member name")),
            "*" => Ok(Segment::AnyKey),
            name => Ok(Segment::Key(Cow::Borrowed(name))),
        }
    }

    /// The inside of `[...]`; the opening bracket is consumed.
    fn bracket(&mut self) -> Result<Segment<'a>, ParseError<'a>> {
        let segment = match self.peek() {
            Some('*') => {
                self.bump();
                Segment::AnyIndex
            }
            Some(quote @ ('\'' | '"')) => Segment::Key(self.quoted(quote)?),
            Some(c) if c.is_ascii_digit() => Segment::Index(self.index()?),
            _ => {
                return Err(self.error(self.pos, "expected an index, `*` or a quoted name"));
            }
        };
        if !self.eat(']') {
            return Err(self.error(self.pos, "expected `]`"));
        }
        Ok(segment)
    }

    fn index(&mut self) -> Result<usize, ParseError<'a>> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.path[start..self.pos]
            .parse()
            .map_err(|_| self.error(start, "index out of range"))
    }

    /// A quoted name; borrowed unless it contains escapes.
    fn quoted(&mut self, quote: char) -> Result<Cow<'a, str>, ParseError<'a>> {
        let path = self.path;
        let open = self.pos;
        self.bump();
        let start = self.pos;
        let mut unescaped: Option<String> = None;

        loop {
            let at = self.pos;
            match self.bump() {
                None => return Err(self.error(open, "unterminated quoted name")),
                Some(c) if c == quote => {
                    return Ok(match unescaped {
                        Some(name) => Cow::Owned(name),
                        None => Cow::Borrowed(&path[start..at]),
                    });
                }
                Some('\\') => {
                    let Some(escaped) = self.bump() else {
                        return Err(self.error(open, "unterminated quoted name"));
                    };
                    unescaped
                        .get_or_insert_with(|| String::from(&path[start..at]))
                        .push(escaped);
                }
                Some(c) => {
                    if let Some(name) = &mut unescaped {
                        name.push(c);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Segment, parse};

    #[test]
    fn forms() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("$").unwrap().is_empty());
        assert_eq!(parse("a").unwrap(), parse("$.a").unwrap());
        assert_eq!(
            parse("a.*[3]").unwrap(),
            [Segment::Key("a".into()), Segment::AnyKey, Segment::Index(3)]
        );
        assert_eq!(parse(r#"["*"]"#).unwrap(), [Segment::Key("*".into())]);
    }

    #[test]
    fn escapes() {
        assert_eq!(
            parse(r"['it\'s']").unwrap(),
            [Segment::Key("it's".into())]
        );
        assert_eq!(
            Segment::Key("it's".into()).to_string(),
            r"['it\'s']"
        );
        assert_eq!(Segment::Key("plain".into()).to_string(), ".plain");
    }

    #[test]
    fn error_offsets() {
        let offset = |path| parse(path).unwrap_err().offset;
        assert_eq!(offset("a..b"), 2);
        assert_eq!(offset("a[x]"), 2);
        assert_eq!(offset("a['open"), 2);
        assert_eq!(offset("a[1"), 3);
        assert_eq!(offset("a]"), 1);
        assert_eq!(offset("a[99999999999999999999999]"), 2);

        let err = parse("a[1").unwrap_err();
        assert_eq!(err.path, "a[1");
        assert_eq!(err.to_string(), "invalid path `a[1` at offset 3: expected `]`");
    }
}
