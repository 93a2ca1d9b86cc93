use super::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
    Dot,
    Question,
    Colon,
    Bang,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    AndAnd,
    OrOr,
}

impl TokenKind {
    /// Short human label for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::StarStar => "'**'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Question => "'?'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Bang => "'!'".to_string(),
            TokenKind::Less => "'<'".to_string(),
            TokenKind::LessEqual => "'<='".to_string(),
            TokenKind::Greater => "'>'".to_string(),
            TokenKind::GreaterEqual => "'>='".to_string(),
            TokenKind::Equal => "'=='".to_string(),
            TokenKind::NotEqual => "'!='".to_string(),
            TokenKind::AndAnd => "'&&'".to_string(),
            TokenKind::OrOr => "'||'".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the formula text
    pub pos: usize,
}

/// Split formula text into tokens.
///
/// `===` and `!==` are accepted as aliases of `==` and `!=` since every value
/// is a number.
pub fn tokenize(src: &str) -> Result<Vec<Token>, FormulaError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            i = scan_number(bytes, i);
            let text = &src[start..i];
            let value: f64 = text
                .parse()
                .map_err(|_| FormulaError::InvalidNumber(text.to_string()))?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' || c == b'$' {
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$')
            {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(src[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        let next = bytes.get(i + 1).copied();
        let next2 = bytes.get(i + 2).copied();
        let (kind, len) = match (c, next, next2) {
            (b'*', Some(b'*'), _) => (TokenKind::StarStar, 2),
            (b'*', _, _) => (TokenKind::Star, 1),
            (b'+', _, _) => (TokenKind::Plus, 1),
            (b'-', _, _) => (TokenKind::Minus, 1),
            (b'/', _, _) => (TokenKind::Slash, 1),
            (b'%', _, _) => (TokenKind::Percent, 1),
            (b'(', _, _) => (TokenKind::LParen, 1),
            (b')', _, _) => (TokenKind::RParen, 1),
            (b',', _, _) => (TokenKind::Comma, 1),
            (b'.', _, _) => (TokenKind::Dot, 1),
            (b'?', _, _) => (TokenKind::Question, 1),
            (b':', _, _) => (TokenKind::Colon, 1),
            (b'<', Some(b'='), _) => (TokenKind::LessEqual, 2),
            (b'<', _, _) => (TokenKind::Less, 1),
            (b'>', Some(b'='), _) => (TokenKind::GreaterEqual, 2),
            (b'>', _, _) => (TokenKind::Greater, 1),
            (b'=', Some(b'='), Some(b'=')) => (TokenKind::Equal, 3),
            (b'=', Some(b'='), _) => (TokenKind::Equal, 2),
            (b'!', Some(b'='), Some(b'=')) => (TokenKind::NotEqual, 3),
            (b'!', Some(b'='), _) => (TokenKind::NotEqual, 2),
            (b'!', _, _) => (TokenKind::Bang, 1),
            (b'&', Some(b'&'), _) => (TokenKind::AndAnd, 2),
            (b'|', Some(b'|'), _) => (TokenKind::OrOr, 2),
            _ => {
                let ch = src[start..].chars().next().unwrap_or('?');
                return Err(FormulaError::UnexpectedChar { ch, pos: start });
            }
        };
        tokens.push(Token { kind, pos: start });
        i += len;
    }

    Ok(tokens)
}

/// Digits, optional fraction, optional exponent. Returns the end offset.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 1e3"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a ** b <= c === d !== e && f || !g"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::StarStar,
                TokenKind::Ident("b".to_string()),
                TokenKind::LessEqual,
                TokenKind::Ident("c".to_string()),
                TokenKind::Equal,
                TokenKind::Ident("d".to_string()),
                TokenKind::NotEqual,
                TokenKind::Ident("e".to_string()),
                TokenKind::AndAnd,
                TokenKind::Ident("f".to_string()),
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Ident("g".to_string()),
            ]
        );
    }

    #[test]
    fn test_math_prefix_lexes_as_dot() {
        assert_eq!(
            kinds("Math.max"),
            vec![
                TokenKind::Ident("Math".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("max".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_assignment_and_strings() {
        assert!(matches!(
            tokenize("x = 1"),
            Err(FormulaError::UnexpectedChar { ch: '=', pos: 2 })
        ));
        assert!(matches!(
            tokenize("'rm -rf'"),
            Err(FormulaError::UnexpectedChar { ch: '\'', .. })
        ));
        assert!(matches!(
            tokenize("a; b"),
            Err(FormulaError::UnexpectedChar { ch: ';', .. })
        ));
    }

    #[test]
    fn test_non_ascii_reported() {
        assert!(matches!(
            tokenize("1 × 2"),
            Err(FormulaError::UnexpectedChar { ch: '×', pos: 2 })
        ));
    }
}
