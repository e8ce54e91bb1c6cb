//! Minimal shader-source checker for the headless driver.
//!
//! Not a compiler. It catches what a test needs a real driver to catch:
//! unbalanced brackets, a missing `main`, and malformed default-block
//! `uniform` declarations, whose types it resolves through the type registry.

use crate::types::{ArrayType, ElementKind, ElementType, ScalarType, TypeDescriptor};

/// A default-block uniform declared by a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UniformDecl {
    pub name: String,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Number(String),
    Punct(char),
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
}

const PRECISION: [&str; 3] = ["lowp", "mediump", "highp"];

/// Checks `source` and returns its uniforms, or a driver-style error log.
pub(crate) fn scan(source: &str) -> Result<Vec<UniformDecl>, String> {
    let tokens = tokenize(&strip_comments(source)?);
    check_brackets(&tokens)?;
    require_main(&tokens)?;
    collect_uniforms(&tokens)
}

fn error(line: usize, message: impl std::fmt::Display) -> String {
    format!("0:{line}: error: {message}")
}

/// Blanks out comments and preprocessor lines, keeping newlines.
fn strip_comments(source: &str) -> Result<String, String> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start = line;
                let mut closed = false;
                while let Some(n) = chars.next() {
                    if n == '\n' {
                        line += 1;
                        out.push('\n');
                    } else if n == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(error(start, "unterminated comment"));
                }
                out.push(' ');
            }
            '#' if at_line_start => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            '\n' => {
                line += 1;
                at_line_start = true;
                out.push('\n');
                continue;
            }
            c => {
                if !c.is_whitespace() {
                    at_line_start = false;
                }
                out.push(c);
            }
        }
    }
    Ok(out)
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        if c == '\n' {
            line += 1;
            chars.next();
        } else if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_alphabetic() || c == '_' {
            let mut word = String::new();
            while let Some(&n) = chars.peek().filter(|n| n.is_ascii_alphanumeric() || **n == '_') {
                word.push(n);
                chars.next();
            }
            tokens.push(Token { tok: Tok::Ident(word), line });
        } else if c.is_ascii_digit() {
            let mut number = String::new();
            while let Some(&n) = chars.peek().filter(|n| n.is_ascii_alphanumeric() || **n == '.') {
                number.push(n);
                chars.next();
            }
            tokens.push(Token { tok: Tok::Number(number), line });
        } else {
            tokens.push(Token { tok: Tok::Punct(c), line });
            chars.next();
        }
    }
    tokens
}

fn check_brackets(tokens: &[Token]) -> Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    for token in tokens {
        let Tok::Punct(c) = token.tok else { continue };
        match c {
            '(' | '[' | '{' => stack.push((c, token.line)),
            ')' | ']' | '}' => {
                let open = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((o, _)) if o == open => {}
                    Some((o, line)) => return Err(error(line, format!("unclosed `{o}`"))),
                    None => return Err(error(token.line, format!("unexpected `{c}`"))),
                }
            }
            _ => {}
        }
    }
    match stack.pop() {
        Some((c, line)) => Err(error(line, format!("unclosed `{c}`"))),
        None => Ok(()),
    }
}

fn require_main(tokens: &[Token]) -> Result<(), String> {
    let found = tokens.windows(3).any(|w| {
        w[0].tok == Tok::Ident("void".into()) && w[1].tok == Tok::Ident("main".into()) && w[2].tok == Tok::Punct('(')
    });
    if found {
        Ok(())
    } else {
        let last = tokens.last().map_or(1, |t| t.line);
        Err(error(last, "no definition of `void main()`"))
    }
}

fn is_opaque(name: &str) -> bool {
    let base = name.strip_prefix(['i', 'u']).unwrap_or(name);
    ["sampler", "image"].iter().any(|p| name.starts_with(p) || base.starts_with(p)) || name == "atomic_uint"
}

fn collect_uniforms(tokens: &[Token]) -> Result<Vec<UniformDecl>, String> {
    let mut uniforms = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i].tok {
            Tok::Punct('{') => depth += 1,
            Tok::Punct('}') => depth = depth.saturating_sub(1),
            Tok::Ident(word) if word == "uniform" && depth == 0 => {
                i = declaration(tokens, i + 1, &mut uniforms)?;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    Ok(uniforms)
}

/// Parses one `uniform` declaration starting after the keyword. Returns the
/// index after its terminating `;`.
fn declaration(tokens: &[Token], mut i: usize, out: &mut Vec<UniformDecl>) -> Result<usize, String> {
    let line_of = move |i: usize| tokens.get(i).or(tokens.last()).map_or(1, |t| t.line);
    let ident = move |i: usize| match tokens.get(i).map(|t| &t.tok) {
        Some(Tok::Ident(word)) => Some(word.as_str()),
        _ => None,
    };

    while ident(i).is_some_and(|w| PRECISION.contains(&w)) {
        i += 1;
    }
    let Some(type_name) = ident(i) else {
        return Err(error(line_of(i), "expected a type after `uniform`"));
    };
    let type_line = line_of(i);
    i += 1;

    // Uniform block: members are not default-block uniforms.
    if tokens.get(i).map(|t| &t.tok) == Some(&Tok::Punct('{')) {
        let mut depth = 0usize;
        while let Some(token) = tokens.get(i) {
            match token.tok {
                Tok::Punct('{') => depth += 1,
                Tok::Punct('}') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        while tokens.get(i).is_some_and(|t| t.tok != Tok::Punct(';')) {
            i += 1;
        }
        return Ok(i + 1);
    }

    let element = if is_opaque(type_name) {
        ElementType::Scalar(ScalarType::new(ElementKind::Int))
    } else {
        ElementType::parse(type_name).map_err(|_| error(type_line, format!("unknown type `{type_name}`")))?
    };

    loop {
        let Some(name) = ident(i) else {
            return Err(error(line_of(i), "expected a uniform name"));
        };
        let name = name.to_owned();
        i += 1;

        let mut ty = TypeDescriptor::from(element);
        if tokens.get(i).map(|t| &t.tok) == Some(&Tok::Punct('[')) {
            let length = match tokens.get(i + 1).map(|t| &t.tok) {
                Some(Tok::Number(n)) => n.trim_end_matches(['u', 'U']).parse::<usize>().ok(),
                _ => None,
            };
            let closed = tokens.get(i + 2).map(|t| &t.tok) == Some(&Tok::Punct(']'));
            let array = length.filter(|_| closed).and_then(|n| ArrayType::new(element, n));
            let Some(array) = array else {
                return Err(error(line_of(i), format!("invalid array size for `{name}`")));
            };
            if tokens.get(i + 3).map(|t| &t.tok) == Some(&Tok::Punct('[')) {
                return Err(error(line_of(i), format!("arrays of arrays are not supported for `{name}`")));
            }
            ty = array.into();
            i += 3;
        }

        out.push(UniformDecl { name, ty });

        match tokens.get(i).map(|t| &t.tok) {
            Some(Tok::Punct(',')) => i += 1,
            Some(Tok::Punct(';')) => return Ok(i + 1),
            // Initialisers are accepted and skipped.
            Some(Tok::Punct('=')) => {
                while tokens.get(i).is_some_and(|t| !matches!(t.tok, Tok::Punct(';') | Tok::Punct(','))) {
                    i += 1;
                }
                if tokens.get(i).map(|t| &t.tok) == Some(&Tok::Punct(';')) {
                    return Ok(i + 1);
                }
                i += 1;
            }
            _ => return Err(error(line_of(i), "expected `;` after uniform declaration")),
        }
    }
}
