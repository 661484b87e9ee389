//! The recursive-descent parser: three grammar levels (expression, term,
//! factor) that build a [`Machine`] via Thompson construction as they go.
//!
//! ```text
//! Expr   ::= Term ("|" Term)*
//! Term   ::= Factor+
//! Factor ::= Symbol Suffix?
//!          | "~"
//!          | "(" Expr ")" "*"?
//! Suffix ::= "*"
//!          | "->" Expr
//!          | ":" String
//!          | Attrs ( "->" Expr )?
//! Attrs  ::= "<" ( Symbol ( "=" String )? )* ">"
//! ```
use crate::error::ParseError;
use crate::machine::{Attribute, Machine, SymbolName};
use crate::token::{Token, Tokenizer};

pub(crate) struct Parser<'a> {
    tok: Tokenizer<'a>,
    lookahead: (Token, usize),
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut tok = Tokenizer::new(input);
        let lookahead = tok.next_token()?;
        Ok(Parser { tok, lookahead })
    }

    fn peek(&self) -> &Token {
        &self.lookahead.0
    }

    pub(crate) fn peek_offset(&self) -> usize {
        self.lookahead.1
    }

    fn bump(&mut self) -> Result<(Token, usize), ParseError> {
        let next = self.tok.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn expect_string(&mut self) -> Result<(Box<str>, usize), ParseError> {
        let offset = self.peek_offset();
        match self.peek().clone() {
            Token::StringTok(s) => {
                self.bump()?;
                Ok((s, offset))
            }
            _ => Err(ParseError::ExpectedString { offset }),
        }
    }

    fn parse_regex_string(&mut self) -> Result<regex::Regex, ParseError> {
        let (s, offset) = self.expect_string()?;
        regex::RegexBuilder::new(&s)
            .case_insensitive(true)
            .build()
            .map_err(|source| ParseError::RegexCompile { offset, source })
    }

    /// `Expr ::= Term ("|" Term)*`
    pub(crate) fn parse_expr(&mut self) -> Result<Machine, ParseError> {
        let mut machine = self.parse_term()?;
        while matches!(self.peek(), Token::Spike) {
            self.bump()?;
            let rhs = self.parse_term()?;
            machine = machine.alternate(rhs);
        }
        Ok(machine)
    }

    /// `Term ::= Factor+`
    fn parse_term(&mut self) -> Result<Machine, ParseError> {
        let mut machine = self.parse_factor()?;
        loop {
            match self.peek() {
                Token::Symbol(_) | Token::Squiggle | Token::Wax => {
                    let rhs = self.parse_factor()?;
                    machine = machine.concat(rhs);
                }
                _ => break,
            }
        }
        Ok(machine)
    }

    /// `Factor ::= Symbol Suffix? | "~" | "(" Expr ")" "*"?`
    fn parse_factor(&mut self) -> Result<Machine, ParseError> {
        match self.peek().clone() {
            Token::Squiggle => {
                self.bump()?;
                Ok(Machine::epsilon())
            }
            Token::Wax => {
                self.bump()?;
                let inner = self.parse_expr()?;
                match self.peek() {
                    Token::Wane => {
                        self.bump()?;
                    }
                    _ => {
                        return Err(ParseError::ExpectedCloseParen {
                            offset: self.peek_offset(),
                        })
                    }
                }
                if matches!(self.peek(), Token::Splat) {
                    self.bump()?;
                    Ok(inner.closure())
                } else {
                    Ok(inner)
                }
            }
            Token::Symbol(name) => {
                self.bump()?;
                self.parse_suffix(name)
            }
            _ => Err(ParseError::ExpectedFactor {
                offset: self.peek_offset(),
            }),
        }
    }

    /// `Suffix ::= "*" | "->" Expr | ":" String | Attrs ( "->" Expr )?`,
    /// applied to the bare `symbol(name)` machine.
    fn parse_suffix(&mut self, name: Box<str>) -> Result<Machine, ParseError> {
        let symbol = if &*name == "." {
            SymbolName::Wildcard
        } else {
            SymbolName::Literal(name)
        };
        let mut machine = Machine::symbol(symbol);
        match self.peek().clone() {
            Token::Splat => {
                self.bump()?;
                Ok(machine.closure())
            }
            Token::Ptr => {
                self.bump()?;
                let child = self.parse_expr()?;
                machine.trans_mut().child = Some(Box::new(child));
                Ok(machine)
            }
            Token::Twospot => {
                self.bump()?;
                let re = self.parse_regex_string()?;
                machine.trans_mut().content_re = Some(re);
                Ok(machine)
            }
            Token::Angle => {
                let attrs = self.parse_attrs()?;
                machine.trans_mut().attrs = attrs;
                if matches!(self.peek(), Token::Ptr) {
                    self.bump()?;
                    let child = self.parse_expr()?;
                    machine.trans_mut().child = Some(Box::new(child));
                }
                Ok(machine)
            }
            _ => Ok(machine),
        }
    }

    /// `Attrs ::= "<" ( Symbol ( "=" String )? )* ">"`
    fn parse_attrs(&mut self) -> Result<Vec<Attribute>, ParseError> {
        debug_assert!(matches!(self.peek(), Token::Angle));
        self.bump()?;
        let mut attrs = Vec::new();
        loop {
            match self.peek().clone() {
                Token::RightAngle => {
                    self.bump()?;
                    break;
                }
                Token::Symbol(name) => {
                    self.bump()?;
                    let value_re = if matches!(self.peek(), Token::Halfmesh) {
                        self.bump()?;
                        Some(self.parse_regex_string()?)
                    } else {
                        None
                    };
                    attrs.push(Attribute::new(name, value_re));
                }
                _ => {
                    return Err(ParseError::ExpectedAttrs {
                        offset: self.peek_offset(),
                    })
                }
            }
        }
        Ok(attrs)
    }

    pub(crate) fn at_eol(&self) -> bool {
        matches!(self.peek(), Token::Eol)
    }
}

/// Compiles `text` into a [`Machine`], honoring
/// [`crate::Config::reject_trailing_residue`].
pub fn parse_pattern(text: &str, config: &crate::Config) -> Result<Machine, ParseError> {
    match parse_pattern_inner(text, config) {
        Ok(machine) => Ok(machine),
        Err(err) => {
            log::debug!("failed to parse pattern {text:?}: {err}");
            Err(err)
        }
    }
}

fn parse_pattern_inner(text: &str, config: &crate::Config) -> Result<Machine, ParseError> {
    let mut parser = Parser::new(text)?;
    let machine = parser.parse_expr()?;
    if config.reject_trailing_residue && !parser.at_eol() {
        return Err(ParseError::Tokenizing {
            offset: parser.peek_offset(),
        });
    }
    Ok(machine)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str) -> Result<Machine, ParseError> {
        parse_pattern(pattern, &crate::Config::default())
    }

    #[test]
    fn unclosed_paren_is_expected_close_paren() {
        let err = parse("(a b").unwrap_err();
        assert!(matches!(err, ParseError::ExpectedCloseParen { .. }));
    }

    #[test]
    fn missing_factor_is_expected_factor() {
        let err = parse("a ->").unwrap_err();
        assert!(matches!(err, ParseError::ExpectedFactor { .. }));
    }

    #[test]
    fn missing_content_regex_string_is_expected_string() {
        let err = parse("a:").unwrap_err();
        assert!(matches!(err, ParseError::ExpectedString { .. }));
    }

    #[test]
    fn malformed_attrs_is_expected_attrs() {
        let err = parse("a<=\"x\">").unwrap_err();
        assert!(matches!(err, ParseError::ExpectedAttrs { .. }));
    }

    #[test]
    fn bad_content_regex_is_regex_compile_error() {
        let err = parse(r#"a:"(""#).unwrap_err();
        assert!(matches!(err, ParseError::RegexCompile { .. }));
    }

    #[test]
    fn trailing_residue_tolerated_by_default() {
        assert!(parse("a b )").is_ok());
    }

    #[test]
    fn trailing_residue_rejected_when_configured() {
        let config = crate::Config {
            reject_trailing_residue: true,
            ..crate::Config::default()
        };
        let err = parse_pattern("a )", &config).unwrap_err();
        assert!(matches!(err, ParseError::Tokenizing { .. }));
    }
}
