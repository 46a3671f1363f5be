//! A compact CSS selector subset.
//!
//! Supported: type selectors, `*`, `.class`, `#id`, `:not(..)` holding a
//! compound list, the descendant (whitespace) and child (`>`) combinators, and
//! comma separated selector lists. That covers everything the window engine
//! binds to, e.g. `.window:not(.maximized)>.title-bar`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{ElementId, Surface};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Child,
    Descendant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    negations: Vec<Vec<Compound>>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.ids.is_empty() && self.classes.is_empty() && self.negations.is_empty()
    }

    fn matches(&self, surface: &Surface, id: ElementId) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && surface.tag(id) != tag
        {
            return false;
        }
        if !self.ids.iter().all(|want| surface.attr(id, "id") == Some(want.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|class| surface.has_class(id, class)) {
            return false;
        }
        self.negations
            .iter()
            .all(|list| !list.iter().any(|c| c.matches(surface, id)))
    }
}

/// One complex selector, stored right to left: the subject compound followed
/// by `(combinator, compound)` steps towards the root.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    ancestry: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, surface: &Surface, id: ElementId) -> bool {
        self.subject.matches(surface, id) && matches_ancestry(surface, id, &self.ancestry)
    }
}

fn matches_ancestry(surface: &Surface, id: ElementId, steps: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = steps.split_first() else {
        return true;
    };
    match combinator {
        Combinator::Child => surface
            .parent(id)
            .is_some_and(|p| compound.matches(surface, p) && matches_ancestry(surface, p, rest)),
        Combinator::Descendant => {
            let mut current = surface.parent(id);
            while let Some(p) = current {
                if compound.matches(surface, p) && matches_ancestry(surface, p, rest) {
                    return true;
                }
                current = surface.parent(p);
            }
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(source);
        let alternatives = parser.selector_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, surface: &Surface, id: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(surface, id))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|(o, _)| *o).unwrap_or(0)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.offset(),
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn selector_list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut list = Vec::new();
        loop {
            self.skip_ws();
            if self.peek().is_none() && list.is_empty() {
                return Err(SelectorError::Empty);
            }
            list.push(self.complex()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                None => return Ok(list),
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        // Parsed left to right, then flipped so matching can start at the subject.
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        let subject = compounds.pop().ok_or(SelectorError::Empty)?;
        let ancestry = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(Complex { subject, ancestry })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.bump();
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.bump();
                    compound.ids.push(self.ident()?);
                }
                Some(':') => {
                    self.bump();
                    let name = self.ident()?;
                    if name != "not" {
                        return Err(SelectorError::UnsupportedPseudo(name));
                    }
                    if self.bump() != Some('(') {
                        return Err(SelectorError::UnexpectedEnd);
                    }
                    compound.negations.push(self.compound_list()?);
                }
                _ => break,
            }
        }
        if compound.is_empty() {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn compound_list(&mut self) -> Result<Vec<Compound>, SelectorError> {
        let mut list = Vec::new();
        loop {
            self.skip_ws();
            list.push(self.compound()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(list),
                Some(found) => {
                    self.pos -= 1;
                    return Err(SelectorError::Unexpected {
                        found,
                        offset: self.offset(),
                    });
                }
                None => return Err(SelectorError::UnexpectedEnd),
            }
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().map(|(_, c)| *c).collect())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
