use std::fmt;

use crate::ast::{Binding, Expr, Identifier, Located, SourceRange, TypeExpression};

/// One arm element of a comprehension: `x <- xs` or `let y = f x`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchClause {
    Generator { pattern: Pattern, source: Expr },
    Let(Binding),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Bind(Located<Identifier>),
    Wildcard,
    Tuple(TuplePattern),
    Struct(StructPattern),
    List(ListPattern),
    Typed(Box<Pattern>, TypeExpression),
    Split(Box<Pattern>, Box<Pattern>),
    Located(SourceRange, Box<Pattern>),
}

impl Pattern {
    pub fn bind(range: SourceRange, name: &str) -> Self {
        Self::Bind(Located::new(range, Identifier::new(name)))
    }

    pub fn tuple(elements: Vec<Pattern>) -> Self {
        Self::Tuple(TuplePattern { elements })
    }

    /// Every variable the pattern binds, left to right.
    pub fn bound_names(&self) -> Vec<&Located<Identifier>> {
        let mut names = vec![];
        self.gather_bound_names(&mut names);
        names
    }

    fn gather_bound_names<'a>(&'a self, names: &mut Vec<&'a Located<Identifier>>) {
        match self {
            Self::Bind(name) => names.push(name),

            Self::Wildcard => (),

            Self::Tuple(TuplePattern { elements }) | Self::List(ListPattern { elements }) => {
                for element in elements {
                    element.gather_bound_names(names)
                }
            }

            Self::Struct(StructPattern { fields }) => {
                for (_, pattern) in fields {
                    pattern.gather_bound_names(names)
                }
            }

            // The annotation only mentions types, it binds none.
            Self::Typed(pattern, _) | Self::Located(_, pattern) => {
                pattern.gather_bound_names(names)
            }

            Self::Split(lhs, rhs) => {
                lhs.gather_bound_names(names);
                rhs.gather_bound_names(names);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuplePattern {
    pub elements: Vec<Pattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPattern {
    pub elements: Vec<Pattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructPattern {
    pub fields: Vec<(Located<Identifier>, Pattern)>,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(x) => write!(f, "{}", x.thing),
            Self::Wildcard => write!(f, "_"),
            Self::Tuple(x) => write!(f, "{x}"),
            Self::Struct(x) => write!(f, "{x}"),
            Self::List(x) => write!(f, "{x}"),
            Self::Typed(x, ty) => write!(f, "({x} : {ty})"),
            Self::Split(lhs, rhs) => write!(f, "({lhs} # {rhs})"),
            Self::Located(_, x) => write!(f, "{x}"),
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, elements: &[Pattern]) -> fmt::Result {
    let mut elements = elements.iter();

    if let Some(element) = elements.next() {
        write!(f, "{element}")?;
    }

    for element in elements {
        write!(f, ", {element}")?;
    }

    Ok(())
}

impl fmt::Display for TuplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { elements } = self;
        write!(f, "(")?;
        write_separated(f, elements)?;
        write!(f, ")")
    }
}

impl fmt::Display for ListPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { elements } = self;
        write!(f, "[")?;
        write_separated(f, elements)?;
        write!(f, "]")
    }
}

impl fmt::Display for StructPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { fields } = self;
        write!(f, "{{ ")?;

        let mut fields = fields.iter();
        if let Some((field, pattern)) = fields.next() {
            write!(f, "{}: {pattern}", field.thing)?;
        }

        for (field, pattern) in fields {
            write!(f, "; {}: {pattern}", field.thing)?;
        }

        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        Identifier, SourceRange, TypeExpression,
        pattern::{Pattern, StructPattern},
    };

    #[test]
    fn bound_names_skip_wildcards_and_annotations() {
        let at = SourceRange::on_row(1, 1, 2);
        let pattern = Pattern::tuple(vec![
            Pattern::bind(at, "a"),
            Pattern::Wildcard,
            Pattern::Typed(
                Pattern::bind(at, "b").into(),
                TypeExpression::Parameter(Identifier::new("t")),
            ),
            Pattern::Split(Pattern::bind(at, "c").into(), Pattern::bind(at, "d").into()),
        ]);

        let names = pattern
            .bound_names()
            .into_iter()
            .map(|name| name.thing.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn struct_patterns_bind_field_patterns_not_labels() {
        let at = SourceRange::on_row(2, 1, 4);
        let pattern = Pattern::Struct(StructPattern {
            fields: vec![(
                crate::ast::Located::new(at, Identifier::new("label")),
                Pattern::bind(at, "value"),
            )],
        });

        let names = pattern
            .bound_names()
            .into_iter()
            .map(|name| name.thing.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["value"]);
        assert_eq!(pattern.to_string(), "{ label: value }");
    }
}
