use std::{convert::Infallible, fmt};

use crate::ast::{Located, SourceRange, namer::QualifiedName};

/// Why a name is in scope, as phrased to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOrigin {
    // `declared_at` is only absent for synthesized type parameters.
    Local {
        declared_at: Option<SourceRange>,
        name: QualifiedName,
    },
    Imported {
        name: QualifiedName,
    },
}

impl NameOrigin {
    pub fn name(&self) -> &QualifiedName {
        match self {
            Self::Local { name, .. } | Self::Imported { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermNameRecord {
    FromBinding(Located<QualifiedName>),
    // The value constructor a newtype introduces alongside its type.
    FromConstructorIntro(Located<QualifiedName>),
    FromImportedModule(QualifiedName),
}

impl TermNameRecord {
    pub fn origin(&self) -> NameOrigin {
        match self {
            Self::FromBinding(located) | Self::FromConstructorIntro(located) => NameOrigin::Local {
                declared_at: Some(located.range),
                name: located.thing.clone(),
            },
            Self::FromImportedModule(name) => NameOrigin::Imported { name: name.clone() },
        }
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        match self {
            Self::FromBinding(located) | Self::FromConstructorIntro(located) => &located.thing,
            Self::FromImportedModule(name) => name,
        }
    }

    pub fn try_map_name<E, F>(self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&QualifiedName) -> Result<QualifiedName, E>,
    {
        Ok(match self {
            Self::FromBinding(located) => Self::FromBinding(located.try_map(|name| f(&name))?),
            Self::FromConstructorIntro(located) => {
                Self::FromConstructorIntro(located.try_map(|name| f(&name))?)
            }
            Self::FromImportedModule(name) => Self::FromImportedModule(f(&name)?),
        })
    }

    pub fn map_name<F>(self, mut f: F) -> Self
    where
        F: FnMut(&QualifiedName) -> QualifiedName,
    {
        let Ok(record) =
            self.try_map_name(&mut |name: &QualifiedName| Ok::<_, Infallible>(f(name)));
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNameRecord {
    FromTypeParameter(QualifiedName),
    FromTypeSynonym(Located<QualifiedName>),
    FromConstructorIntro(Located<QualifiedName>),
    FromImportedModule(QualifiedName),
}

impl TypeNameRecord {
    pub fn origin(&self) -> NameOrigin {
        match self {
            Self::FromTypeParameter(name) => NameOrigin::Local {
                declared_at: None,
                name: name.clone(),
            },
            Self::FromTypeSynonym(located) | Self::FromConstructorIntro(located) => {
                NameOrigin::Local {
                    declared_at: Some(located.range),
                    name: located.thing.clone(),
                }
            }
            Self::FromImportedModule(name) => NameOrigin::Imported { name: name.clone() },
        }
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        match self {
            Self::FromTypeParameter(name) | Self::FromImportedModule(name) => name,
            Self::FromTypeSynonym(located) | Self::FromConstructorIntro(located) => &located.thing,
        }
    }

    pub fn try_map_name<E, F>(self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&QualifiedName) -> Result<QualifiedName, E>,
    {
        Ok(match self {
            Self::FromTypeParameter(name) => Self::FromTypeParameter(f(&name)?),
            Self::FromTypeSynonym(located) => {
                Self::FromTypeSynonym(located.try_map(|name| f(&name))?)
            }
            Self::FromConstructorIntro(located) => {
                Self::FromConstructorIntro(located.try_map(|name| f(&name))?)
            }
            Self::FromImportedModule(name) => Self::FromImportedModule(f(&name)?),
        })
    }

    pub fn map_name<F>(self, mut f: F) -> Self
    where
        F: FnMut(&QualifiedName) -> QualifiedName,
    {
        let Ok(record) =
            self.try_map_name(&mut |name: &QualifiedName| Ok::<_, Infallible>(f(name)));
        record
    }
}

impl fmt::Display for NameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local {
                declared_at: Some(range),
                name,
            } => write!(f, "`{name}`, defined at {range}"),
            Self::Local {
                declared_at: None,
                name,
            } => write!(f, "`{name}`, a type parameter"),
            Self::Imported { name } => match name.module() {
                Some(module) => write!(f, "`{name}`, imported from module {module}"),
                None => write!(f, "`{name}`, imported"),
            },
        }
    }
}
