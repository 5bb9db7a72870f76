use tracing::{debug, trace};

use crate::{
    ast::{
        Binding, Declaration, Fixity, Identifier, Located, Module, Newtype, SourceRange, TopLevel,
        TypeParameter, TypeSignature, TypeSynonym,
        namer::{Naming, NamingEnv, NamingError, QualifiedName, TermNameRecord, TypeNameRecord},
        pattern::{MatchClause, Pattern},
    },
    interface::{InterfaceDecls, InterfaceValue},
};

/// Syntax that introduces names computes the environment it contributes.
/// Siblings are always combined with [`NamingEnv::merge_additive`].
pub trait BindsNames {
    fn naming_env(&self) -> Naming<NamingEnv>;
}

impl<T> BindsNames for [T]
where
    T: BindsNames,
{
    fn naming_env(&self) -> Naming<NamingEnv> {
        self.iter().map(BindsNames::naming_env).collect()
    }
}

impl<T> BindsNames for Vec<T>
where
    T: BindsNames,
{
    fn naming_env(&self) -> Naming<NamingEnv> {
        self.as_slice().naming_env()
    }
}

fn local_name(name: &Located<Identifier>) -> (QualifiedName, Located<QualifiedName>) {
    let located = name.clone().map(QualifiedName::from);
    (located.thing.clone(), located)
}

fn bound_term(name: &Located<Identifier>) -> NamingEnv {
    let (key, located) = local_name(name);
    NamingEnv::singleton_term(key, TermNameRecord::FromBinding(located))
}

impl BindsNames for InterfaceDecls {
    fn naming_env(&self) -> Naming<NamingEnv> {
        let values = self.values.iter().map(|(name, decls)| {
            let terms = decls
                .iter()
                .map(|decl| {
                    NamingEnv::singleton_term(
                        name.clone(),
                        TermNameRecord::FromImportedModule(decl.name.clone()),
                    )
                })
                .collect::<NamingEnv>();

            match unanimous_fixity(decls) {
                Some(fixity) => {
                    terms.merge_additive(NamingEnv::singleton_fixity(name.clone(), fixity))
                }
                None => terms,
            }
        });

        let synonyms = self.synonyms.iter().flat_map(|(name, decls)| {
            decls.iter().map(|decl| {
                NamingEnv::singleton_type(
                    name.clone(),
                    TypeNameRecord::FromImportedModule(decl.name.clone()),
                )
            })
        });

        let newtypes = self.newtypes.iter().flat_map(|(name, decls)| {
            decls.iter().map(|decl| {
                NamingEnv::singleton_term(
                    name.clone(),
                    TermNameRecord::FromImportedModule(decl.name.clone()),
                )
                .merge_additive(NamingEnv::singleton_type(
                    name.clone(),
                    TypeNameRecord::FromImportedModule(decl.name.clone()),
                ))
            })
        });

        Ok(values.chain(synonyms).chain(newtypes).collect())
    }
}

// Every export sharing the name must record the same fixity. A missing one
// counts as disagreement, so the operator parses with the default.
fn unanimous_fixity(decls: &[InterfaceValue]) -> Option<Fixity> {
    let (first, rest) = decls.split_first()?;

    if rest.iter().any(|decl| decl.fixity != first.fixity) {
        debug!(
            "unanimous_fixity: exports of {} disagree on fixity",
            first.name
        );
        return None;
    }

    first.fixity
}

impl BindsNames for Binding {
    fn naming_env(&self) -> Naming<NamingEnv> {
        let env = bound_term(&self.name);

        Ok(match self.fixity {
            Some(fixity) => env.merge_additive(NamingEnv::singleton_fixity(
                QualifiedName::from(self.name.thing.clone()),
                fixity,
            )),
            None => env,
        })
    }
}

impl BindsNames for Pattern {
    fn naming_env(&self) -> Naming<NamingEnv> {
        Ok(self.bound_names().into_iter().map(bound_term).collect())
    }
}

impl BindsNames for TypeParameter {
    fn naming_env(&self) -> Naming<NamingEnv> {
        let name = QualifiedName::from(self.name.clone());
        Ok(NamingEnv::singleton_type(
            name.clone(),
            TypeNameRecord::FromTypeParameter(name),
        ))
    }
}

impl BindsNames for TypeSignature {
    fn naming_env(&self) -> Naming<NamingEnv> {
        self.type_parameters.naming_env()
    }
}

impl BindsNames for Newtype {
    fn naming_env(&self) -> Naming<NamingEnv> {
        let (key, located) = local_name(&self.name);

        Ok(NamingEnv::singleton_term(
            key.clone(),
            TermNameRecord::FromConstructorIntro(located.clone()),
        )
        .merge_additive(NamingEnv::singleton_type(
            key,
            TypeNameRecord::FromConstructorIntro(located),
        )))
    }
}

impl BindsNames for TypeSynonym {
    fn naming_env(&self) -> Naming<NamingEnv> {
        let (key, located) = local_name(&self.name);
        Ok(NamingEnv::singleton_type(
            key,
            TypeNameRecord::FromTypeSynonym(located),
        ))
    }
}

impl Declaration {
    fn naming_env_at(&self, location: Option<SourceRange>) -> Naming<NamingEnv> {
        match self {
            // Same key and target as the binding they annotate.
            Self::Signature(names, _) | Self::Pragma(names, _) => {
                Ok(names.iter().map(bound_term).collect())
            }

            Self::Bind(binding) => binding.naming_env(),

            Self::PatternBind(pattern, _) => Err(NamingError::UnexpectedPatternBinding {
                pattern: pattern.to_string(),
                location,
            }),

            Self::Fixity(_, names) => Err(NamingError::UnexpectedFixityDeclaration {
                names: names
                    .iter()
                    .map(|name| name.thing.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                location: location.or_else(|| names.first().map(|name| name.range)),
            }),

            Self::TypeSynonym(synonym) => synonym.naming_env(),

            Self::Newtype(newtype) => newtype.naming_env(),

            Self::Located(range, declaration) => declaration.naming_env_at(Some(*range)),
        }
    }
}

/// Standalone declarations, as found in `where` blocks: names stay unqualified.
impl BindsNames for Declaration {
    fn naming_env(&self) -> Naming<NamingEnv> {
        self.naming_env_at(None)
    }
}

impl<A> BindsNames for TopLevel<A>
where
    A: BindsNames,
{
    fn naming_env(&self) -> Naming<NamingEnv> {
        self.thing.naming_env()
    }
}

impl Module {
    /// Only the public top-level declarations, qualified. This is the part of
    /// the module a dependent can see.
    pub fn exported_naming_env(&self) -> Naming<NamingEnv> {
        let env = self
            .declarations
            .iter()
            .filter(|declaration| declaration.is_public())
            .map(BindsNames::naming_env)
            .collect::<Naming<NamingEnv>>()?;

        Ok(env.qualify(&self.name.thing))
    }
}

/// A module reports its own members fully qualified.
impl BindsNames for Module {
    fn naming_env(&self) -> Naming<NamingEnv> {
        debug!(
            "naming_env: module {} with {} declarations",
            self.name.thing,
            self.declarations.len()
        );

        Ok(self.declarations.naming_env()?.qualify(&self.name.thing))
    }
}

impl BindsNames for MatchClause {
    fn naming_env(&self) -> Naming<NamingEnv> {
        match self {
            Self::Generator { pattern, .. } => {
                trace!("naming_env: generator {pattern}");
                pattern.naming_env()
            }
            Self::Let(binding) => binding.naming_env(),
        }
    }
}
