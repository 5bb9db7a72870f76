use std::{
    collections::{BTreeMap, btree_map::Entry},
    convert::Infallible,
};

use tracing::trace;

use crate::ast::{
    Fixity, ModuleName,
    namer::{QualifiedName, TermNameRecord, TypeNameRecord},
};

type Table<A> = BTreeMap<QualifiedName, Vec<A>>;

/// The names a construct brings into scope. Terms and types are independent
/// namespaces; more than one record under a key is a candidate set that the
/// resolver narrows down, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingEnv {
    terms: Table<TermNameRecord>,
    types: Table<TypeNameRecord>,
    fixities: Table<Fixity>,
}

impl NamingEnv {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton_term(key: QualifiedName, record: TermNameRecord) -> Self {
        Self {
            terms: BTreeMap::from([(key, vec![record])]),
            ..Self::default()
        }
    }

    pub fn singleton_type(key: QualifiedName, record: TypeNameRecord) -> Self {
        Self {
            types: BTreeMap::from([(key, vec![record])]),
            ..Self::default()
        }
    }

    pub fn singleton_fixity(key: QualifiedName, fixity: Fixity) -> Self {
        Self {
            fixities: BTreeMap::from([(key, vec![fixity])]),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.types.is_empty() && self.fixities.is_empty()
    }

    /// Two sets of names visible at the same scope level. Candidates under a
    /// shared key are kept, `self`'s first, so ambiguity can be reported later.
    /// A fixity already present in `self` wins over `other`'s.
    pub fn merge_additive(self, other: Self) -> Self {
        Self {
            terms: concatenate(self.terms, other.terms),
            types: concatenate(self.types, other.types),
            fixities: keep_first(self.fixities, other.fixities),
        }
    }

    /// `inner` is nested inside `self`: wherever both bind a key, `inner`'s
    /// records replace the outer ones outright.
    pub fn merge_shadowing(self, inner: Self) -> Self {
        Self {
            terms: replace(self.terms, inner.terms),
            types: replace(self.types, inner.types),
            fixities: replace(self.fixities, inner.fixities),
        }
    }

    /// Applies `f` to every name the records refer to. Keys and fixities are
    /// left alone.
    pub fn try_rewrite<E, F>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(&QualifiedName) -> Result<QualifiedName, E>,
    {
        let Self {
            terms,
            types,
            fixities,
        } = self;

        Ok(Self {
            terms: try_map_records(terms, |record| record.try_map_name(&mut f))?,
            types: try_map_records(types, |record| record.try_map_name(&mut f))?,
            fixities,
        })
    }

    pub fn rewrite<F>(self, mut f: F) -> Self
    where
        F: FnMut(&QualifiedName) -> QualifiedName,
    {
        let Ok(env) = self.try_rewrite(|name| Ok::<_, Infallible>(f(name)));
        env
    }

    /// Renames the keys of every table. Keys that collide afterwards are merged
    /// additively in key order.
    pub fn map_keys<F>(self, mut f: F) -> Self
    where
        F: FnMut(&QualifiedName) -> QualifiedName,
    {
        let Self {
            terms,
            types,
            fixities,
        } = self;

        Self {
            terms: rekey(terms, &mut f, concatenate),
            types: rekey(types, &mut f, concatenate),
            fixities: rekey(fixities, &mut f, keep_first),
        }
    }

    /// Views an environment built inside `module` the way the outside sees it:
    /// every key and every referenced name becomes owned by `module`.
    pub fn qualify(self, module: &ModuleName) -> Self {
        trace!("qualify: {} names under {module}", self.len());
        self.rewrite(|name| name.in_module(module))
            .map_keys(|name| name.in_module(module))
    }

    /// Keeps only the keys `keep` accepts, in every table.
    pub fn filter_names<P>(self, mut keep: P) -> Self
    where
        P: FnMut(&QualifiedName) -> bool,
    {
        let Self {
            mut terms,
            mut types,
            mut fixities,
        } = self;

        terms.retain(|name, _| keep(name));
        types.retain(|name, _| keep(name));
        fixities.retain(|name, _| keep(name));

        Self {
            terms,
            types,
            fixities,
        }
    }

    pub fn lookup_term(&self, name: &QualifiedName) -> &[TermNameRecord] {
        self.terms.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn lookup_type(&self, name: &QualifiedName) -> &[TypeNameRecord] {
        self.types.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn lookup_fixity(&self, name: &QualifiedName) -> Option<&Fixity> {
        self.fixities.get(name).and_then(|fixities| fixities.first())
    }

    pub fn term_names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.terms.keys()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.types.keys()
    }

    pub fn fixity_names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.fixities.keys()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&QualifiedName, &[TermNameRecord])> {
        self.terms
            .iter()
            .map(|(name, records)| (name, records.as_slice()))
    }

    pub fn types(&self) -> impl Iterator<Item = (&QualifiedName, &[TypeNameRecord])> {
        self.types
            .iter()
            .map(|(name, records)| (name, records.as_slice()))
    }

    pub fn fixities(&self) -> impl Iterator<Item = (&QualifiedName, &[Fixity])> {
        self.fixities
            .iter()
            .map(|(name, fixities)| (name, fixities.as_slice()))
    }

    fn len(&self) -> usize {
        self.terms.len() + self.types.len() + self.fixities.len()
    }
}

impl FromIterator<NamingEnv> for NamingEnv {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = NamingEnv>,
    {
        iter.into_iter()
            .fold(NamingEnv::empty(), NamingEnv::merge_additive)
    }
}

fn concatenate<A>(mut lhs: Table<A>, rhs: Table<A>) -> Table<A> {
    for (name, mut records) in rhs {
        lhs.entry(name).or_default().append(&mut records);
    }
    lhs
}

fn keep_first<A>(mut lhs: Table<A>, rhs: Table<A>) -> Table<A> {
    for (name, records) in rhs {
        if let Entry::Vacant(slot) = lhs.entry(name) {
            slot.insert(records);
        }
    }
    lhs
}

fn replace<A>(mut outer: Table<A>, inner: Table<A>) -> Table<A> {
    outer.extend(inner);
    outer
}

fn rekey<A, F, M>(table: Table<A>, f: &mut F, merge: M) -> Table<A>
where
    F: FnMut(&QualifiedName) -> QualifiedName,
    M: Fn(Table<A>, Table<A>) -> Table<A>,
{
    table.into_iter().fold(Table::new(), |renamed, (name, records)| {
        merge(renamed, BTreeMap::from([(f(&name), records)]))
    })
}

fn try_map_records<A, E, F>(table: Table<A>, mut f: F) -> Result<Table<A>, E>
where
    F: FnMut(A) -> Result<A, E>,
{
    table
        .into_iter()
        .map(|(name, records)| -> Result<(QualifiedName, Vec<A>), E> {
            let records = records
                .into_iter()
                .map(&mut f)
                .collect::<Result<Vec<_>, E>>()?;
            Ok((name, records))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        Associativity, Fixity, Located, ModuleName, SourceRange,
        namer::{NamingEnv, QualifiedName, TermNameRecord, TypeNameRecord},
    };

    fn name(base: &str) -> QualifiedName {
        QualifiedName::unqualified(base)
    }

    fn bound(base: &str, row: u32) -> NamingEnv {
        NamingEnv::singleton_term(
            name(base),
            TermNameRecord::FromBinding(Located::new(SourceRange::on_row(row, 1, 2), name(base))),
        )
    }

    fn imported(module: &str, base: &str) -> NamingEnv {
        NamingEnv::singleton_term(
            name(base),
            TermNameRecord::FromImportedModule(QualifiedName::qualified(
                ModuleName::new(module),
                base,
            )),
        )
    }

    #[test]
    fn additive_merge_keeps_every_candidate_in_order() {
        let env = imported("A", "f").merge_additive(imported("B", "f"));

        let targets = env
            .lookup_term(&name("f"))
            .iter()
            .map(|record| record.qualified_name().to_string())
            .collect::<Vec<_>>();

        assert_eq!(targets, vec!["A.f", "B.f"]);
    }

    #[test]
    fn additive_merge_prefers_the_first_fixity() {
        let left = Fixity::new(Associativity::Left, 6);
        let right = Fixity::new(Associativity::Right, 9);

        let env = NamingEnv::singleton_fixity(name("<+>"), left)
            .merge_additive(NamingEnv::singleton_fixity(name("<+>"), right));

        assert_eq!(env.lookup_fixity(&name("<+>")), Some(&left));
        assert_eq!(env.fixities().count(), 1);
    }

    #[test]
    fn shadowing_replaces_outer_records() {
        let outer = imported("A", "f").merge_additive(imported("B", "g"));
        let env = outer.merge_shadowing(bound("f", 7));

        assert_eq!(env.lookup_term(&name("f")), bound("f", 7).lookup_term(&name("f")));
        assert_eq!(env.lookup_term(&name("g")).len(), 1);
    }

    #[test]
    fn shadowing_replaces_outer_fixities() {
        let infixl = Fixity::new(Associativity::Left, 6);
        let infixr = Fixity::new(Associativity::Right, 9);

        let env = NamingEnv::singleton_fixity(name("<+>"), infixl)
            .merge_shadowing(NamingEnv::singleton_fixity(name("<+>"), infixr));

        assert_eq!(
            env.fixities().collect::<Vec<_>>(),
            vec![(&name("<+>"), &[infixr][..])]
        );
    }

    #[test]
    fn namespaces_are_independent() {
        let at = Located::new(SourceRange::on_row(1, 1, 5), name("Word"));
        let env = NamingEnv::singleton_term(name("Word"), TermNameRecord::FromBinding(at.clone()))
            .merge_shadowing(NamingEnv::singleton_type(
                name("Word"),
                TypeNameRecord::FromTypeSynonym(at),
            ));

        assert_eq!(env.lookup_term(&name("Word")).len(), 1);
        assert_eq!(env.lookup_type(&name("Word")).len(), 1);
    }

    #[test]
    fn rewrite_leaves_keys_untouched() {
        let module = ModuleName::new("M");
        let env = bound("f", 1).rewrite(|n| n.in_module(&module));

        assert_eq!(env.term_names().collect::<Vec<_>>(), vec![&name("f")]);
        assert_eq!(
            env.lookup_term(&name("f"))[0].qualified_name(),
            &QualifiedName::qualified(module, "f")
        );
    }

    #[test]
    fn try_rewrite_propagates_failure() {
        let env = bound("f", 1).merge_additive(bound("g", 2));

        let result = env.try_rewrite(|n| {
            if n.base().as_str() == "g" {
                Err(format!("cannot rename {n}"))
            } else {
                Ok(n.clone())
            }
        });

        assert_eq!(result, Err("cannot rename g".to_owned()));
    }

    #[test]
    fn qualify_renames_keys_and_targets() {
        let module = ModuleName::new("M");
        let env = bound("f", 1)
            .merge_additive(NamingEnv::singleton_fixity(
                name("f"),
                Fixity::new(Associativity::NonAssociative, 4),
            ))
            .qualify(&module);

        let key = QualifiedName::qualified(module, "f");
        assert_eq!(env.term_names().collect::<Vec<_>>(), vec![&key]);
        assert_eq!(env.lookup_term(&key)[0].qualified_name(), &key);
        assert!(env.lookup_fixity(&key).is_some());
        assert!(env.lookup_term(&name("f")).is_empty());
    }

    #[test]
    fn colliding_keys_merge_after_renaming() {
        let a = QualifiedName::qualified(ModuleName::new("A"), "f");
        let b = QualifiedName::qualified(ModuleName::new("B"), "f");
        let env = NamingEnv::singleton_term(a.clone(), TermNameRecord::FromImportedModule(a))
            .merge_additive(NamingEnv::singleton_term(
                b.clone(),
                TermNameRecord::FromImportedModule(b),
            ))
            .map_keys(QualifiedName::unqualify);

        assert_eq!(env.lookup_term(&name("f")).len(), 2);
    }

    #[test]
    fn filter_names_drops_whole_entries() {
        let env = bound("f", 1)
            .merge_additive(bound("g", 2))
            .filter_names(|n| n.base().as_str() != "g");

        assert_eq!(env.term_names().collect::<Vec<_>>(), vec![&name("f")]);
    }

    #[test]
    fn collecting_folds_additively() {
        let env = [imported("A", "f"), NamingEnv::empty(), imported("B", "f")]
            .into_iter()
            .collect::<NamingEnv>();

        assert_eq!(env.lookup_term(&name("f")).len(), 2);
        assert!(NamingEnv::empty().is_empty());
    }
}
