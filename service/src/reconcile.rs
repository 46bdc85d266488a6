//! Identity-based reconciliation of received and saved entity sets.

use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    hash::Hash,
};

/// Entity having an identity to be reconciled by.
pub trait Identified {
    /// Type of the identity.
    type Key: Clone + Eq + Hash;

    /// Returns the identity of this entity.
    fn key(&self) -> Self::Key;
}

/// Reconciles the `received` entities with the `saved` ones.
///
/// Every entity present in both sets is produced by `merge`, every entity
/// present in the `received` set only is produced by `create`, and every
/// entity present in the `saved` set only is returned untouched.
///
/// Received entities go first in their order, followed by the untouched
/// saved ones in their order. Callers should not rely on this order.
///
/// Keys are expected to be unique within each set.
pub fn reconcile<S, R>(
    received: Vec<R>,
    saved: Vec<S>,
    mut merge: impl FnMut(S, R) -> S,
    mut create: impl FnMut(R) -> S,
) -> Vec<S>
where
    S: Identified,
    R: Identified<Key = S::Key>,
{
    let res = try_reconcile(
        received,
        saved,
        |s, r| Ok::<_, Infallible>(merge(s, r)),
        |r| Ok(create(r)),
    );
    match res {
        Ok(v) => v,
        Err(never) => match never {},
    }
}

/// Fallible version of [`reconcile()`], aborting on the first error.
///
/// # Errors
///
/// If any of `merge` or `create` fails.
pub fn try_reconcile<S, R, E>(
    received: Vec<R>,
    saved: Vec<S>,
    mut merge: impl FnMut(S, R) -> Result<S, E>,
    mut create: impl FnMut(R) -> Result<S, E>,
) -> Result<Vec<S>, E>
where
    S: Identified,
    R: Identified<Key = S::Key>,
{
    let positions = saved
        .iter()
        .enumerate()
        .map(|(i, s)| (s.key(), i))
        .collect::<HashMap<_, _>>();
    let mut saved = saved.into_iter().map(Some).collect::<Vec<_>>();

    let mut out = Vec::with_capacity(received.len() + saved.len());
    for r in received {
        let matched = positions
            .get(&r.key())
            .and_then(|&i| saved.get_mut(i))
            .and_then(Option::take);
        out.push(match matched {
            Some(s) => merge(s, r)?,
            None => create(r)?,
        });
    }
    out.extend(saved.into_iter().flatten());

    Ok(out)
}

/// Classification of identities between received and saved entity sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diff<K: Eq + Hash> {
    /// Identities present in the received set only.
    pub new: HashSet<K>,

    /// Identities present in both sets.
    pub updated: HashSet<K>,

    /// Identities present in the saved set only.
    pub unchanged: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Diff<K> {
    /// Classifies identities of the `received` and `saved` entities.
    pub fn of<R, S>(received: &[R], saved: &[S]) -> Self
    where
        R: Identified<Key = K>,
        S: Identified<Key = K>,
    {
        let received = received.iter().map(R::key).collect::<HashSet<_>>();
        let saved = saved.iter().map(S::key).collect::<HashSet<_>>();

        Self {
            new: received.difference(&saved).cloned().collect(),
            updated: received.intersection(&saved).cloned().collect(),
            unchanged: saved.difference(&received).cloned().collect(),
        }
    }
}

/// Mapping of temporary IDs onto permanent ones, built once per request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mapping<K: Eq + Hash>(HashMap<K, K>);

impl<K: Eq + Hash> Default for Mapping<K> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: Clone + Eq + Hash> Mapping<K> {
    /// Records that the `temporary` ID is replaced with the `permanent` one.
    pub fn insert(&mut self, temporary: K, permanent: K) {
        drop(self.0.insert(temporary, permanent));
    }

    /// Resolves the provided ID into the permanent one.
    ///
    /// IDs not mapped are considered permanent already.
    #[must_use]
    pub fn resolve(&self, id: &K) -> K {
        self.0.get(id).unwrap_or(id).clone()
    }

    /// Rewrites the provided ID in place with the permanent one.
    pub fn rewrite(&self, id: &mut K) {
        if let Some(permanent) = self.0.get(id) {
            permanent.clone_into(id);
        }
    }

    /// Consumes this [`Mapping`] returning the underlying pairs.
    #[must_use]
    pub fn into_inner(self) -> HashMap<K, K> {
        self.0
    }
}
