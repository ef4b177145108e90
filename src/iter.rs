//! Finite-sequence combinators.
//!
//! Predicates receive the item and its index and may fail; the first error
//! aborts the iteration.
use serde_json::{Map, Value};

use crate::errors::{EvalError, Result};

pub fn all_match<T, E>(
    items: impl IntoIterator<Item = T>,
    mut predicate: impl FnMut(T, usize) -> std::result::Result<bool, E>,
) -> std::result::Result<bool, E> {
    for (i, item) in items.into_iter().enumerate() {
        if !predicate(item, i)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn any_match<T, E>(
    items: impl IntoIterator<Item = T>,
    mut predicate: impl FnMut(T, usize) -> std::result::Result<bool, E>,
) -> std::result::Result<bool, E> {
    for (i, item) in items.into_iter().enumerate() {
        if predicate(item, i)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Exactly one item matches. Every item is tested, there is no short-circuit.
pub fn single_match<T, E>(
    items: impl IntoIterator<Item = T>,
    mut predicate: impl FnMut(T, usize) -> std::result::Result<bool, E>,
) -> std::result::Result<bool, E> {
    let mut matches = 0usize;
    for (i, item) in items.into_iter().enumerate() {
        if predicate(item, i)? {
            matches += 1;
        }
    }
    Ok(matches == 1)
}

pub fn element_at<I: IntoIterator>(items: I, index: usize) -> Option<I::Item> {
    items.into_iter().nth(index)
}

/// Keep the items matching `predicate`, in order.
pub fn filter<T, E>(
    items: impl IntoIterator<Item = T>,
    mut predicate: impl FnMut(&T, usize) -> std::result::Result<bool, E>,
) -> std::result::Result<Vec<T>, E> {
    let mut kept = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        if predicate(&item, i)? {
            kept.push(item);
        }
    }
    Ok(kept)
}

pub fn reduce<T, R, E>(
    items: impl IntoIterator<Item = T>,
    mut reducer: impl FnMut(R, T, usize) -> std::result::Result<R, E>,
    initial: R,
) -> std::result::Result<R, E> {
    let mut acc = initial;
    for (i, item) in items.into_iter().enumerate() {
        acc = reducer(acc, item, i)?;
    }
    Ok(acc)
}

/// Chainable wrapper over a lazily evaluated, fallible sequence.
pub struct ItChain<'a, T> {
    iter: Box<dyn Iterator<Item = Result<T>> + 'a>,
}

impl<'a> ItChain<'a, &'a str> {
    pub fn keys_of(object: &'a Map<String, Value>) -> Self {
        ItChain::from(object.keys().map(String::as_str))
    }
}

impl<'a> ItChain<'a, &'a Value> {
    pub fn values_of(object: &'a Map<String, Value>) -> Self {
        ItChain::from(object.values())
    }
}

impl<'a> ItChain<'a, (&'a str, &'a Value)> {
    pub fn entries_of(object: &'a Map<String, Value>) -> Self {
        ItChain::from(object.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl<'a, T: 'a> ItChain<'a, T> {
    pub fn from<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self {
            iter: Box::new(items.into_iter().map(Ok)),
        }
    }

    pub fn map<R: 'a>(self, mut mapper: impl FnMut(T, usize) -> Result<R> + 'a) -> ItChain<'a, R> {
        ItChain {
            iter: Box::new(
                self.iter
                    .enumerate()
                    .map(move |(i, item)| item.and_then(|t| mapper(t, i))),
            ),
        }
    }

    pub fn filter(self, mut predicate: impl FnMut(&T, usize) -> Result<bool> + 'a) -> Self {
        Self {
            iter: Box::new(self.iter.enumerate().filter_map(move |(i, item)| match item {
                Ok(t) => match predicate(&t, i) {
                    Ok(true) => Some(Ok(t)),
                    Ok(false) => None,
                    Err(e) => Some(Err(e)),
                },
                Err(e) => Some(Err(e)),
            })),
        }
    }

    /// Filter only when `x` is present.
    pub fn maybe_filter<X: 'a>(
        self,
        x: Option<X>,
        mut predicate: impl FnMut(&X, &T, usize) -> Result<bool> + 'a,
    ) -> Self {
        match x {
            Some(x) => self.filter(move |t, i| predicate(&x, t, i)),
            None => self,
        }
    }

    pub fn reduce<R>(self, initial: R, mut reducer: impl FnMut(R, T, usize) -> Result<R>) -> Result<R> {
        reduce(self.iter, |acc, item, i| reducer(acc, item?, i), initial)
    }

    /// Assemble an object. A key produced twice is an error.
    pub fn to_index(
        self,
        mut key: impl FnMut(&T) -> String,
        mut value: impl FnMut(T) -> Result<Value>,
    ) -> Result<Map<String, Value>> {
        self.reduce(Map::new(), |mut index, item, _| {
            let k = key(&item);
            if index.contains_key(&k) {
                return Err(EvalError::DuplicateKey(k));
            }
            let v = value(item)?;
            index.insert(k, v);
            Ok(index)
        })
    }

    pub fn index_by(self, key: impl FnMut(&T) -> String) -> Result<Map<String, Value>>
    where
        T: Into<Value>,
    {
        self.to_index(key, |item| Ok(item.into()))
    }

    pub fn all(self, mut predicate: impl FnMut(T, usize) -> Result<bool>) -> Result<bool> {
        all_match(self.iter, |item, i| predicate(item?, i))
    }

    pub fn any(self, mut predicate: impl FnMut(T, usize) -> Result<bool>) -> Result<bool> {
        any_match(self.iter, |item, i| predicate(item?, i))
    }

    pub fn single_match(self, mut predicate: impl FnMut(T, usize) -> Result<bool>) -> Result<bool> {
        single_match(self.iter, |item, i| predicate(item?, i))
    }

    pub fn collect_vec(self) -> Result<Vec<T>> {
        self.iter.collect()
    }
}
