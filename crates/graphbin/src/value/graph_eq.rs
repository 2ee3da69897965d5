// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural equality that also requires matching identity topology.

use crate::value::Value;
use std::collections::HashMap;

/// Compare two graphs structurally.
///
/// Objects and arrays are paired on first visit; every later visit must hit
/// the same partner. Two graphs are equal only if their values match and
/// their sharing and cycles are isomorphic, so a decoded graph that lost a
/// shared reference (or grew one) is reported unequal.
pub fn graph_eq(left: &Value, right: &Value) -> bool {
    Pairing::default().eq(left, right)
}

#[derive(Default)]
struct Pairing {
    forward: HashMap<usize, usize>,
    backward: HashMap<usize, usize>,
}

enum Visit {
    First,
    Again,
    Conflict,
}

impl Pairing {
    fn visit(&mut self, l: usize, r: usize) -> Visit {
        match (self.forward.get(&l), self.backward.get(&r)) {
            (None, None) => {
                self.forward.insert(l, r);
                self.backward.insert(r, l);
                Visit::First
            }
            (Some(&pr), Some(&pl)) if pr == r && pl == l => Visit::Again,
            _ => Visit::Conflict,
        }
    }

    fn all(&mut self, l: &[Value], r: &[Value]) -> bool {
        l.len() == r.len() && l.iter().zip(r).all(|(a, b)| self.eq(a, b))
    }

    fn eq(&mut self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) => match self.visit(l.addr(), r.addr()) {
                Visit::Again => true,
                Visit::Conflict => false,
                Visit::First => {
                    l.class_name() == r.class_name() && self.all(&l.fields(), &r.fields())
                }
            },
            (Value::Array(l), Value::Array(r)) => match self.visit(l.addr(), r.addr()) {
                Visit::Again => true,
                Visit::Conflict => false,
                Visit::First => self.all(&l.to_vec(), &r.to_vec()),
            },
            (Value::MultiArray(l), Value::MultiArray(r)) => {
                l.lengths() == r.lengths() && self.all(l.items(), r.items())
            }
            (Value::List(l), Value::List(r))
            | (Value::Stack(l), Value::Stack(r))
            | (Value::Set(l), Value::Set(r))
            | (Value::Tuple(l), Value::Tuple(r)) => self.all(l, r),
            (Value::Queue(l), Value::Queue(r)) => {
                l.len() == r.len() && l.iter().zip(r).all(|(a, b)| self.eq(a, b))
            }
            (Value::LinkedList(l), Value::LinkedList(r)) => {
                l.len() == r.len() && l.iter().zip(r).all(|(a, b)| self.eq(a, b))
            }
            (Value::SortedMap(l), Value::SortedMap(r)) => {
                l.len() == r.len()
                    && l
                        .iter()
                        .zip(r.iter())
                        .all(|((lk, lv), (rk, rv))| self.eq(lk, rk) && self.eq(lv, rv))
            }
            _ => left == right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassBuilder, TypeCatalog, TypeRef};

    fn catalog() -> TypeCatalog {
        let catalog = TypeCatalog::new();
        catalog
            .register_class(
                ClassBuilder::new("Pair")
                    .member("A", TypeRef::class("Pair"))
                    .member("B", TypeRef::class("Pair")),
            )
            .expect("register");
        catalog
    }

    #[test]
    fn test_cycles_compare_equal() {
        let catalog = catalog();
        let left = catalog.instantiate("Pair").expect("left");
        left.set("A", left.clone()).expect("cycle");
        let right = catalog.instantiate("Pair").expect("right");
        right.set("A", right.clone()).expect("cycle");
        assert!(graph_eq(&Value::Object(left), &Value::Object(right)));
    }

    #[test]
    fn test_lost_sharing_detected() {
        let catalog = catalog();
        let shared = catalog.instantiate("Pair").expect("shared");
        let left = catalog.instantiate("Pair").expect("left");
        left.set("A", shared.clone()).expect("a");
        left.set("B", shared).expect("b");

        let right = catalog.instantiate("Pair").expect("right");
        right
            .set("A", catalog.instantiate("Pair").expect("copy a"))
            .expect("a");
        right
            .set("B", catalog.instantiate("Pair").expect("copy b"))
            .expect("b");

        assert!(!graph_eq(&Value::Object(left), &Value::Object(right)));
    }
}
