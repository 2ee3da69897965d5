// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests for the encode/decode workflow.

use super::*;
use crate::config::DEFAULT_MAX_DEPTH;
use std::sync::Arc;

fn farm() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::new();
    catalog
        .register_class(
            ClassBuilder::new("Farm.Animal")
                .abstract_class()
                .member("Name", TypeRef::STRING)
                .member("Tags", TypeRef::list(TypeRef::STRING)),
        )
        .expect("animal");
    catalog
        .register_class(
            ClassBuilder::new("Farm.Dog")
                .extends("Farm.Animal")
                .member("Breed", TypeRef::STRING),
        )
        .expect("dog");
    catalog
        .register_class(
            ClassBuilder::new("Farm.Barn")
                .member("RefA", TypeRef::class("Farm.Animal"))
                .member("RefB", TypeRef::class("Farm.Animal"))
                .member("Herd", TypeRef::array(TypeRef::class("Farm.Animal")))
                .member("Owner", TypeRef::Object),
        )
        .expect("barn");
    Arc::new(catalog)
}

fn serializer(catalog: &Arc<TypeCatalog>) -> Serializer {
    Serializer::with_source(catalog.clone()).with_config(SerializerConfig::builtin())
}

#[test]
fn test_full_workflow() {
    // 1. Register types and build a graph
    let catalog = farm();
    let dog = catalog.instantiate("Farm.Dog").expect("dog");
    dog.set("Name", "Rex").expect("name");
    dog.set("Breed", "Collie").expect("breed");
    dog.set("Tags", Value::List(vec![Value::from("good")])).expect("tags");

    let barn = catalog.instantiate("Farm.Barn").expect("barn");
    barn.set("RefA", dog.clone()).expect("refA");
    barn.set("RefB", dog.clone()).expect("refB");
    barn.set("Herd", Value::array(vec![Value::Object(dog.clone()), Value::Null]))
        .expect("herd");
    barn.set("Owner", Value::Object(barn.clone())).expect("owner");

    // 2. Encode with the reference pool
    let s = serializer(&catalog);
    let ty = TypeRef::class("Farm.Barn");
    let original = Value::Object(barn);
    let bytes = s.get_bytes(&ty, &original, true).expect("encode");

    // 3. Decode and compare topology
    let decoded = s.get_item(&ty, &bytes, true).expect("decode");
    assert!(graph_eq(&original, &decoded));

    // 4. Shared references stay shared
    let barn = decoded.as_object().expect("barn");
    let ref_a = barn.get("RefA").expect("refA");
    let ref_b = barn.get("RefB").expect("refB");
    assert_eq!(ref_a, ref_b);
    ref_a
        .as_object()
        .expect("dog")
        .set("Breed", "Husky")
        .expect("mutate");
    assert_eq!(
        ref_b.as_object().and_then(|d| d.get("Breed")),
        Some(Value::from("Husky"))
    );
    assert_eq!(barn.get("Owner"), Some(decoded.clone()));
}

#[test]
fn test_without_pool_duplicates_shared_references() {
    let catalog = farm();
    let dog = catalog.instantiate("Farm.Dog").expect("dog");
    let barn = catalog.instantiate("Farm.Barn").expect("barn");
    barn.set("RefA", dog.clone()).expect("refA");
    barn.set("RefB", dog).expect("refB");

    let s = serializer(&catalog);
    let ty = TypeRef::class("Farm.Barn");
    let original = Value::Object(barn);
    let pooled = s.get_bytes(&ty, &original, true).expect("pooled");
    let plain = s.get_bytes(&ty, &original, false).expect("plain");
    assert!(plain.len() > pooled.len());

    let decoded = s.get_item(&ty, &plain, false).expect("decode");
    let barn = decoded.as_object().expect("barn");
    let a = barn.get("RefA").expect("refA");
    let b = barn.get("RefB").expect("refB");
    assert_ne!(a, b);
    assert_eq!(a.as_object().map(|o| o.class_name()), b.as_object().map(|o| o.class_name()));
    // Same content, lost sharing.
    assert!(!graph_eq(&original, &decoded));
}

#[test]
fn test_cycle_without_pool_is_refused() {
    let catalog = farm();
    let barn = catalog.instantiate("Farm.Barn").expect("barn");
    barn.set("Owner", barn.clone()).expect("owner");
    let s = serializer(&catalog);
    assert!(matches!(
        s.get_bytes(&TypeRef::class("Farm.Barn"), &Value::Object(barn.clone()), false),
        Err(Error::CycleWithoutReferencePool(_))
    ));

    // With detection off the depth limit still stops the recursion.
    let s = s.with_config(
        SerializerConfig::builtin()
            .with_cycle_detection(false)
            .with_max_depth(64),
    );
    assert!(matches!(
        s.get_bytes(&TypeRef::class("Farm.Barn"), &Value::Object(barn), false),
        Err(Error::DepthLimitExceeded(64))
    ));
}

#[test]
fn test_pool_flag_must_match() {
    let catalog = farm();
    let s = serializer(&catalog);
    let ty = TypeRef::list(TypeRef::STRING);
    let value = Value::List(vec![Value::from("a"), Value::from("b")]);
    let bytes = s.get_bytes(&ty, &value, true).expect("encode");
    // Decoding with the other flag misreads the stream.
    assert!(s.get_item(&ty, &bytes, false).map(|v| v != value).unwrap_or(true));
}

#[test]
fn test_global_entry_points() {
    let ty = TypeRef::Tuple(vec![TypeRef::STRING, PrimitiveKind::U32.into()]);
    let value = Value::Tuple(vec![Value::from("global"), Value::U32(7)]);
    let bytes = get_bytes(&ty, &value, true).expect("encode");
    assert_eq!(get_item(&ty, &bytes, true).expect("decode"), value);
}

fn chain(catalog: &TypeCatalog, len: usize) -> ObjectRef {
    let head = catalog.instantiate("Deep.Link").expect("link");
    let mut tail = head.clone();
    for _ in 1..len {
        let next = catalog.instantiate("Deep.Link").expect("link");
        tail.set("Next", next.clone()).expect("next");
        tail = next;
    }
    head
}

#[test]
fn test_deep_chain_at_default_limit() {
    let catalog = Arc::new(TypeCatalog::new());
    catalog
        .register_class(ClassBuilder::new("Deep.Link").member("Next", TypeRef::class("Deep.Link")))
        .expect("link");
    let s = serializer(&catalog);
    let ty = TypeRef::class("Deep.Link");

    // The root and every link take one level, the final null Next one more.
    let head = chain(&catalog, DEFAULT_MAX_DEPTH - 1);
    for pool in [true, false] {
        let bytes = s.get_bytes(&ty, &Value::Object(head.clone()), pool).expect("encode");
        let back = s.get_item(&ty, &bytes, pool).expect("decode");
        assert!(graph_eq(&back, &Value::Object(head.clone())));
    }

    // Bytes from a more permissive encoder stop at the limit instead of the stack.
    let longer = chain(&catalog, DEFAULT_MAX_DEPTH + 8);
    let permissive =
        s.with_config(SerializerConfig::builtin().with_max_depth(DEFAULT_MAX_DEPTH + 16));
    let bytes = permissive
        .get_bytes(&ty, &Value::Object(longer), true)
        .expect("encode");
    assert!(matches!(
        serializer(&catalog).get_item(&ty, &bytes, true),
        Err(Error::DepthLimitExceeded(DEFAULT_MAX_DEPTH))
    ));
}
