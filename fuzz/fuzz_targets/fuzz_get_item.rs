// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use graphbin::{
    ClassBuilder, CollectionKind, PrimitiveKind, Serializer, SerializerConfig, TypeCatalog,
    TypeRef,
};
use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};

fn fixture() -> &'static (Serializer, Vec<TypeRef>) {
    static FIXTURE: OnceLock<(Serializer, Vec<TypeRef>)> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let catalog = Arc::new(TypeCatalog::new());
        let _ = catalog.register_class(
            ClassBuilder::new("Fuzz.Node")
                .member("Value", TypeRef::Object)
                .member("Next", TypeRef::class("Fuzz.Node"))
                .member("Children", TypeRef::list(TypeRef::class("Fuzz.Node"))),
        );
        // Small limits keep hostile counts and depths cheap.
        let config = SerializerConfig::builtin()
            .with_max_depth(64)
            .with_max_elements(4096);
        let types = vec![
            TypeRef::Object,
            TypeRef::class("Fuzz.Node"),
            TypeRef::array(TypeRef::STRING),
            TypeRef::multi_array(PrimitiveKind::Decimal.into(), 2),
            TypeRef::collection(CollectionKind::Stack, TypeRef::Object),
            TypeRef::sorted_map(TypeRef::STRING, PrimitiveKind::DateTime.into()),
        ];
        (Serializer::with_source(catalog).with_config(config), types)
    })
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let (serializer, types) = fixture();
    let ty = &types[selector as usize % types.len()];
    // Pool flag from the selector's high bit.
    let _ = serializer.get_item(ty, rest, selector & 0x80 != 0);
});
