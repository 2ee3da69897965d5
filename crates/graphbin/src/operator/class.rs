// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class codec with runtime-type polymorphism.
//!
//! # Wire shape
//!
//! ```text
//! flag null
//! pool seen/new (+ id)
//! flag same-type
//! same:     members in name order
//! derived:  type name (raw UTF-8), then the derived class's members
//! ```
//!
//! The object is registered in the pool before its members are touched, on
//! both sides, so a member pointing back at it resolves to the shell.

use crate::error::{Error, Result};
use crate::operator::{
    write_null_flag, BuildCell, Operator, OperatorRegistry, ReadContext, WriteContext,
};
use crate::types::{ClassDescriptor, NamedType, TypeRef};
use crate::value::{ObjectRef, Value};
use std::sync::Arc;

/// One bound member: slot in the object plus the codec of its declared type.
#[derive(Debug, Clone)]
pub struct MemberBinding {
    name: Arc<str>,
    slot: usize,
    operator: Arc<dyn Operator>,
}

impl MemberBinding {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn operator(&self) -> &Arc<dyn Operator> {
        &self.operator
    }
}

/// Member bindings computed once per class.
#[derive(Debug)]
pub struct ClassLayout {
    class: Arc<ClassDescriptor>,
    members: Vec<MemberBinding>,
    follows: Vec<Arc<dyn Operator>>,
}

impl ClassLayout {
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    pub fn members(&self) -> &[MemberBinding] {
        &self.members
    }
}

#[derive(Debug)]
pub struct ClassOperator {
    raw: TypeRef,
    name: Arc<str>,
    layout: BuildCell<ClassLayout>,
}

impl ClassOperator {
    pub fn new(name: Arc<str>) -> Self {
        Self {
            raw: TypeRef::Class(name.clone()),
            name,
            layout: BuildCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Built layout, waiting for the build if necessary.
    pub fn layout(&self) -> Result<&ClassLayout> {
        self.layout.wait(&self.raw)
    }

    /// Write the members of `object`, which must be exactly this class.
    pub(crate) fn write_body(&self, ctx: &mut WriteContext<'_>, object: &ObjectRef) -> Result<()> {
        let layout = self.layout()?;
        if object.class().members().len() != layout.members.len() {
            return Err(Error::TypeMismatch {
                expected: self.name.to_string(),
                found: format!("{} with a different member layout", object.class_name()),
            });
        }
        for binding in &layout.members {
            let value = object.get_slot(binding.slot);
            ctx.write_child(binding.operator.as_ref(), &value)?;
        }
        Ok(())
    }

    /// Allocate a shell, register it, then decode its members.
    pub(crate) fn read_body(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let layout = self.layout()?;
        let shell = ObjectRef::new(layout.class.clone())?;
        let value = Value::Object(shell.clone());
        ctx.pool.add_object(value.clone());
        for binding in &layout.members {
            let member = ctx.read_child(binding.operator.as_ref())?;
            shell.set_slot(binding.slot, member);
        }
        Ok(value)
    }

    fn derived(&self, registry: &OperatorRegistry, actual: &str) -> Result<Arc<dyn Operator>> {
        if !registry.source().is_assignable(&self.name, actual) {
            return Err(Error::TypeMismatch {
                expected: self.name.to_string(),
                found: actual.to_string(),
            });
        }
        let op = registry.get_operator(&TypeRef::class(actual))?;
        if op.as_class().is_none() {
            return Err(Error::UnresolvedType(actual.to_string()));
        }
        Ok(op)
    }
}

impl Operator for ClassOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, registry: &OperatorRegistry) -> Result<()> {
        if self.layout.is_complete() {
            return Ok(());
        }
        let Some(class) = registry.source().class(&self.name) else {
            let err = Error::UnknownType(self.name.to_string());
            self.layout.complete(Err(err.to_string()));
            return Err(err);
        };
        let outcome = class
            .members()
            .iter()
            .enumerate()
            .map(|(slot, member)| {
                Ok(MemberBinding {
                    name: Arc::from(member.name()),
                    slot,
                    operator: registry.get_operator(member.ty())?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(|members| ClassLayout {
                follows: members.iter().map(|m| m.operator.clone()).collect(),
                class,
                members,
            });
        self.layout.publish(outcome)
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        Ok(&self.layout()?.follows)
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let object = match value {
            Value::Null => None,
            Value::Object(o) => Some(o),
            other => return Err(Error::mismatch(&self.raw, other)),
        };
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        let Some(object) = object else {
            return Ok(());
        };
        let actual = object.class_name();
        let same = *actual == *self.name;
        // Resolve before emitting anything for this object.
        let derived = if same {
            None
        } else {
            Some(self.derived(ctx.registry, &actual)?)
        };

        if ctx.pool.write(&mut ctx.container, value)? {
            return Ok(());
        }
        ctx.pool.add_object(value);
        ctx.container.write_flag(same);
        ctx.pool.enter(value)?;
        let result = match derived.as_ref().and_then(|op| op.as_class()) {
            None => self.write_body(ctx, object),
            Some(class_op) => ctx
                .container
                .write_str(&actual)
                .and_then(|()| class_op.write_body(ctx, object)),
        };
        ctx.pool.exit(value);
        result
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        if let Some(seen) = ctx.pool.read(&mut ctx.container)? {
            return match seen {
                Value::Object(_) => Ok(seen),
                other => Err(Error::Malformed(format!(
                    "class slot refers to pooled {}",
                    other.kind_name()
                ))),
            };
        }
        if ctx.container.read_flag()? {
            return self.read_body(ctx);
        }
        let actual = match ctx.read_named_type(true)? {
            NamedType::Class(class) => class,
            NamedType::Enum(e) => return Err(Error::UnresolvedType(e.name().to_string())),
        };
        let op = self.derived(ctx.registry, actual.name())?;
        match op.as_class() {
            Some(class_op) => class_op.read_body(ctx),
            None => Err(Error::UnresolvedType(actual.name().to_string())),
        }
    }

    fn as_class(&self) -> Option<&ClassOperator> {
        Some(self)
    }
}
