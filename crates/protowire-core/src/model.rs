//! Frozen model registry.
//!
//! A `TypeModel` is built once from declared messages and never mutates
//! afterwards. The derived strategy sets are materialized lazily behind
//! `OnceLock`, so concurrent first use stays idempotent.

use crate::{
    error::Error,
    obs::{self, MetricsEvent},
    strategy::{compiled::CompiledSet, planned::PlanSet},
};
use protowire_schema::{
    build::build_model,
    emit::emit_proto,
    node::{MessageDef, ModelDef},
    resolved::{ResolvedMessage, ResolvedModel},
    types::CompatibilityLevel,
};
use std::{fmt, sync::OnceLock};

///
/// TypeModelBuilder
///

#[derive(Clone, Debug)]
pub struct TypeModelBuilder {
    def: ModelDef,
}

impl TypeModelBuilder {
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            def: ModelDef::new(package),
        }
    }

    /// Level applied to fields without their own `.level(...)`.
    #[must_use]
    pub fn default_compatibility(mut self, level: CompatibilityLevel) -> Self {
        self.def.default_level = level;
        self
    }

    #[must_use]
    pub fn message(mut self, message: MessageDef) -> Self {
        self.def.messages.push(message);
        self
    }

    /// Validate, resolve, and freeze. Every unsupported-format and
    /// ambiguous-map failure surfaces here, before any bytes move.
    pub fn build(self) -> Result<TypeModel, Error> {
        let resolved = build_model(&self.def)?;

        obs::sink().record(MetricsEvent::ModelFrozen {
            messages: resolved.messages.len(),
        });

        Ok(TypeModel {
            resolved,
            planned: OnceLock::new(),
            compiled: OnceLock::new(),
        })
    }
}

///
/// TypeModel
///
/// Immutable after build and `Arc`-shareable across threads.
///

pub struct TypeModel {
    resolved: ResolvedModel,
    planned: OnceLock<PlanSet>,
    compiled: OnceLock<CompiledSet>,
}

impl TypeModel {
    #[must_use]
    pub const fn resolved(&self) -> &ResolvedModel {
        &self.resolved
    }

    #[must_use]
    pub fn message(&self, name: &str) -> Option<&ResolvedMessage> {
        self.resolved.get(name)
    }

    /// Proto3 text for the frozen model.
    #[must_use]
    pub fn schema_text(&self) -> String {
        emit_proto(&self.resolved)
    }

    pub(crate) fn planned(&self) -> &PlanSet {
        self.planned.get_or_init(|| PlanSet::build(&self.resolved))
    }

    pub(crate) fn compiled(&self) -> &CompiledSet {
        self.compiled
            .get_or_init(|| CompiledSet::build(&self.resolved))
    }
}

impl fmt::Debug for TypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeModel")
            .field("package", &self.resolved.package)
            .field("messages", &self.resolved.messages.len())
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
