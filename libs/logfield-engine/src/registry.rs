use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use logfield_api::{Handler, Subject};
use serde::Serialize;

use crate::config::DuplicatePolicy;
use crate::error::DispatchError;
use crate::validate::{ValidationCache, validate};

/// Where a handler ended up after registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Keyed by its exact type.
    Direct,
    /// Tried in catalog order after the direct lookup misses.
    Chain,
    /// Keyed by a type a later handler overwrote. Never fires.
    Shadowed,
}

/// Read-only description of one registered handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerInfo {
    pub name: String,
    pub partition: Partition,
    pub declared: String,
}

/// Immutable handler table: exact-type lookup plus an ordered chain of
/// structural handlers.
#[derive(Debug)]
pub struct Registry {
    direct: HashMap<TypeId, Handler>,
    chain: Vec<Handler>,
    infos: Vec<HandlerInfo>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build from `catalog` with default options: duplicate keys overwrite,
    /// validation goes through the process-wide cache.
    pub fn build(catalog: impl IntoIterator<Item = Handler>) -> Result<Registry, DispatchError> {
        Self::builder().extend(catalog).build()
    }

    /// The handler that would fire for `subject`, if any.
    pub fn resolve(&self, subject: &Subject<'_>) -> Option<&Handler> {
        self.direct
            .get(&subject.type_id())
            .or_else(|| self.chain.iter().find(|h| h.recognizer().recognizes(subject)))
    }

    pub fn direct_len(&self) -> usize {
        self.direct.len()
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// Every registered handler, in catalog order.
    pub fn handlers(&self) -> &[HandlerInfo] {
        &self.infos
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    handlers: Vec<Handler>,
    duplicates: DuplicatePolicy,
    cache: Option<Arc<ValidationCache>>,
}

impl RegistryBuilder {
    pub fn register(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn extend(mut self, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Validate through `cache` instead of the process-wide one.
    pub fn cache(mut self, cache: Arc<ValidationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<Registry, DispatchError> {
        let cache = self.cache.unwrap_or_else(ValidationCache::shared);
        for handler in &self.handlers {
            validate(handler, &cache)?;
        }

        let mut direct: HashMap<TypeId, (usize, Handler)> = HashMap::new();
        let mut chain = Vec::new();
        let mut infos = Vec::with_capacity(self.handlers.len());

        for (position, handler) in self.handlers.into_iter().enumerate() {
            let declared = handler
                .converter()
                .declared()
                .map(ToString::to_string)
                .unwrap_or_default();

            let Some(key) = handler.key() else {
                infos.push(HandlerInfo {
                    name: handler.name().to_string(),
                    partition: Partition::Chain,
                    declared,
                });
                chain.push(handler);
                continue;
            };

            infos.push(HandlerInfo {
                name: handler.name().to_string(),
                partition: Partition::Direct,
                declared,
            });
            match direct.entry(key.id()) {
                Entry::Vacant(slot) => {
                    slot.insert((position, handler));
                }
                Entry::Occupied(mut slot) => {
                    let (previous, first) = slot.get();
                    if self.duplicates == DuplicatePolicy::Reject {
                        return Err(DispatchError::DuplicateType {
                            type_name: key.name(),
                            first: first.name().to_string(),
                            second: handler.name().to_string(),
                        });
                    }
                    tracing::warn!(
                        type_name = %key.short_name(),
                        first = %first.name(),
                        second = %handler.name(),
                        "handler overwritten by a later registration"
                    );
                    infos[*previous].partition = Partition::Shadowed;
                    slot.insert((position, handler));
                }
            }
        }

        let registry = Registry {
            direct: direct.into_iter().map(|(id, (_, h))| (id, h)).collect(),
            chain,
            infos,
        };
        tracing::debug!(
            direct = registry.direct_len(),
            chain = registry.chain_len(),
            "built type registry"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use logfield_api::{Converter, Recognizer, TypeKey};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    fn private() -> Arc<ValidationCache> {
        Arc::new(ValidationCache::new())
    }

    fn constant(name: &str, value: i64) -> Handler {
        Handler::exact::<u32, _>(name, move |_| Value::from(value))
    }

    #[test]
    fn partitions_by_declaration() {
        let registry = Registry::builder()
            .register(Handler::exact::<u8, _>("u8", |v| Value::from(*v)))
            .register(Handler::one_of("ints", vec![TypeKey::of::<i8>()], |_| Ok(Value::Null)))
            .register(Handler::shape("any", "any", |_| true, |_| Ok(Value::Null)))
            .cache(private())
            .build()
            .unwrap();

        assert_eq!(registry.direct_len(), 1);
        assert_eq!(registry.chain_len(), 2);
        let partitions: Vec<Partition> = registry.handlers().iter().map(|h| h.partition).collect();
        assert_eq!(partitions, vec![Partition::Direct, Partition::Chain, Partition::Chain]);
        assert_eq!(registry.handlers()[1].declared, "one of [i8]");
    }

    #[test]
    fn last_registration_wins_by_default() {
        let registry = Registry::builder()
            .register(constant("first", 1))
            .register(constant("second", 2))
            .cache(private())
            .build()
            .unwrap();

        let value = 0u32;
        let subject = Subject::new(&value);
        let handler = registry.resolve(&subject).unwrap();
        assert_eq!(handler.name(), "second");
        assert_eq!(handler.converter().convert(&subject).unwrap(), json!(2));
        assert_eq!(registry.handlers()[0].partition, Partition::Shadowed);
        assert_eq!(registry.direct_len(), 1);
    }

    #[test]
    fn reject_policy_names_both_handlers() {
        let err = Registry::builder()
            .register(constant("first", 1))
            .register(constant("second", 2))
            .duplicates(DuplicatePolicy::Reject)
            .cache(private())
            .build()
            .unwrap_err();

        match err {
            DispatchError::DuplicateType { type_name, first, second } => {
                assert_eq!(type_name, "u32");
                assert_eq!(first, "first");
                assert_eq!(second, "second");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_failure_aborts_construction() {
        let loose = Handler::from_parts(
            "loose",
            Recognizer::undeclared("loose::recognize", |_| true),
            Converter::undeclared("loose::convert", |_| Ok(Value::Null)),
        );
        let err = Registry::builder()
            .register(constant("fine", 0))
            .register(loose)
            .cache(private())
            .build()
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingDeclaredType { .. }));
    }

    #[test]
    fn direct_lookup_precedes_chain() {
        let registry = Registry::builder()
            .register(Handler::shape("any", "any", |_| true, |_| Ok(json!("chain"))))
            .register(Handler::exact::<u8, _>("u8", |_| json!("direct")))
            .cache(private())
            .build()
            .unwrap();

        assert_eq!(registry.resolve(&Subject::new(&1u8)).unwrap().name(), "u8");
        assert_eq!(registry.resolve(&Subject::new(&1i8)).unwrap().name(), "any");
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
