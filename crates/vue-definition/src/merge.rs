//! Merging one definition into another.

use crate::model::{DefinitionModel, NamedEntry};
use rustc_hash::FxHashSet;
use vue_common::{NameScope, RenameBundle, RenameCategory, RenameMap};

impl DefinitionModel {
    /// Appends `fragment` to this definition.
    ///
    /// Params and variables share one scope and are renamed under
    /// `definitionData`. Logics are renamed under `logic`. Lifecycles whose
    /// name is already bound are dropped. Name references inside the
    /// fragment's logics follow both maps.
    pub fn merge(&mut self, fragment: DefinitionModel) -> RenameBundle {
        let fragment = fragment.definition;
        let host = &mut self.definition;

        let mut data_scope: NameScope = host.data_names().chain(fragment.data_names()).collect();
        let mut logic_scope: NameScope =
            host.logic_names().chain(fragment.logic_names()).collect();

        let mut data = Allocator::new(host.data_names(), &mut data_scope);
        let params = data.take_all(fragment.params);
        let variables = data.take_all(fragment.variables);
        let data_renames = data.renames;
        host.params.extend(params);
        host.variables.extend(variables);

        for lifecycle in fragment.lifecycles {
            if host.lifecycles.iter().any(|known| known.name == lifecycle.name) {
                tracing::debug!(name = %lifecycle.name, "lifecycle already bound");
                continue;
            }
            host.lifecycles.push(lifecycle);
        }

        let mut logic = Allocator::new(host.logic_names(), &mut logic_scope);
        let mut logics = Vec::with_capacity(fragment.logics.len());
        for mut node in fragment.logics {
            if let Some(object) = node.as_object_mut() {
                if let Some(name) = object.name().map(str::to_string) {
                    let name = logic.claim(name);
                    object.set_name(name);
                }
            }
            logics.push(node);
        }
        let logic_renames = logic.renames;

        let mut references = data_renames.clone();
        references.extend_from(&logic_renames);
        if !references.is_empty() {
            let count: usize = logics
                .iter_mut()
                .map(|node| node.rename_references(&references))
                .sum();
            tracing::debug!(count, "rewrote logic name references");
        }
        host.logics.extend(logics);

        let mut renames = RenameBundle::new();
        if !data_renames.is_empty() {
            renames.set(RenameCategory::DefinitionData, data_renames);
        }
        if !logic_renames.is_empty() {
            renames.set(RenameCategory::Logic, logic_renames);
        }
        renames
    }
}

/// Hands out names for incoming entries. A name is kept unless the host or
/// an earlier incoming entry already holds it.
struct Allocator<'a> {
    held: FxHashSet<String>,
    scope: &'a mut NameScope,
    renames: RenameMap,
}

impl<'a> Allocator<'a> {
    fn new<'n>(host: impl Iterator<Item = &'n str>, scope: &'a mut NameScope) -> Self {
        Self {
            held: host.map(str::to_string).collect(),
            scope,
            renames: RenameMap::new(),
        }
    }

    fn claim(&mut self, name: String) -> String {
        let new = if self.held.contains(&name) {
            let new = self.scope.allocate(&name);
            tracing::debug!(old = %name, new = %new, "renamed definition entry");
            if !self.renames.contains(&name) {
                self.renames.insert(name, new.clone());
            }
            new
        } else {
            name
        };
        self.held.insert(new.clone());
        new
    }

    fn take_all(&mut self, entries: Vec<NamedEntry>) -> Vec<NamedEntry> {
        entries
            .into_iter()
            .map(|mut entry| {
                entry.name = self.claim(std::mem::take(&mut entry.name));
                entry
            })
            .collect()
    }
}
