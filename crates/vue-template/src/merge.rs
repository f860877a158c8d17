//! Grafting a fragment template into a host template.

use crate::ast::{split_repeat, AttributeKind, Element, TemplateNode, TextToken};
use crate::error::TemplateError;
use crate::expression::{
    fix_class_binding, fix_expression, fix_handler, rename_tokens, ExpressionRenames, Fixed,
};
use crate::traverse::{find_by_path_mut, walk_element_mut, NodeMut, NodePath};
use vue_common::{
    MergeWarning, NameScope, RenameBundle, RenameCategory, RenameMap, TEMPLATE_CATEGORIES,
};

/// What a template merge reports back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateMerge {
    /// Renamed `ref` names of the fragment.
    pub refs: RenameMap,
    /// Expressions that could not be rewritten.
    pub warnings: Vec<MergeWarning>,
}

/// Collects the static `ref` names under `el`, including `v-if` branches.
pub(crate) fn collect_refs(el: &Element, refs: &mut Vec<String>) {
    if let Some(name) = el.ref_name() {
        refs.push(name.to_string());
    }
    for child in el.addressable() {
        if let TemplateNode::Element(child) = child {
            collect_refs(child, refs);
        }
    }
    for branch in &el.branches {
        collect_refs(branch, refs);
    }
}

/// Renames the fragment's refs against `host_refs` and rewrites every
/// expression in the fragment through the bundle's instance renames.
pub(crate) fn prepare_fragment(
    fragment: &mut Element,
    host_refs: &[String],
    renames: &RenameBundle,
) -> TemplateMerge {
    let mut out = TemplateMerge::default();

    let mut fragment_refs = Vec::new();
    collect_refs(fragment, &mut fragment_refs);
    let mut scope: NameScope = host_refs.iter().chain(&fragment_refs).cloned().collect();
    for old in &fragment_refs {
        if host_refs.contains(old) && !out.refs.contains(old) {
            let new = scope.allocate(old);
            tracing::debug!(old = %old, new = %new, "renaming template ref");
            out.refs.insert(old.clone(), new);
        }
    }

    let identifiers = renames.combined(TEMPLATE_CATEGORIES);
    let classes = renames
        .get(RenameCategory::Class)
        .cloned()
        .unwrap_or_default();
    let tables = ExpressionRenames {
        identifiers: &identifiers,
        refs: &out.refs,
        classes: &classes,
    };

    let mut warnings = Vec::new();
    walk_element_mut(fragment, &mut |node| match node {
        NodeMut::Element(el) => fix_element(el, tables, &mut warnings),
        NodeMut::Expression(text) => {
            let mut changed = false;
            for token in &mut text.tokens {
                if let TextToken::Binding(expr) = token {
                    if let Some(new) = apply(expr, fix_expression(expr, tables), &mut warnings) {
                        *expr = new;
                        changed = true;
                    }
                }
            }
            if changed {
                text.rebuild_text();
            }
        }
        NodeMut::Text(_) => {}
    });
    out.warnings = warnings;

    fragment.clear_spans();
    out
}

fn fix_element(el: &mut Element, tables: ExpressionRenames<'_>, warnings: &mut Vec<MergeWarning>) {
    for attr in &mut el.attributes {
        let Some(value) = attr.value.as_deref() else {
            continue;
        };
        let new = match attr.kind() {
            AttributeKind::Static if attr.name == "ref" => {
                tables.refs.get(value).map(str::to_string)
            }
            AttributeKind::Static if attr.name == "class" => rename_tokens(value, tables.classes),
            AttributeKind::Static | AttributeKind::Slot(_) | AttributeKind::SlotScope => None,
            AttributeKind::For => split_repeat(value).and_then(|repeat| {
                apply(repeat.source, fix_expression(repeat.source, tables), warnings)
                    .map(|source| format!("{} {} {}", repeat.alias, repeat.keyword, source))
            }),
            AttributeKind::On(_) => apply(value, fix_handler(value, tables), warnings),
            AttributeKind::Bind("class") => {
                apply(value, fix_class_binding(value, tables), warnings)
            }
            AttributeKind::Bind(_) | AttributeKind::Directive(_) => {
                apply(value, fix_expression(value, tables), warnings)
            }
        };
        if let Some(new) = new {
            attr.value = Some(new);
        }
    }
}

fn apply(source: &str, fixed: Fixed, warnings: &mut Vec<MergeWarning>) -> Option<String> {
    match fixed {
        Fixed::Unchanged => None,
        Fixed::Changed(new) => Some(new),
        Fixed::Unparsable(message) => {
            tracing::warn!(expression = source, %message, "leaving template expression unchanged");
            warnings.push(MergeWarning::UnparsableExpression {
                expression: source.to_string(),
                message,
            });
            None
        }
    }
}

/// Inserts `node` into the element at `parent`, at `index` or at the end.
pub(crate) fn insert(
    root: &mut TemplateNode,
    parent: &NodePath,
    index: Option<usize>,
    node: Element,
) -> Result<(), TemplateError> {
    let target = find_by_path_mut(root, parent).ok_or_else(|| TemplateError::PathOutOfRange {
        path: parent.to_string(),
    })?;
    let TemplateNode::Element(target) = target else {
        return Err(TemplateError::TargetNotElement {
            path: parent.to_string(),
        });
    };
    if let Some(slot) = node.slot_target() {
        if !target.slots.contains_key(&slot) {
            tracing::debug!(parent = %parent, %slot, "inserting scoped slot");
            target.slots.insert(slot, TemplateNode::Element(node));
            return Ok(());
        }
    }
    let index = index
        .unwrap_or(target.children.len())
        .min(target.children.len());
    tracing::debug!(parent = %parent, index, tag = %node.tag, "inserting fragment");
    target.children.insert(index, TemplateNode::Element(node));
    Ok(())
}
