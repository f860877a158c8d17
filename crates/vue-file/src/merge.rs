//! Merging one component into another.

use crate::error::FileError;
use crate::file::ComponentFile;
use crate::store::SectionStore;
use crate::target::MergeTarget;
use vue_common::{MergeWarning, RenameBundle, RenameCategory};
use vue_template::{InsertTarget, TemplateError, TemplateModel, TemplateNode};

/// What a component merge reports back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Every rename, by category.
    pub renames: RenameBundle,
    /// Non-fatal outcomes, in the order they happened.
    pub warnings: Vec<MergeWarning>,
}

/// Merges `fragment` into `host`.
///
/// Both files are parsed as needed. The script goes first, then the style,
/// then the definition; the template merge last rewrites the fragment's
/// markup through every rename collected before it. The target is checked
/// before anything changes.
pub fn merge<H: SectionStore, F: SectionStore>(
    host: &mut ComponentFile<H>,
    mut fragment: ComponentFile<F>,
    target: &MergeTarget,
) -> Result<MergeOutcome, FileError> {
    let (template, script, style, definition) = fragment.take_models()?;
    host.parse_all()?;
    check_target(host.parse_template()?, target.insert_target())?;

    let mut outcome = MergeOutcome::default();

    let merged = host.parse_script()?.merge(script);
    outcome.renames.absorb(merged.renames);
    outcome.warnings.extend(merged.warnings);

    let classes = host.parse_style()?.merge(style, None);
    if !classes.is_empty() {
        outcome.renames.set(RenameCategory::Class, classes);
    }

    outcome
        .renames
        .absorb(host.parse_definition()?.merge(definition));

    let merged = host
        .parse_template()?
        .merge(template, target.insert_target(), &outcome.renames)?;
    if !merged.refs.is_empty() {
        outcome.renames.set(RenameCategory::Ref, merged.refs);
    }
    outcome.warnings.extend(merged.warnings);

    tracing::debug!(
        host = %host.path(),
        target = %target,
        categories = outcome.renames.iter().count(),
        warnings = outcome.warnings.len(),
        "merged component"
    );
    Ok(outcome)
}

impl<S: SectionStore> ComponentFile<S> {
    /// Merges `fragment` into this component. See [`merge`].
    pub fn merge<F: SectionStore>(
        &mut self,
        fragment: ComponentFile<F>,
        target: &MergeTarget,
    ) -> Result<MergeOutcome, FileError> {
        merge(self, fragment, target)
    }
}

/// Fails unless the target route names an element of `template`. An empty
/// template takes any target.
fn check_target(template: &TemplateModel, target: &InsertTarget) -> Result<(), TemplateError> {
    let InsertTarget::Path { parent, .. } = target else {
        return Ok(());
    };
    if template.is_empty() {
        return Ok(());
    }
    match template.find_by_path(parent) {
        Some(TemplateNode::Element(_)) => Ok(()),
        Some(_) => Err(TemplateError::TargetNotElement {
            path: parent.to_string(),
        }),
        None => Err(TemplateError::PathOutOfRange {
            path: parent.to_string(),
        }),
    }
}
