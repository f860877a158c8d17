//! Renaming inside template expressions.
//!
//! Attribute values and interpolations are parsed as JavaScript, renamed,
//! and printed back on a single line. Values that print unchanged are left
//! exactly as written.

use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Spanned, DUMMY_SP};
use swc_ecma_ast::{
    ArrowExpr, ComputedPropName, EsVersion, Expr, Function, Ident, IdentName, KeyValueProp, Lit,
    MemberExpr, MemberProp, Prop, PropName, Str,
};
use swc_ecma_parser::{parse_file_as_expr, parse_file_as_script, Syntax};
use swc_ecma_visit::{VisitMut, VisitMutWith};
use vue_common::RenameMap;

/// The rename tables applied to template expressions.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionRenames<'a> {
    /// Bare identifiers and `this.x` members.
    pub identifiers: &'a RenameMap,
    /// `$refs.x` and `$refs['x']` keys.
    pub refs: &'a RenameMap,
    /// `$style.x` and `$style['x']` keys.
    pub classes: &'a RenameMap,
}

impl ExpressionRenames<'_> {
    fn is_empty(&self) -> bool {
        self.identifiers.is_empty() && self.refs.is_empty() && self.classes.is_empty()
    }
}

/// The result of fixing one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixed {
    /// Nothing was renamed.
    Unchanged,
    /// The rewritten expression.
    Changed(String),
    /// The expression could not be parsed.
    Unparsable(String),
}

/// Renames inside a binding or directive expression.
pub fn fix_expression(source: &str, renames: ExpressionRenames<'_>) -> Fixed {
    fix(source, renames, false)
}

/// Renames inside a `:class` expression. On top of [`fix_expression`],
/// class names in string literals and object keys are renamed by
/// whitespace-separated token.
pub fn fix_class_binding(source: &str, renames: ExpressionRenames<'_>) -> Fixed {
    fix(source, renames, true)
}

/// Renames whitespace-separated tokens of `text` through `map`. Returns
/// `None` when no token was renamed.
pub fn rename_tokens(text: &str, map: &RenameMap) -> Option<String> {
    if !text.split_whitespace().any(|token| map.contains(token)) {
        return None;
    }
    Some(
        text.split_whitespace()
            .map(|token| map.resolve(token))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn fix(source: &str, renames: ExpressionRenames<'_>, class_tokens: bool) -> Fixed {
    if renames.is_empty() || source.trim().is_empty() {
        return Fixed::Unchanged;
    }
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());
    let mut errors = Vec::new();
    let mut expr = match parse_file_as_expr(
        &fm,
        Syntax::Es(Default::default()),
        EsVersion::Es2022,
        None,
        &mut errors,
    ) {
        Ok(expr) => expr,
        Err(error) => return Fixed::Unparsable(error.kind().msg().to_string()),
    };
    if let Some(error) = errors.first() {
        return Fixed::Unparsable(error.kind().msg().to_string());
    }
    // The parser stops after the first complete expression.
    let end = fm.start_pos + BytePos(source.trim_end().len() as u32);
    if expr.span().hi < end {
        return Fixed::Unparsable("unexpected input after expression".to_string());
    }
    let mut renamer = ExpressionRenamer::new(renames);
    renamer.class_tokens = class_tokens;
    expr.visit_mut_with(&mut renamer);
    if !renamer.changed {
        return Fixed::Unchanged;
    }
    Fixed::Changed(single_line(&swc_ecma_codegen::to_code_default(cm, None, &*expr)))
}

/// Renames inside an event handler, which may be a statement list.
pub fn fix_handler(source: &str, renames: ExpressionRenames<'_>) -> Fixed {
    match fix_expression(source, renames) {
        Fixed::Unparsable(message) => {
            fix_statements(source, renames).unwrap_or(Fixed::Unparsable(message))
        }
        fixed => fixed,
    }
}

fn fix_statements(source: &str, renames: ExpressionRenames<'_>) -> Option<Fixed> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());
    let mut errors = Vec::new();
    let mut script = parse_file_as_script(
        &fm,
        Syntax::Es(Default::default()),
        EsVersion::Es2022,
        None,
        &mut errors,
    )
    .ok()?;
    if !errors.is_empty() {
        return None;
    }
    let mut renamer = ExpressionRenamer::new(renames);
    script.visit_mut_with(&mut renamer);
    if !renamer.changed {
        return Some(Fixed::Unchanged);
    }
    Some(Fixed::Changed(single_line(
        &swc_ecma_codegen::to_code_default(cm, None, &script),
    )))
}

/// Joins generated lines with single spaces, unless a template literal could
/// carry meaningful newlines.
fn single_line(code: &str) -> String {
    if code.contains('`') {
        return code.trim().to_string();
    }
    code.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c == '$' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

struct ExpressionRenamer<'a> {
    renames: ExpressionRenames<'a>,
    /// Rename class tokens in string literals and object keys.
    class_tokens: bool,
    changed: bool,
}

impl<'a> ExpressionRenamer<'a> {
    fn new(renames: ExpressionRenames<'a>) -> Self {
        Self {
            renames,
            class_tokens: false,
            changed: false,
        }
    }

    /// Renames the key of `$refs.x` or `$style['x']`.
    fn rename_key(&mut self, prop: &mut MemberProp, map: &RenameMap) {
        match prop {
            MemberProp::Ident(name) => {
                if let Some(new) = map.get(&name.sym) {
                    name.sym = new.into();
                    self.changed = true;
                }
            }
            MemberProp::Computed(ComputedPropName { expr, .. }) => match &mut **expr {
                Expr::Lit(Lit::Str(s)) => {
                    let renamed = s.value.as_str().and_then(|key| map.get(key)).map(str::to_string);
                    if let Some(new) = renamed {
                        s.value = new.as_str().into();
                        s.raw = None;
                        self.changed = true;
                    }
                }
                other => other.visit_mut_with(self),
            },
            MemberProp::PrivateName(_) => {}
        }
    }
}

impl VisitMut for ExpressionRenamer<'_> {
    fn visit_mut_member_expr(&mut self, member: &mut MemberExpr) {
        match &*member.obj {
            Expr::Ident(obj) if &*obj.sym == "$refs" => {
                let refs = self.renames.refs;
                self.rename_key(&mut member.prop, refs);
                return;
            }
            Expr::Ident(obj) if &*obj.sym == "$style" => {
                let classes = self.renames.classes;
                self.rename_key(&mut member.prop, classes);
                return;
            }
            Expr::This(_) => {
                let identifiers = self.renames.identifiers;
                self.rename_key(&mut member.prop, identifiers);
                return;
            }
            _ => {}
        }
        member.obj.visit_mut_with(self);
        if let MemberProp::Computed(computed) = &mut member.prop {
            if !matches!(&*computed.expr, Expr::Lit(Lit::Str(_))) {
                computed.expr.visit_mut_with(self);
            }
        }
    }

    fn visit_mut_str(&mut self, s: &mut Str) {
        if !self.class_tokens {
            return;
        }
        let renamed = s
            .value
            .as_str()
            .and_then(|text| rename_tokens(text, self.renames.classes));
        if let Some(new) = renamed {
            s.value = new.as_str().into();
            s.raw = None;
            self.changed = true;
        }
    }

    fn visit_mut_prop_name(&mut self, name: &mut PropName) {
        if !self.class_tokens {
            if let PropName::Computed(computed) = name {
                computed.expr.visit_mut_with(self);
            }
            return;
        }
        match name {
            PropName::Ident(ident) => {
                if let Some(new) = self.renames.classes.get(&ident.sym) {
                    if is_identifier_name(new) {
                        ident.sym = new.into();
                    } else {
                        *name = PropName::Str(Str {
                            span: ident.span,
                            value: new.into(),
                            raw: None,
                        });
                    }
                    self.changed = true;
                }
            }
            PropName::Str(s) => self.visit_mut_str(s),
            PropName::Computed(computed) => computed.expr.visit_mut_with(self),
            _ => {}
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(ident) = prop {
            if let Some(new) = self.renames.identifiers.get(&ident.sym) {
                *prop = Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(ident.sym.clone(), ident.span)),
                    value: Box::new(Expr::Ident(Ident::new_no_ctxt(new.into(), DUMMY_SP))),
                });
                self.changed = true;
            }
            return;
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_ident(&mut self, ident: &mut Ident) {
        if let Some(new) = self.renames.identifiers.get(&ident.sym) {
            ident.sym = new.into();
            self.changed = true;
        }
    }

    // Parameters and locals of inline functions are not instance members.
    fn visit_mut_function(&mut self, _: &mut Function) {}

    fn visit_mut_arrow_expr(&mut self, _: &mut ArrowExpr) {}
}
