//! AST visitors used by the merge.

use swc_common::{BytePos, Span};
use swc_ecma_ast::{
    ArrowExpr, AssignPat, BindingIdent, BlockStmtOrExpr, Decl, Expr, Function, Ident, IdentName,
    KeyValuePatProp, KeyValueProp, MemberExpr, MemberProp, ObjectPatProp, Pat, Prop, PropName,
    Stmt,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};
use vue_common::RenameMap;

/// Moves every non-dummy span forward by `delta`.
pub(crate) struct ShiftSpans {
    pub(crate) delta: BytePos,
}

impl VisitMut for ShiftSpans {
    fn visit_mut_span(&mut self, span: &mut Span) {
        if !span.is_dummy() {
            span.lo = span.lo + self.delta;
            span.hi = span.hi + self.delta;
        }
    }
}

/// Collects the names bound by a pattern.
pub(crate) fn pattern_names(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => out.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pattern_names(elem, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pattern_names(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(assign.key.id.sym.to_string()),
                    ObjectPatProp::Rest(rest) => pattern_names(&rest.arg, out),
                }
            }
        }
        Pat::Rest(rest) => pattern_names(&rest.arg, out),
        Pat::Assign(assign) => pattern_names(&assign.left, out),
        _ => {}
    }
}

/// Collects the names bound by a declaration.
pub(crate) fn decl_names(decl: &Decl, out: &mut Vec<String>) {
    match decl {
        Decl::Var(var) => {
            for declarator in &var.decls {
                pattern_names(&declarator.name, out);
            }
        }
        Decl::Fn(f) => out.push(f.ident.sym.to_string()),
        Decl::Class(c) => out.push(c.ident.sym.to_string()),
        _ => {}
    }
}

/// Collects the names declared directly in a statement list.
pub(crate) fn declared_names(stmts: &[Stmt], out: &mut Vec<String>) {
    for stmt in stmts {
        if let Stmt::Decl(decl) = stmt {
            decl_names(decl, out);
        }
    }
}

/// Renames bindings and their references. Functions that declare one of
/// the renamed names keep it inside their body.
pub(crate) struct IdentRenamer<'a> {
    renames: &'a RenameMap,
    shadowed: Vec<Vec<String>>,
}

impl<'a> IdentRenamer<'a> {
    pub(crate) fn new(renames: &'a RenameMap) -> Self {
        Self {
            renames,
            shadowed: Vec::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a str> {
        if self.shadowed.iter().any(|names| names.iter().any(|n| n == name)) {
            return None;
        }
        self.renames.get(name)
    }

    fn enter(&mut self, mut names: Vec<String>) {
        names.retain(|name| self.renames.contains(name));
        self.shadowed.push(names);
    }
}

impl VisitMut for IdentRenamer<'_> {
    fn visit_mut_function(&mut self, function: &mut Function) {
        let mut names = Vec::new();
        for param in &function.params {
            pattern_names(&param.pat, &mut names);
        }
        if let Some(body) = &function.body {
            declared_names(&body.stmts, &mut names);
        }
        self.enter(names);
        function.visit_mut_children_with(self);
        self.shadowed.pop();
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ArrowExpr) {
        let mut names = Vec::new();
        for param in &arrow.params {
            pattern_names(param, &mut names);
        }
        if let BlockStmtOrExpr::BlockStmt(body) = &*arrow.body {
            declared_names(&body.stmts, &mut names);
        }
        self.enter(names);
        arrow.visit_mut_children_with(self);
        self.shadowed.pop();
    }

    fn visit_mut_ident(&mut self, ident: &mut Ident) {
        if let Some(new) = self.lookup(&ident.sym) {
            ident.sym = new.into();
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(ident) = prop {
            if let Some(new) = self.lookup(&ident.sym) {
                *prop = Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(ident.sym.clone(), ident.span)),
                    value: Box::new(Expr::Ident(Ident::new_no_ctxt(new.into(), ident.span))),
                });
            }
            return;
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_object_pat_prop(&mut self, prop: &mut ObjectPatProp) {
        if let ObjectPatProp::Assign(assign) = prop {
            if let Some(new) = self.lookup(&assign.key.id.sym) {
                let key = PropName::Ident(IdentName::new(
                    assign.key.id.sym.clone(),
                    assign.key.id.span,
                ));
                let binding = Pat::Ident(BindingIdent::from(Ident::new_no_ctxt(
                    new.into(),
                    assign.key.id.span,
                )));
                let value = match assign.value.take() {
                    Some(default) => Pat::Assign(AssignPat {
                        span: assign.span,
                        left: Box::new(binding),
                        right: default,
                    }),
                    None => binding,
                };
                *prop = ObjectPatProp::KeyValue(KeyValuePatProp {
                    key,
                    value: Box::new(value),
                });
                return;
            }
        }
        prop.visit_mut_children_with(self);
    }
}

/// Renames `this.<old>` to `this.<new>` inside the span range `[lo, hi]`.
pub(crate) struct ThisMemberRenamer<'a> {
    pub(crate) renames: &'a RenameMap,
    pub(crate) lo: BytePos,
    pub(crate) hi: BytePos,
}

impl VisitMut for ThisMemberRenamer<'_> {
    fn visit_mut_member_expr(&mut self, member: &mut MemberExpr) {
        member.visit_mut_children_with(self);
        let inside =
            !member.span.is_dummy() && member.span.lo >= self.lo && member.span.hi <= self.hi;
        if !inside || !matches!(&*member.obj, Expr::This(_)) {
            return;
        }
        if let MemberProp::Ident(name) = &mut member.prop {
            if let Some(new) = self.renames.get(&name.sym) {
                tracing::debug!(old = %name.sym, new, "rewriting instance reference");
                name.sym = new.into();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::{sync::Lrc, FileName, SourceMap};
    use swc_ecma_ast::{EsVersion, Module, ModuleItem};
    use swc_ecma_parser::{parse_file_as_module, Syntax};

    fn parse(source: &str) -> (Lrc<SourceMap>, Module) {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());
        let module = parse_file_as_module(
            &fm,
            Syntax::Es(Default::default()),
            EsVersion::Es2022,
            None,
            &mut Vec::new(),
        )
        .unwrap();
        (cm, module)
    }

    fn rename(source: &str, pairs: &[(&str, &str)]) -> String {
        let (cm, mut module) = parse(source);
        let renames: RenameMap = pairs.iter().copied().collect();
        module.visit_mut_with(&mut IdentRenamer::new(&renames));
        swc_ecma_codegen::to_code_default(cm, None, &module)
    }

    #[test]
    fn test_references_follow_binding() {
        let code = rename("const a = 1;\nfoo(a);\n", &[("a", "a1")]);
        assert!(code.contains("const a1 = 1"), "{code}");
        assert!(code.contains("foo(a1)"), "{code}");
    }

    #[test]
    fn test_shadowing_functions_are_skipped() {
        let code = rename(
            "const a = 1;\nfunction f(a) { return a; }\nconst g = () => { const a = 2; return a; };\n",
            &[("a", "a1")],
        );
        assert!(code.contains("function f(a)"), "{code}");
        assert!(code.contains("return a;"), "{code}");
        assert!(!code.contains("const a1 = 2"), "{code}");
    }

    #[test]
    fn test_shorthand_property_keeps_key() {
        let code = rename("const a = 1;\nexport default { a };\n", &[("a", "a1")]);
        assert!(code.contains("a: a1"), "{code}");
    }

    #[test]
    fn test_member_properties_are_untouched() {
        let code = rename("const a = 1;\nobj.a = a;\n", &[("a", "a1")]);
        assert!(code.contains("obj.a = a1"), "{code}");
    }

    #[test]
    fn test_pattern_names() {
        let (_, module) = parse("const { a, b: [c, ...d], e = 1 } = x;\n");
        let stmts: Vec<Stmt> = module
            .body
            .into_iter()
            .filter_map(|item| match item {
                ModuleItem::Stmt(stmt) => Some(stmt),
                ModuleItem::ModuleDecl(_) => None,
            })
            .collect();
        let mut names = Vec::new();
        declared_names(&stmts, &mut names);
        assert_eq!(names, vec!["a", "c", "d", "e"]);
    }
}
