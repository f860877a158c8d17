//! Merging one component script into another.
//!
//! The fragment is consumed. Its source is registered in the host's source
//! map and every fragment span is shifted into that file, so fragment
//! comments are printed with the host and fragment-born nodes can be told
//! apart from host nodes by span alone.

use crate::declarations::{prop_key, rename_prop_key};
use crate::model::{
    locate_component, object_at_mut, unwrap_parens, unwrap_parens_mut, ComponentLocation,
    ScriptModel,
};
use crate::order::{is_lifecycle_hook, RankCursor, OBJECT_OPTIONS};
use crate::rename::{
    decl_names, declared_names, pattern_names, IdentRenamer, ShiftSpans, ThisMemberRenamer,
};
use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::util::take::Take;
use swc_common::{sync::Lrc, BytePos, FileName, SourceFile, SourceMap, DUMMY_SP};
use swc_ecma_ast::{
    ArrayLit, BlockStmt, BlockStmtOrExpr, DefaultDecl, Decl, ExportDefaultExpr, Expr, ExprOrSpread,
    ExprStmt, ImportSpecifier, Lit, Module, ModuleDecl, ModuleItem, ObjectLit, Prop, PropOrSpread,
    ReturnStmt, Stmt,
};
use swc_ecma_visit::VisitMutWith;
use tracing::{debug, warn};
use vue_common::{
    MergeWarning, NameScope, RenameBundle, RenameCategory, RenameMap, INSTANCE_CATEGORIES,
};

/// What [`ScriptModel::merge`] renamed and could not combine.
#[derive(Debug, Clone, Default)]
pub struct ScriptMerge {
    /// Renames per category: `variables` plus the option categories.
    pub renames: RenameBundle,
    /// Non-fatal outcomes, in the order they happened.
    pub warnings: Vec<MergeWarning>,
}

impl ScriptMerge {
    fn warn(&mut self, warning: MergeWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn record(&mut self, category: Option<RenameCategory>, renames: RenameMap) {
        if let Some(category) = category {
            if !renames.is_empty() {
                debug!(%category, count = renames.len(), "recorded renames");
                self.renames.entry(category).extend_from(&renames);
            }
        }
    }
}

impl ScriptModel {
    /// Merges `fragment` into this script.
    ///
    /// Colliding fragment names are renamed, never host names. The returned
    /// bundle tells the template and definition merges how to follow.
    pub fn merge(&mut self, fragment: ScriptModel) -> ScriptMerge {
        let mut out = ScriptMerge::default();
        let ScriptModel {
            module: mut fragment_module,
            comments: fragment_comments,
            file: fragment_file,
            ..
        } = fragment;
        let (lo, hi) = adopt(
            &self.cm,
            &self.comments,
            &mut fragment_module,
            fragment_comments,
            &fragment_file,
        );

        let fragment_location = locate_component(&fragment_module.body);
        let component_name = fragment_location.and_then(|location| match location {
            ComponentLocation::Declarator { item, decl } => {
                declarator_name(&fragment_module.body, item, decl)
            }
            ComponentLocation::Export(_) => None,
        });

        let variables = self.rename_variables(&mut fragment_module, component_name.as_deref());
        out.record(Some(RenameCategory::Variables), variables);

        let fragment_object = fragment_location
            .and_then(|location| take_component(&mut fragment_module.body, location));

        self.splice_items(fragment_module.body, &mut out);

        if let Some(object) = fragment_object {
            self.merge_component(object, &mut out);
        }

        let instance = out.renames.combined(INSTANCE_CATEGORIES);
        if !instance.is_empty() {
            self.module.visit_mut_with(&mut ThisMemberRenamer {
                renames: &instance,
                lo,
                hi,
            });
        }
        out
    }

    /// Renames fragment top-level bindings that the host already binds.
    fn rename_variables(&self, fragment: &mut Module, skip: Option<&str>) -> RenameMap {
        let mut host_names = Vec::new();
        module_names(&self.module.body, true, &mut host_names);
        let mut fragment_names = Vec::new();
        module_names(&fragment.body, false, &mut fragment_names);
        fragment_names.retain(|name| Some(name.as_str()) != skip);

        let mut scope: NameScope = host_names.iter().chain(&fragment_names).cloned().collect();
        let mut renames = RenameMap::new();
        for name in &fragment_names {
            if host_names.contains(name) && !renames.contains(name) {
                let new = scope.allocate(name);
                debug!(old = %name, new = %new, "renaming top-level binding");
                renames.insert(name.as_str(), new);
            }
        }
        if !renames.is_empty() {
            fragment.visit_mut_with(&mut IdentRenamer::new(&renames));
        }
        renames
    }

    fn splice_items(&mut self, items: Vec<ModuleItem>, out: &mut ScriptMerge) {
        // Fragment code must run before a `const` that holds the host options.
        let anchor = match self.locate_component() {
            Some(ComponentLocation::Declarator { item, .. }) => Some(item),
            _ => self.default_export_index(),
        };
        let mut cursor = Splice {
            after_imports: self.imports().last_index().map_or(0, |last| last + 1),
            anchor,
            has_export: self.default_export_index().is_some(),
        };
        let mut bound = Vec::new();
        module_names(&self.module.body, true, &mut bound);
        for item in items {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    let source = import.src.value.as_str().map(str::to_string);
                    let item = ModuleItem::ModuleDecl(ModuleDecl::Import(import));
                    match source.and_then(|source| self.imports().find_from(&source)) {
                        Some(index) => {
                            if print_item(&self.cm, &self.module.body[index])
                                != print_item(&self.cm, &item)
                            {
                                debug!(index, "replacing import of the same source");
                                self.module.body[index] = item;
                            }
                        }
                        None => {
                            for name in import_locals(&item) {
                                if bound.contains(&name) {
                                    out.warn(MergeWarning::DuplicateImport { name });
                                } else {
                                    bound.push(name);
                                }
                            }
                            cursor.insert_import(&mut self.module.body, item)
                        }
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                    if cursor.has_export {
                        out.warn(MergeWarning::NonObjectDefaultExport);
                        let stmt = expr_stmt(export.expr);
                        cursor.insert_before_export(&mut self.module.body, stmt);
                    } else {
                        let item = ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export));
                        cursor.push_export(&mut self.module.body, item);
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                    if cursor.has_export {
                        out.warn(MergeWarning::NonObjectDefaultExport);
                        let stmt = match export.decl {
                            DefaultDecl::Fn(f) => expr_stmt(Box::new(Expr::Fn(f))),
                            DefaultDecl::Class(c) => expr_stmt(Box::new(Expr::Class(c))),
                            DefaultDecl::TsInterfaceDecl(decl) => {
                                ModuleItem::Stmt(Stmt::Decl(Decl::TsInterface(decl)))
                            }
                        };
                        cursor.insert_before_export(&mut self.module.body, stmt);
                    } else {
                        let item = ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export));
                        cursor.push_export(&mut self.module.body, item);
                    }
                }
                item => cursor.insert_before_export(&mut self.module.body, item),
            }
        }
    }

    fn merge_component(&mut self, object: ObjectLit, out: &mut ScriptMerge) {
        let cm = self.cm.clone();
        if let Some(location) = self.locate_component() {
            if let Some(host) = object_at_mut(&mut self.module.body, location) {
                merge_options(&cm, host, object, out);
                return;
            }
        }
        match self.default_export_index() {
            Some(index) => {
                out.warn(MergeWarning::NonObjectDefaultExport);
                let stmt = expr_stmt(Box::new(Expr::Object(object)));
                self.module.body.insert(index, stmt);
            }
            None => {
                debug!("host has no default export; adopting fragment options");
                self.module
                    .body
                    .push(ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(
                        ExportDefaultExpr {
                            span: DUMMY_SP,
                            expr: Box::new(Expr::Object(object)),
                        },
                    )));
            }
        }
    }
}

/// Insertion points in the host body while fragment items are spliced in.
struct Splice {
    after_imports: usize,
    /// Fragment statements go right before this item: the declaration
    /// holding the host options, or the default export.
    anchor: Option<usize>,
    has_export: bool,
}

impl Splice {
    fn insert(&mut self, body: &mut Vec<ModuleItem>, index: usize, item: ModuleItem) {
        body.insert(index, item);
        if self.after_imports > index {
            self.after_imports += 1;
        }
        if let Some(anchor) = &mut self.anchor {
            if *anchor >= index {
                *anchor += 1;
            }
        }
    }

    fn insert_import(&mut self, body: &mut Vec<ModuleItem>, item: ModuleItem) {
        let index = self.after_imports.min(body.len());
        self.insert(body, index, item);
        self.after_imports = index + 1;
    }

    fn insert_before_export(&mut self, body: &mut Vec<ModuleItem>, item: ModuleItem) {
        let index = self.anchor.unwrap_or(body.len());
        self.insert(body, index, item);
    }

    fn push_export(&mut self, body: &mut Vec<ModuleItem>, item: ModuleItem) {
        self.anchor = Some(body.len());
        self.has_export = true;
        body.push(item);
    }
}

/// Registers the fragment file in the host source map, shifts the fragment
/// tree and comments into it, and returns the fragment's span range.
fn adopt(
    cm: &Lrc<SourceMap>,
    comments: &SingleThreadedComments,
    module: &mut Module,
    fragment_comments: SingleThreadedComments,
    fragment_file: &SourceFile,
) -> (BytePos, BytePos) {
    let file = cm.new_source_file(
        Lrc::new(FileName::Custom("fragment.js".into())),
        fragment_file.src.to_string(),
    );
    let delta = file.start_pos - fragment_file.start_pos;
    module.visit_mut_with(&mut ShiftSpans { delta });

    let (leading, trailing) = fragment_comments.take_all();
    for (pos, mut list) in std::mem::take(&mut *leading.borrow_mut()) {
        shift_comments(&mut list, delta);
        comments.add_leading_comments(pos + delta, list);
    }
    for (pos, mut list) in std::mem::take(&mut *trailing.borrow_mut()) {
        shift_comments(&mut list, delta);
        comments.add_trailing_comments(pos + delta, list);
    }
    (file.start_pos, file.end_pos)
}

fn shift_comments(list: &mut [swc_common::comments::Comment], delta: BytePos) {
    for comment in list {
        comment.span.lo = comment.span.lo + delta;
        comment.span.hi = comment.span.hi + delta;
    }
}

fn declarator_name(body: &[ModuleItem], item: usize, decl: usize) -> Option<String> {
    let var = match body.get(item)? {
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => export.decl.as_var()?,
        _ => return None,
    };
    let mut names = Vec::new();
    pattern_names(&var.decls.get(decl)?.name, &mut names);
    names.into_iter().next()
}

/// Names bound at the top level of a module. Host names include imports.
fn module_names(body: &[ModuleItem], with_imports: bool, out: &mut Vec<String>) {
    for item in body {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => decl_names(decl, out),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                decl_names(&export.decl, out)
            }
            ModuleItem::ModuleDecl(ModuleDecl::Import(_)) if with_imports => {
                out.extend(import_locals(item));
            }
            _ => {}
        }
    }
}

/// Local names an import statement binds.
fn import_locals(item: &ModuleItem) -> Vec<String> {
    let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
        return Vec::new();
    };
    import
        .specifiers
        .iter()
        .map(|specifier| {
            let local = match specifier {
                ImportSpecifier::Named(named) => &named.local,
                ImportSpecifier::Default(default) => &default.local,
                ImportSpecifier::Namespace(namespace) => &namespace.local,
            };
            local.sym.to_string()
        })
        .collect()
}

/// Moves the component options object out of a module, dropping the
/// statements that only carried it.
fn take_component(body: &mut Vec<ModuleItem>, location: ComponentLocation) -> Option<ObjectLit> {
    let object = std::mem::replace(
        object_at_mut(body, location)?,
        ObjectLit {
            span: DUMMY_SP,
            props: Vec::new(),
        },
    );
    match location {
        ComponentLocation::Export(index) => {
            body.remove(index);
        }
        ComponentLocation::Declarator { item, decl } => {
            let emptied = match &mut body[item] {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => {
                    var.decls.remove(decl);
                    var.decls.is_empty()
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &mut export.decl {
                    Decl::Var(var) => {
                        var.decls.remove(decl);
                        var.decls.is_empty()
                    }
                    _ => false,
                },
                _ => false,
            };
            if emptied {
                body.remove(item);
            }
            body.retain(|item| {
                !matches!(item, ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(_)))
            });
        }
    }
    Some(object)
}

fn expr_stmt(expr: Box<Expr>) -> ModuleItem {
    ModuleItem::Stmt(Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr,
    }))
}

fn print_item(cm: &Lrc<SourceMap>, item: &ModuleItem) -> String {
    let module = Module {
        span: DUMMY_SP,
        body: vec![item.clone()],
        shebang: None,
    };
    swc_ecma_codegen::to_code_default(cm.clone(), None, &module)
}

fn print_expr(cm: &Lrc<SourceMap>, expr: Expr) -> String {
    swc_ecma_codegen::to_code_default(cm.clone(), None, &expr)
}

fn print_prop(cm: &Lrc<SourceMap>, prop: &PropOrSpread) -> String {
    print_expr(
        cm,
        Expr::Object(ObjectLit {
            span: DUMMY_SP,
            props: vec![prop.clone()],
        }),
    )
}

fn print_element(cm: &Lrc<SourceMap>, elem: &ExprOrSpread) -> String {
    print_expr(
        cm,
        Expr::Array(ArrayLit {
            span: DUMMY_SP,
            elems: vec![Some(elem.clone())],
        }),
    )
}

/// Merges fragment options into the host options, property by property.
fn merge_options(
    cm: &Lrc<SourceMap>,
    host: &mut ObjectLit,
    fragment: ObjectLit,
    out: &mut ScriptMerge,
) {
    let mut cursor = RankCursor::new();
    for prop in fragment.props {
        let Some(key) = prop_key(&prop) else {
            host.props.push(prop);
            continue;
        };
        let rank = cursor.rank(&key);
        let existing = host
            .props
            .iter()
            .position(|p| prop_key(p).as_deref() == Some(key.as_str()));
        let Some(index) = existing else {
            let at = order_position(host, rank);
            debug!(key = %key, index = at, "inserting option");
            host.props.insert(at, prop);
            continue;
        };
        let Some(prop) = merge_option(cm, &key, &mut host.props[index], prop, out) else {
            continue;
        };
        if print_prop(cm, &host.props[index]) == print_prop(cm, &prop) {
            continue;
        }
        out.warn(MergeWarning::UnmergeableOption { key });
        host.props.insert(index + 1, prop);
    }
}

/// Index before the first host option ranked above `rank`.
fn order_position(host: &ObjectLit, rank: Option<usize>) -> usize {
    let mut cursor = RankCursor::new();
    host.props
        .iter()
        .position(|prop| prop_key(prop).is_some_and(|key| cursor.rank(&key) > rank))
        .unwrap_or(host.props.len())
}

/// Merges one option present on both sides. Gives the fragment property
/// back when the two values cannot be combined.
fn merge_option(
    cm: &Lrc<SourceMap>,
    key: &str,
    host: &mut PropOrSpread,
    mut fragment: PropOrSpread,
    out: &mut ScriptMerge,
) -> Option<PropOrSpread> {
    let category = RenameCategory::from_option_key(key);
    let bag = OBJECT_OPTIONS.contains(&key);

    if bag || key == "data" {
        if let (Some(Expr::Object(h)), Some(Expr::Object(f))) =
            (value_mut(host), value_mut(&mut fragment))
        {
            let renames = merge_object(h, std::mem::take(&mut f.props));
            out.record(category, renames);
            return None;
        }
    }
    if bag {
        if let (Some(Expr::Array(h)), Some(Expr::Array(f))) =
            (value_mut(host), value_mut(&mut fragment))
        {
            let renames = merge_name_list(h, std::mem::take(&mut f.elems));
            out.record(category, renames);
            return None;
        }
    }
    if key == "mixins" {
        if let (Some(Expr::Array(h)), Some(Expr::Array(f))) =
            (value_mut(host), value_mut(&mut fragment))
        {
            merge_list(cm, h, std::mem::take(&mut f.elems));
            return None;
        }
    }
    if (key == "data" || is_lifecycle_hook(key)) && is_function(host) && is_function(&fragment) {
        if let (Some(h), Some(f)) = (body_mut(host), body_mut(&mut fragment)) {
            let renames = merge_function(key, h, std::mem::take(f), out);
            if key == "data" {
                out.record(category, renames);
            }
            return None;
        }
    }
    Some(fragment)
}

fn value_mut(prop: &mut PropOrSpread) -> Option<&mut Expr> {
    match prop {
        PropOrSpread::Prop(prop) => match &mut **prop {
            Prop::KeyValue(kv) => Some(unwrap_parens_mut(&mut kv.value)),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    }
}

fn is_function(prop: &PropOrSpread) -> bool {
    let PropOrSpread::Prop(prop) = prop else {
        return false;
    };
    match &**prop {
        Prop::Method(method) => method.function.body.is_some(),
        Prop::KeyValue(kv) => match unwrap_parens(&kv.value) {
            Expr::Fn(f) => f.function.body.is_some(),
            Expr::Arrow(_) => true,
            _ => false,
        },
        _ => false,
    }
}

/// Returns the statements of a function-valued property. Arrow functions
/// with an expression body are rewritten to `{ return expr; }` first.
fn body_mut(prop: &mut PropOrSpread) -> Option<&mut Vec<Stmt>> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match &mut **prop {
        Prop::Method(method) => Some(&mut method.function.body.as_mut()?.stmts),
        Prop::KeyValue(kv) => match unwrap_parens_mut(&mut kv.value) {
            Expr::Fn(f) => Some(&mut f.function.body.as_mut()?.stmts),
            Expr::Arrow(arrow) => {
                if let BlockStmtOrExpr::Expr(expr) = &mut *arrow.body {
                    let arg = Box::new(Expr::take(expr));
                    let ret = Stmt::Return(ReturnStmt {
                        span: DUMMY_SP,
                        arg: Some(arg),
                    });
                    *arrow.body = BlockStmtOrExpr::BlockStmt(BlockStmt {
                        stmts: vec![ret],
                        ..BlockStmt::dummy()
                    });
                }
                match &mut *arrow.body {
                    BlockStmtOrExpr::BlockStmt(block) => Some(&mut block.stmts),
                    BlockStmtOrExpr::Expr(_) => None,
                }
            }
            _ => None,
        },
        _ => None,
    }
}

fn returned_object_mut(stmt: &mut Stmt) -> Option<&mut ObjectLit> {
    match stmt {
        Stmt::Return(ret) => unwrap_parens_mut(ret.arg.as_deref_mut()?).as_mut_object(),
        _ => None,
    }
}

/// Splices fragment statements into a host function body and merges the
/// two returned objects. Returns the renames of the returned object.
fn merge_function(
    key: &str,
    host: &mut Vec<Stmt>,
    mut fragment: Vec<Stmt>,
    out: &mut ScriptMerge,
) -> RenameMap {
    let mut host_names = Vec::new();
    declared_names(host, &mut host_names);
    let mut fragment_names = Vec::new();
    declared_names(&fragment, &mut fragment_names);

    let mut scope: NameScope = host_names.iter().chain(&fragment_names).cloned().collect();
    let mut locals = RenameMap::new();
    for name in &fragment_names {
        if host_names.contains(name) && !locals.contains(name) {
            let new = scope.allocate(name);
            debug!(function = key, old = %name, new = %new, "renaming local");
            locals.insert(name.as_str(), new);
        }
    }
    if !locals.is_empty() {
        fragment.visit_mut_with(&mut IdentRenamer::new(&locals));
    }

    let host_return = host.iter().position(|stmt| matches!(stmt, Stmt::Return(_)));
    let mut at = host_return.unwrap_or(host.len());
    let mut returns = RenameMap::new();
    for mut stmt in fragment {
        if host_return.is_some() && matches!(stmt, Stmt::Return(_)) {
            let pair = (returned_object_mut(&mut host[at]), returned_object_mut(&mut stmt));
            let merged = match pair {
                (Some(h), Some(f)) => {
                    returns.extend_from(&merge_object(h, std::mem::take(&mut f.props)));
                    true
                }
                _ => false,
            };
            if merged {
                continue;
            }
            out.warn(MergeWarning::UnmergeableReturns {
                key: key.to_string(),
            });
        }
        host.insert(at, stmt);
        at += 1;
    }
    returns
}

/// Appends fragment properties to a host property bag, renaming the keys
/// the host already has.
fn merge_object(host: &mut ObjectLit, fragment: Vec<PropOrSpread>) -> RenameMap {
    let host_keys: Vec<String> = host.props.iter().filter_map(prop_key).collect();
    let mut scope: NameScope = host_keys
        .iter()
        .cloned()
        .chain(fragment.iter().filter_map(prop_key))
        .collect();
    let mut renames = RenameMap::new();
    for mut prop in fragment {
        if let Some(key) = prop_key(&prop) {
            if host_keys.contains(&key) {
                let new = match renames.get(&key) {
                    Some(new) => new.to_string(),
                    None => scope.allocate(&key),
                };
                debug!(old = %key, new = %new, "renaming property");
                rename_prop_key(&mut prop, &new);
                renames.insert(key, new);
            }
        }
        host.props.push(prop);
    }
    renames
}

/// Merges `props: ['a', 'b']` style lists, renaming colliding strings.
fn merge_name_list(host: &mut ArrayLit, fragment: Vec<Option<ExprOrSpread>>) -> RenameMap {
    let host_names: Vec<String> = host.elems.iter().filter_map(element_name).collect();
    let mut scope: NameScope = host_names
        .iter()
        .cloned()
        .chain(fragment.iter().filter_map(element_name))
        .collect();
    let mut renames = RenameMap::new();
    for mut elem in fragment {
        if let Some(name) = element_name(&elem) {
            if host_names.contains(&name) {
                let new = match renames.get(&name) {
                    Some(new) => new.to_string(),
                    None => scope.allocate(&name),
                };
                if let Some(ExprOrSpread { expr, .. }) = &mut elem {
                    if let Expr::Lit(Lit::Str(s)) = &mut **expr {
                        s.value = new.as_str().into();
                        s.raw = None;
                    }
                }
                renames.insert(name, new);
            }
        }
        host.elems.push(elem);
    }
    renames
}

fn element_name(elem: &Option<ExprOrSpread>) -> Option<String> {
    match elem {
        Some(ExprOrSpread { spread: None, expr }) => match &**expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
            _ => None,
        },
        _ => None,
    }
}

/// Appends fragment elements the host does not already list.
fn merge_list(cm: &Lrc<SourceMap>, host: &mut ArrayLit, fragment: Vec<Option<ExprOrSpread>>) {
    let mut seen: Vec<String> = host
        .elems
        .iter()
        .flatten()
        .map(|elem| print_element(cm, elem))
        .collect();
    for elem in fragment.into_iter().flatten() {
        let text = print_element(cm, &elem);
        if seen.contains(&text) {
            continue;
        }
        seen.push(text);
        host.elems.push(Some(elem));
    }
}
