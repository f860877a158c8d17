//! Accessors for declarations inside a script.

use crate::error::ScriptError;
use crate::model::{parse_value, unwrap_parens, ScriptSyntax};
use swc_common::{sync::Lrc, SourceMap, DUMMY_SP};
use swc_ecma_ast::{
    Decl, Expr, Function, IdentName, KeyValueProp, ModuleDecl, ModuleItem, ObjectLit, Pat, Prop,
    PropName, PropOrSpread, ReturnStmt, Stmt, VarDeclarator,
};

/// Returns the key of a property, or `None` for spreads and computed keys.
pub fn prop_key(prop: &PropOrSpread) -> Option<String> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match &**prop {
        Prop::Shorthand(ident) => Some(ident.sym.to_string()),
        Prop::KeyValue(kv) => prop_name_text(&kv.key),
        Prop::Method(method) => prop_name_text(&method.key),
        Prop::Getter(getter) => prop_name_text(&getter.key),
        Prop::Setter(setter) => prop_name_text(&setter.key),
        Prop::Assign(_) => None,
    }
}

/// Returns the text of a literal property name.
pub fn prop_name_text(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

/// Replaces the key of a property, keeping shorthand values intact.
pub(crate) fn rename_prop_key(prop: &mut PropOrSpread, new: &str) {
    let PropOrSpread::Prop(prop) = prop else {
        return;
    };
    let key = |span| {
        if is_identifier_name(new) {
            PropName::Ident(IdentName::new(new.into(), span))
        } else {
            PropName::Str(swc_ecma_ast::Str {
                span,
                value: new.into(),
                raw: None,
            })
        }
    };
    match &mut **prop {
        Prop::Shorthand(ident) => {
            let value = Box::new(Expr::Ident(ident.clone()));
            **prop = Prop::KeyValue(KeyValueProp {
                key: key(ident.span),
                value,
            });
        }
        Prop::KeyValue(kv) => kv.key = key(DUMMY_SP),
        Prop::Method(method) => method.key = key(DUMMY_SP),
        Prop::Getter(getter) => getter.key = key(DUMMY_SP),
        Prop::Setter(setter) => setter.key = key(DUMMY_SP),
        Prop::Assign(_) => {}
    }
}

pub(crate) fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c == '$' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Returns the value of `key: value` in an object literal.
pub fn property_value<'a>(object: &'a ObjectLit, key: &str) -> Option<&'a Expr> {
    object.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(p) => match &**p {
            Prop::KeyValue(kv) if prop_name_text(&kv.key).as_deref() == Some(key) => {
                Some(&*kv.value)
            }
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

/// An editing handle on an object literal, such as the component options.
pub struct ObjectHandle<'a> {
    object: &'a mut ObjectLit,
    cm: Lrc<SourceMap>,
    syntax: ScriptSyntax,
    after: Vec<String>,
}

impl<'a> ObjectHandle<'a> {
    pub(crate) fn new(object: &'a mut ObjectLit, cm: Lrc<SourceMap>, syntax: ScriptSyntax) -> Self {
        Self {
            object,
            cm,
            syntax,
            after: Vec::new(),
        }
    }

    /// Returns the underlying object literal.
    pub fn object(&self) -> &ObjectLit {
        self.object
    }

    /// Returns the literal keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.object.props.iter().filter_map(prop_key).collect()
    }

    /// Returns true if any property has this key.
    pub fn has(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Returns the value of `key: value`.
    pub fn get(&self, key: &str) -> Option<&Expr> {
        property_value(self.object, key)
    }

    /// Returns the value of `key: value` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Expr> {
        self.object.props.iter_mut().find_map(|prop| match prop {
            PropOrSpread::Prop(p) => match &mut **p {
                Prop::KeyValue(kv) if prop_name_text(&kv.key).as_deref() == Some(key) => {
                    Some(&mut *kv.value)
                }
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        })
    }

    /// Returns a handle on a nested object literal value.
    pub fn nested(&mut self, key: &str) -> Option<ObjectHandle<'_>> {
        let cm = self.cm.clone();
        let syntax = self.syntax;
        match self.get_mut(key)? {
            Expr::Object(object) => Some(ObjectHandle::new(object, cm, syntax)),
            _ => None,
        }
    }

    /// Returns the function of a method property such as `data() {}`.
    pub fn get_method(&self, key: &str) -> Option<&Function> {
        self.object.props.iter().find_map(|prop| match prop {
            PropOrSpread::Prop(p) => match &**p {
                Prop::Method(method) if prop_name_text(&method.key).as_deref() == Some(key) => {
                    Some(&*method.function)
                }
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        })
    }

    /// Places the next inserted property after the last of `keys`.
    pub fn after(&mut self, keys: &[&str]) -> &mut Self {
        self.after = keys.iter().map(|key| key.to_string()).collect();
        self
    }

    /// Adds `key: value` unless the key exists. `value` is source text.
    pub fn ensure(&mut self, key: &str, value: &str) -> Result<&mut Self, ScriptError> {
        if self.has(key) {
            self.after.clear();
            return Ok(self);
        }
        let value = parse_value(&self.cm, self.syntax, value)?;
        Ok(self.set_expr(key, value))
    }

    /// Sets `key: value`, replacing an existing property. `value` is source
    /// text.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&mut Self, ScriptError> {
        let value = parse_value(&self.cm, self.syntax, value)?;
        Ok(self.set_expr(key, value))
    }

    /// Sets `key: value` from an expression tree.
    pub fn set_expr(&mut self, key: &str, value: Box<Expr>) -> &mut Self {
        let mut prop = PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
            key: PropName::Ident(IdentName::new("_".into(), DUMMY_SP)),
            value,
        })));
        rename_prop_key(&mut prop, key);
        self.put(key, prop);
        self
    }

    /// Sets a method from source text such as `mounted() { ... }`. The
    /// method is stored under `key` whatever name the text uses.
    pub fn set_method(&mut self, key: &str, source: &str) -> Result<&mut Self, ScriptError> {
        let value = parse_value(&self.cm, self.syntax, &format!("({{ {source} }})"))?;
        let method = match *value {
            Expr::Paren(paren) => match *paren.expr {
                Expr::Object(object) => object.props.into_iter().next(),
                _ => None,
            },
            _ => None,
        };
        let Some(mut prop) = method.filter(|prop| {
            matches!(prop, PropOrSpread::Prop(p) if matches!(&**p, Prop::Method(_)))
        }) else {
            return Err(ScriptError::InvalidValue {
                source_text: source.to_string(),
                message: "expected a method".to_string(),
            });
        };
        rename_prop_key(&mut prop, key);
        self.put(key, prop);
        Ok(self)
    }

    /// Removes the property with this key. Returns false if there was none.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index_of(key) {
            Some(index) => {
                self.object.props.remove(index);
                true
            }
            None => false,
        }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.object
            .props
            .iter()
            .position(|prop| prop_key(prop).as_deref() == Some(key))
    }

    fn put(&mut self, key: &str, prop: PropOrSpread) {
        match self.index_of(key) {
            Some(index) => self.object.props[index] = prop,
            None => {
                let index = self
                    .object
                    .props
                    .iter()
                    .rposition(|p| prop_key(p).is_some_and(|k| self.after.contains(&k)))
                    .map_or(self.object.props.len(), |i| i + 1);
                self.object.props.insert(index, prop);
            }
        }
        self.after.clear();
    }
}

fn import_source(item: &ModuleItem) -> Option<&str> {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => import.src.value.as_str(),
        _ => None,
    }
}

fn reexport_source(item: &ModuleItem) -> Option<&str> {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportAll(export)) => export.src.value.as_str(),
        ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(export)) => {
            export.src.as_ref()?.value.as_str()
        }
        _ => None,
    }
}

fn is_reexport(item: &ModuleItem) -> bool {
    matches!(
        item,
        ModuleItem::ModuleDecl(ModuleDecl::ExportAll(_) | ModuleDecl::ExportNamed(_))
    )
}

/// Import statements of a module.
pub struct ImportsHandle<'a> {
    body: &'a mut Vec<ModuleItem>,
}

impl<'a> ImportsHandle<'a> {
    pub(crate) fn new(body: &'a mut Vec<ModuleItem>) -> Self {
        Self { body }
    }

    /// Index of the last import statement.
    pub fn last_index(&self) -> Option<usize> {
        self.body
            .iter()
            .rposition(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
    }

    /// Index of the import from `source`.
    pub fn find_from(&self, source: &str) -> Option<usize> {
        self.body
            .iter()
            .position(|item| import_source(item) == Some(source))
    }

    /// Returns true if something is imported from `source`.
    pub fn has_from(&self, source: &str) -> bool {
        self.find_from(source).is_some()
    }

    /// Removes the import from `source`. Returns false if there was none.
    pub fn delete_from(&mut self, source: &str) -> bool {
        match self.find_from(source) {
            Some(index) => {
                self.body.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Re-export statements (`export ... from`) of a module.
pub struct ExportsHandle<'a> {
    body: &'a mut Vec<ModuleItem>,
}

impl<'a> ExportsHandle<'a> {
    pub(crate) fn new(body: &'a mut Vec<ModuleItem>) -> Self {
        Self { body }
    }

    /// Index of the last named or star export.
    pub fn last_index(&self) -> Option<usize> {
        self.body.iter().rposition(is_reexport)
    }

    /// Index of the re-export from `source`.
    pub fn find_from(&self, source: &str) -> Option<usize> {
        self.body
            .iter()
            .position(|item| reexport_source(item) == Some(source))
    }
}

/// Every statement of a module that names a source module.
pub struct FromsHandle<'a> {
    body: &'a mut Vec<ModuleItem>,
}

impl<'a> FromsHandle<'a> {
    pub(crate) fn new(body: &'a mut Vec<ModuleItem>) -> Self {
        Self { body }
    }

    fn position(&self, source: &str) -> Option<usize> {
        self.body.iter().position(|item| {
            import_source(item) == Some(source) || reexport_source(item) == Some(source)
        })
    }

    /// Returns true if some import or re-export names `source`.
    pub fn has(&self, source: &str) -> bool {
        self.position(source).is_some()
    }

    /// Removes the first statement naming `source`.
    pub fn delete(&mut self, source: &str) -> bool {
        match self.position(source) {
            Some(index) => {
                self.body.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Variable declarations and the return statement of a statement list.
pub struct StatementList<'a> {
    declarators: Vec<&'a VarDeclarator>,
    stmts: &'a [Stmt],
}

impl<'a> StatementList<'a> {
    /// Collects top-level declarations of a module, exported or not.
    pub fn from_module(body: &'a [ModuleItem]) -> Self {
        let declarators = body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => Some(&var.decls),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                    Decl::Var(var) => Some(&var.decls),
                    _ => None,
                },
                _ => None,
            })
            .flatten()
            .collect();
        Self {
            declarators,
            stmts: &[],
        }
    }

    /// Collects the declarations of a function body.
    pub fn from_stmts(stmts: &'a [Stmt]) -> Self {
        let declarators = stmts
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Decl(Decl::Var(var)) => Some(&var.decls),
                _ => None,
            })
            .flatten()
            .collect();
        Self { declarators, stmts }
    }

    /// Every declarator, in order.
    pub fn declarators(&self) -> &[&'a VarDeclarator] {
        &self.declarators
    }

    /// Names of declarators that bind a plain identifier.
    pub fn names(&self) -> Vec<String> {
        self.declarators
            .iter()
            .filter_map(|d| match &d.name {
                Pat::Ident(binding) => Some(binding.id.sym.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Returns the initializer of the variable `name`.
    pub fn get(&self, name: &str) -> Option<&'a Expr> {
        self.declarators.iter().find_map(|d| match &d.name {
            Pat::Ident(binding) if &*binding.id.sym == name => d.init.as_deref(),
            _ => None,
        })
    }

    /// Returns true if `name` is declared.
    pub fn has(&self, name: &str) -> bool {
        self.declarators
            .iter()
            .any(|d| matches!(&d.name, Pat::Ident(binding) if &*binding.id.sym == name))
    }

    /// Returns the first top-level `return` of a function body.
    pub fn return_statement(&self) -> Option<&'a ReturnStmt> {
        self.stmts.iter().find_map(|stmt| match stmt {
            Stmt::Return(ret) => Some(ret),
            _ => None,
        })
    }

    /// Returns the object literal a function body returns, if any.
    pub fn returned_object(&self) -> Option<&'a ObjectLit> {
        unwrap_parens(self.return_statement()?.arg.as_deref()?).as_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptModel;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"import UButton from './u-button.vue';
export * from './types';
const size = 'normal';
export default {
    name: 'u-form',
    components: { UButton },
    data() {
        const base = 1;
        return { value: base };
    },
};
"#;

    #[test]
    fn test_object_handle_accessors() {
        let mut model = ScriptModel::parse(SOURCE).unwrap();
        let mut object = model.component_object_mut().unwrap();
        assert_eq!(object.keys(), vec!["name", "components", "data"]);
        assert!(object.has("data"));
        assert!(object.get("data").is_none());
        assert!(object.get_method("data").is_some());
        assert!(object.nested("components").unwrap().has("UButton"));

        object.ensure("name", "'other'").unwrap();
        object.after(&["name"]).set("props", "{ size: String }").unwrap();
        object.set_method("mounted", "created() { this.init(); }").unwrap();
        assert_eq!(object.keys(), vec!["name", "props", "components", "data", "mounted"]);
        assert!(object.delete("components"));
        assert!(!object.delete("components"));

        let code = model.generate();
        assert!(code.contains("name: 'u-form'"), "{code}");
        let mut printed = ScriptModel::parse(&code).unwrap();
        let printed = printed.component_object_mut().unwrap();
        assert!(printed.get_method("mounted").is_some(), "{code}");
        assert!(!printed.has("components"), "{code}");
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let mut model = ScriptModel::parse(SOURCE).unwrap();
        let mut object = model.component_object_mut().unwrap();
        assert!(object.set("props", "{ a: }").is_err());
        assert!(object.set_method("mounted", "value: 1").is_err());
    }

    #[test]
    fn test_imports_and_froms() {
        let mut model = ScriptModel::parse(SOURCE).unwrap();
        assert_eq!(model.imports().last_index(), Some(0));
        assert!(model.imports().has_from("./u-button.vue"));
        assert_eq!(model.exports().last_index(), Some(1));
        assert!(model.froms().has("./types"));
        assert!(model.froms().delete("./types"));
        assert!(!model.froms().has("./types"));
        assert!(model.imports().delete_from("./u-button.vue"));
        assert_eq!(model.imports().last_index(), None);
    }

    #[test]
    fn test_variables_and_return() {
        let model = ScriptModel::parse(SOURCE).unwrap();
        let variables = model.variables();
        assert_eq!(variables.names(), vec!["size"]);
        assert!(variables.has("size"));
        assert!(variables.get("size").is_some());

        let object = model.component_object().unwrap();
        let data = object
            .props
            .iter()
            .find_map(|prop| match prop {
                PropOrSpread::Prop(p) => match &**p {
                    Prop::Method(method) => Some(&method.function),
                    _ => None,
                },
                PropOrSpread::Spread(_) => None,
            })
            .unwrap();
        let body = StatementList::from_stmts(&data.body.as_ref().unwrap().stmts);
        assert_eq!(body.names(), vec!["base"]);
        assert_eq!(body.returned_object().unwrap().props.len(), 1);
    }
}
