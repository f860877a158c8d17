//! The script model of one component.

use crate::declarations::{ExportsHandle, FromsHandle, ImportsHandle, ObjectHandle, StatementList};
use crate::error::ScriptError;
use std::fmt;
use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap, Spanned};
use swc_ecma_ast::{
    Decl, EsVersion, Expr, Module, ModuleDecl, ModuleItem, ObjectLit, Pat, Stmt, VarDeclarator,
};
use swc_ecma_parser::{parse_file_as_expr, parse_file_as_module, EsSyntax, Syntax, TsSyntax};
use vue_common::Span;

/// The language of a script block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScriptSyntax {
    /// Plain JavaScript.
    #[default]
    JavaScript,
    /// TypeScript (`<script lang="ts">`).
    TypeScript,
}

impl ScriptSyntax {
    pub(crate) fn syntax(self) -> Syntax {
        match self {
            ScriptSyntax::JavaScript => Syntax::Es(EsSyntax {
                jsx: false,
                ..Default::default()
            }),
            ScriptSyntax::TypeScript => Syntax::Typescript(TsSyntax {
                tsx: false,
                decorators: true,
                dts: false,
                no_early_errors: true,
                disallow_ambiguous_jsx_like: false,
            }),
        }
    }
}

/// Where the component options object lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComponentLocation {
    /// `export default { ... }` at this body index.
    Export(usize),
    /// `const X = { ... }` exported as `export default X`.
    Declarator { item: usize, decl: usize },
}

/// A parsed component script.
///
/// Comments are kept beside the tree and printed back by [`generate`].
///
/// [`generate`]: ScriptModel::generate
pub struct ScriptModel {
    pub(crate) cm: Lrc<SourceMap>,
    pub(crate) comments: SingleThreadedComments,
    pub(crate) module: Module,
    pub(crate) file: Lrc<SourceFile>,
    pub(crate) syntax: ScriptSyntax,
}

impl fmt::Debug for ScriptModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptModel")
            .field("syntax", &self.syntax)
            .field("items", &self.module.body.len())
            .finish()
    }
}

impl ScriptModel {
    /// Parses a JavaScript module.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        Self::parse_with(source, ScriptSyntax::JavaScript)
    }

    /// Parses a module in the given syntax.
    pub fn parse_with(source: &str, syntax: ScriptSyntax) -> Result<Self, ScriptError> {
        let cm: Lrc<SourceMap> = Default::default();
        let file = cm.new_source_file(
            Lrc::new(FileName::Custom("component.js".into())),
            source.to_string(),
        );
        let comments = SingleThreadedComments::default();
        let mut errors = Vec::new();
        let module = parse_file_as_module(
            &file,
            syntax.syntax(),
            EsVersion::Es2022,
            Some(&comments),
            &mut errors,
        );
        let module = match (module, errors.into_iter().next()) {
            (Ok(module), None) => module,
            (Ok(_), Some(error)) | (Err(error), _) => {
                let span = error.span();
                let start = (span.lo - file.start_pos).0 as usize;
                let end = (span.hi - file.start_pos).0 as usize;
                return Err(ScriptError::Parse {
                    message: error.kind().msg().to_string(),
                    span: Span::from_range(start..end.max(start)),
                });
            }
        };
        Ok(Self {
            cm,
            comments,
            module,
            file,
            syntax,
        })
    }

    /// Returns the syntax the model was parsed with.
    pub fn syntax(&self) -> ScriptSyntax {
        self.syntax
    }

    /// Returns the module tree.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Returns the module tree mutably.
    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    /// Returns the text the model was parsed from.
    pub fn source(&self) -> &str {
        &self.file.src
    }

    /// Prints the module with its comments.
    pub fn generate(&self) -> String {
        swc_ecma_codegen::to_code_default(
            self.cm.clone(),
            Some(&self.comments as &dyn Comments),
            &self.module,
        )
    }

    /// Parses `text` as one expression whose spans live in this model.
    pub fn parse_value(&self, text: &str) -> Result<Box<Expr>, ScriptError> {
        parse_value(&self.cm, self.syntax, text)
    }

    /// Import statements of the module.
    pub fn imports(&mut self) -> ImportsHandle<'_> {
        ImportsHandle::new(&mut self.module.body)
    }

    /// Re-export statements of the module.
    pub fn exports(&mut self) -> ExportsHandle<'_> {
        ExportsHandle::new(&mut self.module.body)
    }

    /// Imports and re-exports that name a source module.
    pub fn froms(&mut self) -> FromsHandle<'_> {
        FromsHandle::new(&mut self.module.body)
    }

    /// Adds `import <specifier> from '<source>'`, replacing an import of the
    /// same source or inserting after the last import.
    pub fn import_from(&mut self, specifier: &str, source: &str) -> Result<(), ScriptError> {
        let item = self.parse_item(&format!("import {specifier} from '{source}';"))?;
        let existing = self.imports().find_from(source);
        let index = match existing {
            Some(index) => {
                self.module.body[index] = item;
                return Ok(());
            }
            None => self.imports().last_index().map_or(0, |last| last + 1),
        };
        self.module.body.insert(index, item);
        Ok(())
    }

    /// Adds `export <specifier> from '<source>'`, replacing a re-export of
    /// the same source or inserting after the last re-export.
    pub fn export_from(&mut self, specifier: &str, source: &str) -> Result<(), ScriptError> {
        let item = self.parse_item(&format!("export {specifier} from '{source}';"))?;
        let existing = self.exports().find_from(source);
        let index = match existing {
            Some(index) => {
                self.module.body[index] = item;
                return Ok(());
            }
            None => self.exports().last_index().map_or(0, |last| last + 1),
        };
        self.module.body.insert(index, item);
        Ok(())
    }

    fn parse_item(&self, text: &str) -> Result<ModuleItem, ScriptError> {
        let file = self
            .cm
            .new_source_file(Lrc::new(FileName::Custom("item.js".into())), text.to_string());
        let mut errors = Vec::new();
        let module = parse_file_as_module(
            &file,
            self.syntax.syntax(),
            EsVersion::Es2022,
            None,
            &mut errors,
        )
        .map_err(|error| invalid(text, error.kind().msg().to_string()))?;
        if let Some(error) = errors.first() {
            return Err(invalid(text, error.kind().msg().to_string()));
        }
        module
            .body
            .into_iter()
            .next()
            .ok_or_else(|| invalid(text, "empty statement".to_string()))
    }

    /// Top-level variable declarations, exported or not.
    pub fn variables(&self) -> StatementList<'_> {
        StatementList::from_module(&self.module.body)
    }

    pub(crate) fn locate_component(&self) -> Option<ComponentLocation> {
        locate_component(&self.module.body)
    }

    /// Returns the index of the `export default` statement.
    pub(crate) fn default_export_index(&self) -> Option<usize> {
        self.module.body.iter().position(|item| {
            matches!(
                item,
                ModuleItem::ModuleDecl(
                    ModuleDecl::ExportDefaultExpr(_) | ModuleDecl::ExportDefaultDecl(_)
                )
            )
        })
    }

    /// Returns the component options object, following `export default X`
    /// to a top-level `const X = { ... }`.
    pub fn component_object(&self) -> Option<&ObjectLit> {
        match self.locate_component()? {
            ComponentLocation::Export(index) => match &self.module.body[index] {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                    unwrap_parens(&export.expr).as_object()
                }
                _ => None,
            },
            ComponentLocation::Declarator { item, decl } => {
                let var = match &self.module.body[item] {
                    ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                        export.decl.as_var()?
                    }
                    _ => return None,
                };
                unwrap_parens(var.decls[decl].init.as_deref()?).as_object()
            }
        }
    }

    /// Returns an editing handle on the component options object.
    pub fn component_object_mut(&mut self) -> Option<ObjectHandle<'_>> {
        let location = self.locate_component()?;
        let cm = self.cm.clone();
        let syntax = self.syntax;
        let object = object_at_mut(&mut self.module.body, location)?;
        Some(ObjectHandle::new(object, cm, syntax))
    }

    /// Like [`component_object_mut`](Self::component_object_mut), but says
    /// why there is no options object.
    pub fn require_component_object(&mut self) -> Result<ObjectHandle<'_>, ScriptError> {
        if self.default_export_index().is_none() {
            return Err(ScriptError::NoDefaultExport);
        }
        self.component_object_mut().ok_or(ScriptError::NotAnObject)
    }

    /// Returns the identifier the component `extends`, if any.
    pub fn extends_name(&self) -> Option<String> {
        let object = self.component_object()?;
        match crate::declarations::property_value(object, "extends")? {
            Expr::Ident(ident) => Some(ident.sym.to_string()),
            _ => None,
        }
    }
}

pub(crate) fn locate_component(body: &[ModuleItem]) -> Option<ComponentLocation> {
    let (index, expr) = body.iter().enumerate().find_map(|(i, item)| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
            Some((i, unwrap_parens(&export.expr)))
        }
        _ => None,
    })?;
    match expr {
        Expr::Object(_) => Some(ComponentLocation::Export(index)),
        Expr::Ident(ident) => body.iter().enumerate().find_map(|(item, node)| {
            let var = match node {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                    Decl::Var(var) => var,
                    _ => return None,
                },
                _ => return None,
            };
            let decl = var.decls.iter().position(|d| is_object_binding(d, &ident.sym))?;
            Some(ComponentLocation::Declarator { item, decl })
        }),
        _ => None,
    }
}

pub(crate) fn object_at_mut(
    body: &mut [ModuleItem],
    location: ComponentLocation,
) -> Option<&mut ObjectLit> {
    match location {
        ComponentLocation::Export(index) => match body.get_mut(index)? {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                unwrap_parens_mut(&mut export.expr).as_mut_object()
            }
            _ => None,
        },
        ComponentLocation::Declarator { item, decl } => {
            let var = match body.get_mut(item)? {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    export.decl.as_mut_var()?
                }
                _ => return None,
            };
            unwrap_parens_mut(var.decls.get_mut(decl)?.init.as_deref_mut()?).as_mut_object()
        }
    }
}

fn is_object_binding(declarator: &VarDeclarator, name: &str) -> bool {
    let Pat::Ident(binding) = &declarator.name else {
        return false;
    };
    &*binding.id.sym == name
        && declarator
            .init
            .as_deref()
            .is_some_and(|init| matches!(unwrap_parens(init), Expr::Object(_)))
}

/// Strips parentheses around an expression.
pub(crate) fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &paren.expr;
    }
    expr
}

pub(crate) fn unwrap_parens_mut(mut expr: &mut Expr) -> &mut Expr {
    while let Expr::Paren(paren) = expr {
        expr = &mut paren.expr;
    }
    expr
}

pub(crate) fn parse_value(
    cm: &Lrc<SourceMap>,
    syntax: ScriptSyntax,
    text: &str,
) -> Result<Box<Expr>, ScriptError> {
    let file = cm.new_source_file(Lrc::new(FileName::Custom("value.js".into())), text.to_string());
    let mut errors = Vec::new();
    let expr = parse_file_as_expr(&file, syntax.syntax(), EsVersion::Es2022, None, &mut errors)
        .map_err(|error| invalid(text, error.kind().msg().to_string()))?;
    if let Some(error) = errors.first() {
        return Err(invalid(text, error.kind().msg().to_string()));
    }
    let end = file.start_pos + swc_common::BytePos(text.trim_end().len() as u32);
    if expr.span().hi < end {
        return Err(invalid(text, "unexpected input after expression".to_string()));
    }
    Ok(expr)
}

fn invalid(text: &str, message: String) -> ScriptError {
    ScriptError::InvalidValue {
        source_text: text.to_string(),
        message,
    }
}
