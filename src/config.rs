use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use swc_common::{FileName, SourceMap, sync::Lrc};
use swc_ecma_ast::{Decl, Expr, ModuleDecl, ModuleItem, Pat, Stmt};
use swc_ecma_parser::{Lexer, Parser, StringInput, Syntax, TsSyntax};
use tokio::fs::{read_to_string, try_exists};

use crate::{
    error::Error,
    utils::{expr_to_value::expr_to_value, resolve::resolve_within},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
    #[serde(default = "default_rules")]
    pub rules: Vec<RenameRule>,
    #[serde(default = "default_remove")]
    pub remove: Vec<String>,
    #[serde(default)]
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_dirs: default_skip_dirs(),
            rules: default_rules(),
            remove: default_remove(),
            respect_gitignore: false,
        }
    }
}

/// Replace a trailing `from` suffix with `to`, unless the name ends with one of `except`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub except: Vec<String>,
}

impl RenameRule {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            except: vec![],
        }
    }

    pub fn except(mut self, suffix: &str) -> Self {
        self.except.push(suffix.to_string());
        self
    }
}

fn default_skip_dirs() -> Vec<String> {
    vec!["node_modules".to_string(), ".git".to_string()]
}

fn default_rules() -> Vec<RenameRule> {
    vec![
        RenameRule::new(".tsx", ".jsx"),
        RenameRule::new(".ts", ".js").except(".d.ts"),
    ]
}

fn default_remove() -> Vec<String> {
    [
        "tsconfig.json",
        "tsconfig.app.json",
        "tsconfig.node.json",
        "src/vite-env.d.ts",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        for rule in &self.rules {
            for suffix in [&rule.from, &rule.to] {
                if suffix.len() < 2 || !suffix.starts_with('.') {
                    return Err(Error::Config(format!(
                        "rule suffix {suffix:?} must start with '.' and name an extension"
                    )));
                }
            }
        }
        for entry in &self.remove {
            if resolve_within(".", entry).is_none() {
                return Err(Error::Config(format!(
                    "remove entry {entry:?} must be a path inside the project root"
                )));
            }
        }
        Ok(())
    }
}

/// Load the config at `path`, falling back to defaults when the file does not exist.
pub async fn load_config(path: &str) -> Result<Config, Error> {
    if !try_exists(path).await? {
        tracing::debug!(path, "config file not found, using defaults");
        return Ok(Config::default());
    }
    let config = load_config_from_file(path).await?;
    config.validate()?;
    Ok(config)
}

pub async fn load_config_from_file(path: impl AsRef<Path>) -> Result<Config, Error> {
    let path = path.as_ref();
    let content = read_to_string(path).await?;
    parse_config(path, content)
}

fn parse_config(path: &Path, content: String) -> Result<Config, Error> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Real(path.to_path_buf()).into(), content);
    let lexer = Lexer::new(
        Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        }),
        swc_ecma_ast::EsVersion::EsNext,
        StringInput::from(&*fm),
        None,
    );

    let mut parser = Parser::new_from(lexer);
    let module = parser.parse_module().map_err(Error::ParseModule)?;

    let mut var_map: HashMap<String, &Expr> = HashMap::new();
    for item in &module.body {
        if let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = item {
            for decl in &var.decls {
                if let (Some(init), Pat::Ident(ident)) = (&decl.init, &decl.name) {
                    var_map.insert(ident.id.sym.to_string(), init.as_ref());
                }
            }
        }
    }

    for item in &module.body {
        if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(expr)) = item {
            let target_expr = match &*expr.expr {
                Expr::Ident(ident) => var_map.get(&*ident.sym).copied().ok_or_else(|| {
                    Error::Config(format!("Identifier {} not found in variable map", ident.sym))
                })?,
                other => other,
            };

            let value: Value = expr_to_value(target_expr)?;
            return Ok(serde_json::from_value(value)?);
        }
    }

    Err(Error::Config("No exported expression found".to_string()))
}
