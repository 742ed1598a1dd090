use serde_json::{Number, Value};
use swc_ecma_ast::{Expr, Lit, Prop, PropName, PropOrSpread};

use crate::error::Error;

/// Lower a literal expression from the config module into JSON.
pub fn expr_to_value(expr: &Expr) -> Result<Value, Error> {
    match expr {
        Expr::TsSatisfies(e) => expr_to_value(&e.expr),
        Expr::TsConstAssertion(e) => expr_to_value(&e.expr),
        Expr::Paren(e) => expr_to_value(&e.expr),
        Expr::Object(obj) => {
            let mut map = serde_json::Map::new();
            for prop in &obj.props {
                let PropOrSpread::Prop(prop_box) = prop else {
                    return Err(Error::Config("spread is not supported in config".to_string()));
                };
                if let Prop::KeyValue(kv) = &**prop_box {
                    let key = match &kv.key {
                        PropName::Ident(ident) => ident.sym.to_string(),
                        PropName::Str(s) => s.value.to_string(),
                        _ => return Err(Error::Config(format!("Invalid key: {:?}", kv.key))),
                    };
                    map.insert(key, expr_to_value(&kv.value)?);
                }
            }
            Ok(Value::Object(map))
        }
        Expr::Array(arr) => {
            let mut vec = Vec::new();
            for e in arr.elems.iter().flatten() {
                vec.push(expr_to_value(&e.expr)?);
            }
            Ok(Value::Array(vec))
        }
        Expr::Lit(Lit::Str(s)) => Ok(Value::String(s.value.to_string())),
        Expr::Lit(Lit::Bool(b)) => Ok(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Ok(Value::Null),
        Expr::Lit(Lit::Num(n)) => Number::from_f64(n.value)
            .map(Value::Number)
            .ok_or_else(|| Error::Config(format!("Unsupported number: {}", n.value))),
        _ => Err(Error::Config(format!(
            "Unsupported expression type: {:?}",
            expr
        ))),
    }
}
