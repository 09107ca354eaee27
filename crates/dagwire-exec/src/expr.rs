//! Tiny expression language for filters and renames.
//!
//! Filters: `<column> <op> <literal>` with `==`/`=`, `!=`, `<`, `<=`, `>`,
//! `>=`. Literals are quoted strings, `true`/`false`, integers, floats, or a
//! bare word (treated as a string). Null values never match. Integers and
//! floats compare by exact value, without rounding the integer to `f64`.
//!
//! Renames: `old AS new, other AS renamed` (case-insensitive `AS`).

use std::cmp::Ordering;

use dagwire_core::types::{RowBatch, Scalar};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("cannot parse expression '{0}'")]
    Parse(String),

    #[error("column '{0}' not found")]
    UnknownColumn(String),

    #[error("cannot compare {left:?} with {right:?}")]
    Incomparable { left: Scalar, right: Scalar },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: CmpOp,
    pub literal: Scalar,
}

// Two-character operators first so `<=` is not read as `<`.
const OPERATORS: [(&str, CmpOp); 7] = [
    ("==", CmpOp::Eq),
    ("!=", CmpOp::Ne),
    ("<=", CmpOp::Le),
    (">=", CmpOp::Ge),
    ("<", CmpOp::Lt),
    (">", CmpOp::Gt),
    ("=", CmpOp::Eq),
];

impl Predicate {
    pub fn parse(expr: &str) -> Result<Self, ExprError> {
        let (pos, token, op) = OPERATORS
            .iter()
            .filter_map(|(tok, op)| expr.find(tok).map(|pos| (pos, *tok, *op)))
            .min_by_key(|(pos, tok, _)| (*pos, usize::MAX - tok.len()))
            .ok_or_else(|| ExprError::Parse(expr.to_string()))?;

        let column = expr[..pos].trim();
        let literal = expr[pos + token.len()..].trim();
        if column.is_empty() || literal.is_empty() {
            return Err(ExprError::Parse(expr.to_string()));
        }

        Ok(Predicate {
            column: column.to_string(),
            op,
            literal: parse_literal(literal),
        })
    }

    /// One entry per row: does the row satisfy the predicate?
    pub fn evaluate(&self, batch: &RowBatch) -> Result<Vec<bool>, ExprError> {
        let column = batch
            .column(&self.column)
            .ok_or_else(|| ExprError::UnknownColumn(self.column.clone()))?;
        column
            .values
            .iter()
            .map(|v| match compare(v, &self.literal)? {
                Some(ord) => Ok(self.op.holds(ord)),
                None => Ok(false),
            })
            .collect()
    }
}

fn parse_literal(raw: &str) -> Scalar {
    let unquoted = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
    if let Some(s) = unquoted {
        return Scalar::Str(s.to_string());
    }
    match raw {
        "true" => return Scalar::Bool(true),
        "false" => return Scalar::Bool(false),
        "null" | "NULL" => return Scalar::Null,
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Scalar::I64(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Scalar::F64(f);
    }
    Scalar::Str(raw.to_string())
}

/// `None` when either side is null.
fn compare(value: &Scalar, literal: &Scalar) -> Result<Option<Ordering>, ExprError> {
    use Scalar::*;
    let ord = match (value, literal) {
        (Null, _) | (_, Null) => return Ok(None),
        (Bool(a), Bool(b)) => a.cmp(b),
        (I64(a), I64(b)) => a.cmp(b),
        (I64(a), F64(b)) => cmp_int_float(*a, *b),
        (F64(a), I64(b)) => cmp_int_float(*b, *a).reverse(),
        (F64(a), F64(b)) => a.total_cmp(b),
        (Str(a), Str(b)) => a.cmp(b),
        _ => {
            return Err(ExprError::Incomparable {
                left: value.clone(),
                right: literal.clone(),
            })
        }
    };
    Ok(Some(ord))
}

/// Exact ordering of an integer against a float; no rounding above 2^53.
/// NaN sorts after every integer.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return Ordering::Less;
    }
    // 2^63 as f64; every finite f64 in [-2^63, 2^63) truncates into i64 range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ord => ord,
    }
}

/// Parse `"col1 AS alias1, col2 AS alias2"` into ordered `(old, new)` pairs.
/// Clauses without `AS` are passthroughs and are skipped.
pub fn parse_renames(expr: &str) -> Vec<(String, String)> {
    let mut renames = Vec::new();
    for clause in expr.split(',') {
        let clause = clause.trim();
        // ASCII lowering keeps byte offsets valid for `clause`
        if let Some(as_pos) = clause.to_ascii_lowercase().find(" as ") {
            let old_name = clause[..as_pos].trim();
            let new_name = clause[as_pos + 4..].trim();
            if !old_name.is_empty() && !new_name.is_empty() {
                renames.push((old_name.to_string(), new_name.to_string()));
            }
        }
    }
    renames
}

/// Apply renames; every renamed column must exist.
pub fn apply_renames(batch: &RowBatch, renames: &[(String, String)]) -> Result<RowBatch, ExprError> {
    let mut out = batch.clone();
    for (old, new) in renames {
        let col = out
            .columns
            .iter_mut()
            .find(|c| &c.name == old)
            .ok_or_else(|| ExprError::UnknownColumn(old.clone()))?;
        col.name = new.clone();
    }
    Ok(out)
}
