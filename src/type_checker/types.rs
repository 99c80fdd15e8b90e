//! The semantic type universe and its algebra.
//!
//! Types are plain values compared structurally. The sentinel types
//! (`ANY`, `NOTHING`, `INVALID`) and the literal placeholders (`NUMERIC`,
//! `I_LITERAL`, `F_LITERAL`) are zero-argument `Named` types, so they can be
//! matched with `==` like any primitive.

use std::{borrow::Cow, fmt::Display};

const LIST: &str = "[]";
const RANGE: &str = "Range";

const INTEGER_NAMES: [&str; 8] = ["u8", "u16", "u32", "u64", "i8", "i16", "i32", "i64"];
const FLOAT_NAMES: [&str; 2] = ["f32", "f64"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive or parametric type: `i32`, `str`, `[]T`, `Range(T)`.
    Named {
        name: Cow<'static, str>,
        args: Vec<Type>,
    },
    /// Callable signature. `names` are the parameter names, one per argument.
    Function {
        args: Vec<Type>,
        ret: Box<Type>,
        names: Vec<String>,
    },
    /// Nominal product type.
    Record {
        name: String,
        fields: Vec<String>,
        types: Vec<Type>,
    },
}

const fn primitive(name: &'static str) -> Type {
    Type::Named {
        name: Cow::Borrowed(name),
        args: Vec::new(),
    }
}

impl Type {
    /// Unknown but valid. Compatible with everything.
    pub const ANY: Type = primitive("any");
    /// Bottom: no values have this type.
    pub const NOTHING: Type = primitive("nothing");
    /// Produced after a diagnostic has been reported.
    pub const INVALID: Type = primitive("?");
    /// Some numeric type, not known yet. Parameter type of conversions.
    pub const NUMERIC: Type = primitive("{numeric}");
    /// Integer literal of unknown width.
    pub const I_LITERAL: Type = primitive("{integer}");
    /// Float literal of unknown width.
    pub const F_LITERAL: Type = primitive("{float}");
    pub const UNIT: Type = primitive("unit");
    pub const BOOLEAN: Type = primitive("bool");
    pub const STR: Type = primitive("str");
    pub const CHAR: Type = primitive("char");
    pub const U8: Type = primitive("u8");
    pub const U16: Type = primitive("u16");
    pub const U32: Type = primitive("u32");
    pub const U64: Type = primitive("u64");
    pub const I8: Type = primitive("i8");
    pub const I16: Type = primitive("i16");
    pub const I32: Type = primitive("i32");
    pub const I64: Type = primitive("i64");
    pub const F32: Type = primitive("f32");
    pub const F64: Type = primitive("f64");

    /// Every concrete numeric primitive, each of which gets a conversion function.
    pub const CONCRETE_NUMERICS: [Type; 10] = [
        Type::U8,
        Type::U16,
        Type::U32,
        Type::U64,
        Type::I8,
        Type::I16,
        Type::I32,
        Type::I64,
        Type::F32,
        Type::F64,
    ];

    /// Primitives that can be named in source.
    pub const PRIMITIVES: [Type; 14] = [
        Type::U8,
        Type::U16,
        Type::U32,
        Type::U64,
        Type::I8,
        Type::I16,
        Type::I32,
        Type::I64,
        Type::F32,
        Type::F64,
        Type::STR,
        Type::CHAR,
        Type::BOOLEAN,
        Type::UNIT,
    ];

    pub fn named(name: impl Into<String>) -> Type {
        Type::Named {
            name: Cow::Owned(name.into()),
            args: vec![],
        }
    }

    pub fn list(element: Type) -> Type {
        Type::Named {
            name: Cow::Borrowed(LIST),
            args: vec![element],
        }
    }

    pub fn range(element: Type) -> Type {
        Type::Named {
            name: Cow::Borrowed(RANGE),
            args: vec![element],
        }
    }

    /// Name of a zero-argument `Named` type.
    fn primitive_name(&self) -> Option<&str> {
        match self {
            Type::Named { name, args } if args.is_empty() => Some(name.as_ref()),
            _ => None,
        }
    }

    fn single_arg(&self, expected: &str) -> Option<&Type> {
        match self {
            Type::Named { name, args } if name == expected && args.len() == 1 => args.first(),
            _ => None,
        }
    }

    pub fn list_element(&self) -> Option<&Type> {
        self.single_arg(LIST)
    }

    pub fn range_element(&self) -> Option<&Type> {
        self.single_arg(RANGE)
    }

    pub fn is_list(&self) -> bool {
        self.list_element().is_some()
    }

    pub fn is_range(&self) -> bool {
        self.range_element().is_some()
    }

    /// Concrete integer primitives and the integer literal placeholder.
    pub fn is_integer(&self) -> bool {
        *self == Type::I_LITERAL || self.primitive_name().is_some_and(|name| INTEGER_NAMES.contains(&name))
    }

    /// Concrete float primitives and the float literal placeholder.
    pub fn is_float(&self) -> bool {
        *self == Type::F_LITERAL || self.primitive_name().is_some_and(|name| FLOAT_NAMES.contains(&name))
    }

    pub fn is_numeric(&self) -> bool {
        *self == Type::NUMERIC || self.is_integer() || self.is_float()
    }

    /// Inclusive value range of a concrete integer type.
    pub fn integer_bounds(&self) -> Option<(i128, i128)> {
        let bounds = match self.primitive_name()? {
            "u8" => (0, u8::MAX as i128),
            "u16" => (0, u16::MAX as i128),
            "u32" => (0, u32::MAX as i128),
            "u64" => (0, u64::MAX as i128),
            "i8" => (i8::MIN as i128, i8::MAX as i128),
            "i16" => (i16::MIN as i128, i16::MAX as i128),
            "i32" => (i32::MIN as i128, i32::MAX as i128),
            "i64" => (i64::MIN as i128, i64::MAX as i128),
            _ => return None,
        };
        Some(bounds)
    }

    /// Largest finite magnitude of a concrete float type.
    pub fn float_bound(&self) -> Option<f64> {
        match self.primitive_name()? {
            "f32" => Some(f32::MAX as f64),
            "f64" => Some(f64::MAX),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Named { name, args } if name == LIST && args.len() == 1 => write!(f, "[]{}", args[0]),
            Type::Named { name, args } if name == RANGE && args.len() == 1 => write!(f, "Range({})", args[0]),
            Type::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    let args = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
                    write!(f, "({})", args.join(", "))?;
                }
                Ok(())
            }
            Type::Function { args, ret, names } => {
                let params = args
                    .iter()
                    .zip(names.iter())
                    .map(|(ty, name)| format!("{}: {}", name, ty))
                    .collect::<Vec<_>>();
                write!(f, "fn({}) -> {}", params.join(", "), ret)
            }
            Type::Record { name, .. } => write!(f, "{}", name),
        }
    }
}

/// Narrows a literal placeholder against a type of its numeric family.
///
/// `NUMERIC` accepts any numeric type (literals included), `I_LITERAL` a
/// concrete integer and `F_LITERAL` a concrete float.
fn narrow_placeholder(a: &Type, b: &Type) -> Option<Type> {
    for (placeholder, other) in [(a, b), (b, a)] {
        let fits = if *placeholder == Type::NUMERIC {
            other.is_numeric()
        } else if *placeholder == Type::I_LITERAL {
            other.is_integer()
        } else if *placeholder == Type::F_LITERAL {
            other.is_float()
        } else {
            continue;
        };

        if fits {
            return Some(other.clone());
        }
    }
    None
}

fn bound(a: &Type, b: &Type, fallback: Type, recurse: fn(&Type, &Type) -> Type) -> Type {
    if a == b {
        return a.clone();
    }
    if *a == Type::ANY {
        return b.clone();
    }
    if *b == Type::ANY {
        return a.clone();
    }
    if let Some(narrowed) = narrow_placeholder(a, b) {
        return narrowed;
    }
    if let (Some(x), Some(y)) = (a.list_element(), b.list_element()) {
        return Type::list(recurse(x, y));
    }
    fallback
}

/// Least upper bound. Unrelated types widen to `ANY`.
///
/// `ANY` is absorbing towards the other operand: `lub(ANY, t) == t`.
pub fn lub(a: &Type, b: &Type) -> Type {
    bound(a, b, Type::ANY, lub)
}

/// Greatest lower bound. Unrelated types meet at `NOTHING`.
pub fn glb(a: &Type, b: &Type) -> Type {
    bound(a, b, Type::NOTHING, glb)
}

/// Whether a value of one type may be used where the other is expected.
///
/// Symmetric. `ANY` is compatible with everything, `NOTHING` with nothing but
/// itself.
pub fn compatible(a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }
    if *a == Type::ANY || *b == Type::ANY {
        return true;
    }
    if *a == Type::NOTHING || *b == Type::NOTHING {
        return false;
    }
    if *a == Type::NUMERIC || *b == Type::NUMERIC {
        return a.is_numeric() && b.is_numeric();
    }
    if *a == Type::I_LITERAL || *b == Type::I_LITERAL {
        return a.is_integer() && b.is_integer();
    }
    if *a == Type::F_LITERAL || *b == Type::F_LITERAL {
        return a.is_float() && b.is_float();
    }

    match (a, b) {
        (
            Type::Named { name: name_a, args: args_a },
            Type::Named { name: name_b, args: args_b },
        ) => {
            name_a == name_b
                && args_a.len() == args_b.len()
                && args_a.iter().zip(args_b).all(|(x, y)| compatible(x, y))
        }
        (
            Type::Record { fields: fields_a, types: types_a, .. },
            Type::Record { fields: fields_b, types: types_b, .. },
        ) => {
            fields_a == fields_b
                && types_a.len() == types_b.len()
                && types_a.iter().zip(types_b).all(|(x, y)| compatible(x, y))
        }
        _ => false,
    }
}
