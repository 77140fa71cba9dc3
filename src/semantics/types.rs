use std::collections::HashMap;

/// Identity of a declared type: fully-qualified name plus generic arity.
/// Two declarations may share a name at different arities (`Pretend` and
/// `Pretend<T>`), so the arity is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub full_name: String,
    pub arity: usize,
}

impl TypeKey {
    pub fn new(full_name: impl Into<String>, arity: usize) -> Self {
        Self { full_name: full_name.into(), arity }
    }

    pub fn short_name(&self) -> &str {
        self.full_name.rsplit('.').next().unwrap_or(&self.full_name)
    }
}

/// Semantic type of an expression or signature slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemType {
    Void,
    Bool,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Str,
    Char,
    Object,
    /// The type of a `null` literal before conversion.
    Null,
    /// An uninstantiated generic parameter, e.g. `T`.
    Param(String),
    Named {
        key: TypeKey,
        args: Vec<SemType>,
    },
    Unknown,
}

impl SemType {
    pub fn named(key: TypeKey, args: Vec<SemType>) -> Self {
        SemType::Named { key, args }
    }

    pub fn from_primitive_name(name: &str) -> Option<SemType> {
        Some(match name {
            "bool" => SemType::Bool,
            "int" => SemType::Int,
            "long" => SemType::Long,
            "float" => SemType::Float,
            "double" => SemType::Double,
            "decimal" => SemType::Decimal,
            "string" => SemType::Str,
            "char" => SemType::Char,
            "object" => SemType::Object,
            _ => return None,
        })
    }

    /// Substitute generic parameters. Used to instantiate member signatures
    /// against a receiver's type arguments and explicit method type args.
    pub fn substitute(&self, map: &HashMap<String, SemType>) -> SemType {
        match self {
            SemType::Param(name) => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            SemType::Named { key, args } => SemType::Named {
                key: key.clone(),
                args: args.iter().map(|a| a.substitute(map)).collect(),
            },
            other => other.clone(),
        }
    }

    /// Host-language source text for this type, used verbatim by the emitter.
    pub fn display_name(&self) -> String {
        match self {
            SemType::Void => "void".to_string(),
            SemType::Bool => "bool".to_string(),
            SemType::Int => "int".to_string(),
            SemType::Long => "long".to_string(),
            SemType::Float => "float".to_string(),
            SemType::Double => "double".to_string(),
            SemType::Decimal => "decimal".to_string(),
            SemType::Str => "string".to_string(),
            SemType::Char => "char".to_string(),
            SemType::Object => "object".to_string(),
            SemType::Null => "object".to_string(),
            SemType::Param(name) => name.clone(),
            SemType::Named { key, args } => {
                if args.is_empty() {
                    key.full_name.clone()
                } else {
                    let args = args.iter().map(|a| a.display_name()).collect::<Vec<_>>();
                    format!("{}<{}>", key.full_name, args.join(", "))
                }
            }
            SemType::Unknown => "object".to_string(),
        }
    }

    /// Short identifier-safe name used when deriving proxy type names.
    pub fn ident_name(&self) -> String {
        match self {
            SemType::Named { key, args } => {
                let mut name = key.short_name().to_string();
                for a in args {
                    name.push_str(&a.ident_name());
                }
                name
            }
            SemType::Str => "String".to_string(),
            SemType::Param(name) => name.clone(),
            other => {
                let base = other.display_name();
                let mut chars = base.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => base,
                }
            }
        }
    }
}

impl std::fmt::Display for SemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
