use std::fmt;
use std::str::FromStr;

use crate::core::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl PrimitiveType {
    const ALL: [PrimitiveType; 10] = [
        PrimitiveType::UInt8,
        PrimitiveType::UInt16,
        PrimitiveType::UInt32,
        PrimitiveType::UInt64,
        PrimitiveType::Int8,
        PrimitiveType::Int16,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::Float32,
        PrimitiveType::Float64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::UInt8 => "UInt8",
            PrimitiveType::UInt16 => "UInt16",
            PrimitiveType::UInt32 => "UInt32",
            PrimitiveType::UInt64 => "UInt64",
            PrimitiveType::Int8 => "Int8",
            PrimitiveType::Int16 => "Int16",
            PrimitiveType::Int32 => "Int32",
            PrimitiveType::Int64 => "Int64",
            PrimitiveType::Float32 => "Float32",
            PrimitiveType::Float64 => "Float64",
        }
    }

    pub fn size(self) -> usize {
        match self {
            PrimitiveType::UInt8 | PrimitiveType::Int8 => 1,
            PrimitiveType::UInt16 | PrimitiveType::Int16 => 2,
            PrimitiveType::UInt32 | PrimitiveType::Int32 | PrimitiveType::Float32 => 4,
            PrimitiveType::UInt64 | PrimitiveType::Int64 | PrimitiveType::Float64 => 8,
        }
    }
}

/// A column type in the Native type grammar.
///
/// `Nullable` and `LowCardinality` wrap leaf types only, with the one
/// exception of `LowCardinality(Nullable(T))`. `Array` wraps anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Primitive(PrimitiveType),
    FixedString(usize),
    Nullable(Box<ColumnType>),
    LowCardinality(Box<ColumnType>),
    Array(Box<ColumnType>),
}

impl ColumnType {
    /// Whether the type is a fixed-width leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, ColumnType::Primitive(_) | ColumnType::FixedString(_))
    }

    fn validate(&self) -> Result<(), CodecError> {
        match self {
            ColumnType::Primitive(_) | ColumnType::FixedString(_) => Ok(()),
            ColumnType::Nullable(inner) if inner.is_leaf() => Ok(()),
            ColumnType::LowCardinality(inner) => match inner.as_ref() {
                ColumnType::Nullable(leaf) if leaf.is_leaf() => Ok(()),
                leaf if leaf.is_leaf() => Ok(()),
                _ => Err(CodecError::UnknownType(format!(
                    "LowCardinality cannot wrap {inner}"
                ))),
            },
            ColumnType::Nullable(inner) => Err(CodecError::UnknownType(format!(
                "Nullable cannot wrap {inner}"
            ))),
            ColumnType::Array(inner) => inner.validate(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Primitive(p) => f.write_str(p.name()),
            ColumnType::FixedString(n) => write!(f, "FixedString({n})"),
            ColumnType::Nullable(inner) => write!(f, "Nullable({inner})"),
            ColumnType::LowCardinality(inner) => write!(f, "LowCardinality({inner})"),
            ColumnType::Array(inner) => write!(f, "Array({inner})"),
        }
    }
}

impl FromStr for ColumnType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = parse(s.trim())?;
        parsed.validate()?;
        Ok(parsed)
    }
}

/// `Name(arg)` split into `("Name", Some("arg"))`.
fn split_call(s: &str) -> Result<(&str, Option<&str>), CodecError> {
    match s.find('(') {
        None => Ok((s, None)),
        Some(open) => {
            let arg = s[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| CodecError::UnknownType(format!("unbalanced parentheses in {s}")))?;
            Ok((s[..open].trim(), Some(arg.trim())))
        }
    }
}

fn parse(s: &str) -> Result<ColumnType, CodecError> {
    let (name, arg) = split_call(s)?;
    let wrapped = |arg: Option<&str>| -> Result<Box<ColumnType>, CodecError> {
        match arg {
            Some(inner) if !inner.is_empty() => Ok(Box::new(parse(inner)?)),
            _ => Err(CodecError::UnknownType(format!("{name} needs a type argument"))),
        }
    };
    match (name, arg) {
        ("Nullable", arg) => Ok(ColumnType::Nullable(wrapped(arg)?)),
        ("LowCardinality", arg) => Ok(ColumnType::LowCardinality(wrapped(arg)?)),
        ("Array", arg) => Ok(ColumnType::Array(wrapped(arg)?)),
        ("FixedString", Some(width)) => match width.parse::<usize>() {
            Ok(0) => Err(CodecError::UnknownType(
                "FixedString width must be positive".into(),
            )),
            Ok(n) => Ok(ColumnType::FixedString(n)),
            Err(e) => Err(CodecError::UnknownType(format!(
                "bad FixedString width {width:?}: {e}"
            ))),
        },
        (name, None) => PrimitiveType::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .map(ColumnType::Primitive)
            .ok_or_else(|| CodecError::UnknownType(name.to_string())),
        _ => Err(CodecError::UnknownType(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("UInt8")]
    #[case("Float64")]
    #[case("FixedString(10)")]
    #[case("Nullable(Int32)")]
    #[case("LowCardinality(Float32)")]
    #[case("LowCardinality(Nullable(FixedString(10)))")]
    #[case("Array(Array(Nullable(UInt32)))")]
    #[case("Array(LowCardinality(Nullable(FixedString(4))))")]
    fn test_parse_and_print(#[case] name: &str) {
        let parsed: ColumnType = name.parse().unwrap();
        assert_eq!(parsed.to_string(), name);
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        let parsed: ColumnType = " Array( Nullable(UInt8) ) ".parse().unwrap();
        assert_eq!(
            parsed,
            ColumnType::Array(Box::new(ColumnType::Nullable(Box::new(
                ColumnType::Primitive(PrimitiveType::UInt8)
            ))))
        );
    }

    #[rstest]
    #[case("String")]
    #[case("UInt128")]
    #[case("FixedString(x)")]
    #[case("FixedString")]
    #[case("FixedString(0)")]
    #[case("Array(LowCardinality(FixedString(0)))")]
    #[case("Nullable()")]
    #[case("Array(UInt8")]
    #[case("Nullable(Array(UInt8))")]
    #[case("Nullable(Nullable(UInt8))")]
    #[case("Nullable(LowCardinality(UInt8))")]
    #[case("LowCardinality(Array(UInt8))")]
    #[case("LowCardinality(LowCardinality(UInt8))")]
    fn test_rejects(#[case] name: &str) {
        let err = name.parse::<ColumnType>().unwrap_err();
        assert!(matches!(err, CodecError::UnknownType(_)), "{name}: {err}");
    }

    #[test]
    fn test_primitive_sizes() {
        assert_eq!(PrimitiveType::UInt8.size(), 1);
        assert_eq!(PrimitiveType::Float32.size(), 4);
        assert_eq!(PrimitiveType::Int64.size(), 8);
    }
}
