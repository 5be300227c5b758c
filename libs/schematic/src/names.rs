//! Bus and array name expansion.
//!
//! A name is a comma-separated list of units. Each unit is one of:
//!
//! * a bit: `foo` or `foo<3>`,
//! * a range of bits: `foo<2:0>`, or with a step, `foo<0:6:2>`,
//! * a repetition: `<*N>` followed by a unit or a parenthesized name, as in
//!   `<*2>(a,b)`.
//!
//! # Examples
//!
//! ```
//! use schematic::names::expand_name_bits;
//!
//! assert_eq!(expand_name_bits("foo<2:0>").unwrap(), ["foo<2>", "foo<1>", "foo<0>"]);
//! assert_eq!(expand_name_bits("a,b").unwrap(), ["a", "b"]);
//! assert_eq!(expand_name_bits("<*2>(a,b)").unwrap(), ["a", "b", "a", "b"]);
//! assert!(expand_name_bits("foo<2:0").is_err());
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, map_res, opt, verify};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

/// The largest number of bits a parsed name may expand to.
pub const MAX_NAME_BITS: u64 = 1 << 20;

/// The [`NameError`] result type.
pub type NameResult<T> = Result<T, NameError>;

/// An error parsing a name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name is malformed.
    #[error("failed to parse name `{name}`: {reason}")]
    Parse {
        /// The name that failed to parse.
        name: String,
        /// A description of the failure.
        reason: String,
    },
    /// The name expands to zero or several bits where exactly one was expected.
    #[error("name `{0}` is not a single bit")]
    NotABit(String),
}

/// The syntax used to render a bit name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NameFormat {
    /// Angle-bracket indices, as in `foo<2>`.
    #[default]
    Cdba,
    /// Square-bracket indices, as in `foo[2]`.
    Verilog,
}

/// A single bit of a bus, or a scalar net.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameBit {
    /// The base name.
    pub base: String,
    /// The bit index, if the bit belongs to a bus.
    pub index: Option<u32>,
}

impl NameBit {
    /// Renders this bit in the given syntax.
    pub fn to_string_as(&self, fmt: NameFormat) -> String {
        match (self.index, fmt) {
            (None, _) => self.base.clone(),
            (Some(idx), NameFormat::Cdba) => format!("{}<{idx}>", self.base),
            (Some(idx), NameFormat::Verilog) => format!("{}[{idx}]", self.base),
        }
    }
}

impl Display for NameBit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_as(NameFormat::Cdba))
    }
}

/// One comma-separated element of a [`Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameUnit {
    /// A single bit.
    Bit(NameBit),
    /// The bits `base<start>` through `base<stop>` inclusive, `step` apart.
    Range {
        /// The base name.
        base: String,
        /// The first index.
        start: u32,
        /// The last index; may be less than `start`.
        stop: u32,
        /// The distance between consecutive indices.
        step: u32,
    },
    /// `count` copies of `inner`.
    Repeat {
        /// The number of repetitions.
        count: u32,
        /// The repeated name.
        inner: Name,
    },
}

impl NameUnit {
    /// The number of bits this unit expands to, saturating at [`u64::MAX`].
    pub fn num_bits(&self) -> u64 {
        match self {
            Self::Bit(_) => 1,
            Self::Range {
                start, stop, step, ..
            } => (start.abs_diff(*stop) / step) as u64 + 1,
            Self::Repeat { count, inner } => inner.num_bits().saturating_mul(*count as u64),
        }
    }

    fn push_bits(&self, out: &mut Vec<NameBit>) {
        match self {
            Self::Bit(bit) => out.push(bit.clone()),
            Self::Range {
                base,
                start,
                stop,
                step,
            } => {
                let bit = |idx| NameBit {
                    base: base.clone(),
                    index: Some(idx),
                };
                let step = *step as usize;
                if start <= stop {
                    out.extend((*start..=*stop).step_by(step).map(bit));
                } else {
                    out.extend((*stop..=*start).rev().step_by(step).map(bit));
                }
            }
            Self::Repeat { count, inner } => {
                for _ in 0..*count {
                    inner.push_bits(out);
                }
            }
        }
    }
}

impl Display for NameUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bit(bit) => write!(f, "{bit}"),
            Self::Range {
                base,
                start,
                stop,
                step: 1,
            } => write!(f, "{base}<{start}:{stop}>"),
            Self::Range {
                base,
                start,
                stop,
                step,
            } => write!(f, "{base}<{start}:{stop}:{step}>"),
            Self::Repeat { count, inner } => write!(f, "<*{count}>({inner})"),
        }
    }
}

/// A parsed name: a non-empty list of [`NameUnit`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// The units of the name, in order.
    pub units: Vec<NameUnit>,
}

impl Name {
    /// The number of bits this name expands to, saturating at [`u64::MAX`].
    pub fn num_bits(&self) -> u64 {
        self.units
            .iter()
            .fold(0, |acc: u64, unit| acc.saturating_add(unit.num_bits()))
    }

    fn push_bits(&self, out: &mut Vec<NameBit>) {
        for unit in &self.units {
            unit.push_bits(out);
        }
    }

    /// Expands this name into its bits, in order.
    pub fn bits(&self) -> Vec<NameBit> {
        let mut out = Vec::new();
        self.push_bits(&mut out);
        out
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, unit) in self.units.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{unit}")?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(s)
    }
}

fn is_base_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '/' | '-' | '+' | '#' | '!')
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

fn base(input: &str) -> IResult<&str, String> {
    map(take_while1(is_base_char), String::from)(input)
}

type IndexSpec = (u32, Option<(u32, Option<u32>)>);

fn index_spec(input: &str) -> IResult<&str, IndexSpec> {
    delimited(
        char('<'),
        pair(
            number,
            opt(pair(
                preceded(char(':'), number),
                opt(preceded(char(':'), number)),
            )),
        ),
        char('>'),
    )(input)
}

fn term(input: &str) -> IResult<&str, NameUnit> {
    map_res(
        pair(base, opt(index_spec)),
        |(base, spec)| -> Result<NameUnit, &'static str> {
            Ok(match spec {
                None => NameUnit::Bit(NameBit { base, index: None }),
                Some((index, None)) => NameUnit::Bit(NameBit {
                    base,
                    index: Some(index),
                }),
                Some((_, Some((_, Some(0))))) => return Err("range step must be positive"),
                Some((start, Some((stop, step)))) => NameUnit::Range {
                    base,
                    start,
                    stop,
                    step: step.unwrap_or(1),
                },
            })
        },
    )(input)
}

fn repeat(input: &str) -> IResult<&str, NameUnit> {
    let count = delimited(tag("<*"), verify(number, |n: &u32| *n > 0), char('>'));
    let inner = alt((
        delimited(char('('), name, char(')')),
        map(term, |unit| Name { units: vec![unit] }),
    ));
    map(pair(count, inner), |(count, inner)| NameUnit::Repeat {
        count,
        inner,
    })(input)
}

fn unit(input: &str) -> IResult<&str, NameUnit> {
    alt((repeat, term))(input)
}

fn name(input: &str) -> IResult<&str, Name> {
    map(separated_list1(char(','), unit), |units| Name { units })(input)
}

/// Parses a name into its syntax tree.
///
/// Names expanding to more than [`MAX_NAME_BITS`] bits are rejected.
pub fn parse_name(s: &str) -> NameResult<Name> {
    let (_, name) = all_consuming(name)(s).map_err(|err| NameError::Parse {
        name: s.to_string(),
        reason: err.to_string(),
    })?;
    let num_bits = name.num_bits();
    if num_bits > MAX_NAME_BITS {
        tracing::warn!(name = s, num_bits, "rejected oversized name");
        return Err(NameError::Parse {
            name: s.to_string(),
            reason: format!("expands to {num_bits} bits, more than the limit of {MAX_NAME_BITS}"),
        });
    }
    Ok(name)
}

/// Expands a name into its bits, rendered in CDBA syntax.
pub fn expand_name_bits(s: &str) -> NameResult<Vec<String>> {
    expand_name_bits_as(s, NameFormat::Cdba)
}

/// Expands a name into its bits, rendered in the given syntax.
///
/// # Example
///
/// ```
/// use schematic::names::{expand_name_bits_as, NameFormat};
///
/// assert_eq!(
///     expand_name_bits_as("foo<1:0>,bar", NameFormat::Verilog).unwrap(),
///     ["foo[1]", "foo[0]", "bar"],
/// );
/// ```
pub fn expand_name_bits_as(s: &str, fmt: NameFormat) -> NameResult<Vec<String>> {
    Ok(parse_name(s)?
        .bits()
        .iter()
        .map(|bit| bit.to_string_as(fmt))
        .collect())
}

/// Converts a single CDBA bit name to the given syntax.
pub fn convert_name_bit(s: &str, fmt: NameFormat) -> NameResult<String> {
    match parse_name(s)?.units.as_slice() {
        [NameUnit::Bit(bit)] => Ok(bit.to_string_as(fmt)),
        _ => Err(NameError::NotABit(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn expands_cdba_names() {
        let cases: &[(&str, &[&str])] = &[
            ("foo<2:0>", &["foo<2>", "foo<1>", "foo<0>"]),
            ("a,b", &["a", "b"]),
            ("foo<1:0>,bar", &["foo<1>", "foo<0>", "bar"]),
            ("<*2>(a,b)", &["a", "b", "a", "b"]),
            ("foo<0:2>", &["foo<0>", "foo<1>", "foo<2>"]),
            ("foo<0:6:2>", &["foo<0>", "foo<2>", "foo<4>", "foo<6>"]),
            ("foo<7:0:3>", &["foo<7>", "foo<4>", "foo<1>"]),
            ("foo<3:3>", &["foo<3>"]),
            ("<*3>a", &["a", "a", "a"]),
            ("<*2>x<1:0>,y", &["x<1>", "x<0>", "x<1>", "x<0>", "y"]),
            ("<*2>(<*2>a,b)", &["a", "a", "b", "a", "a", "b"]),
            ("net_1.a", &["net_1.a"]),
        ];
        for (name, expected) in cases {
            assert_eq!(&expand_name_bits(name).unwrap(), expected, "name {name}");
        }
    }

    #[test]
    fn malformed_names_fail() {
        for name in [
            "",
            "foo<2:0",
            "foo<2:0>>",
            "a,,b",
            "a,",
            ",a",
            "a b",
            " a",
            "<*0>a",
            "<*2>(a,b",
            "<*2>",
            "<*-1>a",
            "foo<a>",
            "foo<1:0:0>",
            "foo<>",
            "()",
        ] {
            assert!(
                matches!(expand_name_bits(name), Err(NameError::Parse { .. })),
                "expected `{name}` to fail"
            );
        }
    }

    #[test]
    fn oversized_names_fail() {
        for name in [
            "<*4000000000>a",
            "<*4000000000>(a,b)",
            "a<0:4000000000>",
            "<*65536>(<*65536>(<*65536>x))",
        ] {
            assert!(
                matches!(expand_name_bits(name), Err(NameError::Parse { .. })),
                "expected `{name}` to fail"
            );
        }
        assert_eq!(parse_name("<*1024>a<1023:0>").unwrap().num_bits(), MAX_NAME_BITS);
        assert_eq!(parse_name("<*3>(a,b<4:0:2>)").unwrap().num_bits(), 12);
    }

    #[test]
    fn parse_tree() {
        let name = parse_name("<*2>(a,b<3>),c<4:0:2>").unwrap();
        assert_eq!(
            name.units,
            vec![
                NameUnit::Repeat {
                    count: 2,
                    inner: Name {
                        units: vec![
                            NameUnit::Bit(NameBit {
                                base: "a".into(),
                                index: None
                            }),
                            NameUnit::Bit(NameBit {
                                base: "b".into(),
                                index: Some(3)
                            }),
                        ]
                    },
                },
                NameUnit::Range {
                    base: "c".into(),
                    start: 4,
                    stop: 0,
                    step: 2
                },
            ]
        );
        assert_eq!(name.to_string(), "<*2>(a,b<3>),c<4:0:2>");
        assert_eq!(name.bits().len(), 7);
    }

    #[test]
    fn display_reparses_to_same_tree() {
        for s in ["foo<2:0>", "a,b", "<*3>a", "x<0:8:4>,<*2>(y<1>,z)"] {
            let name: Name = s.parse().unwrap();
            let again: Name = name.to_string().parse().unwrap();
            assert_eq!(name.bits(), again.bits());
        }
    }

    #[test]
    fn convert_single_bits() {
        assert_eq!(convert_name_bit("foo<2>", NameFormat::Verilog).unwrap(), "foo[2]");
        assert_eq!(convert_name_bit("foo<2>", NameFormat::Cdba).unwrap(), "foo<2>");
        assert_eq!(convert_name_bit("vdd", NameFormat::Verilog).unwrap(), "vdd");
        assert_eq!(
            convert_name_bit("foo<1:0>", NameFormat::Verilog),
            Err(NameError::NotABit("foo<1:0>".into()))
        );
        assert_eq!(
            convert_name_bit("a,b", NameFormat::Cdba),
            Err(NameError::NotABit("a,b".into()))
        );
        assert!(convert_name_bit("foo<", NameFormat::Cdba).is_err());
    }
}
