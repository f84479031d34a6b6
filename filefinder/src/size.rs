use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::{FinderError, FinderResult};

const KIB: u64 = 1024;

/// Relational operator applied between a file's size and the target size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SizeOperator {
    #[default]
    EqualTo,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl SizeOperator {
    pub const ALL: [SizeOperator; 5] = [
        SizeOperator::EqualTo,
        SizeOperator::GreaterThan,
        SizeOperator::GreaterThanOrEqual,
        SizeOperator::LessThan,
        SizeOperator::LessThanOrEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            SizeOperator::EqualTo => "==",
            SizeOperator::GreaterThan => ">",
            SizeOperator::GreaterThanOrEqual => ">=",
            SizeOperator::LessThan => "<",
            SizeOperator::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for SizeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SizeOperator::EqualTo => "EqualTo",
            SizeOperator::GreaterThan => "GreaterThan",
            SizeOperator::GreaterThanOrEqual => "GreaterThanOrEqual",
            SizeOperator::LessThan => "LessThan",
            SizeOperator::LessThanOrEqual => "LessThanOrEqual",
        };
        f.write_str(name)
    }
}

impl FromStr for SizeOperator {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let op = match normalized.as_str() {
            "equalto" | "et" | "equal to" | "equal" | "==" | "=" => SizeOperator::EqualTo,
            "greaterthan" | "gt" | "greater" | "greater than" | ">" => SizeOperator::GreaterThan,
            "greaterthanorequal"
            | "greaterthanequalto"
            | "greaterthanorequalto"
            | "gte"
            | "greater than or equal to"
            | ">=" => SizeOperator::GreaterThanOrEqual,
            "lessthan" | "lt" | "less" | "less than" | "<" => SizeOperator::LessThan,
            "lessthanorequal"
            | "lessthanequalto"
            | "lessthanorequalto"
            | "lte"
            | "less than or equal to"
            | "<=" => SizeOperator::LessThanOrEqual,
            _ => return Err(FinderError::invalid_filter_value("operator type", s)),
        };
        Ok(op)
    }
}

/// Checks whether `actual` bytes satisfy `operator` against `target` bytes.
///
/// The tolerance widens the match: `EqualTo` accepts anything inside
/// `[target * (1 - tolerance), target * (1 + tolerance)]`, and the inequality
/// operators accept a value that passes the comparison against either the
/// nominal target or the tolerance-relaxed edge on their side of the band.
pub fn size_matches(operator: SizeOperator, target: u64, tolerance: f64, actual: u64) -> bool {
    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        0.0
    };
    let target_f = target as f64;
    let actual_f = actual as f64;
    let lower = (target_f * (1.0 - tolerance)).max(0.0);
    let upper = target_f * (1.0 + tolerance);

    match operator {
        SizeOperator::EqualTo => actual_f >= lower && actual_f <= upper,
        SizeOperator::GreaterThan => actual > target || actual_f > lower,
        SizeOperator::GreaterThanOrEqual => actual >= target || actual_f >= lower,
        SizeOperator::LessThan => actual < target || actual_f < upper,
        SizeOperator::LessThanOrEqual => actual <= target || actual_f <= upper,
    }
}

/// Parses a human readable size such as `"512"`, `"1 KB"`, `"1.5MB"` or `"2 GiB"`.
///
/// Units are binary multiples, so `"1 MB"` is 1048576 bytes.
pub fn parse_size(input: &str) -> FinderResult<u64> {
    let trimmed = input.trim();
    let split_at = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split_at);

    if number.is_empty() {
        return Err(FinderError::size_parse(format!(
            "expected a number in '{}'",
            input
        )));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| FinderError::size_parse(format!("invalid number '{}'", number)))?;

    let multiplier = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" | "BYTES" => 1,
        "K" | "KB" | "KIB" => KIB,
        "M" | "MB" | "MIB" => KIB.pow(2),
        "G" | "GB" | "GIB" => KIB.pow(3),
        "T" | "TB" | "TIB" => KIB.pow(4),
        other => {
            return Err(FinderError::size_parse(format!(
                "unknown unit '{}' in '{}'",
                other, input
            )))
        }
    };

    let bytes = (value * multiplier as f64).round();
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(FinderError::size_parse(format!("'{}' is too large", input)));
    }
    Ok(bytes as u64)
}

/// Parses an optional size filter; a blank string means no size constraint
pub fn parse_size_filter(input: &str) -> FinderResult<Option<u64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_size(input).map(Some)
}
