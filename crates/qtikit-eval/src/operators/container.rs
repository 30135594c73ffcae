//! Container operators
//!
//! Constructors, size/emptiness probes, element access and the container
//! algebra (`member`, `delete`, `contains`, `random`). The `multiple` and
//! `ordered` constructors skip NULL sub-values and flatten one level of
//! same-base-type sub-containers; when nothing remains the result is NULL.

use log::warn;
use qtikit_ast::Index;
use qtikit_types::{BaseType, Cardinality, MultipleContainer, OrderedContainer, QtiValue};
use rand::Rng;

use crate::context::EvaluationContext;
use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::resolve_integer_ref;

fn container_error(operator: &'static str, source: qtikit_types::ContainerError) -> ExpressionError {
    ExpressionError::Container { operator, source }
}

fn gather_elements(
    operator: &'static str,
    operands: &[QtiValue],
    flatten_from: Cardinality,
) -> ExpressionResult<Vec<QtiValue>> {
    let mut elements = Vec::with_capacity(operands.len());
    for operand in operands {
        if operand.is_null() {
            continue;
        }
        match operand.cardinality() {
            Some(Cardinality::Single) => elements.push(operand.clone()),
            Some(c) if c == flatten_from => {
                // One level only: elements of a container are scalars.
                if let Some(values) = operand.container_values() {
                    elements.extend_from_slice(values);
                }
            }
            Some(found) => {
                return Err(ExpressionError::WrongCardinality { operator, found });
            }
            None => {}
        }
    }
    Ok(elements)
}

fn element_base_type(elements: &[QtiValue]) -> Option<BaseType> {
    elements.first().and_then(QtiValue::base_type)
}

/// The `multiple` constructor.
pub(crate) fn multiple(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let elements = gather_elements("multiple", operands, Cardinality::Multiple)?;
    let Some(base_type) = element_base_type(&elements) else {
        return Ok(QtiValue::Null);
    };
    let container = MultipleContainer::with_values(base_type, elements)
        .map_err(|e| container_error("multiple", e))?;
    Ok(QtiValue::Multiple(container))
}

/// The `ordered` constructor.
pub(crate) fn ordered(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let elements = gather_elements("ordered", operands, Cardinality::Ordered)?;
    let Some(base_type) = element_base_type(&elements) else {
        return Ok(QtiValue::Null);
    };
    let container = OrderedContainer::with_values(base_type, elements)
        .map_err(|e| container_error("ordered", e))?;
    Ok(QtiValue::Ordered(container))
}

/// `containerSize`: element count; NULL counts as zero.
pub(crate) fn container_size(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::integer(0));
    }
    match operand.container_values() {
        Some(values) => Ok(QtiValue::integer(values.len() as i32)),
        None => Err(ExpressionError::WrongCardinality {
            operator: "containerSize",
            found: operand.cardinality().unwrap_or(Cardinality::Single),
        }),
    }
}

/// `isNull`: emptiness probe; never NULL itself.
pub(crate) fn is_null(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    Ok(QtiValue::boolean(operands[0].is_null()))
}

/// `index`: 1-based access into an ordered container. Any out-of-range
/// position, including a non-positive one, is NULL.
pub(crate) fn index(
    expr: &Index,
    operands: &[QtiValue],
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let container = operand.as_ordered().ok_or_else(|| {
        ExpressionError::WrongCardinality {
            operator: "index",
            found: operand.cardinality().unwrap_or(Cardinality::Single),
        }
    })?;
    let n = resolve_integer_ref(&expr.n, ctx)?;
    if n < 1 {
        return Ok(QtiValue::Null);
    }
    Ok(container
        .get(n as usize)
        .cloned()
        .unwrap_or(QtiValue::Null))
}

/// `fieldValue`: record field access; an absent field is NULL.
pub(crate) fn field_value(
    field_identifier: &str,
    operands: &[QtiValue],
) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let record = operand.as_record().ok_or_else(|| {
        ExpressionError::WrongCardinality {
            operator: "fieldValue",
            found: operand.cardinality().unwrap_or(Cardinality::Single),
        }
    })?;
    Ok(record
        .get(field_identifier)
        .cloned()
        .unwrap_or(QtiValue::Null))
}

/// `random`: uniform draw from a container.
pub(crate) fn random(
    operands: &[QtiValue],
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let values = operand.container_values().ok_or_else(|| {
        ExpressionError::WrongCardinality {
            operator: "random",
            found: operand.cardinality().unwrap_or(Cardinality::Single),
        }
    })?;
    let pick = ctx.rng().gen_range(0..values.len());
    Ok(values[pick].clone())
}

fn check_member_types(
    operator: &'static str,
    needle: &QtiValue,
    container: &QtiValue,
) -> ExpressionResult<()> {
    if needle.cardinality() != Some(Cardinality::Single) {
        return Err(ExpressionError::WrongCardinality {
            operator,
            found: needle.cardinality().unwrap_or(Cardinality::Single),
        });
    }
    match (needle.base_type(), container.base_type()) {
        (Some(a), Some(b)) if a == b => {
            if a == BaseType::Float {
                // Same caution as `match`: exact float identity is fragile.
                warn!("{operator} applied to float values; results depend on exact value identity");
            }
            Ok(())
        }
        (_, found) => Err(ExpressionError::WrongBaseType {
            operator,
            found: found.unwrap_or(BaseType::String),
        }),
    }
}

/// `member`: whether the first operand occurs in the second.
pub(crate) fn member(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let (needle, haystack) = (&operands[0], &operands[1]);
    if needle.is_null() || haystack.is_null() {
        return Ok(QtiValue::Null);
    }
    let values = haystack.container_values().ok_or_else(|| {
        ExpressionError::WrongCardinality {
            operator: "member",
            found: haystack.cardinality().unwrap_or(Cardinality::Single),
        }
    })?;
    check_member_types("member", needle, haystack)?;
    Ok(QtiValue::boolean(values.iter().any(|v| v == needle)))
}

/// `delete`: every occurrence of the first operand removed from the
/// second; the result keeps the source container's cardinality.
pub(crate) fn delete(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let (needle, source) = (&operands[0], &operands[1]);
    if needle.is_null() || source.is_null() {
        return Ok(QtiValue::Null);
    }
    check_member_types("delete", needle, source)?;
    match source {
        QtiValue::Multiple(c) => {
            let kept = c.values().iter().filter(|v| *v != needle).cloned();
            let container = MultipleContainer::with_values(c.base_type(), kept)
                .map_err(|e| container_error("delete", e))?;
            Ok(QtiValue::Multiple(container))
        }
        QtiValue::Ordered(c) => {
            let kept = c.values().iter().filter(|v| *v != needle).cloned();
            let container = OrderedContainer::with_values(c.base_type(), kept)
                .map_err(|e| container_error("delete", e))?;
            Ok(QtiValue::Ordered(container))
        }
        other => Err(ExpressionError::WrongCardinality {
            operator: "delete",
            found: other.cardinality().unwrap_or(Cardinality::Single),
        }),
    }
}

/// `contains`: whether the first container contains the second — multiset
/// inclusion for multiple cardinality, contiguous subsequence for ordered.
pub(crate) fn contains(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let (big, small) = (&operands[0], &operands[1]);
    if big.is_null() || small.is_null() {
        return Ok(QtiValue::Null);
    }
    match (big, small) {
        (QtiValue::Multiple(outer), QtiValue::Multiple(inner)) => {
            if outer.base_type() != inner.base_type() {
                return Err(ExpressionError::WrongBaseType {
                    operator: "contains",
                    found: inner.base_type(),
                });
            }
            let included = inner
                .distinct()
                .values()
                .iter()
                .all(|v| inner.occurrences(v) <= outer.occurrences(v));
            Ok(QtiValue::boolean(included))
        }
        (QtiValue::Ordered(outer), QtiValue::Ordered(inner)) => {
            if outer.base_type() != inner.base_type() {
                return Err(ExpressionError::WrongBaseType {
                    operator: "contains",
                    found: inner.base_type(),
                });
            }
            let (haystack, needle) = (outer.values(), inner.values());
            let found = needle.is_empty()
                || haystack
                    .windows(needle.len())
                    .any(|window| window == needle);
            Ok(QtiValue::boolean(found))
        }
        _ => Err(ExpressionError::WrongCardinality {
            operator: "contains",
            found: small.cardinality().unwrap_or(Cardinality::Single),
        }),
    }
}
