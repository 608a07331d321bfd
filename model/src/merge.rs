use crate::error::{self, Result};
use crate::property::Property;
use log::trace;
use snafu::ensure;
use std::collections::HashMap;

/// Merges ordered property sequences into one ordered sequence with each key exactly once.
///
/// Sequences are visited in order, and each sequence in its own order. When a key shows up again
/// its property replaces the earlier one in place: the last property wins on value and the first
/// appearance wins on position. A property with an empty key is an error.
///
/// ```
/// use spi_model::{merge_properties, DisplayProperty, Property};
///
/// let property = |key: &str, name: &str| {
///     let options = spi_model::DisplayPropertyOptions {
///         name: name.to_string(),
///         ..Default::default()
///     };
///     DisplayProperty::new(key, options).unwrap()
/// };
///
/// let base = vec![property("a", "first"), property("b", "first")];
/// let overrides = vec![property("c", "second"), property("a", "second")];
/// let merged = merge_properties(vec![base, overrides]).unwrap();
///
/// let names: Vec<_> = merged.iter().map(|p| (p.key(), p.name())).collect();
/// assert_eq!(names, vec![("a", "second"), ("b", "first"), ("c", "second")]);
/// ```
pub fn merge_properties<P, I, S>(sequences: I) -> Result<Vec<P>>
where
    P: Property,
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = P>,
{
    let mut merged: Vec<P> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (sequence, properties) in sequences.into_iter().enumerate() {
        for (position, property) in properties.into_iter().enumerate() {
            ensure!(
                !property.key().is_empty(),
                error::MissingPropertyKeySnafu { sequence, position }
            );
            match positions.get(property.key()) {
                Some(&index) => {
                    trace!(
                        "property '{}' overridden by sequence {}",
                        property.key(),
                        sequence
                    );
                    merged[index] = property;
                }
                None => {
                    positions.insert(property.key().to_string(), merged.len());
                    merged.push(property);
                }
            }
        }
    }
    Ok(merged)
}

/// Variadic form of [`merge_properties`]. Each argument may be any `IntoIterator` of properties.
/// With no arguments it evaluates to an empty `Ok` result.
#[macro_export]
macro_rules! merge_properties {
    () => {
        $crate::Result::Ok(::std::vec::Vec::new())
    };
    ($($sequence:expr),+ $(,)?) => {
        $crate::merge_properties([$(
            ::std::iter::IntoIterator::into_iter($sequence).collect::<::std::vec::Vec<_>>()
        ),+])
    };
}
