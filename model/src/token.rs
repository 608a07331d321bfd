use crate::property::Property;

/// A property token wraps exactly one property. Providers typically declare their properties as a
/// field-less enum that implements `PropertyToken`, which gives every property a name that can be
/// used in code (e.g. for configuration lookups) while keeping the declaration in one place.
///
/// # Example
///
/// ```
/// use spi_model::{
///     expand_tokens, ConfigurationProperty, ConfigurationPropertyOptions, Property, PropertyToken,
/// };
///
/// #[derive(Clone, Copy)]
/// enum RegionToken {
///     Region,
///     Zone,
/// }
///
/// impl PropertyToken for RegionToken {
///     type Property = ConfigurationProperty;
///
///     fn property(&self) -> ConfigurationProperty {
///         let key = match self {
///             RegionToken::Region => "region",
///             RegionToken::Zone => "zone",
///         };
///         ConfigurationProperty::new(key, ConfigurationPropertyOptions::default()).unwrap()
///     }
/// }
///
/// let properties = expand_tokens([RegionToken::Region, RegionToken::Zone]);
/// assert_eq!(properties[1].key(), "zone");
/// ```
pub trait PropertyToken {
    type Property: Property;

    /// The property this token stands for.
    fn property(&self) -> Self::Property;
}

impl<T> PropertyToken for &T
where
    T: PropertyToken + ?Sized,
{
    type Property = T::Property;

    fn property(&self) -> Self::Property {
        (**self).property()
    }
}

/// Unwraps each token into its property, preserving order and count. No merging takes place, so
/// the result may be handed to [`merge_properties`](crate::merge_properties) afterwards.
pub fn expand_tokens<I, T>(tokens: I) -> Vec<T::Property>
where
    I: IntoIterator<Item = T>,
    T: PropertyToken,
{
    tokens.into_iter().map(|token| token.property()).collect()
}
