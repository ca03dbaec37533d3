//! Typed choice adapters.
//!
//! Selection widgets submit opaque string tokens. This module converts closed enumerations and
//! booleans into `(token, label)` choice lists and back from submitted tokens into typed values.
//!
//! Enumerations are declared with [`choice_enum!`], which generates an explicit [`ChoiceEnum`]
//! implementation per type, so token lookup is a plain `match` with no runtime type inspection.
//!
//! Token rules for enumerations:
//! - an integer token selects the variant with that key,
//! - any other token selects the variant with that name, after dropping everything up to and
//!   including the last `.` (so `Cepod.Emergency` and `Emergency` are equivalent),
//! - a missing or empty token is "no value", which the caller checks against requiredness.

use crate::constants::{FALSE_TOKEN, TRUE_TOKEN};
use crate::error::ChoiceError;
use registry_types::Choice;

/// A closed enumeration that can be offered as a selection widget.
pub trait ChoiceEnum: Copy + Eq + std::fmt::Debug + 'static {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Integer key, also the submitted token.
    fn key(self) -> i64;

    /// Symbolic variant name.
    fn name(self) -> &'static str;

    /// Human readable label.
    fn label(self) -> &'static str;

    fn token(self) -> String {
        self.key().to_string()
    }

    fn from_key(key: i64) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.key() == key)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }
}

/// Declares a closed enumeration together with its [`ChoiceEnum`] implementation, `FromStr`,
/// `Display` (label) and field coercion.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $key:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::choices::ChoiceEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn key(self) -> i64 {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::choices::coerce::<Self>(Some(s))?.ok_or_else(|| {
                    $crate::error::ChoiceError::invalid(stringify!($name), s)
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::choices::ChoiceEnum::label(*self))
            }
        }

        impl $crate::fields::FieldValue for $name {
            fn coerce(raw: &str) -> Result<Self, $crate::error::Rejection> {
                $crate::choices::coerce::<Self>(Some(raw))?.ok_or_else(|| {
                    $crate::error::Rejection::from($crate::error::ChoiceError::invalid(
                        stringify!($name),
                        raw,
                    ))
                })
            }

            fn render(&self) -> String {
                $crate::choices::ChoiceEnum::token(*self)
            }
        }
    };
}

pub(crate) use choice_enum;

/// Either a value that is already typed (pre-populated from a record) or raw submitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted<'a, T> {
    Typed(T),
    Raw(Option<&'a str>),
}

/// Choice list for `E`, one `(key, label)` pair per variant in declaration order, optionally
/// prefixed with the blank `("", "(Any)")` sentinel.
pub fn choices_for<E: ChoiceEnum>(include_blank: bool) -> Vec<Choice> {
    let blank = include_blank.then(Choice::blank);
    blank
        .into_iter()
        .chain(E::VARIANTS.iter().map(|v| Choice::new(v.token(), v.label())))
        .collect()
}

/// Coerce a submitted token into a variant of `E`.
///
/// # Errors
///
/// Returns [`ChoiceError::InvalidChoice`] when the token is an unknown key or name.
pub fn coerce<E: ChoiceEnum>(raw: Option<&str>) -> Result<Option<E>, ChoiceError> {
    let Some(token) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if let Ok(key) = token.parse::<i64>() {
        return E::from_key(key)
            .map(Some)
            .ok_or_else(|| ChoiceError::invalid(E::TYPE_NAME, token));
    }

    let name = token.rsplit_once('.').map_or(token, |(_, name)| name);
    E::from_name(name)
        .map(Some)
        .ok_or_else(|| ChoiceError::invalid(E::TYPE_NAME, token))
}

/// Like [`coerce`], but a typed value passes through unchanged.
pub fn coerce_value<E: ChoiceEnum>(value: Submitted<'_, E>) -> Result<Option<E>, ChoiceError> {
    match value {
        Submitted::Typed(v) => Ok(Some(v)),
        Submitted::Raw(raw) => coerce::<E>(raw),
    }
}

/// The fixed `True` / `False` choice list. Booleans never get a blank option.
pub fn choices_for_bool() -> Vec<Choice> {
    vec![
        Choice::new(TRUE_TOKEN, "True"),
        Choice::new(FALSE_TOKEN, "False"),
    ]
}

pub fn bool_token(value: bool) -> &'static str {
    if value {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    }
}

/// Coerce a submitted token into a boolean. Matching is case-insensitive.
///
/// # Errors
///
/// Returns [`ChoiceError::InvalidChoice`] for anything outside the truthy/falsy sets.
pub fn coerce_bool(raw: Option<&str>) -> Result<Option<bool>, ChoiceError> {
    let Some(token) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    match token.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ChoiceError::invalid("bool", token)),
    }
}

pub fn coerce_bool_value(value: Submitted<'_, bool>) -> Result<Option<bool>, ChoiceError> {
    match value {
        Submitted::Typed(v) => Ok(Some(v)),
        Submitted::Raw(raw) => coerce_bool(raw),
    }
}
