//! Closed vocabularies for catalog fields.
//!
//! Every value is stored and serialized in snake_case; parsing an unknown
//! value is a validation failure, never a fallback.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// An input value outside a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {vocabulary}")]
pub struct UnknownVariant {
    /// Name of the vocabulary that rejected the value.
    pub vocabulary: &'static str,

    /// The offending input.
    pub value: String,
}

impl UnknownVariant {
    fn new(vocabulary: &'static str, value: &str) -> Self {
        Self {
            vocabulary,
            value: value.to_string(),
        }
    }
}

/// Parses a vocabulary value out of a request field, attributing the
/// failure to that field.
pub(crate) fn parse_field<T>(field: &'static str, value: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .parse()
        .map_err(|e: UnknownVariant| ValidationError::new(field, e.to_string()))
}

/// Category names the store sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryName {
    Caps,
    Tshirts,
}

impl CategoryName {
    /// Returns the name as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryName::Caps => "caps",
            CategoryName::Tshirts => "tshirts",
        }
    }
}

impl FromStr for CategoryName {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "caps" => Ok(CategoryName::Caps),
            "tshirts" => Ok(CategoryName::Tshirts),
            other => Err(UnknownVariant::new("category name", other)),
        }
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Garment and logo colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colour {
    White,
    Black,
    Blue,
    Green,
    Yellow,
    Red,
}

impl Colour {
    /// Returns the colour as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Colour::White => "white",
            Colour::Black => "black",
            Colour::Blue => "blue",
            Colour::Green => "green",
            Colour::Yellow => "yellow",
            Colour::Red => "red",
        }
    }
}

impl FromStr for Colour {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Colour::White),
            "black" => Ok(Colour::Black),
            "blue" => Ok(Colour::Blue),
            "green" => Ok(Colour::Green),
            "yellow" => Ok(Colour::Yellow),
            "red" => Ok(Colour::Red),
            other => Err(UnknownVariant::new("colour", other)),
        }
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Garment sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    ExtraSmall,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Size {
    /// Returns the size as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::ExtraSmall => "extra_small",
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
            Size::ExtraLarge => "extra_large",
        }
    }
}

impl FromStr for Size {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extra_small" => Ok(Size::ExtraSmall),
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            "extra_large" => Ok(Size::ExtraLarge),
            other => Err(UnknownVariant::new("size", other)),
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intended fit of a garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sizing {
    Male,
    Female,
    Unisex,
}

impl Sizing {
    /// Returns the sizing as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sizing::Male => "male",
            Sizing::Female => "female",
            Sizing::Unisex => "unisex",
        }
    }
}

impl FromStr for Sizing {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sizing::Male),
            "female" => Ok(Sizing::Female),
            "unisex" => Ok(Sizing::Unisex),
            other => Err(UnknownVariant::new("sizing", other)),
        }
    }
}

impl std::fmt::Display for Sizing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Garment fabrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fabric {
    Cotton,
    Lycra,
    Polyester,
}

impl Fabric {
    /// Returns the fabric as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Fabric::Cotton => "cotton",
            Fabric::Lycra => "lycra",
            Fabric::Polyester => "polyester",
        }
    }
}

impl FromStr for Fabric {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cotton" => Ok(Fabric::Cotton),
            "lycra" => Ok(Fabric::Lycra),
            "polyester" => Ok(Fabric::Polyester),
            other => Err(UnknownVariant::new("fabric", other)),
        }
    }
}

impl std::fmt::Display for Fabric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_roundtrip() {
        for name in ["caps", "tshirts"] {
            let parsed: CategoryName = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_category_name_is_rejected() {
        let err = "socks".parse::<CategoryName>().unwrap_err();
        assert_eq!(err.to_string(), "'socks' is not a valid category name");
    }

    #[test]
    fn test_colour_parse_is_case_sensitive() {
        assert!("white".parse::<Colour>().is_ok());
        assert!("White".parse::<Colour>().is_err());
    }

    #[test]
    fn test_size_serde_uses_snake_case() {
        let json = serde_json::to_string(&Size::ExtraSmall).unwrap();
        assert_eq!(json, "\"extra_small\"");
        let back: Size = serde_json::from_str("\"extra_large\"").unwrap();
        assert_eq!(back, Size::ExtraLarge);
    }

    #[test]
    fn test_fabric_vocabulary() {
        assert_eq!("cotton".parse::<Fabric>().unwrap(), Fabric::Cotton);
        assert_eq!("lycra".parse::<Fabric>().unwrap(), Fabric::Lycra);
        assert_eq!("polyester".parse::<Fabric>().unwrap(), Fabric::Polyester);
        assert!("wool".parse::<Fabric>().is_err());
    }

    #[test]
    fn test_sizing_display_matches_as_str() {
        assert_eq!(Sizing::Unisex.to_string(), "unisex");
    }
}
