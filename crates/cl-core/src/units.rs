// cl-core/src/units.rs

use core::fmt;
use core::str::FromStr;

use uom::si::f64::Length as UomLength;
use uom::si::length::{centimeter, inch, meter, millimeter};

use crate::CoreError;

// Public canonical unit type (SI, f64)
pub type Length = UomLength;

/// Unit the optimizer reports bar and segment lengths in.
///
/// Serialized as its symbol; any spelling [`FromStr`] accepts also decodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "&'static str"))]
pub enum LengthUnit {
    #[default]
    Millimeter,
    Centimeter,
    Meter,
    Inch,
}

impl LengthUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Inch => "in",
        }
    }

    /// Interpret a raw document value in this unit.
    pub fn length(self, v: f64) -> Length {
        match self {
            Self::Millimeter => Length::new::<millimeter>(v),
            Self::Centimeter => Length::new::<centimeter>(v),
            Self::Meter => Length::new::<meter>(v),
            Self::Inch => Length::new::<inch>(v),
        }
    }

    /// Convert a raw value from this unit into metres.
    pub fn to_meters(self, v: f64) -> f64 {
        self.length(v).get::<meter>()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimetre" => Ok(Self::Millimeter),
            "cm" | "centimeter" | "centimetre" => Ok(Self::Centimeter),
            "m" | "meter" | "metre" => Ok(Self::Meter),
            "in" | "inch" => Ok(Self::Inch),
            other => Err(CoreError::UnknownUnit {
                unit: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LengthUnit {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LengthUnit> for &'static str {
    fn from(unit: LengthUnit) -> Self {
        unit.symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millimetres_to_metres() {
        let v = LengthUnit::Millimeter.to_meters(6000.0);
        assert!((v - 6.0).abs() < 1e-12);
    }

    #[test]
    fn inches_to_metres() {
        let v = LengthUnit::Inch.to_meters(100.0);
        assert!((v - 2.54).abs() < 1e-12);
        let v = LengthUnit::Centimeter.to_meters(600.0);
        assert!((v - 6.0).abs() < 1e-12);
    }

    #[test]
    fn parse_units() {
        assert_eq!("MM".parse::<LengthUnit>().unwrap(), LengthUnit::Millimeter);
        assert_eq!("metre".parse::<LengthUnit>().unwrap(), LengthUnit::Meter);
        assert!("furlong".parse::<LengthUnit>().is_err());
    }
}
