use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serializes as the string form so records stay flat key/value.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// Flag as printed next to the value on the source report.
str_enum!(AbnormalFlag {
    High => "H",
    Low => "L",
});

str_enum!(MarkerCategory {
    Cbc => "CBC",
    Chemistry => "Chemistry",
    LipidPanel => "Lipid Panel",
    Inflammatory => "Inflammatory Markers",
    Other => "Other",
});

str_enum!(ConversionOp {
    Multiply => "multiply",
    Divide => "divide",
});

impl AbnormalFlag {
    /// Accept the spellings LLM fallbacks and report footers use
    /// ("H", "high", "HIGH", "L", "low"). Anything else is no flag.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "h" | "high" | "hi" | "+" => Some(Self::High),
            "l" | "low" | "lo" | "-" => Some(Self::Low),
            _ => None,
        }
    }
}

impl ConversionOp {
    pub fn apply(&self, value: f64, factor: f64) -> f64 {
        match self {
            Self::Multiply => value * factor,
            Self::Divide => value / factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn abnormal_flag_round_trip() {
        for (variant, s) in [(AbnormalFlag::High, "H"), (AbnormalFlag::Low, "L")] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AbnormalFlag::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn marker_category_round_trip() {
        for (variant, s) in [
            (MarkerCategory::Cbc, "CBC"),
            (MarkerCategory::Chemistry, "Chemistry"),
            (MarkerCategory::LipidPanel, "Lipid Panel"),
            (MarkerCategory::Inflammatory, "Inflammatory Markers"),
            (MarkerCategory::Other, "Other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MarkerCategory::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AbnormalFlag::from_str("X").is_err());
        assert!(ConversionOp::from_str("add").is_err());
        assert!(MarkerCategory::from_str("").is_err());
    }

    #[test]
    fn lenient_flag_parsing() {
        assert_eq!(AbnormalFlag::parse_lenient("high"), Some(AbnormalFlag::High));
        assert_eq!(AbnormalFlag::parse_lenient(" L "), Some(AbnormalFlag::Low));
        assert_eq!(AbnormalFlag::parse_lenient("normal"), None);
        assert_eq!(AbnormalFlag::parse_lenient(""), None);
    }

    #[test]
    fn serializes_as_string_form() {
        let json = serde_json::to_string(&MarkerCategory::LipidPanel).unwrap();
        assert_eq!(json, "\"Lipid Panel\"");
        let op: ConversionOp = serde_json::from_str("\"divide\"").unwrap();
        assert_eq!(op, ConversionOp::Divide);
        assert!(serde_json::from_str::<ConversionOp>("\"modulo\"").is_err());
    }

    #[test]
    fn conversion_op_applies() {
        assert_eq!(ConversionOp::Divide.apply(90.0, 18.0), 5.0);
        assert_eq!(ConversionOp::Multiply.apply(1.5, 10.0), 15.0);
    }
}
