// Printing cylinder reference record.
//
// Purpose
// - Flat datasheet row: brand, T-number, gears, cylinder count, size and distortion size.
//
// Notes
// - Older documents stored the numeric fields as the raw form strings ("4", "4.5", "").
//   They are read leniently and written back as numbers. Whole numbers are not enforced.
// - Every measurement must be finite: a non-finite f64 serializes as null and could not be
//   read back.

use serde::{Deserialize, Deserializer, Serialize};

pub const XIN_HU: &str = "Xin Hu";
pub const JINGDA: &str = "Jingda";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cylinder {
    pub id: String,
    pub brand: String,
    pub t_no: String,
    #[serde(deserialize_with = "lenient::measure")]
    pub gears: f64,
    #[serde(deserialize_with = "lenient::measure")]
    pub count: f64,
    #[serde(rename = "sizeMM", deserialize_with = "lenient::measure")]
    pub size_mm: f64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_measure",
        skip_serializing_if = "Option::is_none"
    )]
    pub distortion: Option<f64>,
}

/// Input for a new cylinder; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCylinder {
    pub brand: String,
    pub t_no: String,
    #[serde(deserialize_with = "lenient::measure")]
    pub gears: f64,
    #[serde(deserialize_with = "lenient::measure")]
    pub count: f64,
    #[serde(rename = "sizeMM", deserialize_with = "lenient::measure")]
    pub size_mm: f64,
    #[serde(default, deserialize_with = "lenient::optional_measure")]
    pub distortion: Option<f64>,
}

impl NewCylinder {
    /// Name of the first non-finite measurement, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("gears", self.gears),
            ("count", self.count),
            ("sizeMM", self.size_mm),
            ("distortion", self.distortion.unwrap_or(0.0)),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

impl Cylinder {
    pub fn from_new(id: impl Into<String>, new: NewCylinder) -> Self {
        Self {
            id: id.into(),
            brand: new.brand,
            t_no: new.t_no,
            gears: new.gears,
            count: new.count,
            size_mm: new.size_mm,
            distortion: new.distortion,
        }
    }

    /// Numeric part of the T-number (`"T120"` -> 120). Anything without digits sorts as 0.
    pub fn t_number(&self) -> u64 {
        let digits: String = self.t_no.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }
}

mod lenient {
    use super::*;
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    fn parse<E: Error>(raw: NumberOrText) -> Result<Option<f64>, E> {
        let value = match raw {
            NumberOrText::Number(n) => n,
            NumberOrText::Text(text) if text.trim().is_empty() => return Ok(None),
            NumberOrText::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {text:?}")))?,
        };
        if !value.is_finite() {
            return Err(E::custom(format!("expected a finite number, got {value}")));
        }
        Ok(Some(value))
    }

    pub fn measure<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        parse(NumberOrText::deserialize(deserializer)?)?
            .ok_or_else(|| D::Error::custom("missing measurement"))
    }

    pub fn optional_measure<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(raw) => parse(raw),
            None => Ok(None),
        }
    }
}
