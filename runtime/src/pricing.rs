//! Price estimation from fame and artwork features.
//!
//! The regressors themselves are external; they plug in through
//! `PriceModel`. This module validates form input, lays out the feature
//! vector the tabular model was trained on, and blends the two predictions.

use std::collections::HashMap;
use thiserror::Error;

/// Movement flags, in feature-vector order after fame and year.
pub const MOVEMENTS: [&str; 13] = [
    "abstract",
    "abstract_expressionism",
    "art_brut",
    "art_deco",
    "art_nouveau",
    "baroque",
    "conceptual",
    "cubism",
    "environmental_art",
    "expressionism",
    "feminist_art",
    "geometric_abstraction",
    "impressionism",
];

/// Weight of the tabular prediction in the blend.
pub const TABULAR_WEIGHT: f64 = 0.99;

/// Side length (pixels) of the square RGB image the image model expects.
pub const IMAGE_SIDE: usize = 150;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("artist name is required")]
    MissingArtist,

    #[error("'{field}' must be an integer, got '{value}'")]
    InvalidInteger { field: String, value: String },

    #[error("image input has {actual} values, expected {expected}")]
    InvalidImage { expected: usize, actual: usize },

    #[error("model error: {0}")]
    Model(String),
}

/// A trained regressor.
pub trait PriceModel {
    fn predict(&self, input: &[f64]) -> Result<f64, PricingError>;
}

/// Validated tabular features for one artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkFeatures {
    pub fame: u32,
    pub year: i64,
    pub movements: [i64; 13],
}

impl ArtworkFeatures {
    /// Validate raw form fields. Blank fields count as 0; anything else must
    /// parse as an integer. Movement fields are keyed by `MOVEMENTS` names.
    pub fn from_form(
        artist: &str,
        fame: u32,
        year: &str,
        movements: &HashMap<String, String>,
    ) -> Result<Self, PricingError> {
        if artist.trim().is_empty() {
            return Err(PricingError::MissingArtist);
        }
        let year = parse_field("year", year)?;
        let mut flags = [0i64; 13];
        for (slot, field) in flags.iter_mut().zip(MOVEMENTS) {
            let raw = movements.get(field).map(String::as_str).unwrap_or("");
            *slot = parse_field(field, raw)?;
        }
        Ok(Self {
            fame,
            year,
            movements: flags,
        })
    }

    /// `[fame, year, movements...]`.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(2 + self.movements.len());
        v.push(f64::from(self.fame));
        v.push(self.year as f64);
        v.extend(self.movements.iter().map(|&m| m as f64));
        v
    }
}

fn parse_field(field: &str, raw: &str) -> Result<i64, PricingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(|_| PricingError::InvalidInteger {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Weighted blend of the two predictions, rounded to cents.
pub fn blend(image_price: f64, tabular_price: f64) -> f64 {
    let price = image_price * (1.0 - TABULAR_WEIGHT) + TABULAR_WEIGHT * tabular_price;
    (price * 100.0).round() / 100.0
}

/// Predict a sell price from tabular features and a preprocessed image
/// (`IMAGE_SIDE` x `IMAGE_SIDE` x 3 values).
pub fn estimate_price(
    features: &ArtworkFeatures,
    tabular: &dyn PriceModel,
    image_input: &[f64],
    image: &dyn PriceModel,
) -> Result<f64, PricingError> {
    let expected = IMAGE_SIDE * IMAGE_SIDE * 3;
    if image_input.len() != expected {
        return Err(PricingError::InvalidImage {
            expected,
            actual: image_input.len(),
        });
    }
    let image_price = image.predict(image_input)?;
    let tabular_price = tabular.predict(&features.to_vector())?;
    Ok(blend(image_price, tabular_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Linear(Vec<f64>);

    impl PriceModel for Linear {
        fn predict(&self, input: &[f64]) -> Result<f64, PricingError> {
            Ok(self.0.iter().zip(input).map(|(w, x)| w * x).sum())
        }
    }

    struct Constant(f64);

    impl PriceModel for Constant {
        fn predict(&self, _input: &[f64]) -> Result<f64, PricingError> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl PriceModel for Broken {
        fn predict(&self, _input: &[f64]) -> Result<f64, PricingError> {
            Err(PricingError::Model("weights not loaded".into()))
        }
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_form_blanks_are_zero() {
        let f = ArtworkFeatures::from_form("Claude Monet", 120, " 1872 ", &form(&[("impressionism", "1")]))
            .unwrap();
        assert_eq!(f.year, 1872);
        assert_eq!(f.movements[12], 1);
        assert_eq!(f.movements.iter().sum::<i64>(), 1);
        let v = f.to_vector();
        assert_eq!(v.len(), 15);
        assert_eq!(v[0], 120.0);
        assert_eq!(v[1], 1872.0);
        assert_eq!(v[14], 1.0);
    }

    #[test]
    fn test_from_form_rejects_non_integers() {
        let err = ArtworkFeatures::from_form("Monet", 0, "18th century", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidInteger {
                field: "year".into(),
                value: "18th century".into()
            }
        );
        let err = ArtworkFeatures::from_form("Monet", 0, "1900", &form(&[("cubism", "yes")])).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInteger { field, .. } if field == "cubism"));
        assert_eq!(
            ArtworkFeatures::from_form(" ", 0, "", &HashMap::new()).unwrap_err(),
            PricingError::MissingArtist
        );
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(1000.0, 2000.0), 1990.0);
        assert_eq!(blend(0.0, 0.0), 0.0);
        assert_eq!(blend(123.456, 100.0), 100.23);
    }

    #[test]
    fn test_estimate_price() {
        let features = ArtworkFeatures::from_form("Monet", 10, "1900", &HashMap::new()).unwrap();
        let mut weights = vec![0.0; 15];
        weights[0] = 50.0;
        let tabular = Linear(weights);
        let pixels = vec![0.5; IMAGE_SIDE * IMAGE_SIDE * 3];
        let price = estimate_price(&features, &tabular, &pixels, &Constant(1500.0)).unwrap();
        // 1500 * 0.01 + 500 * 0.99
        assert_eq!(price, 510.0);

        assert!(matches!(
            estimate_price(&features, &tabular, &[0.0; 4], &Constant(1.0)),
            Err(PricingError::InvalidImage { actual: 4, .. })
        ));
        assert!(matches!(
            estimate_price(&features, &Broken, &pixels, &Constant(1.0)),
            Err(PricingError::Model(_))
        ));
    }
}
