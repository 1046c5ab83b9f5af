use serde::{Deserialize, Serialize};

/// Qualitative rating of a dial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Mediocre,
    Bad,
    /// No rating applies (unthresholded metric or undefined value).
    Neutral,
}

impl Tier {
    pub fn css_color(&self) -> &'static str {
        match self {
            Tier::Good => "#2ca02c",
            Tier::Mediocre => "#ff7f0e",
            Tier::Bad => "#d62728",
            Tier::Neutral => "#7f7f7f",
        }
    }
}

/// Good/mediocre/bad thresholds.
///
/// When `good_limit < bad_limit` small values are good, otherwise large
/// values are. The lower limit always belongs to the upper band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub good_limit: f64,
    pub bad_limit: f64,
}

impl Thresholds {
    pub const fn new(good_limit: f64, bad_limit: f64) -> Self {
        Self { good_limit, bad_limit }
    }

    pub fn lower_is_better(&self) -> bool {
        self.good_limit < self.bad_limit
    }

    pub fn classify(&self, value: f64) -> Tier {
        if value.is_nan() {
            return Tier::Neutral;
        }
        let (first_limit, second_limit, bands) = if self.lower_is_better() {
            (self.good_limit, self.bad_limit, [Tier::Good, Tier::Mediocre, Tier::Bad])
        } else {
            (self.bad_limit, self.good_limit, [Tier::Bad, Tier::Mediocre, Tier::Good])
        };
        if value < first_limit {
            bands[0]
        } else if value < second_limit {
            bands[1]
        } else {
            bands[2]
        }
    }
}

/// How a metric's dial values are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorScheme {
    Neutral,
    GoodMediocreBad(Thresholds),
}

impl ColorScheme {
    pub fn classify(&self, value: Option<f64>) -> Tier {
        match (self, value) {
            (ColorScheme::GoodMediocreBad(t), Some(v)) => t.classify(v),
            _ => Tier::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_orientation() {
        let t = Thresholds::new(90.0, 80.0);
        assert!(!t.lower_is_better());
        assert_eq!(t.classify(79.9), Tier::Bad);
        assert_eq!(t.classify(80.0), Tier::Mediocre);
        assert_eq!(t.classify(90.0), Tier::Good);
    }

    #[test]
    fn undefined_value_is_neutral() {
        let scheme = ColorScheme::GoodMediocreBad(Thresholds::new(3.0, 6.0));
        assert_eq!(scheme.classify(None), Tier::Neutral);
        assert_eq!(scheme.classify(Some(f64::NAN)), Tier::Neutral);
        assert_eq!(ColorScheme::Neutral.classify(Some(1.0)), Tier::Neutral);
    }
}
