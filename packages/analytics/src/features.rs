//! Reconstructs the one-hot model input from dashboard selections.
//!
//! Unknown states or crime types leave their indicator block at zero so
//! the model predicts from its no-indicator baseline instead of failing.

use crime_dash_crime_models::{
    CrimeSelector, FeatureSchema, FeatureVector, IndicatorFamily, YEAR_FEATURE,
};

/// Builds the feature vector for `(state, crime, year)` over `schema`.
///
/// Every schema feature starts at zero. `Year` takes the selected year,
/// the matching `State_` indicator (if any) takes 1, and either the
/// matching `Crime_Type_` indicator or, for [`CrimeSelector::Combined`],
/// every `Crime_Type_` indicator takes 1.
#[must_use]
pub fn build(schema: &FeatureSchema, state: &str, crime: &CrimeSelector, year: i32) -> FeatureVector {
    let mut vector = FeatureVector::zeroed(schema);

    vector.set(YEAR_FEATURE, f64::from(year));

    let state_key = IndicatorFamily::State.feature_name(state);
    if schema.contains(&state_key) {
        vector.set(&state_key, 1.0);
    } else {
        log::debug!("No indicator for state '{state}'; using baseline");
    }

    match crime {
        CrimeSelector::Combined => {
            for name in schema.indicators(IndicatorFamily::CrimeType) {
                vector.set(name, 1.0);
            }
        }
        CrimeSelector::Single(crime_type) => {
            let crime_key = IndicatorFamily::CrimeType.feature_name(crime_type);
            if schema.contains(&crime_key) {
                vector.set(&crime_key, 1.0);
            } else {
                log::debug!("No indicator for crime type '{crime_type}'; using baseline");
            }
        }
    }

    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            ["Year", "State_X", "State_Y", "Crime_Type_Theft", "Crime_Type_Assault"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        )
        .unwrap()
    }

    fn value(vector: &FeatureVector, name: &str) -> f64 {
        vector.get(name).unwrap()
    }

    #[test]
    fn combined_sets_every_crime_indicator() {
        let vector = build(&schema(), "X", &CrimeSelector::Combined, 2030);

        assert!((value(&vector, "Year") - 2030.0).abs() < f64::EPSILON);
        assert!((value(&vector, "State_X") - 1.0).abs() < f64::EPSILON);
        assert!(value(&vector, "State_Y").abs() < f64::EPSILON);
        assert!((value(&vector, "Crime_Type_Theft") - 1.0).abs() < f64::EPSILON);
        assert!((value(&vector, "Crime_Type_Assault") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_state_leaves_state_block_zero() {
        let vector = build(&schema(), "Z", &CrimeSelector::from("Theft"), 2025);

        assert!((value(&vector, "Year") - 2025.0).abs() < f64::EPSILON);
        assert!(vector.indicator_sum(IndicatorFamily::State).abs() < f64::EPSILON);
        assert!((value(&vector, "Crime_Type_Theft") - 1.0).abs() < f64::EPSILON);
        assert!(value(&vector, "Crime_Type_Assault").abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_crime_type_leaves_crime_block_zero() {
        let vector = build(&schema(), "Y", &CrimeSelector::from("Arson"), 2020);

        assert!((value(&vector, "State_Y") - 1.0).abs() < f64::EPSILON);
        assert!(vector.indicator_sum(IndicatorFamily::CrimeType).abs() < f64::EPSILON);
    }

    #[test]
    fn keys_always_equal_schema() {
        let schema = schema();
        let states = ["X", "Y", "Z", ""];
        let crimes = [
            CrimeSelector::Combined,
            CrimeSelector::from("Theft"),
            CrimeSelector::from("Assault"),
            CrimeSelector::from("Fraud"),
        ];

        for state in states {
            for crime in &crimes {
                for year in [1990, 2021, 2050, 3000] {
                    let vector = build(&schema, state, crime, year);
                    assert!(vector.missing_from(&schema).is_empty());
                    assert!(vector.unexpected_for(&schema).is_empty());
                    assert!(vector.indicator_sum(IndicatorFamily::State) <= 1.0);

                    let crime_sum = vector.indicator_sum(IndicatorFamily::CrimeType);
                    if crime.is_combined() {
                        assert!((crime_sum - 2.0).abs() < f64::EPSILON);
                    } else {
                        assert!(crime_sum <= 1.0);
                    }
                }
            }
        }
    }

    #[test]
    fn year_beyond_training_range_is_kept() {
        let vector = build(&schema(), "X", &CrimeSelector::Combined, 2099);
        assert!((value(&vector, "Year") - 2099.0).abs() < f64::EPSILON);
    }
}
