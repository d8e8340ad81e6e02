//! Column naming convention for blend datasets.
//!
//! Input files describe up to [`COMPONENT_COUNT`] blend components, each with a
//! volume fraction and up to [`PROPERTY_COUNT`] measured properties. The model
//! predicts [`TARGET_COUNT`] blend-level properties.

use once_cell::sync::Lazy;

/// Number of blend components in the naming scheme (`Component1..=Component5`).
pub const COMPONENT_COUNT: usize = 5;

/// Number of per-component properties (`Property1..=Property10`).
pub const PROPERTY_COUNT: usize = 10;

/// Number of predicted blend properties (`BlendProperty1..=BlendProperty10`).
pub const TARGET_COUNT: usize = 10;

/// Default name of the row identifier column.
pub const DEFAULT_ID_COLUMN: &str = "ID";

/// Substring that marks a column as a component fraction.
pub const FRACTION_MARKER: &str = "fraction";

/// Names of the engineered weighted-average columns, in output order.
pub static WEIGHTED_AVG_COLUMNS: Lazy<Vec<String>> =
    Lazy::new(|| (1..=PROPERTY_COUNT).map(weighted_avg_column).collect());

/// Names of the prediction columns, in output order.
pub static TARGET_COLUMNS: Lazy<Vec<String>> =
    Lazy::new(|| (1..=TARGET_COUNT).map(target_column).collect());

/// `Component{component}_fraction`
pub fn fraction_column(component: usize) -> String {
    format!("Component{component}_fraction")
}

/// `Component{component}_Property{property}`
pub fn property_column(component: usize, property: usize) -> String {
    format!("Component{component}_Property{property}")
}

/// `WeightedAvg_Property{property}`
pub fn weighted_avg_column(property: usize) -> String {
    format!("WeightedAvg_Property{property}")
}

/// `BlendProperty{target}`
pub fn target_column(target: usize) -> String {
    format!("BlendProperty{target}")
}

/// Whether a column is carried into the model input as a fraction column.
///
/// Matches on the substring, not the exact `Component{j}_fraction` pattern.
#[inline]
pub fn is_fraction_column(name: &str) -> bool {
    name.contains(FRACTION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(fraction_column(3), "Component3_fraction");
        assert_eq!(property_column(5, 10), "Component5_Property10");
        assert_eq!(weighted_avg_column(1), "WeightedAvg_Property1");
        assert_eq!(target_column(10), "BlendProperty10");
    }

    #[test]
    fn test_static_column_lists() {
        assert_eq!(WEIGHTED_AVG_COLUMNS.len(), PROPERTY_COUNT);
        assert_eq!(WEIGHTED_AVG_COLUMNS[0], "WeightedAvg_Property1");
        assert_eq!(TARGET_COLUMNS.len(), TARGET_COUNT);
        assert_eq!(TARGET_COLUMNS[9], "BlendProperty10");
    }

    #[test]
    fn test_is_fraction_column() {
        assert!(is_fraction_column("Component1_fraction"));
        assert!(is_fraction_column("total_fraction_check"));
        assert!(!is_fraction_column("Component1_Property1"));
        assert!(!is_fraction_column("Component1_Fraction"));
    }
}
