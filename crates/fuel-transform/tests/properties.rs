use proptest::prelude::*;

use fuel_transform::normalize::{normalize_brand, normalize_product, normalize_region};

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GASOLINA".to_string()),
        Just("ALCOOL".to_string()),
        Just("DIESEL S10".to_string()),
        Just("POSTO".to_string()),
        Just("NE".to_string()),
        Just("CENTRO OESTE".to_string()),
        "[A-Z ]{0,12}",
    ]
}

proptest! {
    #[test]
    fn vocabulary_mapping_is_idempotent(value in token()) {
        let product = normalize_product(&value);
        prop_assert_eq!(normalize_product(&product), product.clone());
        let region = normalize_region(&value);
        prop_assert_eq!(normalize_region(&region), region.clone());
        let brand = normalize_brand(&value);
        prop_assert_eq!(normalize_brand(&brand), brand.clone());
    }
}
