//! Provider-defined payloads.
//!
//! The read API never looks inside these records. Each one is a transparent
//! wrapper around a JSON value so it serializes exactly as the provider shaped it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! opaque_payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Value);

        impl $name {
            /// A JSON `null` payload carries no record.
            pub fn is_null(&self) -> bool {
                self.0.is_null()
            }

            pub fn into_inner(self) -> Value {
                self.0
            }
        }

        impl From<Value> for $name {
            fn from(value: Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_payload!(
    /// One entry of the discovery listing.
    StockSummary
);

opaque_payload!(
    /// Company profile for a single ticker.
    StockProfile
);

opaque_payload!(
    /// Quote/detail record for a single ticker.
    StockData
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_transparently() {
        let data = StockData::from(json!({ "symbol": "AAPL", "price": 150 }));
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "symbol": "AAPL", "price": 150 })
        );
    }

    #[test]
    fn test_null_payload() {
        assert!(StockProfile::from(Value::Null).is_null());
        assert!(!StockProfile::from(json!({})).is_null());
    }
}
