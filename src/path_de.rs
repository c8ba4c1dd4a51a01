use serde::de::DeserializeOwned;

use crate::error::Error;

/// Deserialize with JSON-path context in error messages.
pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8], reference: &str) -> Result<T, Error> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        Error::Decode {
            reference: reference.to_string(),
            path,
            message: err.into_inner().to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn decode_error_names_the_path() {
        let err = from_slice_with_path::<Schema>(
            br#"{ "properties": { "size": { "type": "huge" } } }"#,
            "shapes",
        )
        .unwrap_err();
        match err {
            Error::Decode { reference, path, message } => {
                assert_eq!(reference, "shapes");
                assert_eq!(path, "properties.size.type");
                assert!(message.contains("unknown schema type"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = from_slice_with_path::<Schema>(b"{ not json", "broken").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
