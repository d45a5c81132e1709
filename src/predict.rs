use anyhow::Error;
use serde::{Deserialize, Serialize};

/// Value returned for every prediction until real inference lands.
/// Not a class label; callers must treat it as a stand-in.
pub const PLACEHOLDER_PREDICTION: i64 = 0;

/// One observation of the Iris measurement schema. All four fields are
/// required; requests missing any of them never reach handler logic.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IrisFeatures {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PredictResponse {
    pub model: String,
    pub prediction: i64,
}

pub trait PredictHandler {
    fn run_predict(&self, features: &IrisFeatures) -> Result<PredictResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_deserialize_from_full_payload() {
        let payload = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#;
        let features: IrisFeatures = serde_json::from_str(payload).unwrap();

        assert_eq!(
            features,
            IrisFeatures {
                sepal_length: 5.1,
                sepal_width: 3.5,
                petal_length: 1.4,
                petal_width: 0.2,
            }
        );
    }

    #[test]
    fn integer_measurements_parse_as_floats() {
        let payload = r#"{"sepal_length":5,"sepal_width":3,"petal_length":1,"petal_width":0}"#;
        let features: IrisFeatures = serde_json::from_str(payload).unwrap();

        assert_eq!(features.sepal_length, 5.0);
        assert_eq!(features.petal_width, 0.0);
    }

    #[test]
    fn missing_field_is_rejected() {
        let payload = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4}"#;
        let result: Result<IrisFeatures, _> = serde_json::from_str(payload);

        let err = result.unwrap_err().to_string();
        assert!(err.contains("petal_width"), "unexpected error: {err}");
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let payload =
            r#"{"sepal_length":"wide","sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#;
        let result: Result<IrisFeatures, _> = serde_json::from_str(payload);

        assert!(result.is_err());
    }

    #[test]
    fn response_serializes_model_then_prediction() {
        let response = PredictResponse {
            model: "logistic_model".to_string(),
            prediction: PLACEHOLDER_PREDICTION,
        };

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"model":"logistic_model","prediction":0}"#
        );
    }
}
