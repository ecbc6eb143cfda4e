use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Personal and dietary information entered during onboarding.
///
/// Every field is optional. Numeric ranges are checked by [`UserInfo::validate`]
/// at the input boundary, not by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
}

const AGE_RANGE: (u32, u32) = (1, 120);
const WEIGHT_RANGE_KG: (f64, f64) = (1.0, 500.0);
const HEIGHT_RANGE_CM: (f64, f64) = (1.0, 300.0);

impl UserInfo {
    /// Checks age, weight and height against their accepted ranges.
    ///
    /// All violations are reported together in one `ValidationFailed`.
    pub fn validate(&self) -> StoreResult<()> {
        let mut problems = Vec::new();

        if let Some(age) = self.age {
            if !(AGE_RANGE.0..=AGE_RANGE.1).contains(&age) {
                problems.push(format!(
                    "age must be between {} and {}",
                    AGE_RANGE.0, AGE_RANGE.1
                ));
            }
        }
        if let Some(weight) = self.weight_kg {
            if !(WEIGHT_RANGE_KG.0..=WEIGHT_RANGE_KG.1).contains(&weight) {
                problems.push(format!(
                    "weight must be between {} and {} kg",
                    WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1
                ));
            }
        }
        if let Some(height) = self.height_cm {
            if !(HEIGHT_RANGE_CM.0..=HEIGHT_RANGE_CM.1).contains(&height) {
                problems.push(format!(
                    "height must be between {} and {} cm",
                    HEIGHT_RANGE_CM.0, HEIGHT_RANGE_CM.1
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::ValidationFailed(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_user_info_is_valid() {
        assert!(UserInfo::default().validate().is_ok());
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let info = UserInfo {
            age: Some(120),
            weight_kg: Some(1.0),
            height_cm: Some(300.0),
            ..Default::default()
        };
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_all_violations_reported() {
        let info = UserInfo {
            age: Some(0),
            weight_kg: Some(501.0),
            height_cm: Some(0.5),
            ..Default::default()
        };
        match info.validate().unwrap_err() {
            StoreError::ValidationFailed(msg) => {
                assert!(msg.contains("age"));
                assert!(msg.contains("weight"));
                assert!(msg.contains("height"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_user_info_json_roundtrip() {
        let info = UserInfo {
            name: Some("Giulia".into()),
            age: Some(34),
            allergies: vec!["peanuts".into()],
            ..Default::default()
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"age\":34"));
        let parsed: UserInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, info);
    }
}
