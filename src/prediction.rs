use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Percent, 0-100.
    pub confidence: f64,
}

/// Predictions in the order the service ranked them.
pub type PredictionList = Vec<Prediction>;

/// Body of a `/detect` response. Both fields are optional on the wire.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DetectResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<PredictionList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectResponse {
    pub fn predictions(predictions: PredictionList) -> Self {
        Self {
            predictions: Some(predictions),
            error: None,
        }
    }
}

/// One rendered row of the results region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub label: String,
    pub confidence: String,
}

impl From<&Prediction> for ResultRow {
    fn from(prediction: &Prediction) -> Self {
        Self {
            label: prediction.label.clone(),
            confidence: format_confidence(prediction.confidence),
        }
    }
}

/// Two decimals and a percent sign. Rounds half away from zero on the
/// shortest decimal form of the value, so `97.345` reads `97.35%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", round_decimal(confidence, 2))
}

fn round_decimal(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = value.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(places))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(places).is_some_and(|&d| d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - places;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let sign = if value < 0.0 && digits.iter().any(|&d| d != 0) {
        "-"
    } else {
        ""
    };

    if places == 0 {
        format!("{sign}{}", render(&digits))
    } else {
        format!("{sign}{}.{}", render(&digits[..split]), render(&digits[split..]))
    }
}
