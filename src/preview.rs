use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// A renderable representation of the first reporting image, stored on the
/// hazard and echoed back to clients. The aggregation core treats it as an
/// opaque value; thumbnailing proper belongs to the display layer, so the
/// artifact carries the submitted bytes as a JPEG data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preview(String);

impl Preview {
    /// Never fails: whatever bytes arrive are encoded as-is.
    pub fn render(image: &[u8]) -> Preview {
        Preview(format!("data:image/jpeg;base64,{}", STANDARD.encode(image)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_data_url() {
        let preview = Preview::render(b"hello");
        assert_eq!(preview.as_str(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn empty_input_still_renders() {
        assert_eq!(Preview::render(b"").as_str(), "data:image/jpeg;base64,");
    }
}
