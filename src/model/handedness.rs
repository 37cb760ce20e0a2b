//! Which hand the loaded model is rigged for

use serde::{Deserialize, Serialize};

/// Handedness of the model asset; exactly one is active at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Checkbox view as `(right, left)`; exactly one is true
    pub fn controls(self) -> (bool, bool) {
        match self {
            Handedness::Right => (true, false),
            Handedness::Left => (false, true),
        }
    }
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handedness::Right => write!(f, "right"),
            Handedness::Left => write!(f, "left"),
        }
    }
}

impl std::str::FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" | "r" => Ok(Handedness::Right),
            "left" | "l" => Ok(Handedness::Left),
            other => Err(format!("unknown handedness: {other:?} (expected right or left)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_mutually_exclusive() {
        for handedness in [Handedness::Right, Handedness::Left] {
            let (right, left) = handedness.controls();
            assert!(right ^ left);
        }
        assert_eq!(Handedness::Left.controls(), (false, true));
    }

    #[test]
    fn test_default_is_right() {
        assert_eq!(Handedness::default(), Handedness::Right);
        assert_eq!(Handedness::default().controls(), (true, false));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Right".parse::<Handedness>(), Ok(Handedness::Right));
        assert_eq!(" left ".parse::<Handedness>(), Ok(Handedness::Left));
        assert_eq!("l".parse::<Handedness>(), Ok(Handedness::Left));
        assert!("both".parse::<Handedness>().is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Handedness::Left).unwrap();
        assert_eq!(json, r#""left""#);
    }
}
