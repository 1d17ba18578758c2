use serde::Serialize;
use std::fmt;

pub const LABEL_COUNT: usize = 7;

/// Emotion classes in the order the model emits its scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; LABEL_COUNT] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Neutral,
        Emotion::Sad,
        Emotion::Surprise,
    ];

    pub fn from_index(index: usize) -> Option<Emotion> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_maps_every_index_in_order() {
        let labels: Vec<_> = (0..LABEL_COUNT)
            .map(|i| Emotion::from_index(i).unwrap().as_str())
            .collect();
        assert_eq!(
            labels,
            ["angry", "disgust", "fear", "happy", "neutral", "sad", "surprise"]
        );
    }

    #[test]
    fn table_has_no_duplicates() {
        let unique: HashSet<_> = Emotion::ALL.iter().map(Emotion::as_str).collect();
        assert_eq!(unique.len(), LABEL_COUNT);
    }

    #[test]
    fn out_of_range_index_has_no_label() {
        assert_eq!(Emotion::from_index(LABEL_COUNT), None);
        assert_eq!(Emotion::from_index(usize::MAX), None);
    }

    #[test]
    fn serializes_as_lowercase_label() {
        let json = serde_json::to_string(&Emotion::Surprise).unwrap();
        assert_eq!(json, "\"surprise\"");
    }
}
