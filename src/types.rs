//! Core types for the matching pipeline.
//!
//! Participants are identified by [`ParticipantId`] in `[0, N)`. Gender categories are
//! closed enums; the raw strings produced by the loading layer are normalized with
//! [`parse_identities`] and [`parse_preferences`]. [`MatchInput`] bundles the score
//! matrix with both category arrays.

use std::fmt;
use std::str::FromStr;

use crate::error::MatchError;

/// Participant identifier: row/column index into the score matrix.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ParticipantId(pub usize);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gender identity of a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GenderIdentity {
    Male,
    Female,
    #[serde(rename = "Non-binary", alias = "NonBinary")]
    NonBinary,
}

/// Which identities a participant is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GenderPreference {
    Men,
    Women,
    Bisexual,
}

impl GenderPreference {
    /// True if `identity` satisfies this preference.
    ///
    /// Literal mapping: Men accepts Male, Women accepts Female, Bisexual accepts NonBinary.
    pub fn accepts(self, identity: GenderIdentity) -> bool {
        matches!(
            (self, identity),
            (GenderPreference::Men, GenderIdentity::Male)
                | (GenderPreference::Women, GenderIdentity::Female)
                | (GenderPreference::Bisexual, GenderIdentity::NonBinary)
        )
    }
}

/// Returned by `FromStr` when a string is not a known category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for GenderIdentity {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(GenderIdentity::Male),
            "Female" => Ok(GenderIdentity::Female),
            "Non-binary" | "NonBinary" => Ok(GenderIdentity::NonBinary),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

impl FromStr for GenderPreference {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Men" => Ok(GenderPreference::Men),
            "Women" => Ok(GenderPreference::Women),
            "Bisexual" => Ok(GenderPreference::Bisexual),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

fn parse_all<T, S>(values: &[S]) -> Result<Vec<T>, MatchError>
where
    T: FromStr<Err = UnknownCategory>,
    S: AsRef<str>,
{
    values
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.as_ref()
                .parse()
                .map_err(|UnknownCategory(value)| MatchError::UnknownCategory { index, value })
        })
        .collect()
}

/// Normalizes raw identity strings. Fails on the first unrecognized entry.
pub fn parse_identities<S: AsRef<str>>(values: &[S]) -> Result<Vec<GenderIdentity>, MatchError> {
    parse_all(values)
}

/// Normalizes raw preference strings. Fails on the first unrecognized entry.
pub fn parse_preferences<S: AsRef<str>>(
    values: &[S],
) -> Result<Vec<GenderPreference>, MatchError> {
    parse_all(values)
}

/// Immutable input of one matching run.
///
/// `scores[i][j]` is i's raw compatibility with j; the matrix need not be symmetric.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MatchInput {
    pub scores: Vec<Vec<f64>>,
    pub identities: Vec<GenderIdentity>,
    pub preferences: Vec<GenderPreference>,
}

impl MatchInput {
    pub fn new(
        scores: Vec<Vec<f64>>,
        identities: Vec<GenderIdentity>,
        preferences: Vec<GenderPreference>,
    ) -> Self {
        Self {
            scores,
            identities,
            preferences,
        }
    }

    /// Population size N.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Checks lengths, squareness and that every score is finite and non-negative.
    pub fn validate(&self) -> Result<(), MatchError> {
        let n = self.identities.len();
        if self.preferences.len() != n {
            return Err(MatchError::LengthMismatch {
                field: "preferences",
                expected: n,
                actual: self.preferences.len(),
            });
        }
        if self.scores.len() != n {
            return Err(MatchError::LengthMismatch {
                field: "scores",
                expected: n,
                actual: self.scores.len(),
            });
        }
        for (row, values) in self.scores.iter().enumerate() {
            if values.len() != n {
                return Err(MatchError::NotSquare {
                    row,
                    expected: n,
                    actual: values.len(),
                });
            }
            if let Some((col, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(MatchError::InvalidScore { row, col, value });
            }
        }
        Ok(())
    }
}

/// One output tuple: a proposer and the receiver it was matched with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Pair {
    pub proposer: ParticipantId,
    pub receiver: ParticipantId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn input(n: usize) -> MatchInput {
        MatchInput::new(
            vec![vec![1.0; n]; n],
            vec![GenderIdentity::Male; n],
            vec![GenderPreference::Women; n],
        )
    }

    #[test]
    fn parses_literal_category_strings() {
        let ids = parse_identities(&["Male", "Female", "Non-binary", "NonBinary\n"]).unwrap();
        assert_eq!(
            ids,
            vec![
                GenderIdentity::Male,
                GenderIdentity::Female,
                GenderIdentity::NonBinary,
                GenderIdentity::NonBinary
            ]
        );
        let prefs = parse_preferences(&["Men", " Women", "Bisexual"]).unwrap();
        assert_eq!(
            prefs,
            vec![
                GenderPreference::Men,
                GenderPreference::Women,
                GenderPreference::Bisexual
            ]
        );
    }

    #[test]
    fn unknown_category_reports_index() {
        let err = parse_preferences(&["Men", "Women", "Everyone"]).unwrap_err();
        assert_eq!(
            err,
            MatchError::UnknownCategory {
                index: 2,
                value: "Everyone".into()
            }
        );
        assert_eq!(err.kind(), ErrorKind::UnknownCategory);
        assert!(parse_identities(&["male"]).is_err());
    }

    #[test]
    fn preference_mapping_is_literal() {
        assert!(GenderPreference::Men.accepts(GenderIdentity::Male));
        assert!(!GenderPreference::Men.accepts(GenderIdentity::Female));
        assert!(GenderPreference::Women.accepts(GenderIdentity::Female));
        assert!(GenderPreference::Bisexual.accepts(GenderIdentity::NonBinary));
        assert!(!GenderPreference::Bisexual.accepts(GenderIdentity::Male));
    }

    #[test]
    fn serde_uses_category_literals() {
        let json = serde_json::to_string(&GenderIdentity::NonBinary).unwrap();
        assert_eq!(json, "\"Non-binary\"");
        let parsed: GenderIdentity = serde_json::from_str("\"NonBinary\"").unwrap();
        assert_eq!(parsed, GenderIdentity::NonBinary);
        let pair = Pair {
            proposer: ParticipantId(3),
            receiver: ParticipantId(1),
        };
        assert_eq!(
            serde_json::to_string(&pair).unwrap(),
            r#"{"proposer":3,"receiver":1}"#
        );
    }

    #[test]
    fn validate_accepts_square_input() {
        assert!(input(0).validate().is_ok());
        assert!(input(3).validate().is_ok());
    }

    #[test]
    fn validate_rejects_length_mismatch() {
        let mut bad = input(3);
        bad.preferences.pop();
        assert!(matches!(
            bad.validate(),
            Err(MatchError::LengthMismatch {
                field: "preferences",
                ..
            })
        ));
        let mut bad = input(3);
        bad.scores.pop();
        assert!(matches!(
            bad.validate(),
            Err(MatchError::LengthMismatch { field: "scores", .. })
        ));
    }

    #[test]
    fn validate_rejects_ragged_and_invalid_scores() {
        let mut bad = input(3);
        bad.scores[1].push(0.5);
        assert_eq!(
            bad.validate(),
            Err(MatchError::NotSquare {
                row: 1,
                expected: 3,
                actual: 4
            })
        );
        let mut bad = input(3);
        bad.scores[2][0] = -0.1;
        assert!(matches!(
            bad.validate(),
            Err(MatchError::InvalidScore { row: 2, col: 0, .. })
        ));
        let mut bad = input(2);
        bad.scores[0][1] = f64::NAN;
        assert!(matches!(
            bad.validate(),
            Err(MatchError::InvalidScore { row: 0, col: 1, .. })
        ));
    }
}
