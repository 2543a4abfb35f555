use super::domain::ScoringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Step in the sample table: populations up to `upper_bound` inspect `sample_size` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBucket {
    pub upper_bound: u32,
    pub sample_size: u32,
}

/// Fixed lookup from property unit count to the number of units to inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SampleBucket>", into = "Vec<SampleBucket>")]
pub struct SampleSizeTable {
    buckets: Vec<SampleBucket>,
}

const STANDARD_BUCKETS: [(u32, u32); 17] = [
    (1, 1),
    (2, 2),
    (3, 3),
    (4, 4),
    (5, 5),
    (6, 6),
    (8, 7),
    (10, 8),
    (13, 9),
    (17, 10),
    (24, 11),
    (35, 12),
    (60, 13),
    (100, 14),
    (200, 15),
    (500, 16),
    (1000, 17),
];

impl SampleSizeTable {
    pub fn new(buckets: Vec<SampleBucket>) -> Result<Self, SampleTableError> {
        let Some(first) = buckets.first() else {
            return Err(SampleTableError::Empty);
        };
        if first.sample_size == 0 {
            return Err(SampleTableError::ZeroSample {
                upper_bound: first.upper_bound,
            });
        }

        for pair in buckets.windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            if next.upper_bound <= previous.upper_bound {
                return Err(SampleTableError::BoundsNotAscending {
                    previous: previous.upper_bound,
                    next: next.upper_bound,
                });
            }
            if next.sample_size < previous.sample_size {
                return Err(SampleTableError::SampleDecreases {
                    upper_bound: next.upper_bound,
                });
            }
        }

        Ok(Self { buckets })
    }

    pub fn standard() -> Self {
        Self {
            buckets: STANDARD_BUCKETS
                .iter()
                .map(|&(upper_bound, sample_size)| SampleBucket {
                    upper_bound,
                    sample_size,
                })
                .collect(),
        }
    }

    pub fn buckets(&self) -> &[SampleBucket] {
        &self.buckets
    }

    /// Number of units to inspect for a property of `total_units`.
    ///
    /// Never exceeds `total_units`, even for tables whose buckets would.
    pub fn resolve(&self, total_units: u32) -> Result<u32, ScoringError> {
        if total_units == 0 {
            return Err(ScoringError::InvalidPopulationSize {
                total_units,
                sample_size: 0,
            });
        }

        let tabled = self
            .buckets
            .iter()
            .find(|bucket| bucket.upper_bound >= total_units)
            .or_else(|| self.buckets.last())
            .map(|bucket| bucket.sample_size)
            .ok_or(ScoringError::InvalidPopulationSize {
                total_units,
                sample_size: 0,
            })?;

        Ok(tabled.min(total_units))
    }
}

impl Default for SampleSizeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<SampleBucket>> for SampleSizeTable {
    type Error = SampleTableError;

    fn try_from(value: Vec<SampleBucket>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SampleSizeTable> for Vec<SampleBucket> {
    fn from(value: SampleSizeTable) -> Self {
        value.buckets
    }
}

/// Parses `"bound:size,bound:size"` as used by `APP_SAMPLE_TABLE`.
impl FromStr for SampleSizeTable {
    type Err = SampleTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let buckets = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (bound, size) = entry
                    .split_once(':')
                    .ok_or_else(|| SampleTableError::Malformed(entry.to_string()))?;
                let upper_bound = bound
                    .trim()
                    .parse()
                    .map_err(|_| SampleTableError::Malformed(entry.to_string()))?;
                let sample_size = size
                    .trim()
                    .parse()
                    .map_err(|_| SampleTableError::Malformed(entry.to_string()))?;
                Ok(SampleBucket {
                    upper_bound,
                    sample_size,
                })
            })
            .collect::<Result<Vec<_>, SampleTableError>>()?;

        Self::new(buckets)
    }
}

impl fmt::Display for SampleSizeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .buckets
            .iter()
            .map(|bucket| format!("{}:{}", bucket.upper_bound, bucket.sample_size))
            .collect();
        write!(f, "{}", entries.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleTableError {
    #[error("sample table has no buckets")]
    Empty,
    #[error("sample table entry '{0}' is not of the form bound:size")]
    Malformed(String),
    #[error("sample table bounds must ascend ({previous} followed by {next})")]
    BoundsNotAscending { previous: u32, next: u32 },
    #[error("sample size decreases at bound {upper_bound}")]
    SampleDecreases { upper_bound: u32 },
    #[error("sample size for bound {upper_bound} must be positive")]
    ZeroSample { upper_bound: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_buckets_a_hundred_units_to_fourteen() {
        let table = SampleSizeTable::standard();
        assert_eq!(table.resolve(100), Ok(14));
        assert_eq!(table.resolve(61), Ok(14));
        assert_eq!(table.resolve(101), Ok(15));
    }

    #[test]
    fn populations_beyond_the_table_use_the_last_sample() {
        let table = SampleSizeTable::standard();
        assert_eq!(table.resolve(50_000), Ok(17));
    }

    #[test]
    fn zero_units_is_an_invalid_population() {
        let table = SampleSizeTable::standard();
        assert!(matches!(
            table.resolve(0),
            Err(ScoringError::InvalidPopulationSize { total_units: 0, .. })
        ));
    }

    #[test]
    fn oversized_buckets_are_capped_at_the_population() {
        let table: SampleSizeTable = "10:8,50:20".parse().expect("table parses");
        assert_eq!(table.resolve(3), Ok(3));
        assert_eq!(table.resolve(9), Ok(8));
    }

    #[test]
    fn parse_round_trips_through_display() {
        let table = SampleSizeTable::standard();
        let parsed: SampleSizeTable = table.to_string().parse().expect("table parses");
        assert_eq!(parsed, table);
    }

    #[test]
    fn new_rejects_unordered_or_shrinking_tables() {
        assert_eq!(
            "10:5,5:6".parse::<SampleSizeTable>(),
            Err(SampleTableError::BoundsNotAscending {
                previous: 10,
                next: 5
            })
        );
        assert_eq!(
            "10:5,20:4".parse::<SampleSizeTable>(),
            Err(SampleTableError::SampleDecreases { upper_bound: 20 })
        );
        assert_eq!(
            "10:0".parse::<SampleSizeTable>(),
            Err(SampleTableError::ZeroSample { upper_bound: 10 })
        );
        assert_eq!("".parse::<SampleSizeTable>(), Err(SampleTableError::Empty));
        assert!(matches!(
            "ten:5".parse::<SampleSizeTable>(),
            Err(SampleTableError::Malformed(_))
        ));
    }

    #[test]
    fn table_deserializes_from_json_with_validation() {
        let table: SampleSizeTable = serde_json::from_str(
            r#"[{"upper_bound": 20, "sample_size": 5}, {"upper_bound": 200, "sample_size": 25}]"#,
        )
        .expect("table deserializes");
        assert_eq!(table.resolve(150), Ok(25));

        let invalid = serde_json::from_str::<SampleSizeTable>("[]");
        assert!(invalid.is_err());
    }
}
