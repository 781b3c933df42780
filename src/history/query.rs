//! Recent-analysis queries and global statistics

use serde::{Deserialize, Serialize};

use super::AnalysisStore;
use crate::models::{AnalysisKind, AnalysisRecord};

pub const DEFAULT_LIMIT: i64 = 10;

/// Filter and limit for a history query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisQuery {
    /// Raw `type` value; unknown kinds match nothing
    pub kind: Option<String>,
    pub limit: i64,
}

impl Default for AnalysisQuery {
    fn default() -> Self {
        Self { kind: None, limit: DEFAULT_LIMIT }
    }
}

impl AnalysisQuery {
    /// Build from loosely typed query parameters. An empty `type` means no
    /// filter; a missing or non-numeric `limit` falls back to the default.
    pub fn from_params(kind: Option<String>, limit: Option<&str>) -> Self {
        let kind = kind.filter(|k| !k.is_empty());
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self { kind, limit }
    }

    fn matches(&self, record: &AnalysisRecord) -> bool {
        match &self.kind {
            None => true,
            Some(raw) => AnalysisKind::parse(raw) == Some(record.kind()),
        }
    }
}

/// Counts over the whole store, independent of any filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_analyses: usize,
    pub image_analyses: usize,
    pub voice_analyses: usize,
    pub fraud_detections: usize,
}

impl AnalysisStats {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        records.iter().fold(
            AnalysisStats { total_analyses: records.len(), ..Default::default() },
            |mut stats, record| {
                match record.kind() {
                    AnalysisKind::Image => stats.image_analyses += 1,
                    AnalysisKind::Voice => stats.voice_analyses += 1,
                    AnalysisKind::Fraud => stats.fraud_detections += 1,
                }
                stats
            },
        )
    }
}

/// `GET /api/analyses` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysesResponse {
    pub analyses: Vec<AnalysisRecord>,
    pub stats: AnalysisStats,
}

impl AnalysisStore {
    /// Most recent records matching `query`, newest first, plus global stats.
    ///
    /// Records sharing a timestamp come out most recently appended first.
    pub fn query(&self, query: &AnalysisQuery) -> AnalysesResponse {
        let records = self.all();
        let stats = AnalysisStats::from_records(&records);

        let limit = usize::try_from(query.limit).unwrap_or(0);
        let mut analyses: Vec<AnalysisRecord> = records
            .into_iter()
            .rev()
            .filter(|r| query.matches(r))
            .collect();
        // stable: ties keep the reversed insertion order
        analyses.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        analyses.truncate(limit);

        AnalysesResponse { analyses, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisDetails, NewAnalysis, Prediction};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn image_at(offset_secs: i64) -> NewAnalysis {
        NewAnalysis {
            timestamp: base_time() + Duration::seconds(offset_secs),
            details: AnalysisDetails::Image {
                predictions: vec![Prediction { label: "tabby".to_string(), confidence: 0.8 }],
            },
        }
    }

    fn voice_at(offset_secs: i64) -> NewAnalysis {
        NewAnalysis {
            timestamp: base_time() + Duration::seconds(offset_secs),
            details: AnalysisDetails::Voice {
                text: "hi".to_string(),
                confidence: 0.7,
                language: "en".to_string(),
            },
        }
    }

    fn query(kind: Option<&str>, limit: i64) -> AnalysisQuery {
        AnalysisQuery { kind: kind.map(str::to_string), limit }
    }

    fn seeded_store() -> AnalysisStore {
        let store = AnalysisStore::new();
        store.append(image_at(0));
        store.append(voice_at(1));
        store.append(image_at(2));
        store.append(voice_at(3));
        store.append(image_at(4));
        store
    }

    #[test]
    fn empty_store_returns_nothing() {
        let response = AnalysisStore::new().query(&AnalysisQuery::default());
        assert!(response.analyses.is_empty());
        assert_eq!(response.stats, AnalysisStats::default());
    }

    #[test]
    fn stats_cover_whole_store_regardless_of_filter() {
        let store = seeded_store();
        let response = store.query(&query(Some("voice"), 1));

        assert_eq!(response.analyses.len(), 1);
        assert_eq!(response.analyses[0].kind(), AnalysisKind::Voice);
        assert_eq!(
            response.stats,
            AnalysisStats {
                total_analyses: 5,
                image_analyses: 3,
                voice_analyses: 2,
                fraud_detections: 0,
            }
        );
    }

    #[test]
    fn results_are_newest_first() {
        let store = AnalysisStore::new();
        store.append(image_at(10));
        store.append(image_at(30));
        store.append(image_at(20));

        let ids: Vec<u64> = store.query(&query(None, 10)).analyses.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn timestamp_ties_put_latest_append_first() {
        let store = AnalysisStore::new();
        store.append(image_at(5));
        store.append(voice_at(5));
        store.append(image_at(5));
        store.append(image_at(1));

        let ids: Vec<u64> = store.query(&query(None, 10)).analyses.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }

    #[test]
    fn limit_truncates_and_filter_restricts_kind() {
        let store = seeded_store();

        assert_eq!(store.query(&query(None, 3)).analyses.len(), 3);
        assert_eq!(store.query(&query(None, 50)).analyses.len(), 5);

        let images = store.query(&query(Some("image"), 2)).analyses;
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|r| r.kind() == AnalysisKind::Image));
        assert_eq!(images[0].id, 5);
        assert_eq!(images[1].id, 3);
    }

    #[test]
    fn zero_or_negative_limit_yields_empty_results() {
        let store = seeded_store();
        for limit in [0, -1, -100] {
            let response = store.query(&query(None, limit));
            assert!(response.analyses.is_empty());
            assert_eq!(response.stats.total_analyses, 5);
        }
    }

    #[test]
    fn unknown_kind_matches_nothing() {
        let store = seeded_store();
        let response = store.query(&query(Some("video"), 10));
        assert!(response.analyses.is_empty());
        assert_eq!(response.stats.total_analyses, 5);
    }

    #[test]
    fn params_fall_back_to_defaults() {
        assert_eq!(AnalysisQuery::from_params(None, None), AnalysisQuery::default());
        assert_eq!(AnalysisQuery::from_params(None, Some("abc")).limit, DEFAULT_LIMIT);
        assert_eq!(AnalysisQuery::from_params(None, Some(" 3 ")).limit, 3);
        assert_eq!(AnalysisQuery::from_params(None, Some("-2")).limit, -2);
        assert_eq!(AnalysisQuery::from_params(Some(String::new()), None).kind, None);
        assert_eq!(
            AnalysisQuery::from_params(Some("voice".to_string()), None).kind.as_deref(),
            Some("voice")
        );
    }

    #[test]
    fn stats_json_uses_camel_case() {
        let json = serde_json::to_value(AnalysisStats::default()).unwrap();
        assert!(json.get("totalAnalyses").is_some());
        assert!(json.get("imageAnalyses").is_some());
        assert!(json.get("voiceAnalyses").is_some());
        assert!(json.get("fraudDetections").is_some());
    }
}
