use crate::domain::model::{BoundaryRecord, CountryMetrics, JoinReport, JoinedRecord};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub joined: Vec<JoinedRecord>,
    pub report: JoinReport,
}

/// 以國名完全相等做 inner join，結果依邊界資料的順序排列。
///
/// 國名不做任何正規化，兩邊拼法不同的國家會被丟棄並列在 `report` 中。
/// 同一國名有多個邊界 feature 時，每個 feature 都會接上同一筆指標；
/// 資料檔中的重複國名在解析階段就會被拒絕。
pub fn join_boundaries(metrics: &[CountryMetrics], boundaries: &[BoundaryRecord]) -> JoinOutcome {
    let by_name: HashMap<&str, &CountryMetrics> =
        metrics.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut joined = Vec::new();
    let mut matched: HashSet<&str> = HashSet::new();
    let mut missing_records = Vec::new();

    for boundary in boundaries {
        match by_name.get(boundary.name.as_str()) {
            Some(metric) => {
                matched.insert(metric.name.as_str());
                joined.push(JoinedRecord {
                    metrics: (*metric).clone(),
                    geometry: boundary.geometry.clone(),
                });
            }
            None => missing_records.push(boundary.name.clone()),
        }
    }

    let missing_boundaries = metrics
        .iter()
        .filter(|m| !matched.contains(m.name.as_str()))
        .map(|m| m.name.clone())
        .collect();

    JoinOutcome {
        joined,
        report: JoinReport {
            missing_boundaries,
            missing_records,
        },
    }
}
