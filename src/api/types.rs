//! Wire payloads consumed from the dataset query service.

use serde::{Deserialize, Serialize};

/// Response to `GET /datasets`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetList {
    pub datasets: Vec<String>,
}

/// Response to `GET /preview/{dataset}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetPreview {
    pub columns_summary: String,
}

/// Request body for `POST /query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub dataset_name: &'a str,
    pub user_query: &'a str,
}

/// A single named numeric point in a visualization descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
}

/// Backend-supplied chart descriptor. Both fields are nullable on the wire;
/// a missing/empty descriptor renders nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    #[serde(default)]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub data_points: Option<Vec<DataPoint>>,
}

/// Response to `POST /query`. Only the most recent one is retained by the
/// session; `result` is kept as raw JSON since its shape depends on the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub result: serde_json::Value,
    pub humanized_response: String,
    #[serde(default)]
    pub visualization: Option<Visualization>,
}

/// Error body FastAPI-style backends attach to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Response to `POST /upload-dataset`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Chart discriminator as a closed variant. The wire carries an open-ended
/// string tag; anything other than "bar" or "line" degrades to
/// `Unsupported(tag)` instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Unsupported(String),
}

impl ChartKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bar" => Self::Bar,
            "line" => Self::Line,
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Unsupported(tag) => tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chart_kind_dispatch_is_closed() {
        assert_eq!(ChartKind::from_tag("bar"), ChartKind::Bar);
        assert_eq!(ChartKind::from_tag("line"), ChartKind::Line);
        assert_eq!(
            ChartKind::from_tag("pie"),
            ChartKind::Unsupported("pie".to_string())
        );
        assert_eq!(ChartKind::from_tag("pie").as_str(), "pie");
    }

    #[test]
    fn query_response_deserializes_without_visualization() {
        let raw = r#"{
            "query": "df['kills'].mean()",
            "result": {"value": 21.5},
            "humanized_response": "On average there were 21.5 kills."
        }"#;
        let resp: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            resp.humanized_response,
            "On average there were 21.5 kills."
        );
        assert!(resp.visualization.is_none());
    }

    #[test]
    fn query_response_deserializes_with_visualization() {
        let raw = r#"{
            "humanized_response": "Here you go.",
            "result": {},
            "visualization": {
                "chart_type": "bar",
                "data_points": [
                    {"name": "A", "value": 1},
                    {"name": "B", "value": 2}
                ]
            }
        }"#;
        let resp: QueryResponse = serde_json::from_str(raw).unwrap();
        let viz = resp.visualization.unwrap();
        assert_eq!(viz.chart_type.as_deref(), Some("bar"));
        assert_eq!(viz.data_points.unwrap().len(), 2);
    }

    #[test]
    fn visualization_tolerates_null_fields() {
        let raw = r#"{"chart_type": null, "data_points": null}"#;
        let viz: Visualization = serde_json::from_str(raw).unwrap();
        assert!(viz.chart_type.is_none());
        assert!(viz.data_points.is_none());
    }
}
