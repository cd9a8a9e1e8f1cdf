use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::metric::errors::MetricError;
use crate::metric::models::CreateMetricCommand;
use crate::metric::models::MetricName;
use crate::metric::models::MetricValue;
use crate::team::models::TeamId;

const FILE_FIELD: &str = "file";
const REQUIRED_COLUMNS: [&str; 3] = ["metric_name", "metric_value", "team_id"];

/// Bulk metric import from a CSV file sent as the multipart field `file`.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiSuccess<UploadCsvResponseData>, ApiError> {
    let mut contents = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            contents = Some(bytes);
            break;
        }
    }

    let contents = contents.ok_or_else(|| {
        ApiError::UnprocessableEntity(format!("Missing multipart field '{}'", FILE_FIELD))
    })?;

    let commands = parse_metrics_csv(&contents)?;
    let imported = state.metric_service.import_metrics(commands).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UploadCsvResponseData {
            message: "CSV processed successfully".to_string(),
            imported,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadCsvResponseData {
    pub message: String,
    pub imported: usize,
}

#[derive(Debug, Deserialize)]
struct MetricCsvRow {
    metric_name: String,
    metric_value: String,
    team_id: String,
}

/// Parse and validate every data row of an uploaded metrics file.
///
/// Rows are numbered from 1, not counting the header. Columns other than
/// the required ones are ignored.
fn parse_metrics_csv(contents: &[u8]) -> Result<Vec<CreateMetricCommand>, MetricError> {
    let text = std::str::from_utf8(contents)
        .map_err(|e| MetricError::InvalidCsv(format!("file is not valid UTF-8: {}", e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| MetricError::InvalidCsv(e.to_string()))?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(MetricError::InvalidCsv(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    reader
        .deserialize::<MetricCsvRow>()
        .enumerate()
        .map(|(index, record)| {
            let row = index + 1;
            let invalid = |reason: String| MetricError::InvalidRow { row, reason };

            let record = record.map_err(|e| invalid(e.to_string()))?;

            Ok(CreateMetricCommand {
                name: MetricName::new(record.metric_name).map_err(|e| invalid(e.to_string()))?,
                value: MetricValue::parse(&record.metric_value)
                    .map_err(|e| invalid(e.to_string()))?,
                team_id: TeamId::from_string(&record.team_id)
                    .map_err(|e| invalid(format!("invalid team_id: {}", e)))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_file() {
        let team = TeamId::new();
        let csv = format!(
            "metric_name,metric_value,team_id\ntmo,312.5,{team}\n nps , 71 ,{team}\n"
        );

        let commands = parse_metrics_csv(csv.as_bytes()).unwrap();

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].name.as_str(), "tmo");
        assert_eq!(commands[0].value.get(), 312.5);
        assert_eq!(commands[1].name.as_str(), "nps");
        assert_eq!(commands[1].team_id, team);
    }

    #[test]
    fn test_parse_ignores_extra_columns_and_order() {
        let team = TeamId::new();
        let csv = format!("team_id,notes,metric_value,metric_name\n{team},ok,1.5,csat\n");

        let commands = parse_metrics_csv(csv.as_bytes()).unwrap();

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name.as_str(), "csat");
    }

    #[test]
    fn test_parse_header_only() {
        let commands = parse_metrics_csv(b"metric_name,metric_value,team_id\n").unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_parse_missing_column() {
        let result = parse_metrics_csv(b"metric_name,metric_value\ntmo,1\n");
        assert!(matches!(result, Err(MetricError::InvalidCsv(msg)) if msg.contains("team_id")));
    }

    #[test]
    fn test_parse_bad_value_reports_row() {
        let team = TeamId::new();
        let csv = format!(
            "metric_name,metric_value,team_id\ntmo,1,{team}\ntmo,abc,{team}\n"
        );

        let result = parse_metrics_csv(csv.as_bytes());
        assert!(matches!(result, Err(MetricError::InvalidRow { row: 2, .. })));
    }

    #[test]
    fn test_parse_bad_team_id_reports_row() {
        let result = parse_metrics_csv(b"metric_name,metric_value,team_id\ntmo,1,42\n");
        assert!(matches!(
            result,
            Err(MetricError::InvalidRow { row: 1, ref reason }) if reason.contains("team_id")
        ));
    }

    #[test]
    fn test_parse_rejects_non_utf8() {
        let result = parse_metrics_csv(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(MetricError::InvalidCsv(_))));
    }
}
