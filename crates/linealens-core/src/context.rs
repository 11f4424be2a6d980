//! Per-statement execution context supplied by the ingestion caller.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Format used for update times in catalog samples and rendered details.
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Execution metadata for one query of the history log.
///
/// Everything here comes from the warehouse's query history, not from the
/// statement text; the engine never derives it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryContext {
    pub queried_database: Option<String>,
    pub queried_schema: Option<String>,
    pub query_type: Option<String>,
    /// Rows produced/inserted by the query.
    pub query_volume: Option<i64>,
    /// Query end time.
    pub query_time: Option<NaiveDateTime>,
    pub user_name: Option<String>,
    pub role_name: Option<String>,
}

impl QueryContext {
    /// Row volume, zero when unknown.
    pub fn volume(&self) -> i64 {
        self.query_volume.unwrap_or(0)
    }

    /// Query end time formatted as [`UPDATE_TIME_FORMAT`].
    pub fn formatted_time(&self) -> Option<String> {
        self.query_time
            .map(|time| time.format(UPDATE_TIME_FORMAT).to_string())
    }

    /// Render the "Last update" detail block shown on a written table.
    pub fn to_html(&self) -> String {
        let query_type = param_or_unknown(self.query_type.as_deref());
        let user_name = param_or_unknown(self.user_name.as_deref());
        let role_name = param_or_unknown(self.role_name.as_deref());
        let query_time = self.formatted_time().unwrap_or_default();
        let volume = self.volume();
        let volume_color = if volume == 0 { "tomato" } else { "DarkSlateGrey" };

        format!(
            r#"<div style="font-family:arial;color:DarkSlateGrey;font-size:110%;">
    <strong>Last update<br/></strong>
    <div style="min-width:62px;display:inline-block">Type:</div> {query_type}<br/>
    <div style="min-width:62px;display:inline-block">User:</div> {user_name}<br/>
    <div style="min-width:62px;display:inline-block">Role:</div> {role_name}<br/>
    <div style="min-width:62px;display:inline-block">Time:</div> {query_time}<br/>
    <div style="min-width:62px;display:inline-block">Volume:</div> <a style="color:{volume_color}">{volume} rows</a>
</div>"#
        )
    }
}

fn param_or_unknown(param: Option<&str>) -> &str {
    param.unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_params_render_as_unknown() {
        let html = QueryContext::default().to_html();
        assert!(html.contains("Type:</div> unknown"));
        assert!(html.contains("User:</div> unknown"));
        assert!(html.contains("Role:</div> unknown"));
    }

    #[test]
    fn test_zero_volume_is_highlighted() {
        let html = QueryContext::default().to_html();
        assert!(html.contains(r#"<a style="color:tomato">0 rows</a>"#));

        let context = QueryContext {
            query_volume: Some(250),
            ..Default::default()
        };
        assert!(context
            .to_html()
            .contains(r#"<a style="color:DarkSlateGrey">250 rows</a>"#));
    }

    #[test]
    fn test_formatted_time() {
        let context = QueryContext {
            query_time: Some("2022-03-01T10:21:05".parse().unwrap()),
            ..Default::default()
        };
        assert_eq!(
            context.formatted_time(),
            Some("2022-03-01 10:21:05".to_string())
        );
        assert_eq!(QueryContext::default().formatted_time(), None);
    }
}
