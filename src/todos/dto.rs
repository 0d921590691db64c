use serde::Deserialize;

/// Body for todo creation.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_description_to_empty() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title":"buy milk"}"#).unwrap();
        assert_eq!(req.title, "buy milk");
        assert_eq!(req.description, "");
    }

    #[test]
    fn update_distinguishes_absent_from_present() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(req.title.is_none());
        assert!(req.description.is_none());
        assert_eq!(req.completed, Some(true));

        let req: UpdateTodoRequest =
            serde_json::from_str(r#"{"title":"new title","description":""}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("new title"));
        assert_eq!(req.description.as_deref(), Some(""));
        assert!(req.completed.is_none());
    }

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);
    }
}
