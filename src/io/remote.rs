use indexmap::IndexMap;
use serde_json::Value;

use crate::io::http::{HttpClient, HttpError, Method, Response};
use crate::model::task::{Task, TaskDraft, TaskId, TaskRaw};
use crate::model::user::UserRaw;

/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{method} {path} returned HTTP {status}")]
    Status {
        method: Method,
        path: String,
        status: u16,
    },
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("backend did not return an id for the new task")]
    MissingId,
}

/// The document store the board reads from and writes to.
///
/// Implementations must be shareable across threads: persistence runs off
/// the UI thread.
pub trait Backend: Send + Sync {
    /// `GET /tasks/`
    fn fetch_tasks(&self) -> Result<IndexMap<String, TaskRaw>, RemoteError>;
    /// `GET /users`
    fn fetch_users(&self) -> Result<IndexMap<String, UserRaw>, RemoteError>;
    /// `PUT /tasks/{id}` with the full task
    fn put_task(&self, task: &Task) -> Result<(), RemoteError>;
    /// `DELETE /tasks/{id}`
    fn delete_task(&self, id: &TaskId) -> Result<(), RemoteError>;
    /// `POST /tasks`; returns the id the backend assigned
    fn create_task(&self, draft: &TaskDraft) -> Result<TaskId, RemoteError>;
    /// `PUT /users/{id}`
    fn put_user(&self, id: &str, user: &UserRaw) -> Result<(), RemoteError>;
}

/// Entries of a keyed snapshot.
///
/// Objects yield their members. Arrays (document stores send those for dense
/// integer keys) yield their non-null items keyed by index. Anything else,
/// including `null` for an empty collection, yields nothing.
pub fn keyed_entries(data: &Value) -> Vec<(String, &Value)> {
    match data {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Decode a task snapshot without rejecting any entry
pub fn decode_tasks(data: &Value) -> IndexMap<String, TaskRaw> {
    keyed_entries(data)
        .into_iter()
        .map(|(k, v)| (k, TaskRaw::from_value(v)))
        .collect()
}

/// Decode a user snapshot; entries that are not user objects are skipped
pub fn decode_users(data: &Value) -> IndexMap<String, UserRaw> {
    keyed_entries(data)
        .into_iter()
        .filter_map(|(k, v)| {
            serde_json::from_value::<UserRaw>(v.clone())
                .ok()
                .map(|u| (k, u))
        })
        .collect()
}

/// Backend over the JSON HTTP helper
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: HttpClient,
}

impl HttpBackend {
    pub fn new(http: HttpClient) -> Self {
        HttpBackend { http }
    }

    fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, RemoteError> {
        let resp = self.http.request(method, path, body)?;
        if !resp.is_success() {
            return Err(RemoteError::Status {
                method,
                path: path.to_string(),
                status: resp.status,
            });
        }
        Ok(resp)
    }
}

impl Backend for HttpBackend {
    fn fetch_tasks(&self) -> Result<IndexMap<String, TaskRaw>, RemoteError> {
        let resp = self.call(Method::Get, "/tasks/", None)?;
        Ok(decode_tasks(&resp.data))
    }

    fn fetch_users(&self) -> Result<IndexMap<String, UserRaw>, RemoteError> {
        let resp = self.call(Method::Get, "/users", None)?;
        Ok(decode_users(&resp.data))
    }

    fn put_task(&self, task: &Task) -> Result<(), RemoteError> {
        let body = serde_json::to_value(task)?;
        self.call(Method::Put, &format!("/tasks/{}", task.id), Some(&body))?;
        Ok(())
    }

    fn delete_task(&self, id: &TaskId) -> Result<(), RemoteError> {
        self.call(Method::Delete, &format!("/tasks/{}", id), None)?;
        Ok(())
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<TaskId, RemoteError> {
        let body = serde_json::to_value(draft)?;
        let resp = self.call(Method::Post, "/tasks", Some(&body))?;
        new_id_from(&resp.data).ok_or(RemoteError::MissingId)
    }

    fn put_user(&self, id: &str, user: &UserRaw) -> Result<(), RemoteError> {
        let body = serde_json::to_value(user)?;
        self.call(Method::Put, &format!("/users/{}", id), Some(&body))?;
        Ok(())
    }
}

/// Id of a created resource. Document stores answer `{"name": "<id>"}`;
/// REST-style backends answer with the stored object carrying `id`.
fn new_id_from(data: &Value) -> Option<TaskId> {
    let field = data.get("name").or_else(|| data.get("id"))?;
    match field {
        Value::String(s) if !s.is_empty() => Some(TaskId::new(s.as_str())),
        Value::Number(n) => Some(TaskId::new(n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_snapshot() {
        let data = json!({"a": {"title": "A"}, "b": {"title": "B"}});
        let tasks = decode_tasks(&data);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks["a"].title.as_deref(), Some("A"));
    }

    #[test]
    fn array_snapshot_skips_holes() {
        let data = json!([null, {"title": "one"}, null, {"title": "three"}]);
        let tasks = decode_tasks(&data);
        let keys: Vec<&str> = tasks.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "3"]);
    }

    #[test]
    fn null_snapshot_is_empty() {
        assert!(decode_tasks(&Value::Null).is_empty());
        assert!(decode_users(&json!("nope")).is_empty());
    }

    #[test]
    fn users_decode() {
        let data = json!({
            "u1": {"userFullName": "Anna Berg", "userInitials": "AB", "userColor": "user-color-2"},
            "u2": {"userFullName": "Bo Ek"},
            "u3": 17
        });
        let users = decode_users(&data);
        assert_eq!(users.len(), 2);
        assert_eq!(users["u2"].user_color, None);
    }

    #[test]
    fn created_id_forms() {
        assert_eq!(new_id_from(&json!({"name": "-Nabc"})), Some(TaskId::new("-Nabc")));
        assert_eq!(new_id_from(&json!({"id": 12, "title": "x"})), Some(TaskId::new("12")));
        assert_eq!(new_id_from(&json!({"name": ""})), None);
        assert_eq!(new_id_from(&Value::Null), None);
    }
}
