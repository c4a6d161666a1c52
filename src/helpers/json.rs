use actix_web::error::{
    ErrorBadRequest, ErrorForbidden, ErrorInternalServerError, ErrorNotFound,
};
use actix_web::web;
use serde_derive::Serialize;
use uuid::Uuid;

/// Uniform response envelope for every route.
#[derive(Serialize, Debug)]
pub struct JsonResponse<T> {
    pub status: String,
    pub message: String,
    pub code: u32,
    pub id: Option<Uuid>,
    pub item: Option<T>,
    pub list: Option<Vec<T>>,
}

#[derive(Serialize, Default)]
pub struct JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    message: String,
    id: Option<Uuid>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            message: String::new(),
            id: None,
            item: None,
            list: None,
        }
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    pub fn set_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn set_msg(mut self, msg: impl ToString) -> Self {
        self.message = msg.to_string();
        self
    }

    fn into_response(self, status: &str, code: u32, fallback_msg: &str) -> JsonResponse<T> {
        let message = if self.message.trim().is_empty() {
            fallback_msg.to_string()
        } else {
            self.message
        };
        JsonResponse {
            status: status.to_string(),
            message,
            code,
            id: self.id,
            item: self.item,
            list: self.list,
        }
    }

    fn error_body(self, code: u32, msg: impl ToString, fallback: &str) -> String {
        let response = self.set_msg(msg).into_response("Error", code, fallback);
        serde_json::to_string(&response)
            .unwrap_or_else(|_| format!(r#"{{"status":"Error","code":{code}}}"#))
    }

    pub fn ok(self, msg: impl ToString) -> web::Json<JsonResponse<T>> {
        web::Json(self.set_msg(msg).into_response("OK", 200, "Success"))
    }

    pub fn bad_request(self, msg: impl ToString) -> actix_web::Error {
        ErrorBadRequest(self.error_body(400, msg, "Validation error"))
    }

    pub fn forbidden(self, msg: impl ToString) -> actix_web::Error {
        ErrorForbidden(self.error_body(403, msg, "Forbidden"))
    }

    pub fn not_found(self, msg: impl ToString) -> actix_web::Error {
        ErrorNotFound(self.error_body(404, msg, "Object not found"))
    }

    pub fn internal_server_error(self, msg: impl ToString) -> actix_web::Error {
        ErrorInternalServerError(self.error_body(500, msg, "Internal error"))
    }
}

impl<T> std::fmt::Display for JsonResponse<T>
where
    T: serde::Serialize,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_fills_default_message() {
        let resp = JsonResponse::<String>::build().ok("").into_inner();
        assert_eq!(resp.status, "OK");
        assert_eq!(resp.code, 200);
        assert_eq!(resp.message, "Success");
    }

    #[test]
    fn error_body_is_json() {
        let err = JsonResponse::<String>::build().forbidden("Daily limit reached");
        let body = err.to_string();
        assert!(body.contains("Daily limit reached"));
    }

    #[test]
    fn list_and_item_are_exclusive_by_construction() {
        let resp = JsonResponse::<i32>::build()
            .set_list(vec![1, 2, 3])
            .ok("OK")
            .into_inner();
        assert_eq!(resp.list, Some(vec![1, 2, 3]));
        assert_eq!(resp.item, None);
    }
}
