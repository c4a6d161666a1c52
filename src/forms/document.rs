use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Upload payload. The PDF itself never reaches this service; the client
/// extracts the text and reports the page count.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub file_name: String,
    #[validate(minimum = 1)]
    pub page_count: u32,
    #[validate(min_length = 1)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchUploadForm {
    #[validate]
    #[validate(min_items = 1)]
    pub documents: Vec<DocumentForm>,
}
