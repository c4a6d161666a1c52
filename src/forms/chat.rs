use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ChatForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 2000)]
    pub question: String,
}
