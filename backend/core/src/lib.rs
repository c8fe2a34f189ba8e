pub mod error;
pub mod traits;
pub mod types;
pub mod wire;

pub use error::{GranthaError, Result};
pub use traits::Recognizer;
pub use types::{EncodedImage, ItemId, ItemStatus, ProcessingStatus};
pub use wire::{
    GenerateRequest, GenerateRequestBody, GenerateResponse, GENERATE_PATH, HEALTH_PATH,
    MISSING_FIELDS_MESSAGE, NO_RESULT_TEXT,
};
