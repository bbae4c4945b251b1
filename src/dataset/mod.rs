//! Issuer upload parsing and explanation export

mod errors;
mod export;
mod frame;

pub use errors::{DatasetError, DatasetResult};
pub use export::{explanations_to_csv, write_explanations_csv, DEFAULT_EXPORT_FILE_NAME};
pub use frame::{
    parse_timestamp, IssuerFrame, IssuerId, IssuerRecord, UploadPreview, ISSUER_ID_COLUMN,
    LAST_UPDATED_COLUMN, TARGET_COLUMN,
};
