pub mod errors;
pub mod models;

pub use errors::TangochoError;
pub use models::{
    ImportBatch,
    NewWord,
    ProtoRecord,
    WordRecord,
};
