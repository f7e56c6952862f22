pub mod core;
pub mod import;
pub mod persistence;
pub mod store;

pub use crate::{
    core::{
        ImportBatch,
        NewWord,
        TangochoError,
        WordRecord,
    },
    store::{
        ImportOutcome,
        WordStore,
    },
};
