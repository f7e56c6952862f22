pub mod fields;

pub mod flatten;

pub mod normalize;

pub mod rows;

pub mod schema;

pub use normalize::{
    normalize_json,
    normalize_rows,
};
pub use schema::{
    detect,
    Schema,
};
