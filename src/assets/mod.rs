pub mod record;

pub use record::{
    ArticulatedRecord, ModelRecord, NodeRecord, TransformationRecord, load_articulated_str,
    load_model_str, save_articulated_string,
};
