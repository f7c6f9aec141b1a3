pub mod input;
pub mod mutator;
pub mod path;
pub mod value;

pub use input::{InputEvent, InputKind};
pub use mutator::{get_in, get_path, merge_defaults, set_in, set_path, MAX_LIST_GAP};
pub use path::{FieldPath, Segment};
pub use value::{FormMap, FormValue};
