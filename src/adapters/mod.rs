pub mod io;
pub mod serving_split;

pub use io::{load_menu, load_request, save_json};
pub use serving_split::{split, split_menu};
