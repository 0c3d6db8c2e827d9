//! UIコンポーネント

pub mod dropzone;
pub mod evaluation_image;
pub mod evaluation_page;
pub mod evaluation_results;
pub mod model_selector;
pub mod percent_badge;
pub mod sidebar;
pub mod threshold_slider;
