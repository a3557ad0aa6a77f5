//! Controller layer: navigation, page state, the image carousel, and command orchestration.

pub mod carousel;
pub mod events;
pub mod navigation;
pub mod notices;
pub mod orchestration;
pub mod previews;
pub mod scroll_lock;
pub mod session;
pub mod template_form;
pub mod template_list;
