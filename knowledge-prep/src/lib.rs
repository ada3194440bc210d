//! Offline preparation of the medical context served to the Q&A phase.
//!
//! HTML service pages are first reduced to [`ServicePage`] JSON documents,
//! which are then rendered into one plain-text file per (HMO, tier) pair.

pub mod generate;
pub mod html_to_json;
pub mod model;

pub use generate::{generate_all, load_pages, render_context};
pub use html_to_json::{convert_dir, parse_service_page};
pub use model::{ContactDetails, ServiceDescription, ServicePage, TitledSection};
