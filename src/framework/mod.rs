// Handler framework - access control, pagination and request extraction

pub mod extract;
pub mod pagination;
pub mod privacy;

pub use extract::{QueryParams, ValidJson, ValidPath};
pub use pagination::{Page, Pager};
pub use privacy::{Operation, PrivacyPolicy, PrivacyRule};
