mod catalog;
mod dialog;
mod question;
mod viewer;

pub use catalog::CatalogView;
pub use dialog::{ConfirmDialog, NoticeBanner};
pub use question::QuestionView;
pub use viewer::{ViewerPage, ViewerView};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
