mod catalog_vm;
mod question_vm;

pub use catalog_vm::{BlockCardVm, CatalogVm, block_label, buy_all_label, map_catalog};
pub use question_vm::{QuestionVm, map_question};
