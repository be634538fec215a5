use outloud_core::ViewerSession;
use outloud_core::model::{Block, BlockId, Price};

#[derive(Clone, Debug, PartialEq)]
pub struct BlockCardVm {
    pub id: BlockId,
    pub name: String,
    pub label: String,
    pub locked: bool,
    pub pending: bool,
}

impl BlockCardVm {
    fn from_block(block: &Block, entering: Option<BlockId>) -> Self {
        Self {
            id: block.id(),
            name: block.name().to_owned(),
            label: block_label(block),
            locked: !block.is_open(),
            pending: entering == Some(block.id()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogVm {
    pub loaded: bool,
    pub blocks: Vec<BlockCardVm>,
    pub buy_all_label: String,
    pub greeting: Option<String>,
}

/// "Open" when the backend says so, otherwise "Free" or "Paid · {price} ₽".
#[must_use]
pub fn block_label(block: &Block) -> String {
    if block.accessible() == Some(true) && block.is_paid() {
        "Open".to_owned()
    } else if block.is_paid() {
        format!("Paid · {} ₽", block.price())
    } else {
        "Free".to_owned()
    }
}

#[must_use]
pub fn buy_all_label(price: Option<Price>) -> String {
    match price {
        Some(price) if price.amount() > 0.0 => format!("Buy all blocks · {price} ₽"),
        _ => "Buy all blocks".to_owned(),
    }
}

#[must_use]
pub fn map_catalog(session: &ViewerSession) -> CatalogVm {
    CatalogVm {
        loaded: session.catalog_loaded(),
        blocks: session
            .catalog()
            .iter()
            .map(|block| BlockCardVm::from_block(block, session.entering()))
            .collect(),
        buy_all_label: buy_all_label(session.bundle_price()),
        greeting: session
            .viewer()
            .and_then(|viewer| viewer.display_name())
            .map(|name| format!("Hi, {name}!")),
    }
}
