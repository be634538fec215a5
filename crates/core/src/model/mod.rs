mod block;
mod identity;
mod ids;
mod purchase;
mod question;
mod theme;

pub use block::{Block, Price};
pub use identity::{IdentityError, Viewer};
pub use ids::{BlockId, ParseIdError, QuestionId, UserId};
pub use purchase::{PurchaseRequest, PurchaseTarget};
pub use question::Question;
pub use theme::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_TEXT_COLOR, Theme, ThemeConfig,
};
