//! Session-stored state and template view models.

pub mod session;
pub mod view;

pub use session::{load_order_session, save_order_session};
pub use view::{CartView, ChatMessageView, MenuSectionView, NoticeView, SessionSnapshot};
