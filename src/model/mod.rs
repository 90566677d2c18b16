pub mod credit;
pub mod title;

pub use credit::{CreditRow, PersonCharacter, PersonTitle};
pub use title::TitleRecord;
