pub mod category;
pub mod goal;
pub mod money;
pub mod summary;
pub mod transaction;

pub use category::Category;
pub use goal::{Goal, GoalCategory, GoalDraft, GoalError};
pub use money::Money;
pub use summary::Summary;
pub use transaction::{DraftError, TransactionDraft, ValidatedTransaction};
