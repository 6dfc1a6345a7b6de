mod action;
mod error;
mod item_stack;
mod storage;

pub use action::{perform_storage_action, StorageActionError};
pub use error::StorageError;
pub use item_stack::ItemStack;
pub use storage::{MoveKind, StorageComponent};
