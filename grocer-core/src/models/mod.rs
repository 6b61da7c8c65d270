mod entry;
mod item;
mod shopping_list;

pub use entry::Entry;
pub use item::{Item, ItemPatch};
pub use shopping_list::{ShoppingList, ShoppingListPatch};
