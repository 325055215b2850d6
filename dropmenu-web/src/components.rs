pub mod drop_menu;

pub use drop_menu::{DropMenu, MenuOption, Props};
